//! Debit Ledger CLI
//!
//! Replays a CSV script of ledger commands and prints the final state of
//! every account it opened.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- script.csv > accounts.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use debit_ledger::{BatchProcessor, LedgerError, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(LedgerError::MissingArgument);
    }

    let file = File::open(&args[1])?;
    let reader = BufReader::new(file);

    let mut processor = BatchProcessor::new();
    processor.process_csv(reader)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    processor.write_output(handle)?;

    Ok(())
}
