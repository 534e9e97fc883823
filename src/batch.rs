//! Batch replay of CSV command scripts against a [`Ledger`].
//!
//! Rows are read one at a time. A row that cannot be applied is logged at
//! warn level and skipped; business rejections are counted but are not
//! failures of the script.

use crate::account::AccountId;
use crate::amount::Amount;
use crate::command::{Command, CommandRecord, ParsedCommand};
use crate::error::{LedgerError, Result};
use crate::ledger::Ledger;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use log::{debug, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{Read, Write};

/// Row counts from a replay.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// Commands the ledger applied.
    pub applied: usize,

    /// Commands the ledger answered with `false`.
    pub rejected: usize,

    /// Rows that never reached the ledger or raised an error.
    pub skipped: usize,
}

/// Replays scripts and reports final account states.
///
/// Account labels are local to the processor; the ledger only sees the ids it
/// generated. Output is sorted by label.
pub struct BatchProcessor {
    ledger: Ledger,
    labels: BTreeMap<String, AccountId>,
    summary: BatchSummary,
}

#[derive(Serialize)]
struct AccountRow<'a> {
    account: &'a str,
    available: Amount,
    held: Amount,
    total: Amount,
    holds: usize,
}

impl BatchProcessor {
    pub fn new() -> Self {
        Self::with_ledger(Ledger::new())
    }

    pub fn with_ledger(ledger: Ledger) -> Self {
        BatchProcessor {
            ledger,
            labels: BTreeMap::new(),
            summary: BatchSummary::default(),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Id bound to a script label by an `open` row.
    pub fn account_id(&self, label: &str) -> Option<&AccountId> {
        self.labels.get(label)
    }

    pub fn summary(&self) -> BatchSummary {
        self.summary
    }

    /// Replays every row of a CSV script.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<CommandRecord>().enumerate() {
            let row = row_idx + 2; // 1-indexed, after the header

            let parsed = match result {
                Ok(record) => record.parse().map_err(|message| LedgerError::InvalidRecord {
                    row,
                    message: message.to_string(),
                }),
                Err(e) => Err(LedgerError::Csv(e)),
            };

            match parsed.and_then(|cmd| self.apply(cmd, row)) {
                Ok(true) => self.summary.applied += 1,
                Ok(false) => self.summary.rejected += 1,
                Err(e) => {
                    warn!("Row {}: {}, skipping", row, e);
                    self.summary.skipped += 1;
                }
            }
        }

        debug!(
            "Replay finished: {} applied, {} rejected, {} skipped",
            self.summary.applied, self.summary.rejected, self.summary.skipped
        );
        Ok(())
    }

    fn apply(&mut self, cmd: ParsedCommand, row: usize) -> Result<bool> {
        match cmd.command {
            Command::Open { initial_balance } => self.open(cmd.account, initial_balance, row),
            Command::Charge { amount } => {
                let id = self.resolve(&cmd.account, row)?;
                self.ledger.charge(id, amount)
            }
            Command::Hold { vendor_id, amount } => {
                let id = self.resolve(&cmd.account, row)?;
                self.ledger.hold(id, &vendor_id, amount)
            }
            Command::Settle {
                vendor_id,
                actual_amount,
            } => {
                let id = self.resolve(&cmd.account, row)?;
                self.ledger.settle_hold(id, &vendor_id, actual_amount)
            }
        }
    }

    fn open(&mut self, label: String, initial_balance: Amount, row: usize) -> Result<bool> {
        if self.labels.contains_key(&label) {
            return Err(LedgerError::InvalidRecord {
                row,
                message: format!("account {} already opened", label),
            });
        }

        let id = self.ledger.create_account(initial_balance)?;
        debug!("Row {}: opened {} as {}", row, label, id);
        self.labels.insert(label, id);
        Ok(true)
    }

    fn resolve(&self, label: &str, row: usize) -> Result<&AccountId> {
        self.labels
            .get(label)
            .ok_or_else(|| LedgerError::InvalidRecord {
                row,
                message: format!("unknown account {}", label),
            })
    }

    /// Writes `account,available,held,total,holds` for every opened account.
    pub fn write_output<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);

        csv_writer.write_record(["account", "available", "held", "total", "holds"])?;

        for (label, id) in &self.labels {
            let account = self.ledger.account(id)?;
            csv_writer.serialize(AccountRow {
                account: label,
                available: account.balance(),
                held: account.held(),
                total: account.total(),
                holds: account.hold_count(),
            })?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new()
    }
}
