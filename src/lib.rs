//! # Debit Ledger
//!
//! The bookkeeping core of a debit-card processor: accounts with one available
//! balance, per-vendor holds that are settled for an actual amount, and
//! direct charges.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: amounts carry 4 decimal places via `rust_decimal`
//! - **Per-account locking**: operations on one account are serialized, other
//!   accounts are unaffected
//! - **Strict invariants**: balances never go negative, one hold per vendor
//! - **Rejections are values**: insufficient funds and similar outcomes return
//!   `Ok(false)`; only unknown accounts and invalid amounts are errors
//!
//! ## Example
//!
//! ```
//! use debit_ledger::{Amount, Ledger};
//!
//! let ledger = Ledger::new();
//! let acc = ledger.create_account(Amount::from(123)).unwrap();
//!
//! assert!(ledger.hold(&acc, "pizza_hut", Amount::from(100)).unwrap());
//! assert!(ledger.settle_hold(&acc, "pizza_hut", Amount::from(110)).unwrap());
//! assert_eq!(ledger.account(&acc).unwrap().balance(), Amount::from(13));
//! ```

pub mod account;
pub mod amount;
pub mod batch;
pub mod command;
pub mod error;
pub mod ledger;
pub mod store;

pub use account::{Account, AccountId, Hold, Rejection};
pub use amount::Amount;
pub use batch::{BatchProcessor, BatchSummary};
pub use command::{Command, CommandRecord, ParsedCommand};
pub use error::{LedgerError, Result};
pub use ledger::Ledger;
pub use store::{AccountStore, IdGenerator, UuidGenerator};
