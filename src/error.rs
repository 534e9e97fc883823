//! Error types for the ledger and its batch front end.

use crate::account::AccountId;
use crate::amount::Amount;
use thiserror::Error;

/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Failures raised to the caller.
///
/// Business outcomes such as insufficient funds are not errors; see
/// [`crate::Rejection`].
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Amount outside the range an operation accepts
    #[error("invalid amount {amount}")]
    InvalidAmount { amount: Amount },

    /// Unknown account identifier
    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    /// The id generator kept returning identifiers already in use
    #[error("could not allocate a unique account id after {attempts} attempts")]
    IdCollision { attempts: usize },

    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Script row that cannot be applied
    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Missing input file argument
    #[error("Missing input file argument. Usage: debit-ledger <script.csv>")]
    MissingArgument,
}
