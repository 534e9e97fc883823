//! Script commands for batch replay.

use crate::amount::Amount;
use serde::Deserialize;

/// Raw script row as read from CSV.
///
/// `vendor` and `amount` are optional at this level; which ones are required
/// depends on the command type.
#[derive(Debug, Deserialize)]
pub struct CommandRecord {
    /// Command type: open, charge, hold, settle
    #[serde(rename = "type")]
    pub op: String,

    /// Script-local account label
    pub account: String,

    #[serde(default)]
    pub vendor: Option<String>,

    #[serde(default)]
    pub amount: Option<Amount>,
}

impl CommandRecord {
    /// Turns the raw row into a typed command, or says what is missing.
    pub fn parse(&self) -> Result<ParsedCommand, &'static str> {
        let account = self.account.trim();
        if account.is_empty() {
            return Err("missing account label");
        }

        let command = match self.op.trim().to_lowercase().as_str() {
            "open" => Command::Open {
                initial_balance: self.amount.ok_or("open requires an amount")?,
            },
            "charge" => Command::Charge {
                amount: self.amount.ok_or("charge requires an amount")?,
            },
            "hold" => Command::Hold {
                vendor_id: self.vendor_id().ok_or("hold requires a vendor")?,
                amount: self.amount.ok_or("hold requires an amount")?,
            },
            "settle" => Command::Settle {
                vendor_id: self.vendor_id().ok_or("settle requires a vendor")?,
                actual_amount: self.amount.ok_or("settle requires an amount")?,
            },
            _ => return Err("unknown command type"),
        };

        Ok(ParsedCommand {
            account: account.to_string(),
            command,
        })
    }

    fn vendor_id(&self) -> Option<String> {
        self.vendor
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

/// A typed command bound to an account label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub account: String,
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create an account and bind it to the row's label.
    Open { initial_balance: Amount },

    /// Direct debit.
    Charge { amount: Amount },

    /// Reserve funds for a vendor.
    Hold { vendor_id: String, amount: Amount },

    /// Finalise a vendor's hold at the actual amount.
    Settle {
        vendor_id: String,
        actual_amount: Amount,
    },
}
