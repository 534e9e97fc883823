//! Account and hold model.
//!
//! An [`Account`] owns one available balance and at most one [`Hold`] per
//! vendor. The state transitions here are the whole of the ledger's business
//! rules; locking and lookup live in [`crate::store`] and [`crate::ledger`].

use crate::amount::Amount;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Opaque, store-unique account identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        AccountId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Funds reserved for one vendor until settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hold {
    vendor_id: String,

    /// Fixed when the hold is placed; already subtracted from the balance.
    amount: Amount,
}

impl Hold {
    pub fn vendor_id(&self) -> &str {
        &self.vendor_id
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// Why a ledger operation was refused without raising an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Amount, available: Amount },

    #[error("vendor {vendor_id} already holds funds on this account")]
    DuplicateHold { vendor_id: String },

    #[error("no active hold for vendor {vendor_id}")]
    HoldNotFound { vendor_id: String },

    /// The hold was released in full; nothing was charged.
    #[error("settlement of {actual} exceeds coverable funds {coverable}")]
    SettlementExceedsReserve { actual: Amount, coverable: Amount },
}

/// Account state.
///
/// Outside this crate an `Account` is only ever a copy returned by
/// [`crate::Ledger::account`]; every transition goes through the ledger.
///
/// # Invariants
///
/// - `balance >= 0` after every operation; a debit that would break this is
///   rejected before anything changes
/// - at most one hold per vendor id
/// - `balance + held()` only moves down, and only by completed charges and
///   settlements
#[derive(Debug, Clone)]
pub struct Account {
    id: AccountId,

    /// Available (unreserved) funds.
    balance: Amount,

    holds: HashMap<String, Hold>,
}

impl Account {
    /// Creates an account with no holds. The caller validates the sign of
    /// `initial_balance`.
    pub(crate) fn new(id: AccountId, initial_balance: Amount) -> Self {
        Account {
            id,
            balance: initial_balance,
            holds: HashMap::new(),
        }
    }

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    /// Available (unreserved) funds.
    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn hold_for(&self, vendor_id: &str) -> Option<&Hold> {
        self.holds.get(vendor_id)
    }

    pub fn holds(&self) -> impl Iterator<Item = &Hold> {
        self.holds.values()
    }

    pub fn hold_count(&self) -> usize {
        self.holds.len()
    }

    /// Sum of all active hold amounts.
    pub fn held(&self) -> Amount {
        self.holds.values().map(|h| h.amount).sum()
    }

    /// Available plus reserved funds.
    pub fn total(&self) -> Amount {
        self.balance + self.held()
    }

    /// Debits `amount` directly from the available balance.
    ///
    /// Outstanding holds are not consulted.
    pub(crate) fn charge(&mut self, amount: Amount) -> Result<(), Rejection> {
        if self.balance < amount {
            return Err(Rejection::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }

        self.balance -= amount;
        Ok(())
    }

    /// Reserves `amount` for `vendor_id`.
    ///
    /// The funds check runs before the duplicate-vendor check.
    pub(crate) fn place_hold(&mut self, vendor_id: &str, amount: Amount) -> Result<(), Rejection> {
        if amount > self.balance {
            return Err(Rejection::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }

        if self.holds.contains_key(vendor_id) {
            return Err(Rejection::DuplicateHold {
                vendor_id: vendor_id.to_string(),
            });
        }

        self.holds.insert(
            vendor_id.to_string(),
            Hold {
                vendor_id: vendor_id.to_string(),
                amount,
            },
        );
        self.balance -= amount;
        Ok(())
    }

    /// Finalises the hold for `vendor_id` at `actual_amount`.
    ///
    /// The hold is consumed on both outcomes. On success the unused part of
    /// the reservation returns to the balance (or the overage is debited from
    /// it). When `actual_amount` exceeds balance plus reservation, the whole
    /// reservation returns and [`Rejection::SettlementExceedsReserve`] is
    /// reported. A missing hold changes nothing.
    pub(crate) fn settle_hold(&mut self, vendor_id: &str, actual_amount: Amount) -> Result<(), Rejection> {
        let hold = self
            .holds
            .remove(vendor_id)
            .ok_or_else(|| Rejection::HoldNotFound {
                vendor_id: vendor_id.to_string(),
            })?;

        let coverable = self.balance + hold.amount;
        if actual_amount > coverable {
            self.balance = coverable;
            return Err(Rejection::SettlementExceedsReserve {
                actual: actual_amount,
                coverable,
            });
        }

        self.balance = coverable - actual_amount;
        Ok(())
    }

    /// Checks the invariants that do not need history.
    pub(crate) fn check_invariant(&self) -> bool {
        !self.balance.is_negative()
            && self.holds.iter().all(|(vendor, hold)| {
                *vendor == hold.vendor_id && !hold.amount.is_negative()
            })
    }
}
