//! Ledger engine: charge, hold and settle against stored accounts.
//!
//! Every operation validates its amount, resolves the account, then runs
//! the transition while holding that account's lock. Business rejections come
//! back as `Ok(false)`; unknown accounts and bad amounts are errors.

use crate::account::{Account, AccountId, Rejection};
use crate::amount::Amount;
use crate::error::{LedgerError, Result};
use crate::store::{AccountStore, IdGenerator};
use log::debug;

/// The debit ledger.
///
/// `Ledger` is `Send + Sync`; share it behind an `Arc` to serve concurrent
/// callers. Operations on the same account are serialized, operations on
/// different accounts run in parallel.
#[derive(Default)]
pub struct Ledger {
    store: AccountStore,
}

impl Ledger {
    /// Creates an empty ledger that assigns random UUID account ids.
    pub fn new() -> Self {
        Ledger {
            store: AccountStore::new(),
        }
    }

    /// Creates an empty ledger that takes account ids from `ids`.
    pub fn with_id_generator(ids: impl IdGenerator + 'static) -> Self {
        Ledger {
            store: AccountStore::with_id_generator(ids),
        }
    }

    pub fn contains(&self, account_id: &AccountId) -> bool {
        self.store.contains(account_id)
    }

    /// Number of accounts opened so far.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Opens an account funded with `initial_balance`.
    pub fn create_account(&self, initial_balance: Amount) -> Result<AccountId> {
        self.store.create(initial_balance)
    }

    /// Debits `amount` from the available balance.
    ///
    /// Returns `Ok(false)` if the balance does not cover it.
    pub fn charge(&self, account_id: &AccountId, amount: Amount) -> Result<bool> {
        require_positive(amount)?;

        let handle = self.store.get(account_id)?;
        let mut account = handle.lock();
        let outcome = account.charge(amount);
        debug_assert!(account.check_invariant());

        if outcome.is_ok() {
            debug!("Charged {} to account {}", amount, account_id);
        }
        Ok(applied("charge", account_id, outcome))
    }

    /// Reserves `amount` for `vendor_id`.
    ///
    /// Returns `Ok(false)` if the balance does not cover it or the vendor
    /// already has a hold on this account.
    pub fn hold(&self, account_id: &AccountId, vendor_id: &str, amount: Amount) -> Result<bool> {
        require_positive(amount)?;

        let handle = self.store.get(account_id)?;
        let mut account = handle.lock();
        let outcome = account.place_hold(vendor_id, amount);
        debug_assert!(account.check_invariant());

        if outcome.is_ok() {
            debug!(
                "Held {} on account {} for vendor {}",
                amount, account_id, vendor_id
            );
        }
        Ok(applied("hold", account_id, outcome))
    }

    /// Settles the hold for `vendor_id` at `actual_amount`.
    ///
    /// The hold is gone after this call whether it returns `true` or `false`,
    /// except when no hold existed in the first place.
    pub fn settle_hold(
        &self,
        account_id: &AccountId,
        vendor_id: &str,
        actual_amount: Amount,
    ) -> Result<bool> {
        if actual_amount.is_negative() {
            return Err(LedgerError::InvalidAmount {
                amount: actual_amount,
            });
        }

        let handle = self.store.get(account_id)?;
        let mut account = handle.lock();
        let outcome = account.settle_hold(vendor_id, actual_amount);
        debug_assert!(account.check_invariant());

        if outcome.is_ok() {
            debug!(
                "Settled hold for vendor {} on account {} at {}, balance now {}",
                vendor_id, account_id, actual_amount, account.balance()
            );
        }
        Ok(applied("settle", account_id, outcome))
    }

    /// Point-in-time copy of an account.
    ///
    /// The copy is detached from the ledger and exposes no way to change
    /// the stored account:
    ///
    /// ```compile_fail
    /// use debit_ledger::{Amount, Ledger};
    ///
    /// let ledger = Ledger::new();
    /// let acc = ledger.create_account(Amount::from(10)).unwrap();
    /// let mut copy = ledger.account(&acc).unwrap();
    /// copy.balance = Amount::from(-100);
    /// ```
    ///
    /// ```compile_fail
    /// use debit_ledger::{Amount, Ledger};
    ///
    /// let ledger = Ledger::new();
    /// let acc = ledger.create_account(Amount::from(10)).unwrap();
    /// let mut copy = ledger.account(&acc).unwrap();
    /// copy.place_hold("vendor", Amount::from(-5)).unwrap();
    /// ```
    pub fn account(&self, account_id: &AccountId) -> Result<Account> {
        let handle = self.store.get(account_id)?;
        let account = handle.lock().clone();
        Ok(account)
    }
}

fn require_positive(amount: Amount) -> Result<()> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(LedgerError::InvalidAmount { amount })
    }
}

fn applied(op: &str, account_id: &AccountId, outcome: std::result::Result<(), Rejection>) -> bool {
    match outcome {
        Ok(()) => true,
        Err(reason) => {
            debug!("Rejected {} on account {}: {}", op, account_id, reason);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with(balance: i64) -> (Ledger, AccountId) {
        let ledger = Ledger::new();
        let id = ledger.create_account(Amount::from(balance)).unwrap();
        (ledger, id)
    }

    #[test]
    fn test_hold_then_duplicate() {
        let (ledger, acc) = ledger_with(234);

        assert!(ledger.hold(&acc, "pizza_hut", Amount::from(200)).unwrap());
        assert_eq!(ledger.account(&acc).unwrap().balance(), Amount::from(34));

        assert!(!ledger.hold(&acc, "pizza_hut", Amount::from(1)).unwrap());
        assert_eq!(ledger.account(&acc).unwrap().balance(), Amount::from(34));
    }

    #[test]
    fn test_settle_reconciles_actual_amount() {
        let (ledger, acc) = ledger_with(123);
        assert!(ledger.hold(&acc, "pizza_hut", Amount::from(100)).unwrap());
        assert!(ledger
            .settle_hold(&acc, "pizza_hut", Amount::from(110))
            .unwrap());

        let account = ledger.account(&acc).unwrap();
        assert_eq!(account.balance(), Amount::from(13));
        assert_eq!(account.hold_count(), 0);
    }

    #[test]
    fn test_charge_rejects_non_positive_amounts() {
        let (ledger, acc) = ledger_with(10);
        assert!(matches!(
            ledger.charge(&acc, Amount::ZERO),
            Err(LedgerError::InvalidAmount { .. })
        ));
        assert!(matches!(
            ledger.charge(&acc, Amount::from(-5)),
            Err(LedgerError::InvalidAmount { .. })
        ));
        assert_eq!(ledger.account(&acc).unwrap().balance(), Amount::from(10));
    }

    #[test]
    fn test_hold_rejects_non_positive_amounts() {
        let (ledger, acc) = ledger_with(10);
        assert!(matches!(
            ledger.hold(&acc, "v", Amount::ZERO),
            Err(LedgerError::InvalidAmount { .. })
        ));
        assert!(ledger.account(&acc).unwrap().hold_for("v").is_none());
    }

    #[test]
    fn test_settle_rejects_negative_but_allows_zero() {
        let (ledger, acc) = ledger_with(10);
        ledger.hold(&acc, "v", Amount::from(4)).unwrap();

        assert!(matches!(
            ledger.settle_hold(&acc, "v", Amount::from(-1)),
            Err(LedgerError::InvalidAmount { .. })
        ));
        assert!(ledger.account(&acc).unwrap().hold_for("v").is_some());

        assert!(ledger.settle_hold(&acc, "v", Amount::ZERO).unwrap());
        assert_eq!(ledger.account(&acc).unwrap().balance(), Amount::from(10));
    }

    #[test]
    fn test_unknown_account_is_an_error() {
        let ledger = Ledger::new();
        let missing = AccountId::new("nope");

        assert!(matches!(
            ledger.charge(&missing, Amount::from(1)),
            Err(LedgerError::AccountNotFound(_))
        ));
        assert!(matches!(
            ledger.hold(&missing, "v", Amount::from(1)),
            Err(LedgerError::AccountNotFound(_))
        ));
        assert!(matches!(
            ledger.settle_hold(&missing, "v", Amount::from(1)),
            Err(LedgerError::AccountNotFound(_))
        ));
        assert!(matches!(
            ledger.account(&missing),
            Err(LedgerError::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_ledgers_do_not_share_accounts() {
        let (first, acc) = ledger_with(10);
        let second = Ledger::new();

        assert!(first.contains(&acc));
        assert!(!second.contains(&acc));
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert!(second.charge(&acc, Amount::from(1)).is_err());
    }

    #[test]
    fn test_account_copy_is_detached() {
        let (ledger, acc) = ledger_with(50);
        let before = ledger.account(&acc).unwrap();

        assert!(ledger.hold(&acc, "cinema", Amount::from(20)).unwrap());

        assert_eq!(before.balance(), Amount::from(50));
        assert!(before.hold_for("cinema").is_none());

        let after = ledger.account(&acc).unwrap();
        assert_eq!(after.balance(), Amount::from(30));
        assert_eq!(after.hold_for("cinema").unwrap().amount(), Amount::from(20));
        assert_eq!(after.hold_for("cinema").unwrap().vendor_id(), "cinema");
    }
}
