//! Account store: identifier allocation and per-account locks.

use crate::account::{Account, AccountId};
use crate::amount::Amount;
use crate::error::{LedgerError, Result};
use log::{debug, warn};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Shared handle to one account's lock. Never leaves the crate.
pub(crate) type AccountHandle = Arc<Mutex<Account>>;

/// Source of account identifiers. Must be safe to call from several threads.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> AccountId;
}

/// Random v4 UUIDs rendered as hyphenated strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> AccountId {
        AccountId::new(Uuid::new_v4().to_string())
    }
}

/// Maps account ids to accounts.
///
/// The map itself sits behind a read-write lock that is only written by
/// [`AccountStore::create`]. Each account has its own mutex, so work on one
/// account never waits on another.
pub struct AccountStore {
    accounts: RwLock<HashMap<AccountId, AccountHandle>>,
    ids: Box<dyn IdGenerator>,
}

impl AccountStore {
    /// Upper bound on generator calls per `create`.
    pub const MAX_ID_ATTEMPTS: usize = 8;

    /// Creates an empty store that assigns random UUID account ids.
    pub fn new() -> Self {
        Self::with_id_generator(UuidGenerator)
    }

    /// Creates an empty store that takes account ids from `ids`.
    pub fn with_id_generator(ids: impl IdGenerator + 'static) -> Self {
        AccountStore {
            accounts: RwLock::new(HashMap::new()),
            ids: Box::new(ids),
        }
    }

    /// Creates an account holding `initial_balance` and no holds.
    pub fn create(&self, initial_balance: Amount) -> Result<AccountId> {
        if initial_balance.is_negative() {
            return Err(LedgerError::InvalidAmount {
                amount: initial_balance,
            });
        }

        let mut accounts = self.accounts.write();
        for _ in 0..Self::MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if accounts.contains_key(&id) {
                warn!("Generated account id {} already in use, retrying", id);
                continue;
            }

            let account = Account::new(id.clone(), initial_balance);
            accounts.insert(id.clone(), Arc::new(Mutex::new(account)));
            debug!("Created account {} with balance {}", id, initial_balance);
            return Ok(id);
        }

        Err(LedgerError::IdCollision {
            attempts: Self::MAX_ID_ATTEMPTS,
        })
    }

    /// Looks up the lock guarding `id`.
    pub(crate) fn get(&self, id: &AccountId) -> Result<AccountHandle> {
        self.accounts
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::AccountNotFound(id.clone()))
    }

    pub fn contains(&self, id: &AccountId) -> bool {
        self.accounts.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }

    /// All known ids, in no particular order.
    pub fn ids(&self) -> Vec<AccountId> {
        self.accounts.read().keys().cloned().collect()
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}
