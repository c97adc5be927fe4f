//! In-process account store for offline runs and integration tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use layout_sync_core::Account;

use crate::application::account_store::{AccountStore, StoreError};

/// [`AccountStore`] keeping documents in a map keyed by account id.
///
/// Name lookups scan accounts in id order, so "first match" is deterministic.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: Mutex<BTreeMap<String, Account>>,
    puts: AtomicUsize,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `accounts`.
    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        let store = Self::new();
        {
            let mut map = store.lock();
            for account in accounts {
                map.insert(account.id.clone(), account);
            }
        }
        store
    }

    /// Stored copy of account `id`.
    pub fn account(&self, id: &str) -> Option<Account> {
        self.lock().get(id).cloned()
    }

    /// Number of `put_account` calls served.
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Account>> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn put_account(&self, account: &Account) -> Result<(), StoreError> {
        self.lock().insert(account.id.clone(), account.clone());
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get_account(&self, id: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.account(id))
    }

    async fn find_account_by_name(&self, name: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .lock()
            .values()
            .find(|a| a.first_name == name)
            .cloned())
    }
}
