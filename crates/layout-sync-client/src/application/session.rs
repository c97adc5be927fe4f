//! ActiveAccount: the single signed-in account held in memory.
//!
//! At most one [`Account`] is active at a time.  Every structural change to
//! layouts goes through [`ActiveAccount::with_mut`]; the save coordinator reads
//! a snapshot through [`ActiveAccount::snapshot`] when it materializes a job.
//!
//! # Lifecycle
//!
//! ```text
//! None ──register / sign_in──►  Some(account)  ──logout──►  None
//! ```
//!
//! Signing out discards every layout held in memory.  A coalesced flush that
//! fires afterwards finds no account and does nothing.
//!
//! # Locking
//!
//! The lock is a plain `std::sync::Mutex`.  It is held only for the duration
//! of a synchronous closure and never across an `.await`, so the save task and
//! the repository never contend for long.

use std::sync::{Mutex, MutexGuard, PoisonError};

use layout_sync_core::Account;

/// Holder of the currently active account.
#[derive(Debug, Default)]
pub struct ActiveAccount {
    inner: Mutex<Option<Account>>,
}

impl ActiveAccount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a holder with `account` already active.
    pub fn with_account(account: Account) -> Self {
        Self {
            inner: Mutex::new(Some(account)),
        }
    }

    /// Returns `true` if an account is signed in.
    pub fn is_active(&self) -> bool {
        self.lock().is_some()
    }

    /// Clones the active account.
    pub fn snapshot(&self) -> Option<Account> {
        self.lock().clone()
    }

    /// Identifier of the active account.
    pub fn account_id(&self) -> Option<String> {
        self.lock().as_ref().map(|a| a.id.clone())
    }

    /// Replaces the active account, returning the previous one.
    pub fn replace(&self, account: Option<Account>) -> Option<Account> {
        std::mem::replace(&mut *self.lock(), account)
    }

    /// Runs `f` against the active account.
    ///
    /// Returns `None` without calling `f` when no account is active.
    pub fn with<R>(&self, f: impl FnOnce(&Account) -> R) -> Option<R> {
        self.lock().as_ref().map(f)
    }

    /// Runs `f` against the active account with mutable access.
    ///
    /// Returns `None` without calling `f` when no account is active.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Account) -> R) -> Option<R> {
        self.lock().as_mut().map(f)
    }

    fn lock(&self) -> MutexGuard<'_, Option<Account>> {
        // Poisoning is ignored: the guarded value is plain data.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
