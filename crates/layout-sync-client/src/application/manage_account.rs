//! AccountService: registration, sign-in, sign-out and settings.
//!
//! Signing in loads the account document from the remote store and makes it
//! the [`ActiveAccount`].  Documents written by older clients are repaired on
//! the way in (*hydration*):
//!
//! 1. String-encoded `state` values are decoded; undecodable ones become
//!    `null` and raise an error toast.
//! 2. Layouts without a `state_revision` get `0`.
//! 3. The single-default rule is restored.
//!
//! Hydration never writes back by itself.  The repaired document reaches the
//! store with the next save.

use std::sync::Arc;

use layout_sync_core::{
    safe_parse_state, seed_default_layout, Account, Notifier, SettingsPatch, Toast,
};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::account_store::{AccountStore, StoreError};
use super::save_coordinator::SaveCoordinator;
use super::session::ActiveAccount;

/// Errors returned by sign-in operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No account matched the identifier or name.
    #[error("account not found: {0}")]
    NotFound(String),

    /// The remote store could not be queried.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Input for [`AccountService::register`].
#[derive(Debug, Clone, Default)]
pub struct Registration {
    /// Identifier to use; a fresh UUID is minted when `None`.
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    /// Settings that differ from the defaults.
    pub settings: SettingsPatch,
}

/// How the account to sign in was looked up; only affects the toast text.
#[derive(Debug, Clone, Copy)]
enum Lookup {
    Id,
    Name,
}

impl Lookup {
    fn success_detail(self) -> &'static str {
        match self {
            Self::Id => "Signed in successfully by ID",
            Self::Name => "Signed in successfully by Name",
        }
    }
}

/// Account lifecycle operations on top of the session and save queue.
pub struct AccountService {
    active: Arc<ActiveAccount>,
    store: Arc<dyn AccountStore>,
    saves: Arc<SaveCoordinator>,
    notifier: Arc<dyn Notifier>,
}

impl AccountService {
    pub fn new(
        active: Arc<ActiveAccount>,
        store: Arc<dyn AccountStore>,
        saves: Arc<SaveCoordinator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            active,
            store,
            saves,
            notifier,
        }
    }

    /// Creates a new account seeded with the stock default layout, makes it
    /// active and queues its first write.
    pub fn register(&self, registration: Registration) -> Account {
        let Registration {
            id,
            first_name,
            last_name,
            settings,
        } = registration;

        let id = id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let mut account = Account::new(id, first_name);
        account.last_name = last_name;
        account.settings.apply(&settings);

        let mut seed = seed_default_layout();
        seed.id = account.mint_layout_id();
        account.layouts.push(seed);

        info!(account = %account.id, "account registered");
        self.active.replace(Some(account.clone()));
        self.notifier.notify(Toast::success(
            "Registration",
            "Account registered successfully.",
        ));
        self.saves.enqueue("register");
        account
    }

    /// Loads the account with identifier `id` and makes it active.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotFound`] if the store has no such account.
    /// - [`SessionError::Store`] if the store could not be reached.
    pub async fn sign_in(&self, id: &str) -> Result<(), SessionError> {
        let found = self.store.get_account(id).await;
        self.finish_sign_in(found, id, Lookup::Id)
    }

    /// Loads the first account whose first name is `name` and makes it active.
    ///
    /// # Errors
    ///
    /// Same as [`AccountService::sign_in`].
    pub async fn sign_in_by_name(&self, name: &str) -> Result<(), SessionError> {
        let found = self.store.find_account_by_name(name).await;
        self.finish_sign_in(found, name, Lookup::Name)
    }

    /// Discards the active account and every layout held in memory.
    ///
    /// A coalesced flush that is still armed finds no account when it fires
    /// and is dropped.
    pub fn logout(&self) {
        if let Some(previous) = self.active.replace(None) {
            info!(account = %previous.id, "signed out");
        }
        self.notifier
            .notify(Toast::info("Logout", "You have been logged out."));
    }

    /// Merges `patch` into the active account's settings and queues a write.
    ///
    /// Returns `false` when no account is active.
    pub fn update_settings(&self, patch: &SettingsPatch) -> bool {
        if self.active.with_mut(|a| a.settings.apply(patch)).is_none() {
            return false;
        }
        self.saves.enqueue("settings");
        true
    }

    fn finish_sign_in(
        &self,
        found: Result<Option<Account>, StoreError>,
        key: &str,
        lookup: Lookup,
    ) -> Result<(), SessionError> {
        match found {
            Ok(Some(account)) => {
                let account = hydrate_account(account, self.notifier.as_ref());
                info!(account = %account.id, layouts = account.layouts.len(), "signed in");
                self.active.replace(Some(account));
                self.notifier
                    .notify(Toast::success("Sign In", lookup.success_detail()));
                Ok(())
            }
            Ok(None) => {
                warn!(?lookup, key, "sign-in failed: account not found");
                self.notifier
                    .notify(Toast::error("Sign In", "Account not found"));
                Err(SessionError::NotFound(key.to_string()))
            }
            Err(e) => {
                warn!(?lookup, key, "sign-in failed: {e}");
                self.notifier.notify(Toast::error("Sign In", "Sign in error."));
                Err(e.into())
            }
        }
    }
}

/// Repairs a freshly loaded account document.
///
/// Decodes string-encoded layout states (undecodable ones become `null`),
/// backfills missing revisions and restores the single-default rule.
pub fn hydrate_account(mut account: Account, notifier: &dyn Notifier) -> Account {
    for layout in &mut account.layouts {
        layout.state = safe_parse_state(&layout.state, notifier).unwrap_or(Value::Null);
        layout.ensure_revision();
    }
    account.repair_default();
    account
}

// ── Tests ─────────────────────────────────────────────────────────────────────
