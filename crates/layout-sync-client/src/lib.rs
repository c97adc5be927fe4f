//! layout-sync-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/` and
//! the binary entry point in `main.rs` share the same module tree.
//!
//! [`LayoutSync`] wires the application services together around one shared
//! [`ActiveAccount`](application::session::ActiveAccount) and one
//! [`SaveCoordinator`](application::save_coordinator::SaveCoordinator).

pub mod application;
pub mod infrastructure;

use std::sync::Arc;
use std::time::Duration;

use layout_sync_core::Notifier;

use application::account_store::AccountStore;
use application::layout_repository::LayoutRepository;
use application::manage_account::AccountService;
use application::save_coordinator::SaveCoordinator;
use application::session::ActiveAccount;

/// The assembled client: session, save queue, repository and account service.
pub struct LayoutSync {
    pub active: Arc<ActiveAccount>,
    pub saves: Arc<SaveCoordinator>,
    pub layouts: LayoutRepository,
    pub accounts: AccountService,
}

impl LayoutSync {
    /// Builds the client on top of `store`, reporting problems to `notifier`.
    pub fn new(
        store: Arc<dyn AccountStore>,
        notifier: Arc<dyn Notifier>,
        min_save_interval: Duration,
    ) -> Self {
        let active = Arc::new(ActiveAccount::new());
        let saves = SaveCoordinator::new(
            Arc::clone(&active),
            Arc::clone(&store),
            Arc::clone(&notifier),
            min_save_interval,
        );
        let layouts = LayoutRepository::new(
            Arc::clone(&active),
            Arc::clone(&saves),
            Arc::clone(&notifier),
        );
        let accounts = AccountService::new(Arc::clone(&active), store, Arc::clone(&saves), notifier);
        Self {
            active,
            saves,
            layouts,
            accounts,
        }
    }
}
