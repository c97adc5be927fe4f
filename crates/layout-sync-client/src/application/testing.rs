//! Hand-written test doubles shared by the application-layer tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use layout_sync_core::{Account, Notifier, Toast};

use super::account_store::{AccountStore, StoreError};

/// Store that records every write and can be slowed down or made to fail.
///
/// Writes are identified by the account's `first_name`, which tests use as a
/// marker for "which state was written".
#[derive(Default)]
pub(crate) struct RecordingStore {
    pub(crate) attempts: Mutex<Vec<String>>,
    pub(crate) saved: Mutex<Vec<Account>>,
    pub(crate) delay: Duration,
    pub(crate) failures_left: AtomicUsize,
    pub(crate) in_flight: AtomicUsize,
    pub(crate) max_in_flight: AtomicUsize,
}

impl RecordingStore {
    pub(crate) fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    pub(crate) fn failing_first(n: usize) -> Self {
        Self {
            failures_left: AtomicUsize::new(n),
            ..Default::default()
        }
    }

    /// Markers of successful writes, in order.
    pub(crate) fn saved(&self) -> Vec<String> {
        self.saved
            .lock()
            .unwrap()
            .iter()
            .map(|a| a.first_name.clone())
            .collect()
    }

    pub(crate) fn write_count(&self) -> usize {
        self.saved.lock().unwrap().len()
    }

    pub(crate) fn last_saved(&self) -> Option<Account> {
        self.saved.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl AccountStore for RecordingStore {
    async fn put_account(&self, account: &Account) -> Result<(), StoreError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.attempts.lock().unwrap().push(account.first_name.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if fail {
            return Err(StoreError::Unreachable("injected failure".to_string()));
        }
        self.saved.lock().unwrap().push(account.clone());
        Ok(())
    }

    async fn get_account(&self, _id: &str) -> Result<Option<Account>, StoreError> {
        Ok(None)
    }

    async fn find_account_by_name(&self, _name: &str) -> Result<Option<Account>, StoreError> {
        Ok(None)
    }
}

/// Notifier that keeps every toast.
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    /// Removes and returns every toast recorded so far.
    pub(crate) fn take(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.toasts.lock().unwrap())
    }

    pub(crate) fn summaries(&self) -> Vec<String> {
        self.toasts
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.summary.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }
}
