//! SaveCoordinator: coalesced, single-flight persistence of the active account.
//!
//! Grid interactions fire change notifications in bursts (dragging a column
//! edge produces dozens).  Writing the whole account on each one would hammer
//! the remote store and, worse, let an older write land after a newer one.
//! The coordinator turns those bursts into a bounded rate of ordered writes.
//!
//! # State machine
//!
//! ```text
//!          enqueue                 drain                 done
//!  Idle ──────────────► Queued ──────────────► Saving ──────────► Idle
//!                         ▲                      │
//!                         └──── more jobs ───────┘
//! ```
//!
//! # Rules
//!
//! 1. **Minimum interval.**  An `enqueue` that arrives less than
//!    `min_interval` after the last completed save, or while a write is queued
//!    or in flight, does not create a job.  It marks the coordinator dirty and
//!    records its reason.  One flush timer is armed for the interval boundary
//!    once no write is busy; further calls only add their reason.  When the
//!    timer fires it re-checks the boundary (a bypassing write may have moved
//!    it) and snapshots the account *as it is then*, so the write carries the
//!    final state of the burst.
//! 2. **Single flight.**  At most one job executes at a time.  [`drain`] is a
//!    no-op while a job is in flight; the finishing job drains the next one.
//! 3. **FIFO.**  Jobs execute in the order they were queued.
//! 4. **Failures do not stop the queue.**  A failed write is reported as a
//!    toast and the next job still runs.  Nothing is retried: the next
//!    mutation enqueues the current state, which supersedes the lost write.
//!
//! [`drain`]: SaveCoordinator::drain

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use layout_sync_core::{Account, LayoutId, Notifier, Toast};
use thiserror::Error;
use tokio::sync::{oneshot, Notify};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::account_store::{AccountStore, StoreError};
use super::session::ActiveAccount;

/// Default minimum spacing between the end of one save and the next write.
pub const DEFAULT_MIN_SAVE_INTERVAL: Duration = Duration::from_millis(800);

/// Separator used when several reasons are folded into one coalesced flush.
const REASON_SEPARATOR: &str = "+";

/// Errors reported to callers that wait for their write.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Nothing to save: no account is signed in.
    #[error("no active account")]
    NoActiveAccount,

    /// The remote store rejected or never received the write.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The save task went away without reporting a result.
    #[error("save task ended before reporting a result")]
    Abandoned,
}

/// Coarse state for UI indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavePhase {
    /// Nothing queued, pending or running.
    Idle,
    /// Work is queued or a coalesced flush is armed.
    Queued,
    /// A write is in flight.
    Saving,
}

/// One deferred write of the whole account.
pub struct SaveJob {
    /// Why the write was requested (`"layouts"`, `"settings"`, …).
    pub reason: String,
    /// Account snapshot taken when the job was materialized.
    account: Account,
    /// Layout identifiers in collection order, for diagnostics.
    layout_order: Vec<LayoutId>,
    /// Present when a caller awaits this particular write.
    completion: Option<oneshot::Sender<Result<(), StoreError>>>,
}

#[derive(Default)]
struct QueueState {
    queue: VecDeque<SaveJob>,
    in_flight: bool,
    /// Reasons folded into the armed flush, in arrival order.
    pending_reasons: Vec<String>,
    flush_timer: Option<JoinHandle<()>>,
    last_completed: Option<Instant>,
}

/// Owns the save queue, the in-flight flag and the coalescing timer.
///
/// Always used behind an `Arc`: jobs and the flush timer run as Tokio tasks
/// that hold a reference back to the coordinator.
pub struct SaveCoordinator {
    state: Mutex<QueueState>,
    account: Arc<ActiveAccount>,
    store: Arc<dyn AccountStore>,
    notifier: Arc<dyn Notifier>,
    min_interval: Duration,
    idle: Notify,
}

impl SaveCoordinator {
    /// Creates a coordinator writing `account` to `store`.
    pub fn new(
        account: Arc<ActiveAccount>,
        store: Arc<dyn AccountStore>,
        notifier: Arc<dyn Notifier>,
        min_interval: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(QueueState::default()),
            account,
            store,
            notifier,
            min_interval,
            idle: Notify::new(),
        })
    }

    /// Requests a write of the current account state.
    ///
    /// Inside the minimum interval, while a write is busy, or while a flush is
    /// already pending, the request is folded into a single deferred flush;
    /// otherwise a job is queued immediately and the queue is drained.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn enqueue(self: &Arc<Self>, reason: &str) {
        let mut st = self.lock();
        let within_window = st
            .last_completed
            .is_some_and(|last| last.elapsed() < self.min_interval);
        let busy = st.in_flight || !st.queue.is_empty();
        let dirty = st.flush_timer.is_some() || !st.pending_reasons.is_empty();

        if within_window || busy || dirty {
            if !st.pending_reasons.iter().any(|r| r == reason) {
                st.pending_reasons.push(reason.to_string());
            }
            self.arm_flush(&mut st);
            debug!(reason, busy, "save coalesced");
            return;
        }
        drop(st);

        if self.push_job(reason.to_string(), None) {
            self.drain();
        }
    }

    /// Queues a write that bypasses the coalescing window and waits for it.
    ///
    /// The job still goes through the FIFO queue, so it never overlaps another
    /// write.
    ///
    /// # Errors
    ///
    /// - [`SaveError::NoActiveAccount`] if nobody is signed in.
    /// - [`SaveError::Store`] if the remote write failed (the failure has
    ///   already been reported as a toast).
    pub async fn persist_now(self: &Arc<Self>, reason: &str) -> Result<(), SaveError> {
        let (tx, rx) = oneshot::channel();
        if !self.push_job(reason.to_string(), Some(tx)) {
            return Err(SaveError::NoActiveAccount);
        }
        self.drain();
        rx.await.map_err(|_| SaveError::Abandoned)??;
        Ok(())
    }

    /// Starts the oldest queued job unless one is already in flight.
    ///
    /// Idempotent: calling it while a job runs does nothing, and the running
    /// job drains the next one when it finishes.
    pub fn drain(self: &Arc<Self>) {
        let job = {
            let mut st = self.lock();
            if st.in_flight {
                return;
            }
            match st.queue.pop_front() {
                Some(job) => {
                    st.in_flight = true;
                    job
                }
                None => {
                    drop(st);
                    self.notify_if_idle();
                    return;
                }
            }
        };

        let this = Arc::clone(self);
        tokio::spawn(async move {
            this.execute(job).await;
            {
                let mut st = this.lock();
                st.in_flight = false;
                st.last_completed = Some(Instant::now());
                this.arm_flush(&mut st);
            }
            this.drain();
        });
    }

    /// `true` while anything is queued, in flight or armed.
    pub fn has_pending_save(&self) -> bool {
        let st = self.lock();
        !st.queue.is_empty()
            || st.in_flight
            || st.flush_timer.is_some()
            || !st.pending_reasons.is_empty()
    }

    /// Time since the last save completed, successful or not.
    pub fn last_save_age(&self) -> Option<Duration> {
        self.lock().last_completed.map(|t| t.elapsed())
    }

    /// Current phase of the state machine.
    pub fn phase(&self) -> SavePhase {
        let st = self.lock();
        if st.in_flight {
            SavePhase::Saving
        } else if !st.queue.is_empty()
            || st.flush_timer.is_some()
            || !st.pending_reasons.is_empty()
        {
            SavePhase::Queued
        } else {
            SavePhase::Idle
        }
    }

    /// Resolves once nothing is queued, in flight or armed.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            if !self.has_pending_save() {
                return;
            }
            notified.await;
        }
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    /// Snapshots the active account into a new job at the back of the queue.
    ///
    /// Returns `false` when no account is active.
    fn push_job(
        &self,
        reason: String,
        completion: Option<oneshot::Sender<Result<(), StoreError>>>,
    ) -> bool {
        let Some(account) = self.account.snapshot() else {
            debug!(%reason, "no active account; save dropped");
            return false;
        };
        let layout_order = account.layout_ids();
        self.lock().queue.push_back(SaveJob {
            reason,
            account,
            layout_order,
            completion,
        });
        true
    }

    /// Arms the flush timer for pending reasons, unless one is armed already
    /// or a write is busy.  A busy write arms it on completion.
    fn arm_flush(self: &Arc<Self>, st: &mut QueueState) {
        if st.pending_reasons.is_empty()
            || st.flush_timer.is_some()
            || st.in_flight
            || !st.queue.is_empty()
        {
            return;
        }
        let deadline = st
            .last_completed
            .map_or_else(Instant::now, |last| last + self.min_interval);
        let this = Arc::clone(self);
        st.flush_timer = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            this.flush_pending();
        }));
        debug!(reasons = ?st.pending_reasons, "flush armed");
    }

    /// Timer callback: materializes the coalesced flush from current state.
    ///
    /// Defers again when a write completed after the timer was armed or is
    /// still busy.
    fn flush_pending(self: &Arc<Self>) {
        let reasons = {
            let mut st = self.lock();
            st.flush_timer = None;
            let busy = st.in_flight || !st.queue.is_empty();
            let within_window = st
                .last_completed
                .is_some_and(|last| last.elapsed() < self.min_interval);
            if busy || within_window {
                self.arm_flush(&mut st);
                return;
            }
            std::mem::take(&mut st.pending_reasons)
        };
        if !reasons.is_empty() && self.push_job(reasons.join(REASON_SEPARATOR), None) {
            self.drain();
        } else {
            self.notify_if_idle();
        }
    }

    async fn execute(&self, job: SaveJob) {
        let SaveJob {
            reason,
            account,
            layout_order,
            completion,
        } = job;
        debug!(%reason, account = %account.id, layouts = ?layout_order, "saving account");

        let result = self.store.put_account(&account).await;
        match &result {
            Ok(()) => info!(%reason, account = %account.id, "account saved"),
            Err(e) => {
                warn!(%reason, account = %account.id, "account save failed: {e}");
                self.notifier
                    .notify(Toast::error("Account", "Error saving account."));
            }
        }

        if let Some(tx) = completion {
            // The waiter may have given up; the write happened regardless.
            let _ = tx.send(result);
        }
    }

    fn notify_if_idle(&self) {
        if !self.has_pending_save() {
            self.idle.notify_waiters();
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
