//! Notifier adapters: where toasts end up.
//!
//! - [`TracingNotifier`] writes each toast to the log at the matching level.
//!   The CLI uses it, so a failed save shows up on stderr.
//! - [`ChannelNotifier`] forwards toasts to a Tokio channel for a UI task to
//!   render.  Sending never blocks; toasts are dropped once the receiver is
//!   gone.

use layout_sync_core::{Notifier, Severity, Toast};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Logs every toast through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, toast: Toast) {
        let Toast {
            severity,
            summary,
            detail,
            ..
        } = toast;
        match severity {
            Severity::Success | Severity::Info => info!(%summary, "{detail}"),
            Severity::Warn => warn!(%summary, "{detail}"),
            Severity::Error => error!(%summary, "{detail}"),
        }
    }
}

/// Forwards toasts to an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Toast>,
}

impl ChannelNotifier {
    /// Creates the notifier together with the receiving end.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Toast>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, toast: Toast) {
        // A closed receiver means nobody is rendering toasts any more.
        let _ = self.tx.send(toast);
    }
}
