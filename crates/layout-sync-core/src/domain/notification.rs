//! User-facing notification port.
//!
//! The core never renders anything.  It reports outcomes as [`Toast`]s to a
//! [`Notifier`] supplied by the caller and never waits for, or reads, a reply.

use std::fmt;

/// How long a toast stays visible unless the caller overrides it.
pub const DEFAULT_TOAST_LIFE_MS: u32 = 3000;

/// Toast severity, mirroring the levels the dashboard renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// A short user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub severity: Severity,
    /// Short heading, usually the feature area ("Layout", "Account").
    pub summary: String,
    /// One-sentence body.
    pub detail: String,
    pub life_ms: u32,
}

impl Toast {
    pub fn new(severity: Severity, summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity,
            summary: summary.into(),
            detail: detail.into(),
            life_ms: DEFAULT_TOAST_LIFE_MS,
        }
    }

    pub fn success(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(Severity::Success, summary, detail)
    }

    pub fn info(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(Severity::Info, summary, detail)
    }

    pub fn warn(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(Severity::Warn, summary, detail)
    }

    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(Severity::Error, summary, detail)
    }
}

/// Fire-and-forget sink for [`Toast`]s.
///
/// Implementations must not block and must not fail: a notification that
/// cannot be delivered is dropped.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// A notifier that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _toast: Toast) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_constructors_set_severity_and_default_life() {
        let t = Toast::error("Layout", "Invalid layout state JSON.");
        assert_eq!(t.severity, Severity::Error);
        assert_eq!(t.summary, "Layout");
        assert_eq!(t.life_ms, DEFAULT_TOAST_LIFE_MS);
        assert_eq!(Toast::success("a", "b").severity, Severity::Success);
        assert_eq!(Toast::info("a", "b").severity, Severity::Info);
        assert_eq!(Toast::warn("a", "b").severity, Severity::Warn);
    }

    #[test]
    fn test_severity_display_is_lowercase() {
        assert_eq!(Severity::Warn.to_string(), "warn");
        assert_eq!(Severity::Success.to_string(), "success");
    }
}
