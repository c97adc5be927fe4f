//! Defensive decoding of a layout's persisted `state` field.
//!
//! Depending on which client wrote it, the remote store hands back `state`
//! either as structured JSON or as a string holding encoded JSON.  Callers
//! always want structured data or nothing: [`safe_parse_state`] never fails,
//! it reports a decode problem to the user and returns `None`.

use serde_json::Value;
use tracing::warn;

use crate::domain::notification::{Notifier, Toast};

/// Decodes `raw` into structured state.
///
/// | Input | Result |
/// |-------|--------|
/// | `null` | `None` |
/// | object / array | returned unchanged |
/// | blank string | `None` |
/// | string | decoded JSON, or `None` plus an error toast on failure |
/// | number / bool | `None` |
pub fn safe_parse_state(raw: &Value, notifier: &dyn Notifier) -> Option<Value> {
    match raw {
        Value::Null => None,
        Value::Object(_) | Value::Array(_) => Some(raw.clone()),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("discarding undecodable layout state: {e}");
                notifier.notify(Toast::error("Layout", "Invalid layout state JSON."));
                None
            }
        },
        Value::Bool(_) | Value::Number(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::Severity;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        toasts: Mutex<Vec<Toast>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, toast: Toast) {
            self.toasts.lock().unwrap().push(toast);
        }
    }

    #[test]
    fn test_null_returns_none_without_toast() {
        let n = RecordingNotifier::default();
        assert_eq!(safe_parse_state(&Value::Null, &n), None);
        assert!(n.toasts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_structured_object_is_returned_unchanged() {
        let n = RecordingNotifier::default();
        let raw = json!({ "columnState": [{ "colId": "x" }] });
        assert_eq!(safe_parse_state(&raw, &n), Some(raw.clone()));
    }

    #[test]
    fn test_blank_string_returns_none() {
        let n = RecordingNotifier::default();
        assert_eq!(safe_parse_state(&json!("   \n\t"), &n), None);
        assert!(n.toasts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_encoded_string_is_decoded() {
        let n = RecordingNotifier::default();
        let raw = json!(r#"{"sortModel":[{"colId":"a","sort":"asc"}]}"#);
        let decoded = safe_parse_state(&raw, &n).expect("decoded");
        assert_eq!(decoded["sortModel"][0]["sort"], "asc");
    }

    #[test]
    fn test_invalid_string_reports_error_and_returns_none() {
        // Arrange
        let n = RecordingNotifier::default();

        // Act
        let result = safe_parse_state(&json!("{not json"), &n);

        // Assert
        assert_eq!(result, None);
        let toasts = n.toasts.lock().unwrap();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].severity, Severity::Error);
        assert_eq!(toasts[0].detail, "Invalid layout state JSON.");
    }

    #[test]
    fn test_scalar_values_return_none() {
        let n = RecordingNotifier::default();
        assert_eq!(safe_parse_state(&json!(12), &n), None);
        assert_eq!(safe_parse_state(&json!(true), &n), None);
    }
}
