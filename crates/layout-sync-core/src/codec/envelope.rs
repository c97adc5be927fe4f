//! Import/export envelope for sharing layouts between accounts.
//!
//! Exported layouts are wrapped in a small self-describing JSON document:
//!
//! ```json
//! {
//!   "type": "mediaSchedulerLayouts",
//!   "version": 1,
//!   "exportedAt": "2026-01-01T00:00:00.000Z",
//!   "count": 1,
//!   "layouts": [
//!     { "id": "…", "name": "Ops", "isDefault": true, "layoutVersion": 1, "state": {} }
//!   ]
//! }
//! ```
//!
//! Parsing is two-staged.  [`parse_envelope`] validates the outer shape and
//! rejects the whole document if it is wrong.  Each entry of `layouts` is then
//! validated on its own by [`ImportCandidate::from_value`], so one bad entry
//! does not sink the rest.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::layout::{Layout, CURRENT_LAYOUT_VERSION};

/// Value of the `type` field that marks a layout export.
pub const ENVELOPE_TYPE: &str = "mediaSchedulerLayouts";

/// Envelope format version written by this crate.
pub const ENVELOPE_VERSION: u32 = 1;

/// Reasons an envelope is rejected as a whole.
#[derive(Debug, Error, PartialEq)]
pub enum EnvelopeError {
    /// The text is not valid JSON.
    #[error("import is not valid JSON: {0}")]
    MalformedJson(String),

    /// The document is JSON but not a layout export.
    #[error("unexpected envelope type: {found:?}")]
    WrongType { found: Option<String> },

    /// `layouts` is missing or not an array.
    #[error("envelope has no layouts array")]
    MissingLayouts,
}

/// Reasons a single envelope entry is skipped.
#[derive(Debug, Error, PartialEq)]
pub enum CandidateRejection {
    #[error("entry is not an object")]
    NotAnObject,
    #[error("entry has no name")]
    MissingName,
    #[error("entry has no state")]
    MissingState,
}

/// One layout as it appears inside the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedLayout {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_default: bool,
    pub layout_version: u32,
    pub state: Value,
}

impl From<&Layout> for ExportedLayout {
    fn from(l: &Layout) -> Self {
        Self {
            id: l.id.clone(),
            name: l.name.clone(),
            description: l.description.clone(),
            is_default: l.is_default,
            layout_version: l.layout_version,
            state: l.state.clone(),
        }
    }
}

/// The export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: u32,
    pub exported_at: String,
    pub count: usize,
    pub layouts: Vec<ExportedLayout>,
}

impl LayoutEnvelope {
    /// Wraps `layouts` in an envelope stamped with `exported_at`.
    pub fn new<'a>(layouts: impl IntoIterator<Item = &'a Layout>, exported_at: DateTime<Utc>) -> Self {
        let layouts: Vec<ExportedLayout> = layouts.into_iter().map(ExportedLayout::from).collect();
        Self {
            kind: ENVELOPE_TYPE.to_string(),
            version: ENVELOPE_VERSION,
            exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            count: layouts.len(),
            layouts,
        }
    }

    /// Pretty-printed JSON text of the envelope.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A validated entry ready to be merged into an account.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportCandidate {
    /// Identifier carried by the export, if any.
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
    pub layout_version: u32,
    pub state: Value,
}

impl ImportCandidate {
    /// Validates one raw envelope entry.
    ///
    /// # Errors
    ///
    /// Returns a [`CandidateRejection`] when the entry is not an object, has
    /// an empty or missing `name`, or has a missing/null `state`.
    pub fn from_value(raw: &Value) -> Result<Self, CandidateRejection> {
        let obj = raw.as_object().ok_or(CandidateRejection::NotAnObject)?;

        let name = obj
            .get("name")
            .and_then(Value::as_str)
            .filter(|n| !n.trim().is_empty())
            .ok_or(CandidateRejection::MissingName)?
            .to_string();

        let state = obj
            .get("state")
            .filter(|s| !s.is_null())
            .ok_or(CandidateRejection::MissingState)?
            .clone();

        Ok(Self {
            id: obj
                .get("id")
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            name,
            description: obj.get("description").and_then(Value::as_str).map(str::to_string),
            is_default: obj.get("isDefault").and_then(Value::as_bool).unwrap_or(false),
            layout_version: obj
                .get("layoutVersion")
                .and_then(Value::as_u64)
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(CURRENT_LAYOUT_VERSION),
            state,
        })
    }

    /// Converts the candidate into a layout with revision `0`.
    ///
    /// The identifier is left as exported (or empty); the caller resolves
    /// collisions against the target account.
    pub fn into_layout(self) -> Layout {
        let mut layout = Layout::new(self.name, self.state);
        layout.id = self.id.unwrap_or_default();
        layout.description = self.description;
        layout.is_default = self.is_default;
        layout.layout_version = self.layout_version;
        layout.clamp_text_fields();
        layout
    }
}

/// Validates the envelope shape and returns the raw `layouts` entries.
///
/// # Errors
///
/// - [`EnvelopeError::MalformedJson`] if `text` does not parse.
/// - [`EnvelopeError::WrongType`] if `type` is not [`ENVELOPE_TYPE`].
/// - [`EnvelopeError::MissingLayouts`] if `layouts` is absent or not an array.
pub fn parse_envelope(text: &str) -> Result<Vec<Value>, EnvelopeError> {
    let doc: Value =
        serde_json::from_str(text).map_err(|e| EnvelopeError::MalformedJson(e.to_string()))?;

    let kind = doc.get("type").and_then(Value::as_str);
    if kind != Some(ENVELOPE_TYPE) {
        return Err(EnvelopeError::WrongType {
            found: kind.map(str::to_string),
        });
    }

    match doc.get("layouts") {
        Some(Value::Array(entries)) => Ok(entries.clone()),
        _ => Err(EnvelopeError::MissingLayouts),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::layout::MAX_NAME_CHARS;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_layout(id: &str, is_default: bool) -> Layout {
        let mut l = Layout::new(format!("Layout {id}"), json!({ "columnState": [{ "colId": id }] }));
        l.id = id.to_string();
        l.is_default = is_default;
        l.description = Some("desc".to_string());
        l
    }

    #[test]
    fn test_envelope_new_fills_header_fields() {
        // Arrange
        let layouts = [sample_layout("a", true), sample_layout("b", false)];
        let at = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();

        // Act
        let env = LayoutEnvelope::new(layouts.iter(), at);

        // Assert
        assert_eq!(env.kind, ENVELOPE_TYPE);
        assert_eq!(env.version, ENVELOPE_VERSION);
        assert_eq!(env.count, 2);
        assert_eq!(env.exported_at, "2026-03-04T05:06:07.000Z");
        assert_eq!(env.layouts[0].id, "a");
    }

    #[test]
    fn test_envelope_json_uses_wire_field_names() {
        let layouts = [sample_layout("a", true)];
        let env = LayoutEnvelope::new(layouts.iter(), Utc::now());
        let v: Value = serde_json::from_str(&env.to_json().unwrap()).unwrap();
        assert_eq!(v["type"], ENVELOPE_TYPE);
        assert!(v.get("exportedAt").is_some());
        assert_eq!(v["layouts"][0]["isDefault"], true);
        assert_eq!(v["layouts"][0]["layoutVersion"], 1);
    }

    #[test]
    fn test_parse_envelope_rejects_malformed_json() {
        assert!(matches!(
            parse_envelope("{ nope"),
            Err(EnvelopeError::MalformedJson(_))
        ));
    }

    #[test]
    fn test_parse_envelope_rejects_wrong_type() {
        let text = json!({ "type": "somethingElse", "layouts": [] }).to_string();
        assert_eq!(
            parse_envelope(&text),
            Err(EnvelopeError::WrongType {
                found: Some("somethingElse".to_string())
            })
        );
    }

    #[test]
    fn test_parse_envelope_rejects_non_array_layouts() {
        let text = json!({ "type": ENVELOPE_TYPE, "layouts": { "a": 1 } }).to_string();
        assert_eq!(parse_envelope(&text), Err(EnvelopeError::MissingLayouts));
    }

    #[test]
    fn test_parse_envelope_returns_raw_entries() {
        let text = json!({ "type": ENVELOPE_TYPE, "layouts": [{ "name": "x" }, 5] }).to_string();
        assert_eq!(parse_envelope(&text).unwrap().len(), 2);
    }

    #[test]
    fn test_candidate_requires_non_empty_name() {
        let raw = json!({ "name": "  ", "state": {} });
        assert_eq!(ImportCandidate::from_value(&raw), Err(CandidateRejection::MissingName));
    }

    #[test]
    fn test_candidate_requires_non_null_state() {
        let raw = json!({ "name": "x", "state": null });
        assert_eq!(ImportCandidate::from_value(&raw), Err(CandidateRejection::MissingState));
        let raw = json!({ "name": "x" });
        assert_eq!(ImportCandidate::from_value(&raw), Err(CandidateRejection::MissingState));
    }

    #[test]
    fn test_candidate_rejects_non_object_entry() {
        assert_eq!(ImportCandidate::from_value(&json!(3)), Err(CandidateRejection::NotAnObject));
    }

    #[test]
    fn test_candidate_defaults_optional_fields() {
        let c = ImportCandidate::from_value(&json!({ "name": "x", "state": {} })).unwrap();
        assert_eq!(c.id, None);
        assert!(!c.is_default);
        assert_eq!(c.layout_version, CURRENT_LAYOUT_VERSION);
    }

    #[test]
    fn test_into_layout_truncates_name() {
        let c = ImportCandidate::from_value(&json!({ "name": "n".repeat(500), "state": {} })).unwrap();
        let layout = c.into_layout();
        assert_eq!(layout.name.chars().count(), MAX_NAME_CHARS);
        assert_eq!(layout.state_revision, Some(0));
    }
}
