//! Saved grid layout domain entity.
//!
//! A [`Layout`] is a named snapshot of a data grid's visual and query state:
//! column order/width/visibility, sort, filter and grouping.  The `state`
//! payload is opaque to everything except the [`crate::codec::state`] module,
//! which knows how to project it into a comparable shape.
//!
//! # Revisions and versions
//!
//! - `state_revision` counts *meaningful* changes to `state`.  It is optional
//!   on the wire because layouts written before revision tracking existed do
//!   not carry it; [`Layout::ensure_revision`] backfills `0`.
//! - `layout_version` is a format tag for the state payload itself and is
//!   exported verbatim in the import/export envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Layout identifier.  Opaque string; unique within one account.
pub type LayoutId = String;

/// Format tag assigned to layouts that do not carry one.
pub const CURRENT_LAYOUT_VERSION: u32 = 1;

/// Maximum stored length of a layout name, in characters.
pub const MAX_NAME_CHARS: usize = 100;

/// Maximum stored length of a layout description, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 200;

fn default_layout_version() -> u32 {
    CURRENT_LAYOUT_VERSION
}

/// A named, saved configuration of the data grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    /// Unique identifier within the owning account.  Empty means "not yet
    /// assigned"; the repository mints one on first save.
    #[serde(default)]
    pub id: LayoutId,
    /// Human-readable name shown in the layout picker.
    #[serde(default)]
    pub name: String,
    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether this layout is selected automatically when nothing else is.
    #[serde(default)]
    pub is_default: bool,
    /// Number of meaningful state changes since creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_revision: Option<u64>,
    /// Format tag of the state payload.
    #[serde(default = "default_layout_version")]
    pub layout_version: u32,
    /// Opaque grid state.
    #[serde(default)]
    pub state: Value,
}

impl Layout {
    /// Creates a non-default layout with no identifier yet.
    pub fn new(name: impl Into<String>, state: Value) -> Self {
        Self {
            id: LayoutId::new(),
            name: name.into(),
            description: None,
            is_default: false,
            state_revision: Some(0),
            layout_version: CURRENT_LAYOUT_VERSION,
            state,
        }
    }

    /// Returns the revision, treating a missing one as `0`.
    pub fn revision(&self) -> u64 {
        self.state_revision.unwrap_or(0)
    }

    /// Backfills a missing revision with `0`.
    ///
    /// Returns `true` when the layout was modified.
    pub fn ensure_revision(&mut self) -> bool {
        if self.state_revision.is_none() {
            self.state_revision = Some(0);
            true
        } else {
            false
        }
    }

    /// Truncates name and description to their storage limits.
    pub fn clamp_text_fields(&mut self) {
        self.name = truncate_chars(&self.name, MAX_NAME_CHARS);
        if let Some(desc) = self.description.as_mut() {
            *desc = truncate_chars(desc, MAX_DESCRIPTION_CHARS);
        }
    }
}

/// Returns at most `max` leading characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => s[..byte_idx].to_string(),
        None => s.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
