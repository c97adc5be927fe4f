//! Stock grid layout used for new accounts and new layouts.
//!
//! Keep in sync with the guest layout shown to signed-out users.

use serde_json::{json, Value};

use super::layout::Layout;

/// Name given to the layout seeded on registration.
pub const DEFAULT_LAYOUT_NAME: &str = "Default";

/// Column ids of the stock layout, in display order, with their `hide` flag.
const DEFAULT_COLUMNS: [(&str, bool); 14] = [
    ("profile", false),
    ("scheduleTypes", false),
    ("status", false),
    ("priority", true),
    ("timePicker", false),
    ("specificTimes", false),
    ("File Information", true),
    ("General", false),
    ("Media Information", false),
    ("Url", false),
    ("scheduleTags", false),
    ("images", false),
    ("metaData.duration", false),
    ("actions", false),
];

/// Returns the stock grid state.
pub fn default_layout_state() -> Value {
    let columns: Vec<Value> = DEFAULT_COLUMNS
        .iter()
        .map(|(col_id, hide)| json!({ "colId": col_id, "hide": hide }))
        .collect();
    json!({
        "columnState": columns,
        "filterModel": {},
        "sortModel": [],
    })
}

/// Returns the layout seeded into a freshly registered account.
pub fn seed_default_layout() -> Layout {
    let mut layout = Layout::new(DEFAULT_LAYOUT_NAME, default_layout_state());
    layout.is_default = true;
    layout
}
