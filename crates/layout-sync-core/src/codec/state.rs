//! Normalization and diffing of opaque grid-state blobs.
//!
//! Grid state arrives as arbitrary JSON produced by the grid component.  Most
//! of it is noise for persistence purposes (scroll positions, transient
//! flags), and object keys may come back in a different order on every read.
//! [`normalize`] projects a blob onto the fields that affect what the user
//! actually sees, and [`are_different`] compares two blobs through that
//! projection.
//!
//! # What is kept
//!
//! | Field | Source | Notes |
//! |-------|--------|-------|
//! | `colState` | first of `columnState`, `colState`, `columns` | `colId`, `width`, `hide`, `pinned`, `sort`, `sortIndex`, positional `order` |
//! | `colOrderSignature` | derived | column ids joined with `|` |
//! | `sortModel`, `filterModel`, `rowGroupColumns`, `pivotColumns` | verbatim | only when truthy |
//! | `version` | `layoutVersion` | only when truthy |
//!
//! Column order is significant: the positional index is kept on every column
//! and folded into the signature, so moving a column is a real change while
//! reordering the keys of a column object is not.

use serde::Serialize;
use serde_json::{Map, Number, Value};

/// Accepted names of the column array, first match wins.
///
/// The grid has renamed this field over time; older saved layouts still use
/// the earlier spellings.
pub const COLUMN_ARRAY_KEYS: [&str; 3] = ["columnState", "colState", "columns"];

/// Separator used when building [`NormalizedLayoutState::col_order_signature`].
const SIGNATURE_SEPARATOR: &str = "|";

/// Reduced view of one grid column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedColumn {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide: Option<bool>,
    pub pinned: Value,
    pub sort: Value,
    pub sort_index: Value,
    /// Position of the column in the incoming array.
    pub order: usize,
}

/// Canonical, comparison-ready projection of a grid-state blob.
///
/// Derived only; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedLayoutState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_state: Option<Vec<NormalizedColumn>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_order_signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_model: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_model: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_group_columns: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pivot_columns: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<Value>,
}

impl NormalizedLayoutState {
    /// Serializes the projection into its canonical string form.
    ///
    /// Object keys inside passed-through models come out sorted, so two blobs
    /// that differ only in key order serialize identically.
    pub fn canonical_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Returns `true` when nothing was extracted (non-object or empty input).
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Projects `raw` onto the fields that affect visible layout.
///
/// Returns an empty projection for anything that is not a JSON object.
pub fn normalize(raw: &Value) -> NormalizedLayoutState {
    let Some(obj) = raw.as_object() else {
        return NormalizedLayoutState::default();
    };

    let mut out = NormalizedLayoutState::default();

    let columns = COLUMN_ARRAY_KEYS
        .iter()
        .find_map(|key| obj.get(*key).filter(|v| is_truthy(v)));
    if let Some(Value::Array(columns)) = columns {
        let cols: Vec<NormalizedColumn> = columns
            .iter()
            .enumerate()
            .map(|(idx, c)| normalize_column(c, idx))
            .collect();
        let signature = cols
            .iter()
            .map(|c| c.col_id.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join(SIGNATURE_SEPARATOR);
        out.col_state = Some(cols);
        out.col_order_signature = Some(signature);
    }

    out.sort_model = pass_through(obj, "sortModel");
    out.filter_model = pass_through(obj, "filterModel");
    out.row_group_columns = pass_through(obj, "rowGroupColumns");
    out.pivot_columns = pass_through(obj, "pivotColumns");
    out.version = pass_through(obj, "layoutVersion");
    out
}

/// Returns `true` iff the two blobs differ after normalization.
///
/// Pure column reorders count as differences; key-order noise does not.
pub fn are_different(a: &Value, b: &Value) -> bool {
    normalize(a).canonical_json() != normalize(b).canonical_json()
}

/// Returns `true` iff the column order of the two blobs differs.
///
/// Cheaper than [`are_different`] when only moves matter.
pub fn column_order_changed(a: &Value, b: &Value) -> bool {
    normalize(a).col_order_signature != normalize(b).col_order_signature
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn normalize_column(c: &Value, order: usize) -> NormalizedColumn {
    let field = |name: &str| c.get(name).filter(|v| !v.is_null());
    NormalizedColumn {
        col_id: field("colId").and_then(col_id_string),
        width: field("width").and_then(|w| match w {
            Value::Number(n) => Some(n.clone()),
            _ => None,
        }),
        hide: field("hide").and_then(Value::as_bool),
        pinned: field("pinned").cloned().unwrap_or(Value::Null),
        sort: field("sort").cloned().unwrap_or(Value::Null),
        sort_index: field("sortIndex").cloned().unwrap_or(Value::Null),
        order,
    }
}

fn col_id_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn pass_through(obj: &Map<String, Value>, key: &str) -> Option<Value> {
    obj.get(key).filter(|v| is_truthy(v)).cloned()
}

/// Truthiness as the grid's own serializer understands it: empty containers
/// count as present.
fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_non_object_returns_empty() {
        assert!(normalize(&json!(null)).is_empty());
        assert!(normalize(&json!("text")).is_empty());
        assert!(normalize(&json!([1, 2])).is_empty());
        assert!(normalize(&json!(42)).is_empty());
    }

    #[test]
    fn test_normalize_keeps_only_layout_relevant_column_fields() {
        // Arrange
        let raw = json!({
            "columnState": [
                { "colId": "x", "width": 120, "hide": false, "flex": 2, "aggFunc": "sum" }
            ]
        });

        // Act
        let n = normalize(&raw);

        // Assert
        let cols = n.col_state.as_ref().expect("columns");
        assert_eq!(cols.len(), 1);
        assert_eq!(cols[0].col_id.as_deref(), Some("x"));
        assert_eq!(cols[0].width, Some(Number::from(120)));
        assert_eq!(cols[0].hide, Some(false));
        assert_eq!(cols[0].pinned, Value::Null);
        assert_eq!(cols[0].order, 0);
        assert!(!n.canonical_json().contains("flex"));
    }

    #[test]
    fn test_normalize_ignores_non_numeric_width_and_non_bool_hide() {
        let raw = json!({ "columnState": [{ "colId": "x", "width": "wide", "hide": "yes" }] });
        let cols = normalize(&raw).col_state.unwrap();
        assert_eq!(cols[0].width, None);
        assert_eq!(cols[0].hide, None);
    }

    #[test]
    fn test_normalize_accepts_alternate_column_keys_first_match_wins() {
        let legacy = json!({ "colState": [{ "colId": "a" }] });
        assert_eq!(normalize(&legacy).col_order_signature.as_deref(), Some("a"));

        let oldest = json!({ "columns": [{ "colId": "b" }] });
        assert_eq!(normalize(&oldest).col_order_signature.as_deref(), Some("b"));

        let both = json!({ "columnState": [{ "colId": "new" }], "columns": [{ "colId": "old" }] });
        assert_eq!(normalize(&both).col_order_signature.as_deref(), Some("new"));
    }

    #[test]
    fn test_normalize_builds_order_signature() {
        let raw = json!({ "columnState": [{ "colId": "a" }, { "colId": "b" }, { "width": 3 }] });
        assert_eq!(normalize(&raw).col_order_signature.as_deref(), Some("a|b|"));
    }

    #[test]
    fn test_normalize_passes_through_truthy_models_only() {
        let raw = json!({
            "sortModel": [],
            "filterModel": { "status": { "type": "equals" } },
            "rowGroupColumns": null,
            "pivotColumns": false,
            "layoutVersion": 2
        });

        let n = normalize(&raw);

        assert_eq!(n.sort_model, Some(json!([])));
        assert!(n.filter_model.is_some());
        assert_eq!(n.row_group_columns, None);
        assert_eq!(n.pivot_columns, None);
        assert_eq!(n.version, Some(json!(2)));
    }

    #[test]
    fn test_are_different_detects_pure_reorder() {
        let a = json!({ "columnState": [{ "colId": "x", "hide": false }, { "colId": "y", "hide": true }] });
        let b = json!({ "columnState": [{ "colId": "y", "hide": true }, { "colId": "x", "hide": false }] });
        assert!(are_different(&a, &b));
        assert!(column_order_changed(&a, &b));
    }

    #[test]
    fn test_are_different_ignores_object_key_order() {
        let a: Value = serde_json::from_str(
            r#"{"filterModel":{"a":1,"b":2},"columnState":[{"colId":"x","width":10}]}"#,
        )
        .unwrap();
        let b: Value = serde_json::from_str(
            r#"{"columnState":[{"width":10,"colId":"x"}],"filterModel":{"b":2,"a":1}}"#,
        )
        .unwrap();
        assert!(!are_different(&a, &b));
    }

    #[test]
    fn test_are_different_ignores_irrelevant_fields() {
        let a = json!({ "columnState": [{ "colId": "x" }], "scrollTop": 10 });
        let b = json!({ "columnState": [{ "colId": "x" }], "scrollTop": 900 });
        assert!(!are_different(&a, &b));
    }

    #[test]
    fn test_are_different_detects_width_change() {
        let a = json!({ "columnState": [{ "colId": "x", "width": 100 }] });
        let b = json!({ "columnState": [{ "colId": "x", "width": 140 }] });
        assert!(are_different(&a, &b));
        assert!(!column_order_changed(&a, &b));
    }

    #[test]
    fn test_are_different_treats_missing_and_null_pinned_alike() {
        let a = json!({ "columnState": [{ "colId": "x" }] });
        let b = json!({ "columnState": [{ "colId": "x", "pinned": null }] });
        assert!(!are_different(&a, &b));
    }
}
