//! Integration tests for the import/export envelope.
//!
//! These tests exercise the public API end to end: layouts are wrapped into
//! an envelope, serialized, parsed back and validated as import candidates.

use chrono::Utc;
use layout_sync_core::{
    are_different, default_layout_state, parse_envelope, ImportCandidate, Layout, LayoutEnvelope,
};
use serde_json::json;

fn layout(id: &str, name: &str, is_default: bool) -> Layout {
    let mut l = Layout::new(name, json!({ "columnState": [{ "colId": id, "width": 90 }] }));
    l.id = id.to_string();
    l.is_default = is_default;
    l
}

#[test]
fn test_exported_layouts_parse_back_into_equivalent_candidates() {
    // Arrange
    let mut with_desc = layout("b", "Ops", false);
    with_desc.description = Some("night shift".to_string());
    let originals = vec![layout("a", "Main", true), with_desc];
    let text = LayoutEnvelope::new(originals.iter(), Utc::now())
        .to_json()
        .expect("serialize");

    // Act
    let candidates: Vec<ImportCandidate> = parse_envelope(&text)
        .expect("valid envelope")
        .iter()
        .map(|raw| ImportCandidate::from_value(raw).expect("valid entry"))
        .collect();

    // Assert
    assert_eq!(candidates.len(), originals.len());
    for (orig, cand) in originals.iter().zip(&candidates) {
        assert_eq!(cand.id.as_deref(), Some(orig.id.as_str()));
        assert_eq!(cand.name, orig.name);
        assert_eq!(cand.description, orig.description);
        assert_eq!(cand.is_default, orig.is_default);
        assert!(!are_different(&cand.state, &orig.state));
    }
}

#[test]
fn test_stock_layout_survives_export_and_import() {
    let mut stock = Layout::new("Default", default_layout_state());
    stock.id = "seed".to_string();
    let text = LayoutEnvelope::new([&stock], Utc::now()).to_json().unwrap();

    let entries = parse_envelope(&text).unwrap();
    let imported = ImportCandidate::from_value(&entries[0]).unwrap().into_layout();

    assert_eq!(imported.state, stock.state);
}

#[test]
fn test_envelope_with_mixed_entries_keeps_only_valid_ones() {
    let text = json!({
        "type": "mediaSchedulerLayouts",
        "version": 1,
        "exportedAt": "2026-01-01T00:00:00.000Z",
        "count": 3,
        "layouts": [
            { "name": "good", "state": {} },
            { "name": "", "state": {} },
            { "name": "no-state" }
        ]
    })
    .to_string();

    let valid: Vec<_> = parse_envelope(&text)
        .unwrap()
        .iter()
        .filter_map(|raw| ImportCandidate::from_value(raw).ok())
        .collect();

    assert_eq!(valid.len(), 1);
    assert_eq!(valid[0].name, "good");
}
