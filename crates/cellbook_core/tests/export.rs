use cellbook_core::{
    BlockKind, CellType, DocumentExport, EditorSession, ExportError, ItemId, NoSystemClipboard,
    SeparatorStyle, SessionConfig, SessionError, StoreError,
};
use tempfile::tempdir;

fn setup() -> EditorSession<NoSystemClipboard> {
    let mut session = EditorSession::with_defaults(NoSystemClipboard);
    session.set_title("Quarterly report");
    let cell = session.add_cell(CellType::Python, None).unwrap();
    session.set_cell_output(&cell, Some("42".to_string())).unwrap();
    let text = session.add_text_section(None).unwrap();
    session.update_text_section(&text, "<p>Summary</p>").unwrap();
    session.toggle_text_lock(&text).unwrap();
    session.add_separator(SeparatorStyle::Dashed, Some(&cell)).unwrap();
    session
}

#[test]
fn export_json_groups_items_by_kind_with_orders() {
    let session = setup();
    let raw = session.export().to_json().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(json["title"], "Quarterly report");
    assert_eq!(json["cells"][0]["type"], "python");
    assert_eq!(json["cells"][0]["output"], "42");
    assert_eq!(json["cells"][0]["metadata"]["title"], "New python");
    assert_eq!(json["cells"][0]["order"], 0);
    assert_eq!(json["separators"][0]["style"], "dashed");
    assert_eq!(json["separators"][0]["order"], 1);
    assert_eq!(json["textSections"][0]["content"], "<p>Summary</p>");
    assert_eq!(json["textSections"][0]["order"], 2);
    assert_eq!(json["textSections"][0]["isLocked"], true);
}

#[test]
fn file_round_trip_restores_items_and_title() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.json");
    let session = setup();
    session.export().write_to_path(&path).unwrap();

    let export = DocumentExport::read_from_path(&path).unwrap();
    let reopened =
        EditorSession::from_export(export, SessionConfig::default(), NoSystemClipboard).unwrap();

    assert_eq!(reopened.title(), "Quarterly report");
    assert_eq!(reopened.items(), session.items());
    assert!(!reopened.can_undo());
}

#[test]
fn import_closes_order_gaps() {
    let raw = r#"{
        "title": "gappy",
        "cells": [{"id": "c", "type": "sql", "content": "select 1", "metadata": {"title": "Q"}, "order": 10}],
        "textSections": [{"id": "t", "content": "intro", "order": 2}],
        "separators": [{"id": "s", "order": 7}]
    }"#;
    let session = EditorSession::from_export(
        DocumentExport::from_json_str(raw).unwrap(),
        SessionConfig::default(),
        NoSystemClipboard,
    )
    .unwrap();

    let kinds: Vec<BlockKind> = session.items().iter().map(|item| item.kind()).collect();
    assert_eq!(kinds, [BlockKind::TextSection, BlockKind::Separator, BlockKind::Cell]);
    session.store().check_invariants().unwrap();
}

#[test]
fn duplicate_ids_across_kinds_are_rejected() {
    let raw = r#"{
        "cells": [{"id": "x", "type": "python", "content": "", "metadata": {"title": "a"}, "order": 0}],
        "textSections": [{"id": "x", "content": "", "order": 1}]
    }"#;
    let export = DocumentExport::from_json_str(raw).unwrap();
    let result = EditorSession::from_export(export, SessionConfig::default(), NoSystemClipboard);
    assert!(matches!(
        result,
        Err(SessionError::Store(StoreError::DuplicateId(ref id))) if id == &ItemId::new("x")
    ));
}

#[test]
fn missing_file_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = DocumentExport::read_from_path(&path).unwrap_err();
    match err {
        ExportError::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected io error, got {other}"),
    }
}
