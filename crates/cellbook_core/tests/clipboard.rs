use cellbook_core::{
    Block, CellBlock, CellMetadata, CellType, ClipboardEnvelope, ClipboardError,
    ClipboardOutcome, DocumentExport, EditorSession, Item, ItemId, MemoryClipboard,
    NoSystemClipboard, PasteStart, SeparatorBlock, SessionConfig, SystemClipboard, TextBlock,
};

/// Clipboard that rejects structured payloads, as some hosts do for
/// programmatic JSON writes.
#[derive(Default)]
struct PlainOnlyClipboard {
    text: Option<String>,
}

impl SystemClipboard for PlainOnlyClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if text.starts_with('{') {
            return Err(ClipboardError::Unavailable("json writes rejected".to_string()));
        }
        self.text = Some(text.to_string());
        Ok(())
    }

    fn read_text(&mut self) -> Result<String, ClipboardError> {
        self.text
            .clone()
            .ok_or_else(|| ClipboardError::Unavailable("empty".to_string()))
    }
}

fn cell(id: &str, title: &str, content: &str) -> Item {
    Item::with_id(
        ItemId::new(id),
        Block::Cell(CellBlock {
            cell_type: CellType::Python,
            content: content.to_string(),
            output: None,
            metadata: CellMetadata::titled(title),
        }),
    )
}

fn text(id: &str, content: &str) -> Item {
    Item::with_id(
        ItemId::new(id),
        Block::TextSection(TextBlock {
            content: content.to_string(),
            is_locked: None,
        }),
    )
}

fn sample_export() -> DocumentExport {
    let mut items = vec![
        cell("a", "Load", "x = 1"),
        text("b", "<p>notes</p>"),
        cell("c", "Plot", "plot(x)"),
        Item::with_id(ItemId::new("d"), Block::Separator(SeparatorBlock::default())),
    ];
    for (order, item) in items.iter_mut().enumerate() {
        item.order = order;
    }
    DocumentExport::from_items("sample", &items)
}

fn setup<C: SystemClipboard>(clipboard: C) -> EditorSession<C> {
    EditorSession::from_export(sample_export(), SessionConfig::default(), clipboard).unwrap()
}

fn id(value: &str) -> ItemId {
    ItemId::new(value)
}

fn names<C: SystemClipboard>(session: &EditorSession<C>) -> Vec<String> {
    session.items().iter().map(|item| item.id.to_string()).collect()
}

#[test]
fn copy_then_paste_inserts_equal_items_with_fresh_ids_after_anchor() {
    let mut session = setup(MemoryClipboard::new());
    session.click(&id("a"));
    session.ctrl_click(&id("b"));

    assert_eq!(session.copy(), ClipboardOutcome::Copied(2));

    let ClipboardOutcome::Pasted(pasted) = session.paste().unwrap() else {
        panic!("expected paste");
    };
    assert_eq!(pasted.len(), 2);
    assert!(pasted.iter().all(|id| id.as_str().starts_with("paste-")));

    // Anchor was `b`, so the block lands directly after it.
    let items = session.items();
    assert_eq!(items[2].id, pasted[0]);
    assert_eq!(items[3].id, pasted[1]);
    assert_eq!(items[2].block, items[0].block);
    assert_eq!(items[3].block, items[1].block);
    session.store().check_invariants().unwrap();
}

#[test]
fn copy_publishes_envelope_readable_by_another_session() {
    let mut source = setup(MemoryClipboard::new());
    source.click(&id("c"));
    source.copy();
    let written = source.clipboard().system().contents().unwrap().to_string();

    let envelope = ClipboardEnvelope::parse(&written).unwrap();
    assert_eq!(envelope.kind, "document-items");
    assert_eq!(envelope.plain_text, "# Plot\nplot(x)");

    let mut target = EditorSession::with_defaults(MemoryClipboard::with_text(written));
    let outcome = target.paste().unwrap();
    assert!(matches!(outcome, ClipboardOutcome::Pasted(ref ids) if ids.len() == 1));
    match &target.items()[0].block {
        Block::Cell(cell) => assert_eq!(cell.content, "plot(x)"),
        other => panic!("expected cell, got {other:?}"),
    }
}

#[test]
fn cut_matches_copy_followed_by_delete() {
    let mut cut = setup(MemoryClipboard::new());
    cut.click(&id("b"));
    cut.ctrl_click(&id("d"));
    assert_eq!(cut.cut(), ClipboardOutcome::Cut(2));

    let mut manual = setup(MemoryClipboard::new());
    manual.click(&id("b"));
    manual.ctrl_click(&id("d"));
    manual.copy();
    manual.delete_selected();

    assert_eq!(cut.items(), manual.items());
    assert_eq!(cut.clipboard().system(), manual.clipboard().system());
    assert!(cut.selection().is_empty());

    // One undo restores the cut items.
    assert!(cut.undo().unwrap());
    assert_eq!(names(&cut), ["a", "b", "c", "d"]);
}

#[test]
fn duplicate_inserts_after_last_selected_and_suffixes_titles() {
    let mut session = setup(NoSystemClipboard);
    session.click(&id("a"));
    session.ctrl_click(&id("c"));

    let ClipboardOutcome::Duplicated(copies) = session.duplicate().unwrap() else {
        panic!("expected duplicate");
    };
    let ids: Vec<&str> = session.items().iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids[..3], ["a", "b", "c"]);
    assert_eq!(ids[5], "d");
    assert_eq!(session.items()[3].id, copies[0]);
    assert_eq!(session.items()[4].id, copies[1]);

    let titles: Vec<String> = session.items()[3..5]
        .iter()
        .map(|item| match &item.block {
            Block::Cell(cell) => cell.metadata.title.clone(),
            other => panic!("expected cell, got {other:?}"),
        })
        .collect();
    assert_eq!(titles, ["Load Copy", "Plot Copy"]);
    assert!(session.clipboard().retained().is_none());
}

#[test]
fn duplicate_with_empty_selection_is_noop() {
    let mut session = setup(NoSystemClipboard);
    assert_eq!(session.duplicate().unwrap(), ClipboardOutcome::Empty);
    assert_eq!(session.copy(), ClipboardOutcome::Empty);
    assert_eq!(session.cut(), ClipboardOutcome::Empty);
    assert!(!session.can_undo());
}

#[test]
fn malformed_clipboard_text_pastes_nothing() {
    let payloads = [
        "not json at all",
        r#"{"kind":"other-app","items":[]}"#,
        r#"{"kind":"document-items","items":"x"}"#,
    ];
    for payload in payloads {
        let mut session = setup(MemoryClipboard::with_text(payload));
        assert_eq!(session.paste().unwrap(), ClipboardOutcome::NothingToPaste);
        assert_eq!(names(&session), ["a", "b", "c", "d"]);
        assert!(!session.can_undo());
    }
}

#[test]
fn structured_write_failure_falls_back_to_plain_text() {
    let mut session = setup(PlainOnlyClipboard::default());
    session.click(&id("a"));
    session.ctrl_click(&id("b"));
    assert_eq!(session.copy(), ClipboardOutcome::Copied(2));

    let written = session.clipboard().system().text.as_deref();
    assert_eq!(written, Some("# Load\nx = 1\n\n---\n\nnotes"));

    // The in-session copy is still retained, so paste works.
    assert!(matches!(session.paste().unwrap(), ClipboardOutcome::Pasted(_)));
}

#[test]
fn paste_without_anchor_appends() {
    let envelope = ClipboardEnvelope::from_items(vec![text("z", "tail")]);
    let mut session = setup(MemoryClipboard::with_text(envelope.to_json().unwrap()));

    let ClipboardOutcome::Pasted(ids) = session.paste().unwrap() else {
        panic!("expected paste");
    };
    assert_eq!(session.items().last().unwrap().id, ids[0]);
    assert_ne!(ids[0], id("z"));
}

#[test]
fn external_paste_gate_blocks_other_clipboard_operations() {
    let mut session = setup(MemoryClipboard::new());
    session.click(&id("a"));

    let PasteStart::AwaitingRead(ticket) = session.begin_external_paste().unwrap() else {
        panic!("expected external read");
    };
    assert!(session.clipboard().is_busy());
    assert_eq!(session.copy(), ClipboardOutcome::Busy);
    assert_eq!(session.cut(), ClipboardOutcome::Busy);
    assert_eq!(session.paste().unwrap(), ClipboardOutcome::Busy);
    assert_eq!(
        session.begin_external_paste().unwrap(),
        PasteStart::Completed(ClipboardOutcome::Busy)
    );
    assert_eq!(names(&session), ["a", "b", "c", "d"]);

    let json = ClipboardEnvelope::from_items(vec![text("z", "from host")])
        .to_json()
        .unwrap();
    let outcome = session.finish_external_paste(ticket, Ok(json)).unwrap();
    let ClipboardOutcome::Pasted(ids) = outcome else {
        panic!("expected paste");
    };
    assert_eq!(session.items()[1].id, ids[0]);
    assert!(!session.clipboard().is_busy());
}

#[test]
fn external_paste_uses_retained_copy_without_host_read() {
    let mut session = setup(NoSystemClipboard);
    session.click(&id("d"));
    session.copy();

    let start = session.begin_external_paste().unwrap();
    assert!(matches!(start, PasteStart::Completed(ClipboardOutcome::Pasted(_))));
    assert!(!session.clipboard().is_busy());
    assert_eq!(session.items().len(), 5);
}

#[test]
fn cancelled_external_paste_reopens_clipboard() {
    let mut session = setup(MemoryClipboard::new());
    session.click(&id("a"));

    let PasteStart::AwaitingRead(ticket) = session.begin_external_paste().unwrap() else {
        panic!("expected external read");
    };
    assert_eq!(session.copy(), ClipboardOutcome::Busy);

    assert!(session.cancel_external_paste(ticket));
    assert!(!session.clipboard().is_busy());
    assert_eq!(names(&session), ["a", "b", "c", "d"]);
    assert!(!session.can_undo());

    assert_eq!(session.copy(), ClipboardOutcome::Copied(1));
    assert!(matches!(session.paste().unwrap(), ClipboardOutcome::Pasted(_)));
}
