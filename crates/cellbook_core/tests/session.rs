use cellbook_core::{
    Block, BlockKind, CellDraft, CellType, ClipboardOutcome, CommandOutcome, EditorSession, ItemId,
    Key, KeyChord, MemoryClipboard, SeparatorStyle, SessionError,
};

fn setup() -> (EditorSession<MemoryClipboard>, Vec<ItemId>) {
    let mut session = EditorSession::with_defaults(MemoryClipboard::new());
    let ids = vec![
        session.add_text_section(None).unwrap(),
        session.add_cell(CellType::Python, None).unwrap(),
        session.add_separator(SeparatorStyle::Line, None).unwrap(),
    ];
    (session, ids)
}

#[test]
fn add_after_anchor_inserts_directly_below_it() {
    let (mut session, ids) = setup();
    let added = session.add_cell(CellType::Chart, Some(&ids[0])).unwrap();
    assert_eq!(session.store().index_of(&added), Some(1));

    // A stale anchor appends.
    let appended = session
        .add_text_section(Some(&ItemId::new("gone")))
        .unwrap();
    assert_eq!(session.store().index_of(&appended), Some(4));
}

#[test]
fn convert_keeps_id_and_position() {
    let (mut session, ids) = setup();
    session.convert_text_to_cell(&ids[0], CellType::Sql).unwrap();

    let item = &session.items()[0];
    assert_eq!(item.id, ids[0]);
    match &item.block {
        Block::Cell(cell) => {
            assert_eq!(cell.cell_type, CellType::Sql);
            assert_eq!(cell.metadata.title, "Converted sql Cell");
        }
        other => panic!("expected cell, got {other:?}"),
    }

    session.update_cell_content(&ids[1], "print(1)").unwrap();
    session.convert_cell_to_text(&ids[1]).unwrap();
    assert_eq!(session.items()[1].kind(), BlockKind::TextSection);
    match &session.items()[1].block {
        Block::TextSection(text) => assert_eq!(text.content, "print(1)"),
        other => panic!("expected text section, got {other:?}"),
    }

    let err = session.convert_cell_to_text(&ids[2]).unwrap_err();
    assert!(matches!(
        err,
        SessionError::WrongKind {
            expected: BlockKind::Cell,
            found: BlockKind::Separator,
            ..
        }
    ));
}

#[test]
fn generated_cells_insert_after_anchor_as_one_action() {
    let (mut session, ids) = setup();
    let depth = session.history().undo_depth();
    let drafts = vec![
        CellDraft {
            cell_type: Some(CellType::Prompt),
            content: Some("summarize".to_string()),
            ..CellDraft::default()
        },
        CellDraft::default(),
    ];

    let created = session.insert_generated_cells(Some(&ids[0]), drafts).unwrap();
    assert_eq!(created.len(), 2);
    assert!(created.iter().all(|id| id.as_str().starts_with("generated-")));
    assert_eq!(session.store().index_of(&created[0]), Some(1));
    assert_eq!(session.store().index_of(&created[1]), Some(2));
    match &session.items()[2].block {
        Block::Cell(cell) => assert_eq!(cell.metadata.title, "Generated Cell"),
        other => panic!("expected cell, got {other:?}"),
    }
    assert_eq!(session.history().undo_depth(), depth + 1);

    assert!(session
        .insert_generated_cells(None, Vec::new())
        .unwrap()
        .is_empty());
}

#[test]
fn keyboard_shortcuts_route_to_session_operations() {
    let (mut session, ids) = setup();

    assert_eq!(session.handle_key(KeyChord::ctrl(Key::Char('c'))).unwrap(), None);

    session.click(&ids[0]);
    assert_eq!(
        session.handle_key(KeyChord::ctrl(Key::Char('c'))).unwrap(),
        Some(CommandOutcome::Clipboard(ClipboardOutcome::Copied(1)))
    );
    assert_eq!(
        session.handle_key(KeyChord::shift(Key::ArrowDown)).unwrap(),
        Some(CommandOutcome::Applied(true))
    );
    assert_eq!(session.selection().len(), 2);

    session.handle_key(KeyChord::plain(Key::Escape)).unwrap();
    assert!(session.selection().is_empty());

    session.handle_key(KeyChord::ctrl(Key::Char('a'))).unwrap();
    assert_eq!(
        session.handle_key(KeyChord::plain(Key::Delete)).unwrap(),
        Some(CommandOutcome::Applied(true))
    );
    assert!(session.items().is_empty());

    session.handle_key(KeyChord::ctrl(Key::Char('z'))).unwrap();
    assert_eq!(session.items().len(), 3);
    session.handle_key(KeyChord::ctrl_shift(Key::Char('z'))).unwrap();
    assert!(session.items().is_empty());
}

#[test]
fn delete_item_and_clear_all_prune_selection() {
    let (mut session, ids) = setup();
    session.select_all();
    session.delete_item(&ids[1]).unwrap();
    assert_eq!(session.selection().len(), 2);
    assert!(matches!(
        session.delete_item(&ids[1]),
        Err(SessionError::ItemNotFound(_))
    ));

    assert_eq!(session.clear_all(), 2);
    assert!(session.selection().is_empty());
    assert_eq!(session.clear_all(), 0);
    assert!(session.undo().unwrap());
    assert_eq!(session.items().len(), 2);
}

#[test]
fn separator_style_change_is_recorded() {
    let (mut session, ids) = setup();
    session.set_separator_style(&ids[2], SeparatorStyle::Dotted).unwrap();
    assert!(session.plain_text().ends_with("··········"));
    session.undo().unwrap();
    assert!(session.plain_text().ends_with("──────────"));
}

#[test]
fn locked_cells_still_accept_output() {
    let (mut session, ids) = setup();
    assert!(session.toggle_cell_lock(&ids[1]).unwrap());
    assert!(matches!(
        session.rename_cell(&ids[1], "renamed"),
        Err(SessionError::ItemLocked(_))
    ));
    session.set_cell_output(&ids[1], Some("done".to_string())).unwrap();
    assert!(!session.toggle_cell_lock(&ids[1]).unwrap());
    session.rename_cell(&ids[1], "renamed").unwrap();
}
