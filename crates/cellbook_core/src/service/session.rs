//! Editor session use-cases.
//!
//! # Responsibility
//! - Own one document's items, selection, clipboard state and history.
//! - Expose every user-level editing operation, snapshotting discrete
//!   actions for undo.
//! - Route keyboard chords to operations through the keymap.
//!
//! # Invariants
//! - Store invariants hold after every public call returns.
//! - A snapshot is committed only after its mutation succeeded; failed or
//!   no-op calls leave history untouched.
//! - Undo and redo clear the selection.
//! - Keystroke-level content edits are not snapshotted; callers group them
//!   with [`EditorSession::checkpoint`].
//!
//! # See also
//! - crate::history::snapshot_stack
//! - crate::service::keymap

use crate::clipboard::envelope::{ClipboardEnvelope, ClipboardError};
use crate::clipboard::manager::{
    clone_for_insert, ClipboardManager, ClipboardOutcome, PasteTicket, SystemClipboard,
};
use crate::clipboard::plain_text::render_items;
use crate::config::{ConfigError, SessionConfig};
use crate::export::document::DocumentExport;
use crate::history::snapshot_stack::History;
use crate::model::geometry::Point;
use crate::model::item::{
    Block, BlockKind, CellBlock, CellMetadata, CellType, Item, ItemId, SeparatorStyle, TextBlock,
};
use crate::reorder::engine;
use crate::selection::controller::{NavDirection, SelectionController};
use crate::selection::marquee::ItemBounds;
use crate::service::keymap::{self, EditorCommand, KeyChord};
use crate::store::item_store::{ItemStore, StoreError};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const PASTE_ID_PREFIX: &str = "paste";
const DUPLICATE_ID_PREFIX: &str = "duplicate";
const GENERATED_ID_PREFIX: &str = "generated";
const GENERATED_CELL_TITLE: &str = "Generated Cell";

/// Result type used by session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Session-level error.
#[derive(Debug)]
pub enum SessionError {
    /// Target item does not exist.
    ItemNotFound(ItemId),
    /// Content edit on a locked item.
    ItemLocked(ItemId),
    /// Operation does not apply to this item kind.
    WrongKind {
        id: ItemId,
        expected: BlockKind,
        found: BlockKind,
    },
    /// Session config failed validation.
    Config(ConfigError),
    /// Item store rejected a mutation.
    Store(StoreError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::ItemLocked(id) => write!(f, "item is locked: {id}"),
            Self::WrongKind {
                id,
                expected,
                found,
            } => write!(f, "item {id} is a {found}, expected a {expected}"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::ItemNotFound(id) => Self::ItemNotFound(id),
            other => Self::Store(other),
        }
    }
}

impl From<ConfigError> for SessionError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

/// Partial cell supplied by the generation collaborator.
///
/// Missing fields default to a blank python cell titled `Generated Cell`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CellDraft {
    #[serde(rename = "type")]
    pub cell_type: Option<CellType>,
    pub content: Option<String>,
    pub output: Option<String>,
    pub metadata: Option<CellMetadata>,
}

impl CellDraft {
    fn into_block(self) -> CellBlock {
        CellBlock {
            cell_type: self.cell_type.unwrap_or(CellType::Python),
            content: self.content.unwrap_or_default(),
            output: self.output,
            metadata: self
                .metadata
                .unwrap_or_else(|| CellMetadata::titled(GENERATED_CELL_TITLE)),
        }
    }
}

/// First phase of a paste whose system clipboard read may complete later.
#[derive(Debug, PartialEq, Eq)]
pub enum PasteStart {
    /// Resolved without an external read (retained envelope, or busy).
    Completed(ClipboardOutcome),
    /// Host must read the system clipboard and call
    /// [`EditorSession::finish_external_paste`] with this ticket, or
    /// [`EditorSession::cancel_external_paste`] if the read is abandoned.
    AwaitingRead(PasteTicket),
}

/// Result of a keyboard command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Clipboard(ClipboardOutcome),
    /// Whether the document or selection changed.
    Applied(bool),
}

/// One open document and its editing state.
pub struct EditorSession<C: SystemClipboard> {
    title: String,
    store: ItemStore,
    selection: SelectionController,
    clipboard: ClipboardManager<C>,
    history: History,
    config: SessionConfig,
}

impl<C: SystemClipboard> EditorSession<C> {
    /// Creates an empty session.
    ///
    /// # Errors
    /// - Returns `Config` when `config` fails validation.
    pub fn new(config: SessionConfig, clipboard: C) -> SessionResult<Self> {
        config.validate()?;
        Ok(Self::empty(config, clipboard))
    }

    /// Empty session with default config.
    pub fn with_defaults(clipboard: C) -> Self {
        Self::empty(SessionConfig::default(), clipboard)
    }

    /// Field setup shared by every constructor; `config` is already valid.
    fn empty(config: SessionConfig, clipboard: C) -> Self {
        Self {
            title: String::new(),
            store: ItemStore::new(),
            selection: SelectionController::new(config.marquee),
            clipboard: ClipboardManager::new(clipboard),
            history: History::with_limit(config.history_limit),
            config,
        }
    }

    /// Opens an exported document. History starts empty.
    ///
    /// # Errors
    /// - Returns `Config` when `config` fails validation.
    /// - Returns `Store` when two exported records share an ID.
    pub fn from_export(
        export: DocumentExport,
        config: SessionConfig,
        clipboard: C,
    ) -> SessionResult<Self> {
        let mut session = Self::new(config, clipboard)?;
        session.title = export.title.clone();
        session.store = ItemStore::from_items(export.into_items())?;
        info!(
            "event=session_open module=service status=ok items={}",
            session.store.len()
        );
        Ok(session)
    }

    /// Projects the current document into the export layout.
    pub fn export(&self) -> DocumentExport {
        DocumentExport::from_items(self.title.clone(), self.store.items())
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Items in document order.
    pub fn items(&self) -> &[Item] {
        self.store.items()
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn is_selected(&self, id: &ItemId) -> bool {
        self.selection.is_selected(id)
    }

    pub fn clipboard(&self) -> &ClipboardManager<C> {
        &self.clipboard
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Plain-text rendering of the whole document.
    pub fn plain_text(&self) -> String {
        render_items(self.store.items())
    }

    /// Adds a blank cell titled `New {type}` after `after`, or at the end.
    pub fn add_cell(
        &mut self,
        cell_type: CellType,
        after: Option<&ItemId>,
    ) -> SessionResult<ItemId> {
        let item = Item::cell(CellBlock::blank(cell_type));
        self.add_one(item, after)
    }

    pub fn add_text_section(&mut self, after: Option<&ItemId>) -> SessionResult<ItemId> {
        self.add_one(Item::text(String::new()), after)
    }

    pub fn add_separator(
        &mut self,
        style: SeparatorStyle,
        after: Option<&ItemId>,
    ) -> SessionResult<ItemId> {
        self.add_one(Item::separator(style), after)
    }

    /// Inserts generated cells as one undoable action, after `after` or at
    /// the end.
    pub fn insert_generated_cells(
        &mut self,
        after: Option<&ItemId>,
        drafts: Vec<CellDraft>,
    ) -> SessionResult<Vec<ItemId>> {
        if drafts.is_empty() {
            return Ok(Vec::new());
        }
        let items: Vec<Item> = drafts
            .into_iter()
            .map(|draft| {
                Item::with_id(
                    ItemId::generate_with_prefix(GENERATED_ID_PREFIX),
                    Block::Cell(draft.into_block()),
                )
            })
            .collect();
        let at_index = self.index_after(after);
        self.insert_tracked(items, at_index)
    }

    /// Replaces a cell's source.
    ///
    /// # Errors
    /// - `ItemLocked` when the cell is locked.
    pub fn update_cell_content(
        &mut self,
        id: &ItemId,
        content: impl Into<String>,
    ) -> SessionResult<()> {
        self.ensure_unlocked(id)?;
        let content = content.into();
        self.with_cell(id, |cell| cell.content = content)
    }

    /// Stores an execution result. Allowed on locked cells.
    pub fn set_cell_output(&mut self, id: &ItemId, output: Option<String>) -> SessionResult<()> {
        self.with_cell(id, |cell| cell.output = output)
    }

    pub fn rename_cell(&mut self, id: &ItemId, title: impl Into<String>) -> SessionResult<()> {
        self.ensure_unlocked(id)?;
        let title = title.into();
        self.with_cell(id, |cell| cell.metadata.title = title)
    }

    /// Replaces a text section's markup.
    ///
    /// # Errors
    /// - `ItemLocked` when the section is locked.
    pub fn update_text_section(
        &mut self,
        id: &ItemId,
        content: impl Into<String>,
    ) -> SessionResult<()> {
        self.ensure_unlocked(id)?;
        let content = content.into();
        self.with_text(id, |text| text.content = content)
    }

    /// Records the current document as an undo point.
    pub fn checkpoint(&mut self) {
        self.history.record_before_mutation(&self.store);
    }

    /// Flips a cell's lock. Returns the new state.
    pub fn toggle_cell_lock(&mut self, id: &ItemId) -> SessionResult<bool> {
        let before = self.history.snapshot(&self.store);
        let locked = self.with_cell(id, |cell| {
            let next = !cell.is_locked();
            cell.metadata.locked = Some(next);
            next
        })?;
        self.history.commit(before);
        Ok(locked)
    }

    /// Flips a text section's lock. Returns the new state.
    pub fn toggle_text_lock(&mut self, id: &ItemId) -> SessionResult<bool> {
        let before = self.history.snapshot(&self.store);
        let locked = self.with_text(id, |text| {
            let next = !text.is_locked();
            text.is_locked = Some(next);
            next
        })?;
        self.history.commit(before);
        Ok(locked)
    }

    pub fn set_separator_style(&mut self, id: &ItemId, style: SeparatorStyle) -> SessionResult<()> {
        let before = self.history.snapshot(&self.store);
        let found = self.store.update(id, |block| match block {
            Block::Separator(separator) => {
                separator.style = style;
                Ok(())
            }
            other => Err(other.kind()),
        })?;
        found.map_err(|found| wrong_kind(id, BlockKind::Separator, found))?;
        self.history.commit(before);
        Ok(())
    }

    /// Turns a cell into a text section with the cell's source as content.
    /// ID and position are kept.
    pub fn convert_cell_to_text(&mut self, id: &ItemId) -> SessionResult<()> {
        self.convert(id, BlockKind::Cell, |block| match block {
            Block::Cell(cell) => Some(Block::TextSection(TextBlock {
                content: cell.content.clone(),
                is_locked: None,
            })),
            _ => None,
        })
    }

    /// Turns a text section into a cell titled `Converted {type} Cell`.
    /// ID and position are kept.
    pub fn convert_text_to_cell(&mut self, id: &ItemId, cell_type: CellType) -> SessionResult<()> {
        self.convert(id, BlockKind::TextSection, |block| match block {
            Block::TextSection(text) => Some(Block::Cell(CellBlock {
                cell_type,
                content: text.content.clone(),
                output: None,
                metadata: CellMetadata::titled(format!("Converted {} Cell", cell_type.as_str())),
            })),
            _ => None,
        })
    }

    /// Removes every selected item. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        if self.selection.is_empty() {
            return 0;
        }
        let before = self.history.snapshot(&self.store);
        let removed = self.store.remove(self.selection.selected()).len();
        self.selection.clear();
        if removed > 0 {
            self.history.commit(before);
        }
        info!(
            "event=session_delete module=service status=ok removed={}",
            removed
        );
        removed
    }

    /// Removes one item regardless of selection.
    pub fn delete_item(&mut self, id: &ItemId) -> SessionResult<()> {
        if !self.store.contains(id) {
            return Err(SessionError::ItemNotFound(id.clone()));
        }
        let before = self.history.snapshot(&self.store);
        self.store.remove(&HashSet::from([id.clone()]));
        self.selection.retain_existing(&self.store);
        self.history.commit(before);
        Ok(())
    }

    /// Removes every item. Returns how many were removed.
    pub fn clear_all(&mut self) -> usize {
        if self.store.is_empty() {
            return 0;
        }
        let before = self.history.snapshot(&self.store);
        let removed = self.store.take_items().len();
        self.selection.clear();
        self.history.commit(before);
        info!(
            "event=session_clear module=service status=ok removed={}",
            removed
        );
        removed
    }

    /// Copies the selection in document order.
    pub fn copy(&mut self) -> ClipboardOutcome {
        if self.clipboard.is_busy() {
            return ClipboardOutcome::Busy;
        }
        let items = self.selected_items();
        if items.is_empty() {
            return ClipboardOutcome::Empty;
        }
        let count = self.clipboard.copy_items(items);
        info!(
            "event=clipboard_copy module=service status=ok count={}",
            count
        );
        ClipboardOutcome::Copied(count)
    }

    /// Copies the selection, then deletes it as one undoable action.
    pub fn cut(&mut self) -> ClipboardOutcome {
        match self.copy() {
            ClipboardOutcome::Copied(count) => {
                self.delete_selected();
                ClipboardOutcome::Cut(count)
            }
            other => other,
        }
    }

    /// Pastes after the anchor, or at the end when there is none.
    ///
    /// Reads the system clipboard synchronously when nothing was copied in
    /// this session.
    pub fn paste(&mut self) -> SessionResult<ClipboardOutcome> {
        if self.clipboard.is_busy() {
            return Ok(ClipboardOutcome::Busy);
        }
        match self.clipboard.resolve_paste() {
            Some(envelope) => self.paste_envelope(envelope),
            None => Ok(ClipboardOutcome::NothingToPaste),
        }
    }

    /// Starts a paste for hosts whose clipboard read is asynchronous.
    pub fn begin_external_paste(&mut self) -> SessionResult<PasteStart> {
        if self.clipboard.is_busy() {
            return Ok(PasteStart::Completed(ClipboardOutcome::Busy));
        }
        if let Some(envelope) = self.clipboard.retained().cloned() {
            return self.paste_envelope(envelope).map(PasteStart::Completed);
        }
        match self.clipboard.begin_external() {
            Some(ticket) => Ok(PasteStart::AwaitingRead(ticket)),
            None => Ok(PasteStart::Completed(ClipboardOutcome::Busy)),
        }
    }

    /// Completes a paste started with [`EditorSession::begin_external_paste`].
    pub fn finish_external_paste(
        &mut self,
        ticket: PasteTicket,
        read: Result<String, ClipboardError>,
    ) -> SessionResult<ClipboardOutcome> {
        match self.clipboard.finish_external(ticket, read) {
            Some(envelope) => self.paste_envelope(envelope),
            None => Ok(ClipboardOutcome::NothingToPaste),
        }
    }

    /// Abandons a paste started with [`EditorSession::begin_external_paste`]
    /// and reopens the clipboard. The document is left unchanged.
    pub fn cancel_external_paste(&mut self, ticket: PasteTicket) -> bool {
        self.clipboard.cancel_external(ticket)
    }

    /// Clones the selection directly after its last item. Does not touch the
    /// clipboard.
    pub fn duplicate(&mut self) -> SessionResult<ClipboardOutcome> {
        let items = self.selected_items();
        let Some(last) = items.last() else {
            return Ok(ClipboardOutcome::Empty);
        };
        let at_index = self.index_after(Some(&last.id));
        let clones = clone_for_insert(
            &items,
            DUPLICATE_ID_PREFIX,
            Some(self.config.duplicate_title_suffix.as_str()),
        );
        let ids = self.insert_tracked(clones, at_index)?;
        info!(
            "event=session_duplicate module=service status=ok count={}",
            ids.len()
        );
        Ok(ClipboardOutcome::Duplicated(ids))
    }

    /// Applies a drag-and-drop result.
    pub fn drag_end(&mut self, dragged: &ItemId, destination: usize) -> bool {
        let selected = self.selection.selected().clone();
        self.reorder_tracked(|store| engine::drag_end(store, &selected, dragged, destination))
    }

    pub fn move_selection_up(&mut self) -> bool {
        let selected = self.selection.selected().clone();
        self.reorder_tracked(|store| engine::move_up(store, &selected))
    }

    pub fn move_selection_down(&mut self) -> bool {
        let selected = self.selection.selected().clone();
        self.reorder_tracked(|store| engine::move_down(store, &selected))
    }

    pub fn undo(&mut self) -> SessionResult<bool> {
        let applied = self.history.undo(&mut self.store)?;
        if applied {
            self.selection.clear();
        }
        Ok(applied)
    }

    pub fn redo(&mut self) -> SessionResult<bool> {
        let applied = self.history.redo(&mut self.store)?;
        if applied {
            self.selection.clear();
        }
        Ok(applied)
    }

    /// Plain click. Unknown IDs are ignored.
    pub fn click(&mut self, id: &ItemId) -> bool {
        if !self.store.contains(id) {
            return false;
        }
        self.selection.click(id);
        true
    }

    pub fn ctrl_click(&mut self, id: &ItemId) -> bool {
        if !self.store.contains(id) {
            return false;
        }
        self.selection.ctrl_click(id);
        true
    }

    pub fn shift_click(&mut self, id: &ItemId) -> bool {
        if !self.store.contains(id) {
            return false;
        }
        self.selection.shift_click(id, &self.store);
        true
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.store);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn start_marquee(&mut self, point: Point) {
        self.selection.start_marquee(point);
    }

    pub fn update_marquee(&mut self, point: Point, bounds: &dyn ItemBounds) {
        self.selection.update_marquee(point, &self.store, bounds);
    }

    pub fn end_marquee(&mut self) {
        self.selection.end_marquee();
    }

    pub fn arrow_nav(&mut self, direction: NavDirection, extend: bool) -> bool {
        self.selection.arrow_nav(direction, extend, &self.store)
    }

    /// Resolves and runs a key chord. Returns `None` when the chord is not an
    /// editor shortcut in the current state.
    pub fn handle_key(&mut self, chord: KeyChord) -> SessionResult<Option<CommandOutcome>> {
        let Some(command) = keymap::resolve(chord, !self.selection.is_empty()) else {
            return Ok(None);
        };
        debug!(
            "event=key_command module=service status=ok command={:?}",
            command
        );
        self.execute(command).map(Some)
    }

    /// Runs one editor command.
    pub fn execute(&mut self, command: EditorCommand) -> SessionResult<CommandOutcome> {
        let outcome = match command {
            EditorCommand::Copy => CommandOutcome::Clipboard(self.copy()),
            EditorCommand::Cut => CommandOutcome::Clipboard(self.cut()),
            EditorCommand::Paste => CommandOutcome::Clipboard(self.paste()?),
            EditorCommand::Duplicate => CommandOutcome::Clipboard(self.duplicate()?),
            EditorCommand::Undo => CommandOutcome::Applied(self.undo()?),
            EditorCommand::Redo => CommandOutcome::Applied(self.redo()?),
            EditorCommand::SelectAll => {
                self.select_all();
                CommandOutcome::Applied(!self.store.is_empty())
            }
            EditorCommand::ClearSelection => {
                let had_selection = !self.selection.is_empty();
                self.clear_selection();
                CommandOutcome::Applied(had_selection)
            }
            EditorCommand::DeleteSelected => CommandOutcome::Applied(self.delete_selected() > 0),
            EditorCommand::Navigate { direction, extend } => {
                CommandOutcome::Applied(self.arrow_nav(direction, extend))
            }
        };
        Ok(outcome)
    }

    fn selected_items(&self) -> Vec<Item> {
        self.store
            .items()
            .iter()
            .filter(|item| self.selection.is_selected(&item.id))
            .cloned()
            .collect()
    }

    /// Index directly after `after`; the end when `after` is `None` or gone.
    fn index_after(&self, after: Option<&ItemId>) -> usize {
        after
            .and_then(|id| self.store.index_of(id))
            .map_or(self.store.len(), |index| index + 1)
    }

    fn add_one(&mut self, item: Item, after: Option<&ItemId>) -> SessionResult<ItemId> {
        let id = item.id.clone();
        let kind = item.kind();
        let at_index = self.index_after(after);
        self.insert_tracked(vec![item], at_index)?;
        debug!(
            "event=session_add module=service status=ok kind={:?} at_index={}",
            kind, at_index
        );
        Ok(id)
    }

    /// Shared insertion path for adds, paste, duplicate and generation.
    fn insert_tracked(&mut self, items: Vec<Item>, at_index: usize) -> SessionResult<Vec<ItemId>> {
        let ids: Vec<ItemId> = items.iter().map(|item| item.id.clone()).collect();
        let before = self.history.snapshot(&self.store);
        self.store.insert(items, at_index)?;
        self.history.commit(before);
        Ok(ids)
    }

    fn paste_envelope(&mut self, envelope: ClipboardEnvelope) -> SessionResult<ClipboardOutcome> {
        if envelope.items.is_empty() {
            return Ok(ClipboardOutcome::NothingToPaste);
        }
        let at_index = self.index_after(self.selection.anchor());
        let clones = clone_for_insert(&envelope.items, PASTE_ID_PREFIX, None);
        let ids = self.insert_tracked(clones, at_index)?;
        info!(
            "event=clipboard_paste module=service status=ok count={} at_index={}",
            ids.len(),
            at_index
        );
        Ok(ClipboardOutcome::Pasted(ids))
    }

    fn reorder_tracked(&mut self, reorder: impl FnOnce(&mut ItemStore) -> bool) -> bool {
        let before = self.history.snapshot(&self.store);
        let changed = reorder(&mut self.store);
        if changed {
            self.history.commit(before);
        }
        changed
    }

    fn ensure_unlocked(&self, id: &ItemId) -> SessionResult<()> {
        let item = self
            .store
            .get(id)
            .ok_or_else(|| SessionError::ItemNotFound(id.clone()))?;
        if item.block.is_locked() {
            return Err(SessionError::ItemLocked(id.clone()));
        }
        Ok(())
    }

    fn with_cell<T>(
        &mut self,
        id: &ItemId,
        mutate: impl FnOnce(&mut CellBlock) -> T,
    ) -> SessionResult<T> {
        let found = self.store.update(id, |block| match block {
            Block::Cell(cell) => Ok(mutate(cell)),
            other => Err(other.kind()),
        })?;
        found.map_err(|found| wrong_kind(id, BlockKind::Cell, found))
    }

    fn with_text<T>(
        &mut self,
        id: &ItemId,
        mutate: impl FnOnce(&mut TextBlock) -> T,
    ) -> SessionResult<T> {
        let found = self.store.update(id, |block| match block {
            Block::TextSection(text) => Ok(mutate(text)),
            other => Err(other.kind()),
        })?;
        found.map_err(|found| wrong_kind(id, BlockKind::TextSection, found))
    }

    fn convert(
        &mut self,
        id: &ItemId,
        expected: BlockKind,
        build: impl FnOnce(&Block) -> Option<Block>,
    ) -> SessionResult<()> {
        let before = self.history.snapshot(&self.store);
        let converted = self.store.update(id, |block| match build(&*block) {
            Some(next) => {
                *block = next;
                Ok(())
            }
            None => Err(block.kind()),
        })?;
        converted.map_err(|found| wrong_kind(id, expected, found))?;
        self.history.commit(before);
        Ok(())
    }
}

fn wrong_kind(id: &ItemId, expected: BlockKind, found: BlockKind) -> SessionError {
    SessionError::WrongKind {
        id: id.clone(),
        expected,
        found,
    }
}
