//! Clipboard transfer state.
//!
//! # Responsibility
//! - Retain the last copied envelope in-process.
//! - Write to / read from the host's system clipboard through
//!   [`SystemClipboard`], falling back to plain text when a structured write
//!   fails.
//! - Serialize clipboard operations with a single in-flight gate.
//! - Clone items for re-insertion with fresh IDs.
//!
//! # Invariants
//! - At most one external paste is in flight; while it is, other clipboard
//!   operations report `Busy` and change nothing.
//! - Cloned items never reuse a source ID.
//! - System clipboard failures are logged and absorbed, never returned to
//!   the user.

use crate::clipboard::envelope::{ClipboardEnvelope, ClipboardError};
use crate::model::item::{Block, Item, ItemId};
use log::{debug, warn};

/// Host system clipboard seam.
pub trait SystemClipboard {
    /// Writes UTF-8 text to the clipboard.
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
    /// Reads UTF-8 text from the clipboard.
    fn read_text(&mut self) -> Result<String, ClipboardError>;
}

/// Process-local clipboard for headless hosts and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clipboard pre-filled with `text`, as if another application copied it.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl SystemClipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.text = Some(text.to_string());
        Ok(())
    }

    fn read_text(&mut self) -> Result<String, ClipboardError> {
        self.text
            .clone()
            .ok_or_else(|| ClipboardError::Unavailable("clipboard is empty".to_string()))
    }
}

/// Clipboard for hosts without system clipboard access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoSystemClipboard;

impl SystemClipboard for NoSystemClipboard {
    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable("no system clipboard".to_string()))
    }

    fn read_text(&mut self) -> Result<String, ClipboardError> {
        Err(ClipboardError::Unavailable("no system clipboard".to_string()))
    }
}

/// Result of a user-level clipboard command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardOutcome {
    /// Items copied.
    Copied(usize),
    /// Items copied then removed.
    Cut(usize),
    /// New item IDs, in document order.
    Pasted(Vec<ItemId>),
    /// New item IDs, in document order.
    Duplicated(Vec<ItemId>),
    /// Nothing usable on either clipboard; the document is unchanged. Hosts
    /// may show a transient notice.
    NothingToPaste,
    /// Nothing was selected.
    Empty,
    /// Another clipboard operation is still in flight.
    Busy,
}

/// Token for a split-phase paste whose clipboard read completes later.
///
/// Consumed by `finish_external_paste` or `cancel_external_paste`. Until one
/// of them runs, copy, cut and paste report `Busy`. A ticket that does not
/// match the open gate is rejected.
#[must_use = "an unfinished paste ticket keeps the clipboard busy"]
#[derive(Debug, PartialEq, Eq)]
pub struct PasteTicket {
    serial: u64,
}

/// Clipboard state owned by one editor session.
#[derive(Debug)]
pub struct ClipboardManager<C: SystemClipboard> {
    system: C,
    retained: Option<ClipboardEnvelope>,
    in_flight: Option<u64>,
    next_serial: u64,
}

impl<C: SystemClipboard> ClipboardManager<C> {
    pub fn new(system: C) -> Self {
        Self {
            system,
            retained: None,
            in_flight: None,
            next_serial: 0,
        }
    }

    pub fn system(&self) -> &C {
        &self.system
    }

    /// Envelope from the last copy/cut in this session.
    pub fn retained(&self) -> Option<&ClipboardEnvelope> {
        self.retained.as_ref()
    }

    /// Whether an external paste is awaiting its clipboard read.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Retains `items` (document order) and publishes them to the system
    /// clipboard: structured JSON first, plain text on failure.
    pub fn copy_items(&mut self, items: Vec<Item>) -> usize {
        let envelope = ClipboardEnvelope::from_items(items);
        let count = envelope.items.len();
        self.publish(&envelope);
        self.retained = Some(envelope);
        count
    }

    /// Envelope to paste: the retained one, else whatever the system
    /// clipboard holds if it parses as a document-items envelope.
    pub fn resolve_paste(&mut self) -> Option<ClipboardEnvelope> {
        if let Some(envelope) = &self.retained {
            return Some(envelope.clone());
        }
        let read = self.system.read_text();
        parse_clipboard_read(read)
    }

    /// Opens the gate for a split-phase paste.
    ///
    /// Returns `None` when another read is already in flight.
    pub fn begin_external(&mut self) -> Option<PasteTicket> {
        if self.in_flight.is_some() {
            return None;
        }
        let serial = self.next_serial;
        self.next_serial += 1;
        self.in_flight = Some(serial);
        Some(PasteTicket { serial })
    }

    /// Closes the gate opened by `ticket` and parses the host's read result.
    ///
    /// A mismatched ticket leaves the gate untouched and yields `None`.
    pub fn finish_external(
        &mut self,
        ticket: PasteTicket,
        read: Result<String, ClipboardError>,
    ) -> Option<ClipboardEnvelope> {
        if self.in_flight != Some(ticket.serial) {
            warn!(
                "event=clipboard_paste module=clipboard status=error error_code=stale_ticket serial={}",
                ticket.serial
            );
            return None;
        }
        self.in_flight = None;
        parse_clipboard_read(read)
    }

    /// Closes the gate opened by `ticket` without reading the clipboard.
    ///
    /// Returns `false` and leaves the gate untouched for a mismatched ticket.
    pub fn cancel_external(&mut self, ticket: PasteTicket) -> bool {
        if self.in_flight != Some(ticket.serial) {
            warn!(
                "event=clipboard_paste_cancel module=clipboard status=error error_code=stale_ticket serial={}",
                ticket.serial
            );
            return false;
        }
        self.in_flight = None;
        debug!(
            "event=clipboard_paste_cancel module=clipboard status=ok serial={}",
            ticket.serial
        );
        true
    }

    fn publish(&mut self, envelope: &ClipboardEnvelope) {
        let structured = envelope.to_json();
        let written = structured.and_then(|json| self.system.write_text(&json));
        let Err(err) = written else {
            debug!("event=clipboard_write module=clipboard status=ok format=json");
            return;
        };

        warn!(
            "event=clipboard_write module=clipboard status=fallback format=json error={}",
            err
        );
        if let Err(err) = self.system.write_text(&envelope.plain_text) {
            warn!(
                "event=clipboard_write module=clipboard status=error format=plain_text error={}",
                err
            );
        }
    }
}

fn parse_clipboard_read(read: Result<String, ClipboardError>) -> Option<ClipboardEnvelope> {
    match read.and_then(|text| ClipboardEnvelope::parse(&text)) {
        Ok(envelope) => Some(envelope),
        Err(err) => {
            warn!(
                "event=clipboard_read module=clipboard status=noop error={}",
                err
            );
            None
        }
    }
}

/// Clones `items` with fresh IDs tagged by `prefix`, keeping their sequence.
///
/// When `title_suffix` is set, cell titles get it appended. Orders are left
/// for the store to assign.
pub fn clone_for_insert(items: &[Item], prefix: &str, title_suffix: Option<&str>) -> Vec<Item> {
    items
        .iter()
        .map(|item| {
            let mut clone = item.clone_with_id(ItemId::generate_with_prefix(prefix));
            if let (Some(suffix), Block::Cell(cell)) = (title_suffix, &mut clone.block) {
                cell.metadata.title.push_str(suffix);
            }
            clone
        })
        .collect()
}
