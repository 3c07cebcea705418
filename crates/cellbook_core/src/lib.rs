//! Core domain logic for cellbook documents.
//! This crate is the single source of truth for document editing invariants.

pub mod clipboard;
pub mod config;
pub mod export;
pub mod history;
pub mod logging;
pub mod model;
pub mod reorder;
pub mod selection;
pub mod service;
pub mod store;

pub use clipboard::envelope::{ClipboardEnvelope, ClipboardError, CLIPBOARD_KIND};
pub use clipboard::manager::{
    ClipboardOutcome, MemoryClipboard, NoSystemClipboard, PasteTicket, SystemClipboard,
};
pub use config::{
    default_log_level, ConfigError, LoggingConfig, MarqueeThresholds, SessionConfig,
};
pub use export::document::{DocumentExport, ExportError};
pub use history::snapshot_stack::History;
pub use logging::{init_logging, logging_status, LoggingError};
pub use model::geometry::{Point, Rect};
pub use model::item::{
    Block, BlockKind, CellBlock, CellMetadata, CellType, Item, ItemId, SeparatorBlock,
    SeparatorStyle, TextBlock,
};
pub use selection::controller::{NavDirection, SelectionController};
pub use selection::marquee::ItemBounds;
pub use service::keymap::{EditorCommand, Key, KeyChord};
pub use service::session::{
    CellDraft, CommandOutcome, EditorSession, PasteStart, SessionError, SessionResult,
};
pub use store::item_store::{ItemStore, StoreError, StoreResult};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
