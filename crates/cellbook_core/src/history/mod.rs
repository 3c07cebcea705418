//! Undo/redo history.
//!
//! # Responsibility
//! - Capture whole-document snapshots before undoable actions.
//! - Restore them on undo/redo.
//!
//! # Invariants
//! - Callers decide action granularity; keystroke-level edits are not
//!   recorded unless the caller asks.

pub mod snapshot_stack;
