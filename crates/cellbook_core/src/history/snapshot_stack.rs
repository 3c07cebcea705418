//! Snapshot-based undo/redo.
//!
//! # Responsibility
//! - Keep bounded undo and redo stacks of whole-document snapshots.
//! - Restore snapshots through `ItemStore::replace_all`.
//!
//! # Invariants
//! - History is linear: recording a new action clears the redo stack.
//! - Neither stack exceeds `limit`; the oldest entry is evicted first.
//! - Undo/redo on an empty stack is a no-op.

use crate::config::DEFAULT_HISTORY_LIMIT;
use crate::model::item::Item;
use crate::store::item_store::{ItemStore, StoreResult};
use log::debug;
use std::collections::VecDeque;

/// Deep copy of every item in a document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    items: Vec<Item>,
}

impl DocumentSnapshot {
    pub fn capture(store: &ItemStore) -> Self {
        Self {
            items: store.items().to_vec(),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }
}

/// Bounded linear undo/redo history.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<DocumentSnapshot>,
    redo: VecDeque<DocumentSnapshot>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// History keeping at most `limit` entries per stack (minimum 1).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    /// Deep-clones the current document.
    pub fn snapshot(&self, store: &ItemStore) -> DocumentSnapshot {
        DocumentSnapshot::capture(store)
    }

    /// Marks the start of an undoable action. Call immediately before the
    /// mutation.
    pub fn record_before_mutation(&mut self, store: &ItemStore) {
        let snapshot = self.snapshot(store);
        self.commit(snapshot);
    }

    /// Pushes a snapshot taken before a mutation that has since succeeded.
    pub fn commit(&mut self, snapshot: DocumentSnapshot) {
        push_bounded(&mut self.undo, snapshot, self.limit);
        self.redo.clear();
        debug!(
            "event=history_record module=history status=ok undo_depth={}",
            self.undo.len()
        );
    }

    /// Restores the most recent undo snapshot.
    ///
    /// Returns `Ok(false)` when there is nothing to undo.
    pub fn undo(&mut self, store: &mut ItemStore) -> StoreResult<bool> {
        let Some(previous) = self.undo.pop_back() else {
            return Ok(false);
        };
        let current = self.snapshot(store);
        if let Err(err) = store.replace_all(previous.items.clone()) {
            self.undo.push_back(previous);
            return Err(err);
        }
        push_bounded(&mut self.redo, current, self.limit);
        debug!(
            "event=history_undo module=history status=ok undo_depth={} redo_depth={}",
            self.undo.len(),
            self.redo.len()
        );
        Ok(true)
    }

    /// Re-applies the most recently undone snapshot.
    ///
    /// Returns `Ok(false)` when there is nothing to redo.
    pub fn redo(&mut self, store: &mut ItemStore) -> StoreResult<bool> {
        let Some(next) = self.redo.pop_back() else {
            return Ok(false);
        };
        let current = self.snapshot(store);
        if let Err(err) = store.replace_all(next.items.clone()) {
            self.redo.push_back(next);
            return Err(err);
        }
        push_bounded(&mut self.undo, current, self.limit);
        debug!(
            "event=history_redo module=history status=ok undo_depth={} redo_depth={}",
            self.undo.len(),
            self.redo.len()
        );
        Ok(true)
    }

    /// Drops all history.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

fn push_bounded(stack: &mut VecDeque<DocumentSnapshot>, snapshot: DocumentSnapshot, limit: usize) {
    stack.push_back(snapshot);
    while stack.len() > limit {
        stack.pop_front();
    }
}
