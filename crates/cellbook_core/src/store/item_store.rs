//! Canonical ordered item storage.
//!
//! # Responsibility
//! - Own the document's item list and its dense ordering.
//! - Provide the only mutation primitives (`insert`, `remove`,
//!   `replace_all`, `apply_sequence`) the rest of the core may use.
//!
//! # Invariants
//! - `items` is always sorted by `order`, and `order` equals the vector index
//!   (`0..N-1`, no gaps, no duplicates).
//! - Item IDs are unique across the whole store.
//! - Orders are re-derived from sequence position after every mutation; no
//!   increment/decrement patching.
//! - A failed mutation leaves the store unchanged.

use crate::model::item::{Block, Item, ItemId};
use log::{debug, error};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by item store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from item store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Two items would share one ID.
    DuplicateId(ItemId),
    /// Target item does not exist.
    ItemNotFound(ItemId),
    /// Order values are not a dense `0..N-1` sequence.
    OrderGap { index: usize, order: usize },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate item id: {id}"),
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::OrderGap { index, order } => write!(
                f,
                "item order is not dense: position {index} carries order {order}"
            ),
        }
    }
}

impl Error for StoreError {}

/// Ordered, ID-unique item collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemStore {
    items: Vec<Item>,
}

impl ItemStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from arbitrary items, sorting by their `order` hints.
    ///
    /// # Errors
    /// - Returns `DuplicateId` when two items share an ID.
    pub fn from_items(items: Vec<Item>) -> StoreResult<Self> {
        let mut store = Self::new();
        store.replace_all(items)?;
        Ok(store)
    }

    /// Items in document order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.index_of(id).is_some()
    }

    /// Current document index of `id`.
    pub fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    /// IDs in document order.
    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    /// Order value the next appended item would receive.
    pub fn next_order_hint(&self) -> usize {
        self.items.len()
    }

    /// Inserts `new_items` as one contiguous block starting at `at_index`.
    ///
    /// Existing items at or after `at_index` shift down by the block length.
    /// `at_index` past the end appends.
    ///
    /// # Errors
    /// - Returns `DuplicateId` when a new ID collides with an existing item or
    ///   with another item of the same batch. Nothing is inserted.
    pub fn insert(&mut self, new_items: Vec<Item>, at_index: usize) -> StoreResult<()> {
        let mut seen: HashSet<&ItemId> = self.items.iter().map(|item| &item.id).collect();
        for item in &new_items {
            if !seen.insert(&item.id) {
                error!("event=store_insert module=store status=error error_code=duplicate_id");
                return Err(StoreError::DuplicateId(item.id.clone()));
            }
        }

        let at_index = at_index.min(self.items.len());
        let count = new_items.len();
        self.items.splice(at_index..at_index, new_items);
        self.renumber();
        debug!(
            "event=store_insert module=store status=ok count={} at_index={} total={}",
            count,
            at_index,
            self.items.len()
        );
        Ok(())
    }

    /// Removes all items whose ID is in `ids` and returns them in document
    /// order. Unknown IDs are ignored.
    pub fn remove(&mut self, ids: &HashSet<ItemId>) -> Vec<Item> {
        if ids.is_empty() {
            return Vec::new();
        }
        let (removed, kept): (Vec<Item>, Vec<Item>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| ids.contains(&item.id));
        self.items = kept;
        self.renumber();
        debug!(
            "event=store_remove module=store status=ok removed={} total={}",
            removed.len(),
            self.items.len()
        );
        removed
    }

    /// Replaces the whole collection, e.g. when restoring a history snapshot.
    ///
    /// Incoming items are stably sorted by their `order` values and then
    /// renumbered, so gaps or ties in the input are tolerated.
    ///
    /// # Errors
    /// - Returns `DuplicateId` when two items share an ID. The store is left
    ///   unchanged.
    pub fn replace_all(&mut self, mut items: Vec<Item>) -> StoreResult<()> {
        ensure_unique_ids(&items)?;
        items.sort_by_key(|item| item.order);
        self.items = items;
        self.renumber();
        Ok(())
    }

    /// Mutates one item's payload in place. Order and ID are not touched.
    ///
    /// # Errors
    /// - Returns `ItemNotFound` when `id` is absent.
    pub fn update<T>(
        &mut self,
        id: &ItemId,
        mutate: impl FnOnce(&mut Block) -> T,
    ) -> StoreResult<T> {
        let item = self
            .items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| StoreError::ItemNotFound(id.clone()))?;
        Ok(mutate(&mut item.block))
    }

    /// Installs a new sequence of the items previously taken out with
    /// [`ItemStore::take_items`].
    ///
    /// Used by the reorder engine; `sequence` must be a permutation of the
    /// taken items.
    pub(crate) fn apply_sequence(&mut self, sequence: Vec<Item>) {
        self.items = sequence;
        self.renumber();
    }

    /// Moves the items out, leaving the store empty until
    /// [`ItemStore::apply_sequence`] is called.
    pub(crate) fn take_items(&mut self) -> Vec<Item> {
        std::mem::take(&mut self.items)
    }

    /// Verifies ID uniqueness and dense ordering.
    ///
    /// Routing every mutation through this type keeps this check green; it is
    /// exposed for assertions in tests and after imports.
    pub fn check_invariants(&self) -> StoreResult<()> {
        ensure_unique_ids(&self.items)?;
        for (index, item) in self.items.iter().enumerate() {
            if item.order != index {
                return Err(StoreError::OrderGap {
                    index,
                    order: item.order,
                });
            }
        }
        Ok(())
    }

    fn renumber(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.order = index;
        }
    }
}

fn ensure_unique_ids(items: &[Item]) -> StoreResult<()> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(&item.id) {
            return Err(StoreError::DuplicateId(item.id.clone()));
        }
    }
    Ok(())
}
