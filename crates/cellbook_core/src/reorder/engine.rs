//! Block-preserving reorder primitives.
//!
//! # Invariants
//! - Moved items keep their relative document order among themselves.
//! - Destinations are clamped to `[0, N - block_len]`.
//! - Every path ends in one full renumber through the item store.

use crate::model::item::{Item, ItemId};
use crate::store::item_store::ItemStore;
use log::debug;
use std::collections::HashSet;

/// Moves every item in `ids` as one contiguous block so the block starts at
/// `destination` in the resulting sequence.
///
/// Unknown IDs are ignored. Returns whether the sequence changed.
pub fn move_block(store: &mut ItemStore, ids: &HashSet<ItemId>, destination: usize) -> bool {
    if ids.is_empty() || !store.items().iter().any(|item| ids.contains(&item.id)) {
        return false;
    }

    let before: Vec<ItemId> = store.ids();
    let (mut block, mut rest): (Vec<Item>, Vec<Item>) = store
        .take_items()
        .into_iter()
        .partition(|item| ids.contains(&item.id));

    let block_len = block.len();
    let destination = destination.min(rest.len());
    let tail = rest.split_off(destination);
    rest.append(&mut block);
    rest.extend(tail);

    let changed = rest
        .iter()
        .map(|item| &item.id)
        .ne(before.iter());
    store.apply_sequence(rest);

    debug!(
        "event=reorder_move module=reorder status={} block_len={} destination={}",
        if changed { "ok" } else { "noop" },
        block_len,
        destination
    );
    changed
}

/// Moves one item to `destination`.
pub fn move_single(store: &mut ItemStore, id: &ItemId, destination: usize) -> bool {
    move_block(store, &HashSet::from([id.clone()]), destination)
}

/// Resolves a drag-and-drop result.
///
/// When the dragged item belongs to a multi-item selection the whole
/// selection moves as a block; otherwise only the dragged item moves.
pub fn drag_end(
    store: &mut ItemStore,
    selected: &HashSet<ItemId>,
    dragged: &ItemId,
    destination: usize,
) -> bool {
    if selected.len() > 1 && selected.contains(dragged) {
        move_block(store, selected, destination)
    } else {
        move_single(store, dragged, destination)
    }
}

/// Shifts the selected block one position towards the top.
///
/// No-op when the first selected item is already first.
pub fn move_up(store: &mut ItemStore, ids: &HashSet<ItemId>) -> bool {
    let Some(first) = store.items().iter().position(|item| ids.contains(&item.id)) else {
        return false;
    };
    if first == 0 {
        return false;
    }
    move_block(store, ids, first - 1)
}

/// Shifts the selected block one position towards the bottom.
///
/// No-op when the last selected item is already last.
pub fn move_down(store: &mut ItemStore, ids: &HashSet<ItemId>) -> bool {
    let Some(last) = store.items().iter().rposition(|item| ids.contains(&item.id)) else {
        return false;
    };
    if last + 1 == store.len() {
        return false;
    }
    let block_len = store
        .items()
        .iter()
        .filter(|item| ids.contains(&item.id))
        .count();
    // Block ends one past its current last slot.
    move_block(store, ids, last + 2 - block_len)
}

#[cfg(test)]
mod tests {
    use super::{move_block, move_down, move_up};
    use crate::model::item::{Block, Item, ItemId, TextBlock};
    use crate::store::item_store::ItemStore;
    use std::collections::HashSet;

    fn store(ids: &[&str]) -> ItemStore {
        ItemStore::from_items(
            ids.iter()
                .enumerate()
                .map(|(order, id)| {
                    let mut item =
                        Item::with_id(ItemId::new(*id), Block::TextSection(TextBlock::default()));
                    item.order = order;
                    item
                })
                .collect(),
        )
        .unwrap()
    }

    fn names(store: &ItemStore) -> Vec<String> {
        store.ids().iter().map(|id| id.to_string()).collect()
    }

    fn set(ids: &[&str]) -> HashSet<ItemId> {
        ids.iter().map(|id| ItemId::new(*id)).collect()
    }

    #[test]
    fn destination_is_clamped_to_last_block_slot() {
        let mut store = store(&["a", "b", "c", "d"]);
        assert!(move_block(&mut store, &set(&["a", "b"]), 99));
        assert_eq!(names(&store), ["c", "d", "a", "b"]);
    }

    #[test]
    fn scattered_block_moves_up_as_contiguous_run() {
        let mut store = store(&["a", "b", "c", "d", "e"]);
        assert!(move_up(&mut store, &set(&["c", "e"])));
        assert_eq!(names(&store), ["a", "c", "e", "b", "d"]);
    }

    #[test]
    fn contiguous_block_moves_down_one_step() {
        let mut store = store(&["a", "b", "c", "d"]);
        assert!(move_down(&mut store, &set(&["a", "b"])));
        assert_eq!(names(&store), ["c", "a", "b", "d"]);
        store.check_invariants().unwrap();
    }

    #[test]
    fn unchanged_sequence_reports_no_change() {
        let mut store = store(&["a", "b", "c"]);
        assert!(!move_block(&mut store, &set(&["b"]), 1));
        assert!(!move_block(&mut store, &set(&["zz"]), 0));
    }
}
