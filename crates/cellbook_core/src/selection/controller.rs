//! Selection state machine.
//!
//! # Responsibility
//! - Track which items are selected and which one anchors range/keyboard
//!   operations.
//! - Translate click, modifier-click, marquee and arrow-key input into
//!   selection changes.
//!
//! # Invariants
//! - Range selection always replaces the prior selection; it never unions.
//! - The selection never mutates the document.
//! - `marquee` is `Some` only while `is_marquee_active` is true.

use crate::config::MarqueeThresholds;
use crate::model::geometry::{Point, Rect};
use crate::model::item::ItemId;
use crate::selection::marquee::{marquee_hits, ItemBounds};
use crate::store::item_store::ItemStore;
use std::collections::HashSet;

/// Keyboard navigation direction in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Up,
    Down,
}

/// Selection state for one editor session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionController {
    selected: HashSet<ItemId>,
    anchor: Option<ItemId>,
    marquee_origin: Option<Point>,
    marquee: Option<Rect>,
    is_marquee_active: bool,
    thresholds: MarqueeThresholds,
}

impl SelectionController {
    pub fn new(thresholds: MarqueeThresholds) -> Self {
        Self {
            thresholds,
            ..Self::default()
        }
    }

    pub fn selected(&self) -> &HashSet<ItemId> {
        &self.selected
    }

    pub fn is_selected(&self, id: &ItemId) -> bool {
        self.selected.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Last focused item; paste and range selection start here.
    pub fn anchor(&self) -> Option<&ItemId> {
        self.anchor.as_ref()
    }

    /// Current marquee rectangle while a drag is in progress.
    pub fn marquee(&self) -> Option<Rect> {
        self.marquee
    }

    pub fn is_marquee_active(&self) -> bool {
        self.is_marquee_active
    }

    /// Selected IDs sorted by document position. Stale IDs are skipped.
    pub fn selected_in_document_order(&self, store: &ItemStore) -> Vec<ItemId> {
        store
            .items()
            .iter()
            .filter(|item| self.selected.contains(&item.id))
            .map(|item| item.id.clone())
            .collect()
    }

    /// Plain click: select exactly `id`.
    pub fn click(&mut self, id: &ItemId) {
        self.selected.clear();
        self.selected.insert(id.clone());
        self.anchor = Some(id.clone());
    }

    /// Ctrl/Cmd click: toggle `id`. The anchor moves to `id` either way.
    pub fn ctrl_click(&mut self, id: &ItemId) {
        if !self.selected.remove(id) {
            self.selected.insert(id.clone());
        }
        self.anchor = Some(id.clone());
    }

    /// Shift click: select the inclusive document range between the anchor
    /// and `id`, replacing the prior selection.
    ///
    /// Without an anchor this is a plain [`SelectionController::click`]. When
    /// either end is no longer in the document, `id` is added to the existing
    /// selection instead.
    pub fn shift_click(&mut self, id: &ItemId, store: &ItemStore) {
        let Some(anchor) = self.anchor.as_ref() else {
            self.click(id);
            return;
        };

        match (store.index_of(anchor), store.index_of(id)) {
            (Some(from), Some(to)) => {
                self.selected = store.items()[from.min(to)..=from.max(to)]
                    .iter()
                    .map(|item| item.id.clone())
                    .collect();
            }
            _ => {
                self.selected.insert(id.clone());
            }
        }
        self.anchor = Some(id.clone());
    }

    /// Selects every item; the anchor becomes the last one.
    pub fn select_all(&mut self, store: &ItemStore) {
        self.selected = store.items().iter().map(|item| item.id.clone()).collect();
        self.anchor = store.items().last().map(|item| item.id.clone());
    }

    /// Begins a marquee drag at a container-relative point.
    pub fn start_marquee(&mut self, point: Point) {
        self.selected.clear();
        self.marquee_origin = Some(point);
        self.marquee = Some(Rect::from_corners(point, point));
        self.is_marquee_active = true;
    }

    /// Recomputes the marquee and the selection from current item bounds.
    ///
    /// Ignored when no marquee is active. The anchor moves to the last hit
    /// item in document order, or stays put when nothing is hit.
    pub fn update_marquee(&mut self, point: Point, store: &ItemStore, bounds: &dyn ItemBounds) {
        let Some(origin) = self.marquee_origin.filter(|_| self.is_marquee_active) else {
            return;
        };

        let rect = Rect::from_corners(origin, point);
        self.marquee = Some(rect);

        let hits: Vec<ItemId> = store
            .items()
            .iter()
            .filter(|item| {
                bounds
                    .item_bounds(&item.id)
                    .is_some_and(|item_rect| marquee_hits(&rect, &item_rect, &self.thresholds))
            })
            .map(|item| item.id.clone())
            .collect();

        if let Some(last) = hits.last() {
            self.anchor = Some(last.clone());
        }
        self.selected = hits.into_iter().collect();
    }

    /// Ends the marquee drag, keeping the last computed selection.
    pub fn end_marquee(&mut self) {
        self.is_marquee_active = false;
        self.marquee = None;
        self.marquee_origin = None;
    }

    /// Moves the anchor one step in document order.
    ///
    /// With `extend`, behaves like a shift click on the new position; without
    /// it, like a plain click. Returns `false` (and changes nothing) when
    /// there is no anchor or the anchor is already at the boundary.
    pub fn arrow_nav(&mut self, direction: NavDirection, extend: bool, store: &ItemStore) -> bool {
        let Some(current) = self.anchor.as_ref().and_then(|id| store.index_of(id)) else {
            return false;
        };
        let next = match direction {
            NavDirection::Up if current > 0 => current - 1,
            NavDirection::Down if current + 1 < store.len() => current + 1,
            _ => return false,
        };

        let target = store.items()[next].id.clone();
        if extend {
            self.shift_click(&target, store);
        } else {
            self.click(&target);
        }
        true
    }

    /// Empties the selection and forgets the anchor.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }

    /// Drops IDs that no longer exist in `store`.
    pub fn retain_existing(&mut self, store: &ItemStore) {
        self.selected.retain(|id| store.contains(id));
        if self.anchor.as_ref().is_some_and(|id| !store.contains(id)) {
            self.anchor = None;
        }
    }
}
