//! Marquee hit-testing.
//!
//! Geometry comes from the rendering collaborator through [`ItemBounds`], so
//! the thresholds here are testable without a real layout.

use crate::config::MarqueeThresholds;
use crate::model::geometry::Rect;
use crate::model::item::ItemId;
use std::collections::HashMap;

/// Layout query supplied by the renderer.
pub trait ItemBounds {
    /// Container-relative bounding box of a rendered item, or `None` when the
    /// item is not currently rendered.
    fn item_bounds(&self, id: &ItemId) -> Option<Rect>;
}

impl ItemBounds for HashMap<ItemId, Rect> {
    fn item_bounds(&self, id: &ItemId) -> Option<Rect> {
        self.get(id).copied()
    }
}

/// Whether `item` counts as hit by `marquee`.
///
/// Hit when the overlap is non-empty and covers more than
/// `thresholds.item_ratio` of the item, or more than
/// `thresholds.marquee_ratio` of the marquee. A zero-area item or marquee
/// never satisfies its own ratio.
pub fn marquee_hits(marquee: &Rect, item: &Rect, thresholds: &MarqueeThresholds) -> bool {
    let overlap = marquee.intersection_area(item);
    if overlap <= 0.0 {
        return false;
    }
    let item_area = item.area();
    let marquee_area = marquee.area();
    let covers_item = item_area > 0.0 && overlap / item_area > thresholds.item_ratio;
    let covers_marquee = marquee_area > 0.0 && overlap / marquee_area > thresholds.marquee_ratio;
    covers_item || covers_marquee
}
