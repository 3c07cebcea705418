//! Document domain model.
//!
//! # Responsibility
//! - Define the item record and its per-kind payloads.
//! - Define container-relative geometry for selection math.
//!
//! # Invariants
//! - Every item is identified by an `ItemId` unique across all kinds.

pub mod geometry;
pub mod item;
