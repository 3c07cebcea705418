//! Item storage layer.
//!
//! # Responsibility
//! - Own the canonical ordered item list.
//! - Expose the only mutation primitives other components may use.
//!
//! # Invariants
//! - Item IDs are unique and orders are dense after every public call.

pub mod item_store;
