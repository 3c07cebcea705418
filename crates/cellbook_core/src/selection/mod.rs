//! Item selection.
//!
//! # Responsibility
//! - Click, modifier-click, marquee and keyboard selection.
//! - Marquee hit-testing against renderer-supplied bounds.

pub mod controller;
pub mod marquee;
