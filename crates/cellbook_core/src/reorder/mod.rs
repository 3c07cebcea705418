//! Item repositioning for drag-and-drop and keyboard moves.

pub mod engine;
