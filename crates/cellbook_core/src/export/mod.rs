//! Document export/import.

pub mod document;
