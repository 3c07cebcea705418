//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store, selection, clipboard, reorder and history calls into
//!   user-level editing APIs.
//! - Keep hosts decoupled from component internals.

pub mod keymap;
pub mod session;
