//! Clipboard transfer protocol.
//!
//! # Responsibility
//! - Define the structured clipboard envelope and its plain-text fallback.
//! - Bridge to the host system clipboard and serialize in-flight operations.
//!
//! # See also
//! - crate::service::session (copy/cut/paste/duplicate orchestration)

pub mod envelope;
pub mod manager;
pub mod plain_text;
