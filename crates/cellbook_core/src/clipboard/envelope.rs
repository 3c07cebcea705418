//! Clipboard wire format.
//!
//! # Invariants
//! - Written as UTF-8 JSON: `{ kind, version, items, plainText }`.
//! - Readers trust a payload only after its `kind` tag matches
//!   [`CLIPBOARD_KIND`].

use crate::clipboard::plain_text::render_items;
use crate::model::item::Item;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Tag identifying structured document clipboard payloads.
pub const CLIPBOARD_KIND: &str = "document-items";
/// Envelope format version.
pub const CLIPBOARD_VERSION: &str = "1.0";

/// Clipboard transfer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// System clipboard threw, was denied, or does not exist.
    Unavailable(String),
    /// Clipboard text is not JSON.
    MalformedJson(String),
    /// JSON is valid but not a document-items envelope.
    UnexpectedKind(Option<String>),
    /// Tag matched but the items could not be decoded.
    InvalidPayload(String),
    /// Envelope could not be encoded.
    Encode(String),
}

impl Display for ClipboardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "system clipboard unavailable: {reason}"),
            Self::MalformedJson(reason) => write!(f, "clipboard text is not json: {reason}"),
            Self::UnexpectedKind(Some(kind)) => {
                write!(f, "clipboard payload kind `{kind}` is not `{CLIPBOARD_KIND}`")
            }
            Self::UnexpectedKind(None) => write!(f, "clipboard payload has no kind tag"),
            Self::InvalidPayload(reason) => write!(f, "invalid clipboard payload: {reason}"),
            Self::Encode(reason) => write!(f, "failed to encode clipboard payload: {reason}"),
        }
    }
}

impl Error for ClipboardError {}

/// Structured clipboard payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardEnvelope {
    pub kind: String,
    pub version: String,
    pub items: Vec<Item>,
    pub plain_text: String,
}

impl ClipboardEnvelope {
    /// Builds an envelope for items already in document order.
    pub fn from_items(items: Vec<Item>) -> Self {
        let plain_text = render_items(&items);
        Self {
            kind: CLIPBOARD_KIND.to_string(),
            version: CLIPBOARD_VERSION.to_string(),
            items,
            plain_text,
        }
    }

    pub fn to_json(&self) -> Result<String, ClipboardError> {
        serde_json::to_string(self).map_err(|err| ClipboardError::Encode(err.to_string()))
    }

    /// Defensively parses clipboard text.
    ///
    /// # Errors
    /// - `MalformedJson` when `text` is not JSON.
    /// - `UnexpectedKind` when the `kind` tag is missing or different.
    /// - `InvalidPayload` when the tag matches but the body does not decode.
    pub fn parse(text: &str) -> Result<Self, ClipboardError> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|err| ClipboardError::MalformedJson(err.to_string()))?;

        match value.get("kind").and_then(serde_json::Value::as_str) {
            Some(CLIPBOARD_KIND) => {}
            Some(other) => return Err(ClipboardError::UnexpectedKind(Some(other.to_string()))),
            None => return Err(ClipboardError::UnexpectedKind(None)),
        }

        serde_json::from_value(value).map_err(|err| ClipboardError::InvalidPayload(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{ClipboardEnvelope, ClipboardError, CLIPBOARD_KIND};
    use crate::model::item::Item;

    #[test]
    fn envelope_json_uses_wire_field_names() {
        let envelope = ClipboardEnvelope::from_items(vec![Item::text("hello")]);
        let json: serde_json::Value = serde_json::from_str(&envelope.to_json().unwrap()).unwrap();
        assert_eq!(json["kind"], CLIPBOARD_KIND);
        assert_eq!(json["version"], "1.0");
        assert_eq!(json["plainText"], "hello");
        assert_eq!(json["items"][0]["kind"], "text");
    }

    #[test]
    fn parse_rejects_foreign_and_malformed_payloads() {
        assert!(matches!(
            ClipboardEnvelope::parse("just words"),
            Err(ClipboardError::MalformedJson(_))
        ));
        assert_eq!(
            ClipboardEnvelope::parse(r#"{"kind":"other","items":[]}"#),
            Err(ClipboardError::UnexpectedKind(Some("other".to_string())))
        );
        assert_eq!(
            ClipboardEnvelope::parse(r#"[1,2,3]"#),
            Err(ClipboardError::UnexpectedKind(None))
        );
        assert!(matches!(
            ClipboardEnvelope::parse(r#"{"kind":"document-items","items":"nope"}"#),
            Err(ClipboardError::InvalidPayload(_))
        ));
    }
}
