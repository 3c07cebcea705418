//! Document item model.
//!
//! # Responsibility
//! - Define the canonical record for every block in a document.
//! - Keep per-kind payloads in one closed sum type so consumers match
//!   exhaustively instead of probing a loosely-typed payload.
//!
//! # Invariants
//! - `id` is unique across all kinds, not only within one kind.
//! - `order` is owned by the item store; values written here by callers are
//!   treated as hints and renumbered on insert.
//!
//! # See also
//! - crate::store::item_store

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier shared by every item kind.
///
/// Also used as the paste target and DOM anchor key by renderers, so imported
/// documents may carry arbitrary non-UUID strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wraps an existing identifier string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Generates a fresh identifier tagged with a batch prefix, e.g.
    /// `paste-<uuid>`.
    pub fn generate_with_prefix(prefix: &str) -> Self {
        Self(format!("{prefix}-{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Executable cell flavour. Execution itself lives outside the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    Python,
    R,
    Sql,
    Chart,
    Gpu,
    Table,
    Params,
    Prompt,
}

impl CellType {
    /// Wire name, also used for default titles.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::R => "r",
            Self::Sql => "sql",
            Self::Chart => "chart",
            Self::Gpu => "gpu",
            Self::Table => "table",
            Self::Params => "params",
            Self::Prompt => "prompt",
        }
    }
}

/// Visual style of a separator block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeparatorStyle {
    #[default]
    Line,
    Dotted,
    Dashed,
    Thick,
}

/// Chart payload attached to chart cells by the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(rename = "type")]
    pub chart_type: String,
    pub data: Vec<serde_json::Value>,
}

/// Cell metadata. Only `title` is required on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellMetadata {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_data: Option<ChartData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Map<String, serde_json::Value>>,
}

impl CellMetadata {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Executable cell payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellBlock {
    pub cell_type: CellType,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub metadata: CellMetadata,
}

impl CellBlock {
    /// Blank cell titled `New {type}`.
    pub fn blank(cell_type: CellType) -> Self {
        Self {
            cell_type,
            content: String::new(),
            output: None,
            metadata: CellMetadata::titled(format!("New {}", cell_type.as_str())),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.metadata.locked.unwrap_or(false)
    }
}

/// Rich-text section payload. `content` is opaque markup owned by the editor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
}

impl TextBlock {
    pub fn is_locked(&self) -> bool {
        self.is_locked.unwrap_or(false)
    }
}

/// Separator payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeparatorBlock {
    pub style: SeparatorStyle,
}

/// Per-kind payload. Serialized adjacently as `kind` + `payload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum Block {
    Cell(CellBlock),
    #[serde(rename = "text")]
    TextSection(TextBlock),
    Separator(SeparatorBlock),
}

/// Discriminant of [`Block`], used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Cell,
    TextSection,
    Separator,
}

impl Display for BlockKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cell => write!(f, "cell"),
            Self::TextSection => write!(f, "text section"),
            Self::Separator => write!(f, "separator"),
        }
    }
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Cell(_) => BlockKind::Cell,
            Self::TextSection(_) => BlockKind::TextSection,
            Self::Separator(_) => BlockKind::Separator,
        }
    }

    /// Whether content edits are currently blocked. Separators have no
    /// content and are never locked.
    pub fn is_locked(&self) -> bool {
        match self {
            Self::Cell(cell) => cell.is_locked(),
            Self::TextSection(text) => text.is_locked(),
            Self::Separator(_) => false,
        }
    }
}

/// One ordered block of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(default)]
    pub order: usize,
    #[serde(flatten)]
    pub block: Block,
}

impl Item {
    /// Creates an item with a generated ID. `order` is assigned on insert.
    pub fn new(block: Block) -> Self {
        Self::with_id(ItemId::generate(), block)
    }

    /// Creates an item with a caller-provided ID.
    pub fn with_id(id: ItemId, block: Block) -> Self {
        Self { id, order: 0, block }
    }

    pub fn cell(cell: CellBlock) -> Self {
        Self::new(Block::Cell(cell))
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(Block::TextSection(TextBlock {
            content: content.into(),
            is_locked: None,
        }))
    }

    pub fn separator(style: SeparatorStyle) -> Self {
        Self::new(Block::Separator(SeparatorBlock { style }))
    }

    pub fn kind(&self) -> BlockKind {
        self.block.kind()
    }

    /// Clone with a new ID. Used by paste and duplicate so source IDs are
    /// never reused.
    pub fn clone_with_id(&self, id: ItemId) -> Self {
        Self {
            id,
            order: self.order,
            block: self.block.clone(),
        }
    }
}
