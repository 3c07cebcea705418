//! Document export/import format.
//!
//! # Responsibility
//! - Project the ordered item list into the per-kind export layout
//!   (`cells`, `textSections`, `separators`).
//! - Merge the per-kind arrays back into one ordered item list.
//!
//! # Invariants
//! - Export preserves IDs and document order.
//! - Import breaks `order` ties as text, then cells, then separators, and
//!   always yields dense orders.

use crate::model::item::{
    Block, CellBlock, CellMetadata, CellType, Item, ItemId, SeparatorBlock, SeparatorStyle,
    TextBlock,
};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

/// Errors from export encoding and file I/O.
#[derive(Debug)]
pub enum ExportError {
    Json(serde_json::Error),
    Io { path: PathBuf, source: std::io::Error },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid document json: {err}"),
            Self::Io { path, source } => {
                write!(f, "document file error at `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Exported cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    pub id: ItemId,
    #[serde(rename = "type")]
    pub cell_type: CellType,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub metadata: CellMetadata,
    pub order: usize,
}

/// Exported text section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSectionRecord {
    pub id: ItemId,
    pub content: String,
    pub order: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
}

/// Exported separator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeparatorRecord {
    pub id: ItemId,
    #[serde(default)]
    pub style: SeparatorStyle,
    pub order: usize,
}

/// Whole-document export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentExport {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub cells: Vec<CellRecord>,
    #[serde(default)]
    pub text_sections: Vec<TextSectionRecord>,
    #[serde(default)]
    pub separators: Vec<SeparatorRecord>,
}

impl DocumentExport {
    /// Splits `items` (document order) into per-kind records.
    pub fn from_items(title: impl Into<String>, items: &[Item]) -> Self {
        let mut export = Self {
            title: title.into(),
            ..Self::default()
        };
        for item in items {
            let id = item.id.clone();
            let order = item.order;
            match &item.block {
                Block::Cell(cell) => export.cells.push(CellRecord {
                    id,
                    cell_type: cell.cell_type,
                    content: cell.content.clone(),
                    output: cell.output.clone(),
                    metadata: cell.metadata.clone(),
                    order,
                }),
                Block::TextSection(text) => export.text_sections.push(TextSectionRecord {
                    id,
                    content: text.content.clone(),
                    order,
                    is_locked: text.is_locked,
                }),
                Block::Separator(separator) => export.separators.push(SeparatorRecord {
                    id,
                    style: separator.style,
                    order,
                }),
            }
        }
        export
    }

    /// Merges the per-kind records into one densely ordered item list.
    pub fn into_items(self) -> Vec<Item> {
        // Rank breaks order ties: text, cells, separators.
        let mut ranked: Vec<(usize, u8, Item)> = Vec::with_capacity(
            self.cells.len() + self.text_sections.len() + self.separators.len(),
        );
        ranked.extend(self.text_sections.into_iter().map(|record| {
            let block = Block::TextSection(TextBlock {
                content: record.content,
                is_locked: record.is_locked,
            });
            (record.order, 0, Item::with_id(record.id, block))
        }));
        ranked.extend(self.cells.into_iter().map(|record| {
            let block = Block::Cell(CellBlock {
                cell_type: record.cell_type,
                content: record.content,
                output: record.output,
                metadata: record.metadata,
            });
            (record.order, 1, Item::with_id(record.id, block))
        }));
        ranked.extend(self.separators.into_iter().map(|record| {
            let block = Block::Separator(SeparatorBlock {
                style: record.style,
            });
            (record.order, 2, Item::with_id(record.id, block))
        }));

        ranked.sort_by_key(|(order, rank, _)| (*order, *rank));
        ranked
            .into_iter()
            .enumerate()
            .map(|(index, (_, _, mut item))| {
                item.order = index;
                item
            })
            .collect()
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(value: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(value)?)
    }

    /// Writes pretty JSON to `path`, replacing any existing file.
    pub fn write_to_path(&self, path: &Path) -> Result<(), ExportError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| {
            error!("event=export_write module=export status=error error_code=io");
            ExportError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        debug!(
            "event=export_write module=export status=ok cells={} text_sections={} separators={}",
            self.cells.len(),
            self.text_sections.len(),
            self.separators.len()
        );
        Ok(())
    }

    pub fn read_from_path(path: &Path) -> Result<Self, ExportError> {
        let raw = fs::read_to_string(path).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}
