//! Human-readable rendering of items for plain-text clipboard targets.
//!
//! Rules:
//! - text sections: markup tags stripped, common entities decoded;
//! - cells: `# {title}\n{content}` plus `\n\nOutput:\n{output}` when output is
//!   non-empty;
//! - separators: one rule line per style;
//! - items joined with a `---` line surrounded by blank lines.

use crate::model::item::{Block, CellBlock, Item, SeparatorStyle};
use once_cell::sync::Lazy;
use regex::Regex;

/// Joiner placed between rendered items.
pub const ITEM_SEPARATOR: &str = "\n\n---\n\n";

static BLOCK_BREAK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(p|div|li|h[1-6]|blockquote|pre)>").expect("valid break regex")
});
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static BLANK_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").expect("valid blank-run regex"));

/// Renders items in the given order.
pub fn render_items(items: &[Item]) -> String {
    items
        .iter()
        .map(render_item)
        .collect::<Vec<_>>()
        .join(ITEM_SEPARATOR)
}

/// Renders one item.
pub fn render_item(item: &Item) -> String {
    match &item.block {
        Block::Cell(cell) => render_cell(cell),
        Block::TextSection(text) => strip_markup(&text.content),
        Block::Separator(separator) => separator_rule(separator.style).to_string(),
    }
}

fn render_cell(cell: &CellBlock) -> String {
    let mut rendered = format!("# {}\n{}", cell.metadata.title, cell.content);
    if let Some(output) = cell.output.as_deref().filter(|output| !output.is_empty()) {
        rendered.push_str("\n\nOutput:\n");
        rendered.push_str(output);
    }
    rendered
}

fn separator_rule(style: SeparatorStyle) -> &'static str {
    match style {
        SeparatorStyle::Line => "──────────",
        SeparatorStyle::Dotted => "··········",
        SeparatorStyle::Dashed => "- - - - - -",
        SeparatorStyle::Thick => "══════════",
    }
}

/// Strips markup from rich-text content. Plain input passes through apart
/// from entity decoding and trimming.
pub fn strip_markup(content: &str) -> String {
    let with_breaks = BLOCK_BREAK_RE.replace_all(content, "\n");
    let without_tags = TAG_RE.replace_all(&with_breaks, "");
    let decoded = decode_entities(&without_tags);
    BLANK_RUN_RE
        .replace_all(&decoded, "\n\n")
        .trim()
        .to_string()
}

fn decode_entities(value: &str) -> String {
    // `&amp;` last so that `&amp;lt;` stays `&lt;`.
    value
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
