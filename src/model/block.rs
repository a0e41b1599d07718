//! Content blocks.

use super::{ImageBlock, ListBlock, Paragraph, TableBlock};
use serde::{Deserialize, Serialize};

/// A content block in the document body.
///
/// The order of blocks in [`Document::content`](super::Document) is the
/// reading order of the source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A paragraph of text
    Paragraph(Paragraph),

    /// A table
    Table(TableBlock),

    /// An image reference
    Image(ImageBlock),

    /// A flat list of items
    List(ListBlock),
}

impl Block {
    /// Check if this block is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self, Block::Paragraph(_))
    }

    /// Check if this block is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, Block::Table(_))
    }

    /// Check if this block is an image.
    pub fn is_image(&self) -> bool {
        matches!(self, Block::Image(_))
    }

    /// Check if this block is a list.
    pub fn is_list(&self) -> bool {
        matches!(self, Block::List(_))
    }

    /// Get plain text content of the block.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Paragraph(p) => p.text.clone(),
            Block::Table(t) => t.plain_text(),
            Block::Image(i) => i.alt.clone().unwrap_or_default(),
            Block::List(l) => l.plain_text(),
        }
    }
}

impl From<Paragraph> for Block {
    fn from(p: Paragraph) -> Self {
        Block::Paragraph(p)
    }
}

impl From<TableBlock> for Block {
    fn from(t: TableBlock) -> Self {
        Block::Table(t)
    }
}

impl From<ImageBlock> for Block {
    fn from(i: ImageBlock) -> Self {
        Block::Image(i)
    }
}

impl From<ListBlock> for Block {
    fn from(l: ListBlock) -> Self {
        Block::List(l)
    }
}
