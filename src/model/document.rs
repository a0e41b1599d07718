//! Document-level types.

use super::{Block, ImageBlock, ListBlock, Paragraph, TableBlock};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A parsed HWP document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata (title, author, etc.)
    pub metadata: Metadata,

    /// Content blocks in reading order
    pub content: Vec<Block>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block to the document.
    pub fn add_block(&mut self, block: Block) {
        self.content.push(block);
    }

    /// Add a paragraph to the document.
    ///
    /// Paragraphs without visible text are dropped.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        if !paragraph.is_empty() {
            self.content.push(Block::Paragraph(paragraph));
        }
    }

    /// Add a table to the document.
    ///
    /// Tables without rows or columns are dropped.
    pub fn add_table(&mut self, table: TableBlock) {
        if table.rows > 0 && table.cols > 0 {
            self.content.push(Block::Table(table));
        }
    }

    /// Add an image to the document.
    ///
    /// Images without an identifier are dropped.
    pub fn add_image(&mut self, image: ImageBlock) {
        if !image.id.is_empty() {
            self.content.push(Block::Image(image));
        }
    }

    /// Add a list to the document.
    pub fn add_list(&mut self, list: ListBlock) {
        if !list.is_empty() {
            self.content.push(Block::List(list));
        }
    }

    /// Get the number of content blocks.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Check if the document has any content.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Iterate over the paragraphs in the document.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.content.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Iterate over the tables in the document.
    pub fn tables(&self) -> impl Iterator<Item = &TableBlock> {
        self.content.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Iterate over the images in the document.
    pub fn images(&self) -> impl Iterator<Item = &ImageBlock> {
        self.content.iter().filter_map(|b| match b {
            Block::Image(i) => Some(i),
            _ => None,
        })
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .map(|block| block.plain_text())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Free-form description
    pub description: Option<String>,

    /// Keywords
    pub keywords: Option<String>,

    /// Content language (e.g., "ko")
    pub language: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,

    /// Source format (e.g., "HWPX")
    pub format: String,

    /// Number of content sections parsed
    pub section_count: u32,
}

impl Metadata {
    /// Create new metadata for the given source format.
    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..Default::default()
        }
    }

    /// Check if no descriptive fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.subject.is_none()
            && self.description.is_none()
            && self.keywords.is_none()
    }

    /// Convert metadata to YAML frontmatter format.
    pub fn to_yaml_frontmatter(&self) -> String {
        let mut lines = vec!["---".to_string()];

        let fields = [
            ("title", &self.title),
            ("author", &self.author),
            ("subject", &self.subject),
            ("description", &self.description),
            ("keywords", &self.keywords),
            ("language", &self.language),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                lines.push(format!("{}: \"{}\"", key, escape_yaml(value)));
            }
        }
        if let Some(ref created) = self.created {
            lines.push(format!("created: {}", created.to_rfc3339()));
        }
        if let Some(ref modified) = self.modified {
            lines.push(format!("modified: {}", modified.to_rfc3339()));
        }
        if !self.format.is_empty() {
            lines.push(format!("format: \"{}\"", self.format));
        }
        lines.push(format!("sections: {}", self.section_count));

        lines.push("---".to_string());
        lines.push(String::new());

        lines.join("\n")
    }
}

/// Escape special characters for YAML strings.
fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
