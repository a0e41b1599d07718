//! Paragraph types.

use serde::{Deserialize, Serialize};

/// A paragraph of text content.
///
/// Text runs, tabs and forced line breaks of the source are flattened into
/// a single string; a line break is stored as `'\n'`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Paragraph text
    pub text: String,

    /// Paragraph style
    pub style: ParagraphStyle,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with plain text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: ParagraphStyle::default(),
        }
    }

    /// Create a heading paragraph.
    pub fn heading(text: impl Into<String>, level: u8) -> Self {
        let mut p = Self::with_text(text);
        p.style.heading_level = level.clamp(1, 6);
        p
    }

    /// Create a block quote paragraph.
    pub fn quote(text: impl Into<String>) -> Self {
        let mut p = Self::with_text(text);
        p.style.is_quote = true;
        p
    }

    /// Set the style and return self.
    pub fn styled(mut self, style: ParagraphStyle) -> Self {
        self.style = style;
        self
    }

    /// Append text.
    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Append a single character.
    pub fn push(&mut self, c: char) {
        self.text.push(c);
    }

    /// Check if the paragraph has no visible text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Check if this is a heading.
    pub fn is_heading(&self) -> bool {
        self.style.heading_level > 0
    }
}

/// Paragraph styling signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphStyle {
    /// Heading rank (0 = body text)
    pub heading_level: u8,

    /// Whether the paragraph is a quotation
    pub is_quote: bool,
}

impl ParagraphStyle {
    /// Style for a heading of the given rank.
    pub fn heading(level: u8) -> Self {
        Self {
            heading_level: level,
            is_quote: false,
        }
    }

    /// Style for a quotation.
    pub fn quote() -> Self {
        Self {
            heading_level: 0,
            is_quote: true,
        }
    }
}
