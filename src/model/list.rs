//! List types.

use serde::{Deserialize, Serialize};

/// A flat list of items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBlock {
    /// Whether the list is numbered
    pub ordered: bool,

    /// Items in order
    pub items: Vec<ListItem>,
}

impl ListBlock {
    /// Create an empty unordered list.
    pub fn unordered() -> Self {
        Self::default()
    }

    /// Create an empty ordered list.
    pub fn ordered() -> Self {
        Self {
            ordered: true,
            items: Vec::new(),
        }
    }

    /// Create a list from text values.
    pub fn from_strings<S: Into<String>>(ordered: bool, values: impl IntoIterator<Item = S>) -> Self {
        Self {
            ordered,
            items: values.into_iter().map(ListItem::new).collect(),
        }
    }

    /// Add an item.
    pub fn add_item(&mut self, text: impl Into<String>) {
        self.items.push(ListItem::new(text));
    }

    /// Check if the list has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get plain text representation, one item per line.
    pub fn plain_text(&self) -> String {
        self.items
            .iter()
            .map(|item| item.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A list item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Item text
    pub text: String,
}

impl ListItem {
    /// Create a new item.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
