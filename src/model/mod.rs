//! Document model types for HWP content representation.
//!
//! This module defines the intermediate representation (IR) that bridges
//! document parsing and content rendering. The model is format-agnostic:
//! every parser produces it and every renderer or formatter consumes it
//! read-only.

mod block;
mod document;
mod image;
mod list;
mod paragraph;
mod table;

pub use block::Block;
pub use document::{Document, Metadata};
pub use image::ImageBlock;
pub(crate) use image::format_from_path;
pub use list::{ListBlock, ListItem};
pub use paragraph::{Paragraph, ParagraphStyle};
pub use table::{TableBlock, TableCell};
