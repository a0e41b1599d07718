//! HWPX parsing module.

mod container;
mod hwpx_parser;
mod manifest;
mod options;
mod section;
mod styles;
mod table_builder;
mod xml;

use std::path::Path;

use crate::error::Result;
use crate::model::{Document, ImageBlock};

pub use container::HwpxContainer;
pub use hwpx_parser::HwpxParser;
pub use manifest::{Manifest, ManifestItem};
pub use options::ParseOptions;
pub use styles::StyleMap;

/// Common contract for document format parsers.
///
/// Every format produces the same [`Document`] tree, so renderers and
/// formatters never see which parser built it.
pub trait DocumentParser {
    /// Parse the whole document.
    fn parse(&mut self) -> Result<Document>;

    /// Write the document's binary assets into `dir`.
    fn extract_images(&mut self, dir: &Path) -> Result<Vec<ImageBlock>>;
}
