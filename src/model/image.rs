//! Image types for embedded binary assets.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// An image reference resolved against the package's asset index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlock {
    /// Binary item identifier, unique per document
    pub id: String,

    /// Resolved asset location (package path, or file path after extraction)
    pub path: String,

    /// Alternative text
    pub alt: Option<String>,

    /// Declared width (0 = unknown)
    pub width: u32,

    /// Declared height (0 = unknown)
    pub height: u32,

    /// File format derived from the extension (e.g., "png")
    pub format: Option<String>,

    /// Raw binary data, present only when extraction was requested
    #[serde(skip)]
    pub data: Option<Vec<u8>>,
}

impl ImageBlock {
    /// Create a new image with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Set the resolved path and return self.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set alt text and return self.
    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    /// Set image dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Get the size of the loaded data in bytes.
    pub fn size(&self) -> usize {
        self.data.as_ref().map(|d| d.len()).unwrap_or(0)
    }

    /// Get the file name component of the path.
    pub fn filename(&self) -> Option<&str> {
        Path::new(&self.path).file_name().and_then(|n| n.to_str())
    }

    /// Get the MIME type based on the format.
    pub fn mime_type(&self) -> &'static str {
        match self.format.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("bmp") => "image/bmp",
            Some("tif") | Some("tiff") => "image/tiff",
            Some("webp") => "image/webp",
            Some("svg") => "image/svg+xml",
            Some("wmf") => "image/wmf",
            Some("emf") => "image/emf",
            _ => "application/octet-stream",
        }
    }
}

/// Derive a format name from a path's extension.
pub(crate) fn format_from_path(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_string())
}
