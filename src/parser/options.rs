//! Parsing options and configuration.

/// Options for parsing HWP documents.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Whether to emit image blocks and load their binary data
    pub extract_images: bool,

    /// Whether to resolve paragraph styles from the document header
    pub resolve_styles: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable image extraction.
    pub fn with_images(mut self, extract: bool) -> Self {
        self.extract_images = extract;
        self
    }

    /// Enable or disable heading/quote style resolution.
    pub fn with_styles(mut self, resolve: bool) -> Self {
        self.resolve_styles = resolve;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            extract_images: false,
            resolve_styles: true,
        }
    }
}
