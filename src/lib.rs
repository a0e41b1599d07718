//! # hwp2md
//!
//! HWPX document parsing and conversion library for Rust.
//!
//! This library reads HWPX packages (the zip-based XML format of Hangul
//! Word Processor), builds a format-neutral document tree and renders it
//! as Markdown, plain text or JSON.
//!
//! ## Quick Start
//!
//! ```no_run
//! use hwp2md::{parse_file, render};
//!
//! fn main() -> hwp2md::Result<()> {
//!     // Parse an HWPX file
//!     let doc = parse_file("report.hwpx")?;
//!
//!     // Convert to Markdown
//!     let options = render::RenderOptions::default();
//!     let markdown = render::to_markdown(&doc, &options)?;
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Multiple output formats**: Markdown, plain text, JSON
//! - **Structure preservation**: Headings, quotes, tables with merged cells
//! - **Asset extraction**: Images stored under `BinData/`
//! - **Cleanup pipeline**: Unicode normalization and vendor glyph removal
//! - **Formatter seam**: Hand the document to a language-model formatter

pub mod detect;
pub mod error;
pub mod llm;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_hwpx, FormatType};
pub use error::{Error, Result};
pub use llm::{FormatOptions, FormatResult, Formatter, MarkdownFormatter};
pub use model::{
    Block, Document, ImageBlock, ListBlock, ListItem, Metadata, Paragraph, ParagraphStyle,
    TableBlock, TableCell,
};
pub use parser::{DocumentParser, HwpxContainer, HwpxParser, ParseOptions};
pub use render::{
    CleanupOptions, CleanupPreset, ExtractionStats, JsonFormat, RenderOptions, RenderResult,
    TableFallback,
};

use std::io::{Read, Seek};
use std::path::Path;

/// Parse an HWPX file and return a structured document.
///
/// The file format is checked first; binary HWP 5.x files are rejected
/// with [`Error::UnsupportedFormat`].
///
/// # Example
///
/// ```no_run
/// use hwp2md::parse_file;
///
/// let doc = parse_file("report.hwpx").unwrap();
/// println!("Blocks: {}", doc.len());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    parse_file_with_options(path, ParseOptions::default())
}

/// Parse an HWPX file with custom options.
///
/// # Example
///
/// ```no_run
/// use hwp2md::{parse_file_with_options, ParseOptions};
///
/// let options = ParseOptions::new().with_images(true);
/// let doc = parse_file_with_options("report.hwpx", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    let path = path.as_ref();
    ensure_supported(detect_format_from_path(path)?)?;
    let mut parser = HwpxParser::open_with_options(path, options)?;
    parser.parse()
}

/// Parse an HWPX package held in memory.
///
/// # Example
///
/// ```no_run
/// use hwp2md::parse_bytes;
///
/// let data = std::fs::read("report.hwpx").unwrap();
/// let doc = parse_bytes(&data).unwrap();
/// ```
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    parse_bytes_with_options(data, ParseOptions::default())
}

/// Parse an HWPX package held in memory with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Document> {
    ensure_supported(detect_format_from_bytes(data)?)?;
    let mut parser = HwpxParser::from_bytes(data, options)?;
    parser.parse()
}

/// Parse an HWPX package from any seekable reader.
///
/// # Example
///
/// ```no_run
/// use hwp2md::{parse_reader, ParseOptions};
/// use std::fs::File;
///
/// let file = File::open("report.hwpx").unwrap();
/// let doc = parse_reader(file, ParseOptions::default()).unwrap();
/// ```
pub fn parse_reader<R: Read + Seek>(reader: R, options: ParseOptions) -> Result<Document> {
    let mut parser = HwpxParser::from_reader(reader, options)?;
    parser.parse()
}

fn ensure_supported(format: FormatType) -> Result<()> {
    match format {
        FormatType::Hwpx => Ok(()),
        FormatType::Hwp5 => Err(Error::UnsupportedFormat(
            "HWP 5.x binary documents are not supported; save the file as HWPX".to_string(),
        )),
    }
}

/// Extract plain text from an HWPX file.
///
/// # Example
///
/// ```no_run
/// use hwp2md::extract_text;
///
/// let text = extract_text("report.hwpx").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = parse_file(path)?;
    Ok(doc.plain_text())
}

/// Convert an HWPX file to Markdown.
///
/// # Example
///
/// ```no_run
/// use hwp2md::to_markdown;
///
/// let markdown = to_markdown("report.hwpx").unwrap();
/// std::fs::write("report.md", markdown).unwrap();
/// ```
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_markdown(&doc, &RenderOptions::default())
}

/// Convert an HWPX file to Markdown with custom options.
///
/// # Example
///
/// ```no_run
/// use hwp2md::{to_markdown_with_options, CleanupPreset, RenderOptions};
///
/// let options = RenderOptions::new()
///     .with_frontmatter(true)
///     .with_cleanup_preset(CleanupPreset::Standard);
/// let markdown = to_markdown_with_options("report.hwpx", &options).unwrap();
/// ```
pub fn to_markdown_with_options<P: AsRef<Path>>(
    path: P,
    options: &RenderOptions,
) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_markdown(&doc, options)
}

/// Convert an HWPX file to plain text.
pub fn to_text<P: AsRef<Path>>(path: P, options: &RenderOptions) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_text(&doc, options)
}

/// Convert an HWPX file to JSON.
///
/// # Example
///
/// ```no_run
/// use hwp2md::{to_json, JsonFormat};
///
/// let json = to_json("report.hwpx", JsonFormat::Pretty).unwrap();
/// std::fs::write("report.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_json(&doc, format)
}

/// Builder for parsing and converting HWPX documents.
///
/// # Example
///
/// ```no_run
/// use hwp2md::Hwp2md;
///
/// let markdown = Hwp2md::new()
///     .with_images(true)
///     .with_image_dir("./images")
///     .with_frontmatter()
///     .parse("report.hwpx")?
///     .to_markdown()?;
/// # Ok::<(), hwp2md::Error>(())
/// ```
pub struct Hwp2md {
    parse_options: ParseOptions,
    render_options: RenderOptions,
}

impl Hwp2md {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            render_options: RenderOptions::default(),
        }
    }

    /// Enable image extraction.
    pub fn with_images(mut self, extract: bool) -> Self {
        self.parse_options = self.parse_options.with_images(extract);
        self
    }

    /// Disable heading and quote detection from header styles.
    pub fn without_styles(mut self) -> Self {
        self.parse_options = self.parse_options.with_styles(false);
        self
    }

    /// Set image output directory.
    ///
    /// Images are written there when image extraction is enabled.
    pub fn with_image_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.render_options = self.render_options.with_image_dir(dir);
        self
    }

    /// Set the path prefix used for image links in Markdown.
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_image_prefix(prefix);
        self
    }

    /// Enable frontmatter in output.
    pub fn with_frontmatter(mut self) -> Self {
        self.render_options = self.render_options.with_frontmatter(true);
        self
    }

    /// Set table fallback mode.
    pub fn with_table_fallback(mut self, fallback: TableFallback) -> Self {
        self.render_options = self.render_options.with_table_fallback(fallback);
        self
    }

    /// Set cleanup preset.
    pub fn with_cleanup(mut self, preset: CleanupPreset) -> Self {
        self.render_options = self.render_options.with_cleanup_preset(preset);
        self
    }

    /// Parse an HWPX file and return a result wrapper.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<Hwp2mdResult> {
        let path = path.as_ref();
        ensure_supported(detect_format_from_path(path)?)?;
        let parser = HwpxParser::open_with_options(path, self.parse_options.clone())?;
        self.finish(parser)
    }

    /// Parse an HWPX package from bytes.
    pub fn parse_bytes(self, data: &[u8]) -> Result<Hwp2mdResult> {
        ensure_supported(detect_format_from_bytes(data)?)?;
        let parser = HwpxParser::from_bytes(data, self.parse_options.clone())?;
        self.finish(parser)
    }

    fn finish<R: Read + Seek>(self, mut parser: HwpxParser<R>) -> Result<Hwp2mdResult> {
        let document = parser.parse()?;
        let images = match (&self.render_options.image_dir, self.parse_options.extract_images) {
            (Some(dir), true) => parser.extract_images(dir)?,
            _ => Vec::new(),
        };
        Ok(Hwp2mdResult {
            document,
            images,
            render_options: self.render_options,
        })
    }
}

impl Default for Hwp2md {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of parsing an HWPX document.
pub struct Hwp2mdResult {
    /// The parsed document
    pub document: Document,
    /// Images written to the image directory, if any
    pub images: Vec<ImageBlock>,
    /// Render options to use
    render_options: RenderOptions,
}

impl Hwp2mdResult {
    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::to_markdown(&self.document, &self.render_options)
    }

    /// Convert to Markdown and collect extraction statistics.
    pub fn to_markdown_with_stats(&self) -> Result<RenderResult> {
        render::to_markdown_with_stats(&self.document, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Get plain text without cleanup.
    pub fn plain_text(&self) -> String {
        self.document.plain_text()
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}
