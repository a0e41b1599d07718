//! Error types for hwp2md library.

use std::io;
use thiserror::Error;

/// Result type alias for hwp2md operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during document processing.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as an HWP document.
    #[error("Unknown file format: not a valid HWP or HWPX document")]
    UnknownFormat,

    /// The document format is recognized but not handled by this build.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The package could not be opened or read as an archive.
    #[error("Archive error: {0}")]
    Archive(String),

    /// The manifest is present but malformed.
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// An entry referenced by the package was not found.
    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    /// The XML token stream failed.
    #[error("XML parse error: {0}")]
    Xml(String),

    /// A failure while parsing one content section.
    #[error("Failed to parse section {path}: {source}")]
    Section {
        /// Entry path of the section
        path: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Error extracting images from the package.
    #[error("Image extraction error: {0}")]
    ImageExtract(String),

    /// Error during rendering (Markdown, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Error reported by a language-model formatter.
    #[error("Formatting error: {0}")]
    Format(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap an error with the section path it occurred in.
    pub fn in_section(self, path: impl Into<String>) -> Self {
        Error::Section {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            zip::result::ZipError::FileNotFound => Error::EntryNotFound(err.to_string()),
            _ => Error::Archive(err.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}
