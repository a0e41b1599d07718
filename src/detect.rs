//! HWP format detection.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Document container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// Zip-packaged XML (HWPX, OWPML)
    Hwpx,
    /// OLE compound binary (HWP 5.x)
    Hwp5,
}

impl std::fmt::Display for FormatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Hwpx => write!(f, "HWPX"),
            FormatType::Hwp5 => write!(f, "HWP 5.x"),
        }
    }
}

/// Zip local file header.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// OLE compound file signature.
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Detect the format from a file path.
///
/// # Example
/// ```no_run
/// use hwp2md::detect::{detect_format_from_path, FormatType};
///
/// let format = detect_format_from_path("report.hwpx").unwrap();
/// assert_eq!(format, FormatType::Hwpx);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<FormatType> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(OLE_MAGIC.len());
    BufReader::new(file)
        .take(OLE_MAGIC.len() as u64)
        .read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect the format from the leading bytes of a file.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<FormatType> {
    if data.starts_with(ZIP_MAGIC) {
        Ok(FormatType::Hwpx)
    } else if data.starts_with(OLE_MAGIC) {
        Ok(FormatType::Hwp5)
    } else {
        Err(Error::UnknownFormat)
    }
}

/// Check if a file is an HWPX package.
pub fn is_hwpx<P: AsRef<Path>>(path: P) -> bool {
    matches!(detect_format_from_path(path), Ok(FormatType::Hwpx))
}
