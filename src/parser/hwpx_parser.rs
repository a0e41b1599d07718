//! HWPX document parser.

use std::fs::{self, File};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{format_from_path, Document, ImageBlock, Metadata};

use super::container::HwpxContainer;
use super::options::ParseOptions;
use super::section::{AssetSource, SectionParser};
use super::styles::StyleMap;
use super::DocumentParser;

/// HWPX document parser.
///
/// Owns the open package for its whole lifetime; the archive handle is
/// released when the parser is dropped, on success and error paths alike.
pub struct HwpxParser<R: Read + Seek = File> {
    container: HwpxContainer<R>,
    options: ParseOptions,
}

impl HwpxParser<File> {
    /// Open an HWPX file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open an HWPX file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let container = HwpxContainer::open(path)?;
        Ok(Self { container, options })
    }
}

impl HwpxParser<Cursor<Vec<u8>>> {
    /// Parse an HWPX package held in memory.
    pub fn from_bytes(data: &[u8], options: ParseOptions) -> Result<Self> {
        Self::from_reader(Cursor::new(data.to_vec()), options)
    }
}

impl<R: Read + Seek> HwpxParser<R> {
    /// Parse an HWPX package from a seekable reader.
    pub fn from_reader(reader: R, options: ParseOptions) -> Result<Self> {
        let container = HwpxContainer::from_reader(reader)?;
        Ok(Self { container, options })
    }

    /// The opened package.
    pub fn container(&self) -> &HwpxContainer<R> {
        &self.container
    }

    /// Parse options in effect.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse every section into a document.
    pub fn parse(&mut self) -> Result<Document> {
        let mut document = Document::new();
        document.metadata = self.extract_metadata();

        let styles = if self.options.resolve_styles {
            self.load_styles()
        } else {
            None
        };

        let sections = self.container.sections().to_vec();
        for path in &sections {
            let data = self
                .container
                .read_entry(path)
                .map_err(|e| e.in_section(path.as_str()))?;
            SectionParser::new(&self.options, styles.as_ref())
                .parse(&data, &mut self.container, &mut document)
                .map_err(|e| e.in_section(path.as_str()))?;
            log::debug!("parsed {path}: {} blocks so far", document.len());
        }

        Ok(document)
    }

    fn extract_metadata(&self) -> Metadata {
        let mut metadata = self
            .container
            .manifest()
            .map(|m| m.to_metadata())
            .unwrap_or_default();
        metadata.format = "HWPX".to_string();
        metadata.section_count = self.container.sections().len() as u32;
        metadata
    }

    /// Load the header's style table; a missing or broken header is not fatal.
    fn load_styles(&mut self) -> Option<StyleMap> {
        let path = self.container.header_path()?;
        let parsed = self
            .container
            .read_entry(&path)
            .and_then(|data| StyleMap::parse(&data));
        match parsed {
            Ok(styles) => {
                log::debug!("{} styles with heading/quote signal", styles.len());
                Some(styles)
            }
            Err(e) => {
                log::debug!("ignoring header {path}: {e}");
                None
            }
        }
    }

    /// Read the bytes of a binary item by identifier.
    pub fn resolve_asset(&mut self, id: &str) -> Result<Vec<u8>> {
        let path = self
            .container
            .asset_path(id)
            .ok_or_else(|| Error::EntryNotFound(id.to_string()))?;
        self.container.read_entry(&path)
    }

    /// Write every binary asset into `dir` under its original file name.
    ///
    /// Assets that cannot be read or written are skipped.
    pub fn extract_images<P: AsRef<Path>>(&mut self, dir: P) -> Result<Vec<ImageBlock>> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| {
            Error::ImageExtract(format!("cannot create {}: {e}", dir.display()))
        })?;

        let assets: Vec<(String, String)> = self
            .container
            .assets()
            .iter()
            .map(|(id, path)| (id.clone(), path.clone()))
            .collect();

        let mut images = Vec::with_capacity(assets.len());
        for (id, path) in assets {
            let Some(name) = Path::new(&path).file_name() else {
                continue;
            };
            let target = dir.join(name);

            let data = match self.container.read_entry(&path) {
                Ok(data) => data,
                Err(e) => {
                    log::debug!("skipping asset {id}: {e}");
                    continue;
                }
            };
            if let Err(e) = fs::write(&target, &data) {
                log::debug!("skipping asset {id}: {e}");
                continue;
            }

            let mut image = ImageBlock::new(id).with_path(target.to_string_lossy());
            image.format = format_from_path(&path);
            images.push(image);
        }

        Ok(images)
    }
}

impl<R: Read + Seek> DocumentParser for HwpxParser<R> {
    fn parse(&mut self) -> Result<Document> {
        HwpxParser::parse(self)
    }

    fn extract_images(&mut self, dir: &Path) -> Result<Vec<ImageBlock>> {
        HwpxParser::extract_images(self, dir)
    }
}
