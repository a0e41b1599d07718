//! HWPX package access.
//!
//! An HWPX file is a zip archive. A manifest (`content.hpf`) lists the
//! section parts and binary assets; when it is missing the archive entries
//! are scanned by name instead.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use zip::ZipArchive;

use crate::error::{Error, Result};

use super::manifest::{Manifest, ManifestItem};
use super::section::AssetSource;

/// Manifest locations, tried in order.
const MANIFEST_PATHS: [&str; 2] = ["Contents/content.hpf", "content.hpf"];

/// Directory holding section parts.
const CONTENT_DIR: &str = "Contents/";

/// Directory holding binary assets.
const BIN_DATA_DIR: &str = "BinData/";

/// Default location of the header part.
const HEADER_PATH: &str = "Contents/header.xml";

/// An opened HWPX package with its sections and assets resolved.
pub struct HwpxContainer<R: Read + Seek = File> {
    archive: ZipArchive<R>,
    entries: Vec<String>,
    manifest: Option<Manifest>,
    sections: Vec<String>,
    assets: BTreeMap<String, String>,
}

impl HwpxContainer<File> {
    /// Open a package from a file path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }
}

impl<R: Read + Seek> HwpxContainer<R> {
    /// Open a package from any seekable reader.
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;

        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            entries.push(archive.by_index(i)?.name().to_string());
        }

        let manifest_entry = MANIFEST_PATHS.iter().find_map(|candidate| {
            entries
                .iter()
                .find(|e| e.eq_ignore_ascii_case(candidate))
                .cloned()
        });

        let mut container = Self {
            archive,
            entries,
            manifest: None,
            sections: Vec::new(),
            assets: BTreeMap::new(),
        };

        match manifest_entry {
            Some(entry) => {
                let data = container.read_entry(&entry)?;
                let manifest = Manifest::parse(&data)?;
                container.index_manifest(&manifest);
                container.manifest = Some(manifest);
            }
            None => {
                log::debug!("no manifest found, discovering parts by name");
                container.discover();
            }
        }

        log::debug!(
            "package: {} sections, {} assets",
            container.sections.len(),
            container.assets.len()
        );
        Ok(container)
    }

    fn index_manifest(&mut self, manifest: &Manifest) {
        for item in &manifest.items {
            if is_section_item(item) {
                self.sections.push(normalize_href(item));
            }
            if item.href.starts_with(BIN_DATA_DIR) {
                self.assets.insert(item.id.clone(), item.href.clone());
            }
        }
        self.sections.sort();
    }

    fn discover(&mut self) {
        for name in &self.entries {
            if name.contains("section") && name.ends_with(".xml") {
                self.sections.push(name.clone());
            }
            if name.starts_with(BIN_DATA_DIR) {
                let stem = Path::new(name)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or_default();
                if !stem.is_empty() {
                    self.assets.insert(stem.to_string(), name.clone());
                }
            }
        }
        self.sections.sort();
    }

    /// Section part paths in processing order.
    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    /// Binary asset index, keyed by item identifier.
    pub fn assets(&self) -> &BTreeMap<String, String> {
        &self.assets
    }

    /// The parsed manifest, if the package has one.
    pub fn manifest(&self) -> Option<&Manifest> {
        self.manifest.as_ref()
    }

    /// All archive entry names.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Path of the header part, if present in the archive.
    pub fn header_path(&self) -> Option<String> {
        let declared = self
            .manifest
            .as_ref()
            .and_then(|m| m.item("header"))
            .map(|item| item.href.trim_start_matches('/').to_string());
        declared
            .into_iter()
            .chain(std::iter::once(HEADER_PATH.to_string()))
            .find_map(|path| self.find_entry(&path).map(str::to_string))
    }

    /// Find an archive entry by exact case-insensitive name, then by suffix.
    pub fn find_entry(&self, path: &str) -> Option<&str> {
        let path = path.trim_start_matches('/');
        self.entries
            .iter()
            .find(|e| e.eq_ignore_ascii_case(path))
            .or_else(|| {
                let suffix = path.to_ascii_lowercase();
                self.entries
                    .iter()
                    .find(|e| e.to_ascii_lowercase().ends_with(&suffix))
            })
            .map(String::as_str)
    }

    /// Read an entry fully into memory.
    pub fn read_entry(&mut self, path: &str) -> Result<Vec<u8>> {
        let name = self
            .find_entry(path)
            .ok_or_else(|| Error::EntryNotFound(path.to_string()))?
            .to_string();
        let mut file = self.archive.by_name(&name)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }
}

impl<R: Read + Seek> AssetSource for HwpxContainer<R> {
    fn asset_path(&self, id: &str) -> Option<String> {
        self.assets.get(id).cloned()
    }

    fn read_asset(&mut self, path: &str) -> Result<Vec<u8>> {
        self.read_entry(path)
    }
}

fn is_section_item(item: &ManifestItem) -> bool {
    item.id.to_ascii_lowercase().contains("section")
}

/// Resolve a section href against the content directory.
fn normalize_href(item: &ManifestItem) -> String {
    let href = item.href.trim_start_matches('/');
    if !href.starts_with(CONTENT_DIR) && item.media_type.ends_with("xml") {
        format!("{CONTENT_DIR}{href}")
    } else {
        href.to_string()
    }
}
