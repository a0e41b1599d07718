//! Package manifest (`content.hpf`) parsing.

use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::model::Metadata;

use super::xml::{attr, attributes, local_name, resolve_entity, strip_bom};

/// One entry of the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    /// Item identifier (e.g., "section0", "image1")
    pub id: String,
    /// Package path as written in the manifest
    pub href: String,
    /// Declared media type
    pub media_type: String,
}

/// Parsed package manifest.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    /// Manifest items in document order
    pub items: Vec<ManifestItem>,
    /// Descriptive metadata from the package
    pub metadata: Metadata,
}

impl Manifest {
    /// Parse a manifest document.
    ///
    /// Malformed XML is an error; unknown elements are ignored.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(strip_bom(data));
        let mut buf = Vec::new();

        let mut manifest = Manifest::default();
        let mut in_metadata = false;
        // Element whose text is being collected: "title", "language" or a meta name.
        let mut current: Option<String> = None;
        let mut text = String::new();
        let mut depth = 0usize;

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| Error::Manifest(e.to_string()))?;
            match event {
                Event::Start(e) => {
                    depth += 1;
                    let name = e.name();
                    match local_name(name.as_ref()) {
                        b"metadata" => in_metadata = true,
                        b"title" | b"language" if in_metadata => {
                            current =
                                Some(String::from_utf8_lossy(local_name(name.as_ref())).into());
                            text.clear();
                        }
                        b"meta" if in_metadata => {
                            let attrs = attributes(&e);
                            current = attr(&attrs, "name").map(|n| n.to_ascii_lowercase());
                            text.clear();
                        }
                        b"item" => manifest.push_item(&attributes(&e)),
                        _ => {}
                    }
                }
                Event::Empty(e) => {
                    let name = e.name();
                    if local_name(name.as_ref()) == b"item" {
                        manifest.push_item(&attributes(&e));
                    }
                }
                Event::Text(e) => {
                    if current.is_some() {
                        text.push_str(&String::from_utf8_lossy(e.as_ref()));
                    }
                }
                Event::GeneralRef(e) => {
                    if current.is_some() {
                        if let Some(resolved) = resolve_entity(&String::from_utf8_lossy(e.as_ref()))
                        {
                            text.push_str(&resolved);
                        }
                    }
                }
                Event::End(e) => {
                    depth = depth.saturating_sub(1);
                    let name = e.name();
                    let local = local_name(name.as_ref());
                    if local == b"metadata" {
                        in_metadata = false;
                    }
                    if matches!(local, b"title" | b"language" | b"meta") {
                        if let Some(field) = current.take() {
                            manifest.set_metadata(&field, text.trim());
                        }
                        text.clear();
                    }
                }
                Event::Eof if depth > 0 => {
                    return Err(Error::Manifest(format!(
                        "unexpected end of input with {depth} open elements"
                    )));
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(manifest)
    }

    /// Find an item by identifier (case-insensitive).
    pub fn item(&self, id: &str) -> Option<&ManifestItem> {
        self.items.iter().find(|i| i.id.eq_ignore_ascii_case(id))
    }

    /// Get the metadata described by the manifest.
    pub fn to_metadata(&self) -> Metadata {
        self.metadata.clone()
    }

    fn push_item(&mut self, attrs: &[(String, String)]) {
        let id = attr(attrs, "id").unwrap_or_default();
        if id.is_empty() {
            return;
        }
        self.items.push(ManifestItem {
            id: id.to_string(),
            href: attr(attrs, "href").unwrap_or_default().to_string(),
            media_type: attr(attrs, "media-type").unwrap_or_default().to_string(),
        });
    }

    fn set_metadata(&mut self, field: &str, value: &str) {
        if value.is_empty() {
            return;
        }
        let meta = &mut self.metadata;
        match field {
            "title" => meta.title = Some(value.to_string()),
            "language" => meta.language = Some(value.to_string()),
            "creator" => meta.author = Some(value.to_string()),
            "subject" => meta.subject = Some(value.to_string()),
            "description" => meta.description = Some(value.to_string()),
            "keyword" | "keywords" => meta.keywords = Some(value.to_string()),
            "createddate" => meta.created = parse_date(value),
            "modifieddate" => meta.modified = parse_date(value),
            _ => {}
        }
    }
}

/// Parse a manifest date, accepting RFC 3339 or a bare local timestamp.
fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc())
}
