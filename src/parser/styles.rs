//! Paragraph style resolution from the document header part.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::model::ParagraphStyle;

use super::xml::{attr, attributes, local_name, strip_bom};

/// Maps style identifiers to the heading/quote signal they carry.
#[derive(Debug, Clone, Default)]
pub struct StyleMap {
    styles: HashMap<String, ParagraphStyle>,
}

impl StyleMap {
    /// Parse the `style` definitions of a header part.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(strip_bom(data));
        let mut buf = Vec::new();
        let mut map = StyleMap::default();
        let mut depth = 0usize;

        loop {
            let event = reader.read_event_into(&mut buf)?;
            match &event {
                Event::Start(_) => depth += 1,
                Event::End(_) => depth = depth.saturating_sub(1),
                _ => {}
            }
            match event {
                Event::Start(e) | Event::Empty(e) => {
                    let name = e.name();
                    if local_name(name.as_ref()) == b"style" {
                        let attrs = attributes(&e);
                        if let Some(id) = attr(&attrs, "id") {
                            let style = classify(
                                attr(&attrs, "name").unwrap_or_default(),
                                attr(&attrs, "engName").unwrap_or_default(),
                            );
                            if style != ParagraphStyle::default() {
                                map.styles.insert(id.to_string(), style);
                            }
                        }
                    }
                }
                Event::Eof if depth > 0 => {
                    return Err(Error::Xml("header ends inside an open element".into()));
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(map)
    }

    /// Get the style for an identifier; unknown identifiers are body text.
    pub fn get(&self, id: &str) -> ParagraphStyle {
        self.styles.get(id).copied().unwrap_or_default()
    }

    /// Number of styles carrying a signal.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if no style carries a signal.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// Derive the signal from a style's local and English names.
fn classify(name: &str, eng_name: &str) -> ParagraphStyle {
    for candidate in [eng_name, name] {
        if let Some(level) = outline_level(candidate) {
            return ParagraphStyle::heading(level);
        }
    }
    let is_quote = eng_name.to_ascii_lowercase().contains("quote") || name.contains("인용");
    if is_quote {
        return ParagraphStyle::quote();
    }
    ParagraphStyle::default()
}

/// "Outline 3" / "개요 3" -> 3, clamped to a Markdown heading rank.
fn outline_level(name: &str) -> Option<u8> {
    let rest = name
        .strip_prefix("Outline")
        .or_else(|| name.strip_prefix("개요"))?;
    let level: u8 = rest.trim().parse().ok()?;
    (level > 0).then(|| level.min(6))
}
