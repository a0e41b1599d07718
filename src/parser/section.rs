//! Section content state machine.
//!
//! Streams one section's XML and appends paragraphs, images and finished
//! tables to the document in encounter order. Tables may nest to any depth;
//! the enclosing tables wait on an owned stack while an inner one is built.

use std::mem;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::model::{format_from_path, Document, ImageBlock, Paragraph};

use super::options::ParseOptions;
use super::styles::StyleMap;
use super::table_builder::{build_table, flatten_nested, RawCell};
use super::xml::{attr, attributes, local_name, parse_or, resolve_entity, strip_bom};

/// Attribute names carrying a binary item reference.
const IMAGE_ID_ATTRS: [&str; 3] = ["binItemIDRef", "binItemId", "binaryItemIDRef"];

/// Access to the package's binary assets while a section is parsed.
pub(crate) trait AssetSource {
    /// Resolve a binary item identifier to its package path.
    fn asset_path(&self, id: &str) -> Option<String>;

    /// Read the bytes of an asset by package path.
    fn read_asset(&mut self, path: &str) -> Result<Vec<u8>>;
}

/// Text of a table cell under construction.
#[derive(Debug)]
struct CellState {
    text: String,
    col_span: u32,
    row_span: u32,
    /// A paragraph inside the cell ended; the next write starts a new line.
    paragraph_break: bool,
}

impl CellState {
    fn new() -> Self {
        Self {
            text: String::new(),
            col_span: 1,
            row_span: 1,
            paragraph_break: false,
        }
    }

    fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if mem::take(&mut self.paragraph_break) && !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str(text);
    }

    /// Splice a flattened nested table into this cell on its own line.
    fn splice(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str(text);
        self.paragraph_break = false;
    }

    fn into_raw(self) -> RawCell {
        RawCell::new(self.text).spans(self.col_span, self.row_span)
    }
}

/// A table under construction.
#[derive(Debug, Default)]
struct TableState {
    rows: Vec<Vec<RawCell>>,
    row: Vec<RawCell>,
    cell: Option<CellState>,
}

/// Parser state for one section.
pub(crate) struct SectionParser<'a> {
    options: &'a ParseOptions,
    styles: Option<&'a StyleMap>,
    paragraph: Option<Paragraph>,
    stack: Vec<TableState>,
    current: Option<TableState>,
    /// Inside a picture; `true` once it produced an image.
    picture: Option<bool>,
}

impl<'a> SectionParser<'a> {
    pub fn new(options: &'a ParseOptions, styles: Option<&'a StyleMap>) -> Self {
        Self {
            options,
            styles,
            paragraph: None,
            stack: Vec::new(),
            current: None,
            picture: None,
        }
    }

    /// Parse a section document into `doc`.
    pub fn parse<A: AssetSource>(
        mut self,
        data: &[u8],
        assets: &mut A,
        doc: &mut Document,
    ) -> Result<()> {
        let mut reader = Reader::from_reader(strip_bom(data));
        let mut buf = Vec::new();
        let mut text_buf = Vec::new();
        let mut depth = 0usize;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    if local_name(e.name().as_ref()) == b"t" {
                        let text = read_text_run(&mut reader, &mut text_buf)?;
                        self.write(&text);
                    } else {
                        depth += 1;
                        self.start(&e, assets, doc);
                    }
                }
                Event::Empty(e) => {
                    self.start(&e, assets, doc);
                    let name = e.name();
                    self.end(local_name(name.as_ref()), doc);
                }
                Event::End(e) => {
                    depth = depth.saturating_sub(1);
                    let name = e.name();
                    self.end(local_name(name.as_ref()), doc);
                }
                Event::Eof if depth > 0 => {
                    return Err(Error::Xml(format!(
                        "unexpected end of input with {depth} open elements"
                    )));
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        log::trace!(
            "section done: {} blocks, {} open tables",
            doc.len(),
            self.stack.len() + usize::from(self.current.is_some())
        );
        Ok(())
    }

    fn start<A: AssetSource>(&mut self, e: &BytesStart<'_>, assets: &mut A, doc: &mut Document) {
        let name = e.name();
        match local_name(name.as_ref()) {
            b"p" => {
                let attrs = attributes(e);
                let style = match (self.styles, attr(&attrs, "styleIDRef")) {
                    (Some(styles), Some(id)) => styles.get(id),
                    _ => Default::default(),
                };
                self.paragraph = Some(Paragraph::new().styled(style));
            }
            b"tab" => self.write("\t"),
            b"lineBreak" => self.write("\n"),
            b"br" => {
                let attrs = attributes(e);
                if attr(&attrs, "type").map_or(true, |t| t == "line") {
                    self.write("\n");
                }
            }
            b"tbl" => self.start_table(),
            b"tr" => {
                if let Some(table) = self.current.as_mut() {
                    table.row.clear();
                }
            }
            b"tc" => {
                if let Some(table) = self.current.as_mut() {
                    table.cell = Some(CellState::new());
                }
            }
            b"cellSpan" => {
                if let Some(cell) = self.cell_mut() {
                    let attrs = attributes(e);
                    cell.col_span = parse_or(attr(&attrs, "colSpan"), 1);
                    cell.row_span = parse_or(attr(&attrs, "rowSpan"), 1);
                }
            }
            b"pic" => {
                let emitted = self.image(&attributes(e), assets, doc);
                self.picture = Some(emitted);
            }
            b"img" | b"image" => {
                if self.picture != Some(true) {
                    let emitted = self.image(&attributes(e), assets, doc);
                    if self.picture.is_some() {
                        self.picture = Some(emitted);
                    }
                }
            }
            _ => {}
        }
    }

    fn end(&mut self, name: &[u8], doc: &mut Document) {
        match name {
            b"p" => self.end_paragraph(doc),
            b"tbl" => self.end_table(doc),
            b"tr" => {
                if let Some(table) = self.current.as_mut() {
                    if !table.row.is_empty() {
                        let row = mem::take(&mut table.row);
                        table.rows.push(row);
                    }
                }
            }
            b"tc" => {
                if let Some(table) = self.current.as_mut() {
                    if let Some(cell) = table.cell.take() {
                        table.row.push(cell.into_raw());
                    }
                }
            }
            b"pic" => self.picture = None,
            _ => {}
        }
    }

    fn cell_mut(&mut self) -> Option<&mut CellState> {
        self.current.as_mut().and_then(|t| t.cell.as_mut())
    }

    /// Route text to the open cell, else the open paragraph. Text outside
    /// any paragraph is dropped.
    fn write(&mut self, text: &str) {
        if self.paragraph.is_none() {
            return;
        }
        if let Some(cell) = self.cell_mut() {
            cell.write(text);
        } else if let Some(paragraph) = self.paragraph.as_mut() {
            paragraph.push_str(text);
        }
    }

    fn end_paragraph(&mut self, doc: &mut Document) {
        let paragraph = self.paragraph.take();
        if let Some(cell) = self.cell_mut() {
            if let Some(p) = paragraph {
                cell.write(&p.text);
            }
            cell.paragraph_break = true;
        } else if self.current.is_none() {
            if let Some(p) = paragraph {
                doc.add_paragraph(p);
            }
        }
    }

    fn start_table(&mut self) {
        if let Some(parent) = self.current.take() {
            self.stack.push(parent);
        }
        self.current = Some(TableState::default());
    }

    fn end_table(&mut self, doc: &mut Document) {
        let Some(table) = self.current.take() else {
            return;
        };
        let mut parent = self.stack.pop();

        if !table.rows.is_empty() {
            match parent.as_mut() {
                Some(parent) => {
                    let text = flatten_nested(&table.rows);
                    if let Some(cell) = parent.cell.as_mut() {
                        cell.splice(&text);
                    }
                }
                None => {
                    if let Some(block) = build_table(&table.rows) {
                        log::trace!("table {}x{}", block.rows, block.cols);
                        doc.add_table(block);
                    }
                }
            }
        }

        self.current = parent;
    }

    /// Emit an image for a binary item reference. Returns whether one was emitted.
    fn image<A: AssetSource>(
        &mut self,
        attrs: &[(String, String)],
        assets: &mut A,
        doc: &mut Document,
    ) -> bool {
        if !self.options.extract_images {
            return false;
        }
        let Some(id) = IMAGE_ID_ATTRS
            .iter()
            .find_map(|key| attr(attrs, key))
            .filter(|id| !id.is_empty())
        else {
            return false;
        };
        let Some(path) = assets.asset_path(id) else {
            log::debug!("dropping image with unknown binary item {id:?}");
            return false;
        };

        let mut image = ImageBlock::new(id).with_path(path.as_str()).with_dimensions(
            parse_or(attr(attrs, "width"), 0),
            parse_or(attr(attrs, "height"), 0),
        );
        if let Some(alt) = attr(attrs, "alt")
            .or_else(|| attr(attrs, "descr"))
            .filter(|a| !a.trim().is_empty())
        {
            image = image.with_alt(alt);
        }
        image.format = format_from_path(&path);
        match assets.read_asset(&path) {
            Ok(data) => image.data = Some(data),
            Err(e) => log::debug!("image {id:?} data unavailable: {e}"),
        }

        doc.add_image(image);
        true
    }
}

/// Read the character content of a text run up to its closing tag.
fn read_text_run(reader: &mut Reader<&[u8]>, buf: &mut Vec<u8>) -> Result<String> {
    let mut text = String::new();
    let mut depth = 0usize;

    loop {
        buf.clear();
        match reader.read_event_into(buf)? {
            Event::Text(e) => text.push_str(&String::from_utf8_lossy(e.as_ref())),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(e.as_ref())),
            Event::GeneralRef(e) => {
                if let Some(resolved) = resolve_entity(&String::from_utf8_lossy(e.as_ref())) {
                    text.push_str(&resolved);
                }
            }
            Event::Start(e) => {
                depth += 1;
                push_inline_mark(&mut text, local_name(e.name().as_ref()));
            }
            Event::Empty(e) => push_inline_mark(&mut text, local_name(e.name().as_ref())),
            Event::End(_) => {
                if depth == 0 {
                    return Ok(text);
                }
                depth -= 1;
            }
            Event::Eof => {
                return Err(Error::Xml("unexpected end of input inside text run".into()));
            }
            _ => {}
        }
    }
}

fn push_inline_mark(text: &mut String, name: &[u8]) {
    match name {
        b"fwSpace" | b"hwSpace" => text.push(' '),
        b"tab" => text.push('\t'),
        b"lineBreak" => text.push('\n'),
        _ => {}
    }
}
