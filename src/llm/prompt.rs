//! Prompt construction for language-model formatters.

use std::fmt::Write;

use crate::error::{Error, Result};
use crate::model::{Block, Document, ImageBlock, ListBlock, Paragraph, TableBlock};

/// Default system prompt for document formatting.
pub const SYSTEM_PROMPT: &str = "\
You convert the structure of Korean word-processor (HWP) documents into clean Markdown.

Input is a document as JSON or as a tagged outline. Produce Markdown that keeps the
original content and order.

Paragraphs: separate with a blank line. A heading_level above 0 (or a [Heading N] tag)
becomes a # heading of that level. A quote becomes a > block quote.

Tables: use GitHub pipe tables. Put a separator line after the first row when it is a
header. Replace line breaks inside cells with spaces.

Images: write ![alt](path), falling back to the image id when there is no alt text.

Lists: number ordered items 1. 2. 3.; mark unordered items with -.

Output only the Markdown, with no commentary and no surrounding code fence. Drop
redundant blank lines.";

/// Build a prompt embedding the whole document as JSON.
pub fn build_prompt(doc: &Document) -> Result<String> {
    let json = serde_json::to_string_pretty(doc)
        .map_err(|e| Error::Format(format!("failed to serialize document: {e}")))?;
    Ok(format!(
        "Convert the following document structure to Markdown:\n\n```json\n{json}\n```"
    ))
}

/// Build a token-efficient prompt from tagged plain-text lines.
pub fn build_compact_prompt(doc: &Document) -> String {
    let mut out = String::from("Convert this document to Markdown:\n\n");

    let meta = &doc.metadata;
    if let Some(title) = meta.title.as_deref() {
        let _ = writeln!(out, "Title: {title}");
    }
    if let Some(author) = meta.author.as_deref() {
        let _ = writeln!(out, "Author: {author}");
    }
    if meta.title.is_some() || meta.author.is_some() {
        out.push_str("\n---\n\n");
    }

    for (i, block) in doc.content.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        match block {
            Block::Paragraph(p) => write_paragraph(&mut out, p),
            Block::Table(t) => write_table(&mut out, t),
            Block::Image(img) => write_image(&mut out, img),
            Block::List(l) => write_list(&mut out, l),
        }
    }

    out
}

fn write_paragraph(out: &mut String, p: &Paragraph) {
    if p.style.heading_level > 0 {
        let _ = write!(out, "[Heading {}] ", p.style.heading_level);
    }
    if p.style.is_quote {
        out.push_str("[Quote] ");
    }
    out.push_str(&p.text);
    out.push('\n');
}

fn write_table(out: &mut String, t: &TableBlock) {
    out.push_str("[Table]\n");
    for (i, row) in t.to_rows().iter().enumerate() {
        if i == 0 && t.has_header {
            out.push_str("Header: ");
        }
        let cells: Vec<String> = row.iter().map(|c| c.text.replace('\n', " ")).collect();
        out.push_str(&cells.join(" | "));
        out.push('\n');
    }
}

fn write_image(out: &mut String, img: &ImageBlock) {
    let alt = img.alt.as_deref().unwrap_or(&img.id);
    let _ = writeln!(out, "[Image: {alt}, path: {}]", img.path);
}

fn write_list(out: &mut String, l: &ListBlock) {
    let kind = if l.ordered { "Ordered" } else { "Unordered" };
    let _ = writeln!(out, "[{kind} list]");
    for item in &l.items {
        let _ = writeln!(out, "- {}", item.text);
    }
}
