//! Markdown rendering for HWP documents.

use crate::error::Result;
use crate::model::{Block, Document, ImageBlock, ListBlock, Paragraph, TableBlock, TableCell};

use super::{CleanupPipeline, ExtractionStats, RenderOptions, RenderResult, TableFallback};

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document, options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(doc)
}

/// Convert a document to Markdown with statistics.
pub fn to_markdown_with_stats(doc: &Document, options: &RenderOptions) -> Result<RenderResult> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render_with_stats(doc)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
    stats: ExtractionStats,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            stats: ExtractionStats::new(),
        }
    }

    /// Render a document to Markdown.
    pub fn render(mut self, doc: &Document) -> Result<String> {
        self.render_internal(doc)
    }

    /// Render a document to Markdown with extraction statistics.
    pub fn render_with_stats(mut self, doc: &Document) -> Result<RenderResult> {
        self.options.collect_stats = true;
        let content = self.render_internal(doc)?;
        self.stats.count_text(&content);

        Ok(RenderResult::new(content, doc.metadata.clone(), self.stats))
    }

    fn render_internal(&mut self, doc: &Document) -> Result<String> {
        let mut output = String::new();

        if self.options.include_frontmatter {
            output.push_str(&doc.metadata.to_yaml_frontmatter());
        }

        for block in &doc.content {
            self.render_block(&mut output, block);
        }

        if let Some(ref cleanup_options) = self.options.cleanup {
            let pipeline = CleanupPipeline::new(cleanup_options.clone());
            output = pipeline.process(&output);
        }

        Ok(output.trim().to_string())
    }

    fn render_block(&mut self, output: &mut String, block: &Block) {
        match block {
            Block::Paragraph(p) => self.render_paragraph(output, p),
            Block::Table(t) => {
                if self.options.collect_stats {
                    self.stats.add_table();
                }
                self.render_table(output, t);
            }
            Block::Image(img) => {
                if self.options.collect_stats {
                    self.stats.add_image();
                }
                self.render_image(output, img);
            }
            Block::List(list) => {
                if self.options.collect_stats {
                    self.stats.add_list_items(list.items.len());
                }
                self.render_list(output, list);
            }
        }
    }

    fn render_paragraph(&mut self, output: &mut String, para: &Paragraph) {
        if para.is_empty() {
            return;
        }

        if para.is_heading() {
            if self.options.collect_stats {
                self.stats.add_heading();
            }
            let level = para.style.heading_level.min(self.options.max_heading_level);
            let text = self.escape(&join_lines(para.text.trim(), " "));
            output.push_str(&"#".repeat(level as usize));
            output.push(' ');
            output.push_str(&text);
            output.push_str("\n\n");
            return;
        }

        let text = self.render_lines(para.text.trim());
        if para.style.is_quote {
            if self.options.collect_stats {
                self.stats.add_quote();
            }
            for line in text.split('\n') {
                output.push_str("> ");
                output.push_str(line);
                output.push('\n');
            }
            output.push('\n');
            return;
        }

        if self.options.collect_stats {
            self.stats.add_paragraph();
        }
        output.push_str(&text);
        output.push_str("\n\n");
    }

    /// Escape text and apply the line break policy.
    fn render_lines(&self, text: &str) -> String {
        let separator = if self.options.preserve_line_breaks {
            "  \n"
        } else {
            " "
        };
        text.split('\n')
            .map(|line| self.escape(line.trim_end()))
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn render_list(&self, output: &mut String, list: &ListBlock) {
        for (i, item) in list.items.iter().enumerate() {
            let text = item.text.trim();
            if text.is_empty() {
                continue;
            }
            if list.ordered {
                output.push_str(&format!("{}. ", i + 1));
            } else {
                output.push(self.options.list_marker);
                output.push(' ');
            }
            output.push_str(&self.escape(&join_lines(text, " ")));
            output.push('\n');
        }
        output.push('\n');
    }

    fn render_table(&self, output: &mut String, table: &TableBlock) {
        if table.is_empty() {
            return;
        }

        if table.has_merged_cells() && self.options.table_fallback == TableFallback::Html {
            self.render_table_html(output, table);
            return;
        }

        self.render_table_markdown(output, table);
    }

    fn render_table_markdown(&self, output: &mut String, table: &TableBlock) {
        // Pipe tables always need a header line; a single-row table uses it.
        for (i, row) in table.cells.iter().enumerate() {
            output.push('|');
            for cell in row {
                let content = if cell.covered {
                    String::new()
                } else {
                    self.escape(&join_lines(cell.text.trim(), " "))
                };
                output.push_str(&format!(" {} |", content));
            }
            output.push('\n');

            if i == 0 {
                output.push('|');
                output.push_str(&" --- |".repeat(table.cols));
                output.push('\n');
            }
        }

        output.push('\n');
    }

    fn render_table_html(&self, output: &mut String, table: &TableBlock) {
        output.push_str("<table>\n");

        if let Some(header) = table.header() {
            output.push_str("<thead>\n");
            render_html_row(output, header, true);
            output.push_str("</thead>\n");
        }

        output.push_str("<tbody>\n");
        for row in table.body() {
            render_html_row(output, row, false);
        }
        output.push_str("</tbody>\n");

        output.push_str("</table>\n\n");
    }

    fn render_image(&self, output: &mut String, image: &ImageBlock) {
        let alt = image.alt.as_deref().unwrap_or(&image.id);
        let path = if self.options.image_path_prefix.is_empty() {
            image.path.clone()
        } else {
            let name = image.filename().unwrap_or(&image.id);
            format!("{}{}", self.options.image_path_prefix, name)
        };
        output.push_str(&format!("![{}]({})\n\n", alt, path));
    }

    fn escape(&self, text: &str) -> String {
        if self.options.escape_special_chars {
            escape_markdown(text)
        } else {
            text.to_string()
        }
    }
}

fn render_html_row(output: &mut String, row: &[TableCell], is_header: bool) {
    let tag = if is_header { "th" } else { "td" };
    output.push_str("<tr>");

    for cell in row.iter().filter(|c| !c.covered) {
        let mut attrs = String::new();
        if cell.row_span > 1 {
            attrs.push_str(&format!(" rowspan=\"{}\"", cell.row_span));
        }
        if cell.col_span > 1 {
            attrs.push_str(&format!(" colspan=\"{}\"", cell.col_span));
        }

        let content = escape_html(cell.text.trim()).replace('\n', "<br>");
        output.push_str(&format!("<{}{}>{}</{}>", tag, attrs, content, tag));
    }

    output.push_str("</tr>\n");
}

fn join_lines(text: &str, separator: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Escape special Markdown characters.
/// Only characters that could be misread as inline syntax or table pipes.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ListBlock;

    fn doc_with(blocks: Vec<Block>) -> Document {
        let mut doc = Document::new();
        for block in blocks {
            doc.add_block(block);
        }
        doc
    }

    fn render(doc: &Document) -> String {
        to_markdown(doc, &RenderOptions::new()).unwrap()
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("Hello *world*"), "Hello \\*world\\*");
        assert_eq!(escape_markdown("[link]"), "\\[link\\]");
        assert_eq!(escape_markdown("제1장."), "제1장.");
    }

    #[test]
    fn test_render_paragraphs_and_headings() {
        let doc = doc_with(vec![
            Paragraph::heading("개요", 1).into(),
            Paragraph::heading("Deep", 6).into(),
            Paragraph::with_text("본문입니다.").into(),
        ]);
        let options = RenderOptions::new().with_max_heading(3);
        let md = to_markdown(&doc, &options).unwrap();
        assert_eq!(md, "# 개요\n\n### Deep\n\n본문입니다.");
    }

    #[test]
    fn test_render_line_breaks() {
        let doc = doc_with(vec![Paragraph::with_text("one\ntwo").into()]);
        assert_eq!(render(&doc), "one  \ntwo");

        let options = RenderOptions::new().with_line_breaks(false);
        assert_eq!(to_markdown(&doc, &options).unwrap(), "one two");
    }

    #[test]
    fn test_render_quote() {
        let doc = doc_with(vec![Paragraph::quote("first\nsecond").into()]);
        assert_eq!(render(&doc), "> first  \n> second");
    }

    #[test]
    fn test_render_table() {
        let mut table = TableBlock::new(2, 2);
        table.cells[0][0] = TableCell::text("A1");
        table.cells[0][1] = TableCell::text("B1");
        table.cells[1][0] = TableCell::text("A2");
        table.cells[1][1] = TableCell::text("B|2");
        table.set_header_row();

        let md = render(&doc_with(vec![table.into()]));
        assert_eq!(md, "| A1 | B1 |\n| --- | --- |\n| A2 | B\\|2 |");
    }

    #[test]
    fn test_render_merged_table_html() {
        let mut table = TableBlock::new(2, 2);
        table.cells[0][0] = TableCell::text("Head").col_span(2);
        table.cells[1][0] = TableCell::text("a<b");
        table.cells[1][1] = TableCell::text("x\ny");
        table.set_header_row();
        let doc = doc_with(vec![table.into()]);

        let md = render(&doc);
        assert!(md.starts_with("| Head |  |"));

        let options = RenderOptions::new().with_table_fallback(TableFallback::Html);
        let html = to_markdown(&doc, &options).unwrap();
        assert!(html.contains("<thead>\n<tr><th colspan=\"2\">Head</th></tr>"));
        assert!(html.contains("<tr><td>a&lt;b</td><td>x<br>y</td></tr>"));
    }

    #[test]
    fn test_render_image() {
        let image = ImageBlock::new("img1")
            .with_path("BinData/image1.png")
            .with_alt("로고");
        let doc = doc_with(vec![image.clone().into()]);
        assert_eq!(render(&doc), "![로고](BinData/image1.png)");

        let options = RenderOptions::new().with_image_prefix("images/");
        let doc = doc_with(vec![ImageBlock::new("img2").with_path("BinData/b.jpg").into()]);
        assert_eq!(to_markdown(&doc, &options).unwrap(), "![img2](images/b.jpg)");
    }

    #[test]
    fn test_render_lists() {
        let doc = doc_with(vec![
            ListBlock::from_strings(true, ["first", "second"]).into(),
            ListBlock::from_strings(false, ["dot"]).into(),
        ]);
        let options = RenderOptions::new().with_list_marker('*');
        assert_eq!(
            to_markdown(&doc, &options).unwrap(),
            "1. first\n2. second\n\n* dot"
        );
    }

    #[test]
    fn test_render_with_frontmatter() {
        let mut doc = Document::new();
        doc.metadata.title = Some("Test Doc".to_string());

        let options = RenderOptions::new().with_frontmatter(true);
        let result = to_markdown(&doc, &options).unwrap();
        assert!(result.starts_with("---"));
        assert!(result.contains("title:"));
    }

    #[test]
    fn test_render_empty_document() {
        assert_eq!(render(&Document::new()), "");
    }

    #[test]
    fn test_render_with_stats() {
        let doc = doc_with(vec![
            Paragraph::heading("Title", 1).into(),
            Paragraph::with_text("Body text").into(),
            ListBlock::from_strings(false, ["a", "b"]).into(),
        ]);
        let result = to_markdown_with_stats(&doc, &RenderOptions::new()).unwrap();
        assert_eq!(result.stats.heading_count, 1);
        assert_eq!(result.stats.paragraph_count, 1);
        assert_eq!(result.stats.list_item_count, 2);
        assert!(result.stats.word_count > 0);
    }
}
