//! HTML rendering for reconstructed documents.
//!
//! Produces article-body markup: one `<h2>` per section, consecutive
//! paragraphs merged into a single justified `<p>` separated by `<br>`,
//! bordered tables and sized images.

use crate::error::Result;
use crate::model::{ContentItem, Document, ImageRef, Section, Table};

use super::RenderOptions;

const TITLE_STYLE: &str = "text-align:center; color:#2E86C1; margin-top:10px;";
const HEADING_STYLE: &str = "color:#2874A6;margin-top:14px;";
const PARAGRAPH_STYLE: &str = "text-align:justify; line-height:1.5; margin:0 0 12px 0;";
const TABLE_STYLE: &str = "width:100%;border-collapse:collapse;border:1px solid #ccc;margin:12px 0;";
const SHADED_ROW_STYLE: &str = "background:#f5f5f5;";
const CELL_STYLE: &str = "border:1px solid #ddd;padding:8px;vertical-align:top;";

/// Convert a document to an HTML fragment.
pub fn to_html(doc: &Document, options: &RenderOptions) -> Result<String> {
    let renderer = HtmlRenderer::new(options.clone());
    renderer.render(doc)
}

/// HTML renderer.
pub struct HtmlRenderer {
    options: RenderOptions,
}

impl HtmlRenderer {
    /// Create a new HTML renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a document to HTML.
    pub fn render(&self, doc: &Document) -> Result<String> {
        let mut output = String::new();

        if self.options.include_document_title {
            if let Some(ref source) = doc.metadata.source {
                output.push_str(&format!(
                    "<h1{}>{}</h1>\n",
                    self.style(TITLE_STYLE),
                    escape_html(source)
                ));
            }
        }

        for section in &doc.sections {
            self.render_section(&mut output, section);
        }

        Ok(output)
    }

    fn render_section(&self, output: &mut String, section: &Section) {
        output.push_str(&format!(
            "<h2{}>{}</h2>\n",
            self.style(HEADING_STYLE),
            escape_html(&section.title)
        ));

        let mut pending: Vec<&str> = Vec::new();
        for item in &section.content {
            match item {
                ContentItem::Paragraph(text) => pending.push(text),
                ContentItem::Table(table) => {
                    self.flush_paragraphs(output, &mut pending);
                    self.render_table(output, table);
                }
                ContentItem::Image(image) => {
                    self.flush_paragraphs(output, &mut pending);
                    self.render_image(output, image);
                }
            }
        }
        self.flush_paragraphs(output, &mut pending);
    }

    fn flush_paragraphs(&self, output: &mut String, pending: &mut Vec<&str>) {
        if pending.is_empty() {
            return;
        }
        let joined = pending
            .drain(..)
            .map(escape_html)
            .collect::<Vec<_>>()
            .join("<br>");
        output.push_str(&format!("<p{}>{}</p>\n", self.style(PARAGRAPH_STYLE), joined));
    }

    fn render_table(&self, output: &mut String, table: &Table) {
        let col_count = table.column_count();
        if col_count == 0 {
            return;
        }

        output.push_str(&format!("<table{}>\n", self.style(TABLE_STYLE)));
        for (i, row) in table.rows.iter().enumerate() {
            // Rows alternate shading starting with the first one
            let row_style = if i % 2 == 0 {
                self.style(SHADED_ROW_STYLE)
            } else {
                String::new()
            };
            let tag = if row.is_header { "th" } else { "td" };
            output.push_str(&format!("<tr{}>", row_style));
            for col in 0..col_count {
                let content = row.cells.get(col).map(String::as_str).unwrap_or("");
                output.push_str(&format!(
                    "<{tag}{}>{}</{tag}>",
                    self.style(CELL_STYLE),
                    escape_html(content)
                ));
            }
            output.push_str("</tr>\n");
        }
        output.push_str("</table>\n");
    }

    fn render_image(&self, output: &mut String, image: &ImageRef) {
        let width = format!("width:{:.0}%;", image.width_percent.clamp(0.0, 100.0));
        output.push_str(&format!(
            "<img src=\"{}\" alt=\"\" style=\"{}{}\">\n",
            escape_html(&self.options.image_path(&image.image_ref)),
            width,
            if self.options.inline_styles {
                " display:block; margin:12px auto;"
            } else {
                ""
            }
        ));
    }

    fn style(&self, css: &str) -> String {
        if self.options.inline_styles {
            format!(" style=\"{}\"", css)
        } else {
            String::new()
        }
    }
}

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
