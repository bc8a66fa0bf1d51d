//! Markdown rendering for reconstructed documents.

use crate::error::Result;
use crate::model::{ContentItem, Document, ImageRef, Section, Table};

use super::RenderOptions;

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document, options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(doc)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a document to Markdown.
    pub fn render(&self, doc: &Document) -> Result<String> {
        let mut output = String::new();

        if self.options.include_document_title {
            if let Some(ref source) = doc.metadata.source {
                output.push_str("# ");
                output.push_str(&self.escape(source));
                output.push_str("\n\n");
            }
        }

        for section in &doc.sections {
            self.render_section(&mut output, section);
        }

        Ok(output.trim().to_string())
    }

    fn render_section(&self, output: &mut String, section: &Section) {
        output.push_str("## ");
        output.push_str(&self.escape(&section.title));
        output.push_str("\n\n");

        for item in &section.content {
            match item {
                ContentItem::Paragraph(text) => {
                    output.push_str(&self.escape(text));
                    output.push_str("\n\n");
                }
                ContentItem::Table(table) => self.render_table(output, table),
                ContentItem::Image(image) => self.render_image(output, image),
            }
        }
    }

    fn render_table(&self, output: &mut String, table: &Table) {
        let col_count = table.column_count();
        if col_count == 0 {
            return;
        }

        for (i, row) in table.rows.iter().enumerate() {
            output.push('|');
            for col in 0..col_count {
                let content = row.cells.get(col).map(String::as_str).unwrap_or("");
                output.push_str(&format!(" {} |", escape_cell(content.trim())));
            }
            output.push('\n');

            // Separator after header row
            if i == table.header_row_index {
                output.push('|');
                output.push_str(&" --- |".repeat(col_count));
                output.push('\n');
            }
        }

        output.push('\n');
    }

    fn render_image(&self, output: &mut String, image: &ImageRef) {
        output.push_str(&format!("![]({})\n\n", self.options.image_path(&image.image_ref)));
    }

    fn escape(&self, text: &str) -> String {
        if self.options.escape_special_chars {
            escape_markdown(text)
        } else {
            text.to_string()
        }
    }
}

/// Escape special Markdown characters.
/// Only characters that could be misread as Markdown syntax are escaped.
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

/// Pipes would split a table cell, so they are escaped regardless of options.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
