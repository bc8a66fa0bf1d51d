//! # relayout
//!
//! Page-layout reconstruction for Rust.
//!
//! This library takes the positioned text and image blocks of a document's
//! pages (as produced by any PDF or OCR front end) and rebuilds a clean
//! logical structure: titled sections holding paragraphs, tables and images,
//! with running headers, footers and tables of contents removed.
//!
//! ## Quick Start
//!
//! ```no_run
//! use relayout::{extract_file, render};
//!
//! fn main() -> relayout::Result<()> {
//!     // Reconstruct a document from a JSON page stream
//!     let doc = extract_file("notice.json")?;
//!
//!     // Convert to Markdown
//!     let options = render::RenderOptions::default();
//!     let markdown = render::to_markdown(&doc, &options)?;
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Noise removal**: footers, repeated page headers, table-of-contents blocks
//! - **Table detection**: column resolution from runs of multi-cell rows
//! - **Sections**: title detection by casing and font size, continued across pages
//! - **Multiple output formats**: JSON, Markdown, HTML, plain text
//! - **Parallel processing**: Uses Rayon to lay out many documents at once

pub mod error;
pub mod layout;
pub mod model;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use error::{Error, Result};
pub use layout::{DocumentContext, ErrorMode, LayoutEngine, LayoutOptions};
pub use model::{
    BBox, Block, BlockKind, ContentItem, Document, ImageBlock, ImageRef, Metadata, Page, Section,
    Table, TableRow, TextBlock,
};
pub use render::{JsonFormat, RenderOptions};
pub use source::{JsonPageSource, PageSource, VecPageSource};

use std::path::Path;

/// Reconstruct a document from in-memory pages with default options.
///
/// # Example
///
/// ```
/// use relayout::{extract_pages, BBox, Page};
///
/// let page = Page::a4(1).with_text(BBox::new(50.0, 100.0, 300.0, 116.0), "MONTAGE", 14.0);
/// let doc = extract_pages("notice", vec![page]).unwrap();
/// assert_eq!(doc.sections[0].title, "MONTAGE");
/// ```
pub fn extract_pages(document_id: impl Into<String>, pages: Vec<Page>) -> Result<Document> {
    LayoutEngine::new(LayoutOptions::default())?.extract_pages(document_id, pages)
}

/// Reconstruct a document from a JSON page stream file.
///
/// # Example
///
/// ```no_run
/// use relayout::extract_file;
///
/// let doc = extract_file("notice.json").unwrap();
/// println!("Sections: {}", doc.section_count());
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    extract_file_with_options(path, LayoutOptions::default())
}

/// Reconstruct a document from a JSON page stream file with custom options.
pub fn extract_file_with_options<P: AsRef<Path>>(
    path: P,
    options: LayoutOptions,
) -> Result<Document> {
    let mut source = JsonPageSource::open(path)?;
    LayoutEngine::new(options)?.extract(&mut source)
}

/// Reconstruct a document from a JSON page stream file and render it as Markdown.
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = extract_file(path)?;
    render::to_markdown(&doc, &RenderOptions::default())
}

/// Reconstruct a document from a JSON page stream file and render it as HTML.
pub fn to_html<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = extract_file(path)?;
    render::to_html(&doc, &RenderOptions::default())
}

/// Reconstruct a document from a JSON page stream file and render it as JSON.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = extract_file(path)?;
    render::to_json(&doc, format)
}

/// Builder for reconstructing and rendering documents.
///
/// # Example
///
/// ```no_run
/// use relayout::Relayout;
///
/// let html = Relayout::new()
///     .strict()
///     .with_image_prefix("./images/")
///     .extract_file("notice.json")?
///     .to_html()?;
/// # Ok::<(), relayout::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Relayout {
    layout_options: LayoutOptions,
    render_options: RenderOptions,
}

impl Relayout {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the layout options.
    pub fn with_layout_options(mut self, options: LayoutOptions) -> Self {
        self.layout_options = options;
        self
    }

    /// Fail on unusable pages instead of skipping them.
    pub fn strict(mut self) -> Self {
        self.layout_options = self.layout_options.strict();
        self
    }

    /// Set the image path prefix used by renderers.
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_image_prefix(prefix);
        self
    }

    /// Emit the document identifier as a top-level heading.
    pub fn with_document_title(mut self) -> Self {
        self.render_options = self.render_options.with_document_title(true);
        self
    }

    /// Reconstruct a document from a JSON page stream file.
    pub fn extract_file<P: AsRef<Path>>(self, path: P) -> Result<RelayoutResult> {
        let mut source = JsonPageSource::open(path)?;
        self.extract(&mut source)
    }

    /// Reconstruct a document from any page source.
    pub fn extract<S: PageSource + ?Sized>(self, source: &mut S) -> Result<RelayoutResult> {
        let document = LayoutEngine::new(self.layout_options)?.extract(source)?;
        Ok(RelayoutResult {
            document,
            render_options: self.render_options,
        })
    }
}

/// A reconstructed document paired with the render options to use.
#[derive(Debug, Clone)]
pub struct RelayoutResult {
    /// The reconstructed document
    pub document: Document,
    render_options: RenderOptions,
}

impl RelayoutResult {
    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::to_markdown(&self.document, &self.render_options)
    }

    /// Convert to HTML.
    pub fn to_html(&self) -> Result<String> {
        render::to_html(&self.document, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_strict() {
        let builder = Relayout::new().strict();
        assert_eq!(builder.layout_options.error_mode, ErrorMode::Strict);
        assert!(!builder.render_options.include_document_title);
    }

    #[test]
    fn test_builder_render_options() {
        let builder = Relayout::new()
            .with_image_prefix("img/")
            .with_document_title();
        assert_eq!(builder.render_options.image_path_prefix, "img/");
        assert!(builder.render_options.include_document_title);
    }

    #[test]
    fn test_builder_invalid_options() {
        let options = LayoutOptions::new().with_y_tolerance(-1.0);
        let mut source = VecPageSource::new("doc", Vec::new());
        let result = Relayout::new()
            .with_layout_options(options)
            .extract(&mut source);
        assert!(matches!(result, Err(Error::InvalidOptions(_))));
    }

    #[test]
    fn test_extract_pages_empty() {
        let doc = extract_pages("empty", Vec::new()).unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.metadata.source.as_deref(), Some("empty"));
    }

    #[test]
    fn test_extract_file_missing() {
        let result = extract_file("/nonexistent/notice.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_result_renders() {
        let page = Page::a4(1)
            .with_text(BBox::new(50.0, 200.0, 300.0, 216.0), "ENTRETIEN", 14.0)
            .with_text(BBox::new(50.0, 230.0, 300.0, 240.0), "Nettoyer avec un chiffon sec.", 9.0);
        let mut source = VecPageSource::new("notice", vec![page]);
        let result = Relayout::new().extract(&mut source).unwrap();
        assert!(result.to_markdown().unwrap().contains("## ENTRETIEN"));
        assert!(result.to_html().unwrap().contains("ENTRETIEN</h2>"));
        assert!(result.to_text().unwrap().contains("chiffon sec"));
        assert!(result.to_json(JsonFormat::Compact).unwrap().contains("\"ENTRETIEN\""));
    }
}
