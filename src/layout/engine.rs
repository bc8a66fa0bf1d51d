//! Layout engine: runs the per-page pipeline and carries per-document state.
//!
//! [`LayoutEngine`] holds only immutable configuration and can be shared by
//! many threads. Everything that must survive from one page to the next (the
//! running-header map and the open section) lives in a [`DocumentContext`]
//! owned by a single document, so documents never share mutable state.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{Block, Document, Metadata, Page};
use crate::source::{PageSource, VecPageSource};

use super::filters::{in_header_band, is_footer, HeaderDeduplicator, TocClassifier};
use super::finalizer::finalize_sections;
use super::options::{ErrorMode, LayoutOptions};
use super::reading_order::{assemble, PageItem};
use super::rows::RowClusterer;
use super::section_builder::SectionBuilder;
use super::table_detector::{TableDetector, TableDetectorConfig};

/// Reconstructs documents from page streams.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    options: LayoutOptions,
    toc: TocClassifier,
    clusterer: RowClusterer,
    detector: TableDetector,
}

impl LayoutEngine {
    /// Create an engine after validating `options`.
    pub fn new(options: LayoutOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            toc: TocClassifier::new(&options),
            clusterer: RowClusterer::new(options.y_tolerance),
            detector: TableDetector::with_config(TableDetectorConfig::from(&options)),
            options,
        })
    }

    /// The options this engine was built with.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Start a fresh per-document context.
    pub fn context(&self, document_id: impl Into<String>) -> DocumentContext<'_> {
        DocumentContext {
            engine: self,
            document_id: document_id.into(),
            headers: HeaderDeduplicator::new(self.options.header_key_max_len),
            builder: SectionBuilder::new(&self.options, self.toc.clone()),
            page_count: 0,
            pages_skipped: 0,
        }
    }

    /// Reconstruct one document from its page source.
    ///
    /// Any failure is reported as [`Error::ExtractionFailed`] for this document.
    pub fn extract<S: PageSource + ?Sized>(&self, source: &mut S) -> Result<Document> {
        self.extract_until(source, || false)
    }

    /// Reconstruct a document from in-memory pages.
    pub fn extract_pages(
        &self,
        document_id: impl Into<String>,
        pages: Vec<Page>,
    ) -> Result<Document> {
        self.extract(&mut VecPageSource::new(document_id, pages))
    }

    /// Like [`extract`](Self::extract), but stops with [`Error::Cancelled`]
    /// as soon as `cancel` is set between two pages. Partial state is dropped.
    pub fn extract_cancellable<S: PageSource + ?Sized>(
        &self,
        source: &mut S,
        cancel: &AtomicBool,
    ) -> Result<Document> {
        self.extract_until(source, || cancel.load(Ordering::Relaxed))
    }

    /// Reconstruct many documents in parallel, one worker per document.
    ///
    /// Results come back in input order. A failing document, including one
    /// whose processing panics, yields an error without affecting the others.
    pub fn extract_batch<S: PageSource + Send>(&self, sources: Vec<S>) -> Vec<Result<Document>> {
        self.extract_batch_with(sources, |_, _| {})
    }

    /// Like [`extract_batch`](Self::extract_batch), calling `on_done` with the
    /// document id and its result as each document completes.
    pub fn extract_batch_with<S, F>(&self, sources: Vec<S>, on_done: F) -> Vec<Result<Document>>
    where
        S: PageSource + Send,
        F: Fn(&str, &Result<Document>) + Sync,
    {
        sources
            .into_par_iter()
            .map(|mut source| {
                let id = source.document_id().to_string();
                let result = panic::catch_unwind(AssertUnwindSafe(|| self.extract(&mut source)))
                    .unwrap_or_else(|_| {
                        Err(Error::ExtractionFailed {
                            document: id.clone(),
                            reason: "layout panicked".to_string(),
                        })
                    });
                if let Err(ref e) = result {
                    log::warn!("Skipping document {}: {}", id, e);
                }
                on_done(&id, &result);
                result
            })
            .collect()
    }

    fn extract_until<S, F>(&self, source: &mut S, should_stop: F) -> Result<Document>
    where
        S: PageSource + ?Sized,
        F: Fn() -> bool,
    {
        let id = source.document_id().to_string();
        let mut ctx = self.context(id.clone());

        loop {
            if should_stop() {
                log::debug!("Extraction of {} cancelled after {} pages", id, ctx.page_count);
                return Err(Error::Cancelled { document: id });
            }
            let page = match source.next_page() {
                Ok(Some(page)) => page,
                Ok(None) => break,
                Err(e) => return Err(e.scoped_to(&id)),
            };
            ctx.process_page(&page).map_err(|e| e.scoped_to(&id))?;
        }

        Ok(ctx.finish())
    }

    /// Filter a page's blocks and lay them out in reading order.
    ///
    /// Returns `None` when the page has no usable blocks left.
    fn layout_page(&self, page: &Page, headers: &mut HeaderDeduplicator) -> Option<Vec<PageItem>> {
        let opts = &self.options;
        let mut texts: Vec<Block> = Vec::new();
        let mut images: Vec<Block> = Vec::new();

        for block in page.blocks() {
            if is_footer(&block.bbox, page.height, opts.footer_fraction) {
                continue;
            }
            if !block.is_text() {
                images.push(block);
                continue;
            }
            if self.toc.is_toc(&block.text) {
                log::debug!("Page {}: dropping TOC block {:?}", page.number, block.text);
                continue;
            }
            if in_header_band(&block.bbox, page.height, opts.header_band_fraction)
                && !headers.observe(&block.text)
            {
                log::debug!("Page {}: dropping repeated header {:?}", page.number, block.text);
                continue;
            }
            texts.push(block);
        }

        if texts.is_empty() && images.is_empty() {
            return None;
        }

        let rows = self.clusterer.cluster(texts);
        let tables = self.detector.detect(&rows);
        Some(assemble(rows, tables, images, page.width, page.height))
    }
}

/// Mutable state for one document, carried across its pages in order.
#[derive(Debug)]
pub struct DocumentContext<'e> {
    engine: &'e LayoutEngine,
    document_id: String,
    headers: HeaderDeduplicator,
    builder: SectionBuilder,
    page_count: u32,
    pages_skipped: u32,
}

impl DocumentContext<'_> {
    /// Lay out the next page and feed it into the open section.
    ///
    /// Pages must be supplied in ascending order. A page with no usable blocks
    /// is skipped; a page with unusable dimensions is skipped in lenient mode
    /// and rejected in strict mode.
    pub fn process_page(&mut self, page: &Page) -> Result<()> {
        self.page_count += 1;
        let number = if page.number == 0 {
            self.page_count
        } else {
            page.number
        };

        if !page.has_usable_dimensions() {
            if self.engine.options.error_mode == ErrorMode::Strict {
                return Err(Error::InvalidPage {
                    page: number,
                    reason: format!("dimensions {}x{}", page.width, page.height),
                });
            }
            log::warn!(
                "{}: skipping page {} with dimensions {}x{}",
                self.document_id,
                number,
                page.width,
                page.height
            );
            self.pages_skipped += 1;
            return Ok(());
        }

        match self.engine.layout_page(page, &mut self.headers) {
            Some(items) => {
                log::debug!("{}: page {} -> {} items", self.document_id, number, items.len());
                for item in items {
                    self.builder.push(item);
                }
            }
            None => {
                log::debug!("{}: page {} has no usable blocks", self.document_id, number);
                self.pages_skipped += 1;
            }
        }
        Ok(())
    }

    /// Pages processed so far, including skipped ones.
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Finalize the sections and produce the document.
    pub fn finish(self) -> Document {
        let options = &self.engine.options;
        let sections =
            finalize_sections(self.builder.finish(), &self.engine.toc, options.min_row_chars);
        log::debug!(
            "{}: {} pages -> {} sections",
            self.document_id,
            self.page_count,
            sections.len()
        );
        Document {
            metadata: Metadata {
                source: Some(self.document_id),
                page_count: self.page_count,
                pages_skipped: self.pages_skipped,
            },
            sections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, ContentItem};

    fn engine() -> LayoutEngine {
        LayoutEngine::new(LayoutOptions::default()).unwrap()
    }

    #[test]
    fn test_invalid_options_rejected() {
        let result = LayoutEngine::new(LayoutOptions::new().with_footer_fraction(2.0));
        assert!(matches!(result, Err(Error::InvalidOptions(_))));
    }

    #[test]
    fn test_footer_blocks_dropped() {
        let page = Page::a4(1)
            .with_text(BBox::new(10.0, 200.0, 300.0, 210.0), "MONTAGE", 14.0)
            .with_text(BBox::new(10.0, 800.0, 300.0, 810.0), "www.example.com", 8.0);
        let doc = engine().extract_pages("doc", vec![page]).unwrap();
        assert!(!doc.plain_text().contains("example"));
    }

    #[test]
    fn test_header_kept_on_first_page_only() {
        let pages = vec![
            Page::a4(1)
                .with_text(BBox::new(10.0, 10.0, 300.0, 20.0), "Guide de pose", 9.0)
                .with_text(BBox::new(10.0, 200.0, 300.0, 210.0), "Contenu de la page un.", 9.0),
            Page::a4(2)
                .with_text(BBox::new(10.0, 10.0, 300.0, 20.0), "Guide de pose", 9.0)
                .with_text(BBox::new(10.0, 200.0, 300.0, 210.0), "Contenu de la page deux.", 9.0),
        ];
        let doc = engine().extract_pages("doc", pages).unwrap();
        assert_eq!(doc.plain_text().matches("Guide de pose").count(), 1);
        let intro = doc.section("Introduction").unwrap();
        assert_eq!(intro.content[0], ContentItem::Paragraph("Guide de pose".to_string()));
    }

    #[test]
    fn test_unusable_page_lenient_and_strict() {
        let pages = vec![
            Page::new(1, 0.0, 0.0),
            Page::a4(2).with_text(BBox::new(10.0, 200.0, 300.0, 210.0), "ENTRETIEN", 9.0),
        ];
        let doc = engine().extract_pages("doc", pages.clone()).unwrap();
        assert_eq!(doc.metadata.page_count, 2);
        assert_eq!(doc.metadata.pages_skipped, 1);

        let strict = LayoutEngine::new(LayoutOptions::new().strict()).unwrap();
        let err = strict.extract_pages("doc", pages).unwrap_err();
        match err {
            Error::ExtractionFailed { document, reason } => {
                assert_eq!(document, "doc");
                assert!(reason.contains("Page 1"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_cancelled_before_first_page() {
        let cancel = AtomicBool::new(true);
        let mut source = VecPageSource::new("doc", vec![Page::a4(1)]);
        let err = engine()
            .extract_cancellable(&mut source, &cancel)
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled { .. }));
    }

    #[test]
    fn test_context_page_numbering() {
        let engine = engine();
        let mut ctx = engine.context("doc");
        ctx.process_page(&Page::new(0, 595.0, 842.0)).unwrap();
        ctx.process_page(&Page::new(0, 595.0, 842.0)).unwrap();
        assert_eq!(ctx.page_count(), 2);
        let doc = ctx.finish();
        assert!(doc.is_empty());
        assert_eq!(doc.metadata.pages_skipped, 2);
    }
}
