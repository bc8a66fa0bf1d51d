//! Page-layout reconstruction pipeline.
//!
//! Stages, per page: footer filter, TOC classifier, header deduplicator,
//! row clusterer, table detector, reading-order assembler. The section
//! builder and finalizer then work across the whole document.

mod engine;
mod filters;
mod finalizer;
mod options;
mod reading_order;
mod rows;
mod section_builder;
mod table_detector;

pub use engine::{DocumentContext, LayoutEngine};
pub use filters::{
    alnum_count, fold_accents, in_header_band, is_all_uppercase, is_footer,
    normalize_header_key, normalize_title, HeaderDeduplicator, TocClassifier,
};
pub use finalizer::finalize_sections;
pub use options::{ErrorMode, LayoutOptions};
pub use reading_order::{assemble, PageItem, TextLine};
pub use rows::{Row, RowClusterer};
pub use section_builder::SectionBuilder;
pub use table_detector::{ColumnSet, DetectedTable, TableDetector, TableDetectorConfig};
