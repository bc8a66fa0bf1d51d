//! Document model types for layout reconstruction.
//!
//! The input side ([`Page`], [`TextBlock`], [`ImageBlock`]) is what a
//! document-reading component hands over per page. The output side
//! ([`Document`], [`Section`], [`ContentItem`], [`Table`]) is what the
//! publishing layer consumes.

mod document;
mod geometry;
mod page;
mod section;
mod table;

pub use document::{Document, Metadata};
pub use geometry::BBox;
pub use page::{Block, BlockKind, ImageBlock, Page, TextBlock};
pub use section::{ContentItem, ImageRef, Section};
pub use table::{Table, TableRow};
