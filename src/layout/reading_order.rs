//! Reading-order assembly: merges a page's text rows, tables and images into
//! one top-to-bottom sequence.

use crate::model::{Block, BlockKind, ImageRef, Table};

use super::rows::Row;
use super::table_detector::DetectedTable;

/// A text row reduced to what section building needs.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Row text, left to right
    pub text: String,
    /// Largest font size in the row
    pub max_font_size: f32,
}

/// One item of a page in reading order.
#[derive(Debug, Clone, PartialEq)]
pub enum PageItem {
    /// A row of body text or a title candidate
    Text(TextLine),
    /// A detected table
    Table(Table),
    /// An image sized relative to the page
    Image(ImageRef),
}

/// Merge rows, tables and images top to bottom, then left to right.
///
/// Rows covered by a detected table are replaced by that table. Items sharing
/// both top and left edge keep their relative order: text and tables in row
/// order, then images in source order.
pub fn assemble(
    rows: Vec<Row>,
    tables: Vec<DetectedTable>,
    images: Vec<Block>,
    page_width: f32,
    page_height: f32,
) -> Vec<PageItem> {
    let mut owner: Vec<Option<usize>> = vec![None; rows.len()];
    for (ti, t) in tables.iter().enumerate() {
        for idx in t.rows.clone() {
            if let Some(slot) = owner.get_mut(idx) {
                *slot = Some(ti);
            }
        }
    }
    let mut tables: Vec<Option<DetectedTable>> = tables.into_iter().map(Some).collect();

    let mut placed: Vec<(f32, f32, PageItem)> = Vec::with_capacity(rows.len() + images.len());
    for (idx, row) in rows.into_iter().enumerate() {
        match owner[idx] {
            // a table is emitted once, at its first row
            Some(ti) => {
                if let Some(t) = tables[ti].take() {
                    placed.push((t.top, t.left, PageItem::Table(t.table)));
                }
            }
            None => placed.push((
                row.top(),
                row.left(),
                PageItem::Text(TextLine {
                    text: row.text(),
                    max_font_size: row.max_font_size(),
                }),
            )),
        }
    }

    for image in images {
        if let BlockKind::Image(image_ref) = image.kind {
            let bbox = image.bbox;
            placed.push((
                bbox.y0,
                bbox.x0,
                PageItem::Image(ImageRef::new(
                    image_ref,
                    bbox.width() / page_width * 100.0,
                    bbox.height() / page_height * 100.0,
                )),
            ));
        }
    }

    placed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
    placed.into_iter().map(|(_, _, item)| item).collect()
}
