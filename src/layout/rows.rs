//! Row clustering: groups a page's text blocks by vertical center.

use std::cmp::Ordering;

use crate::model::Block;

/// Blocks of one page sharing an approximate vertical center.
#[derive(Debug, Clone)]
pub struct Row {
    /// Member blocks in the order they joined the row
    pub cells: Vec<Block>,
    /// Running average of the members' vertical centers
    pub y_center: f32,
}

impl Row {
    /// Start a row from a single block.
    pub fn new(block: Block) -> Self {
        Self {
            y_center: block.bbox.y_center(),
            cells: vec![block],
        }
    }

    /// Add a block and update the running center.
    pub fn push(&mut self, block: Block) {
        let count = self.cells.len() as f32;
        self.y_center = (self.y_center * count + block.bbox.y_center()) / (count + 1.0);
        self.cells.push(block);
    }

    /// Whether `y_center` is close enough to join this row.
    pub fn accepts(&self, y_center: f32, tolerance: f32) -> bool {
        (self.y_center - y_center).abs() <= tolerance
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether this row can take part in a table.
    pub fn is_multi_cell(&self) -> bool {
        self.cells.len() > 1
    }

    /// Topmost edge of any member.
    pub fn top(&self) -> f32 {
        self.cells
            .iter()
            .map(|c| c.bbox.y0)
            .fold(f32::INFINITY, f32::min)
    }

    /// Leftmost edge of any member.
    pub fn left(&self) -> f32 {
        self.cells
            .iter()
            .map(|c| c.bbox.x0)
            .fold(f32::INFINITY, f32::min)
    }

    /// Largest font size among the members.
    pub fn max_font_size(&self) -> f32 {
        self.cells
            .iter()
            .map(|c| c.max_font_size)
            .fold(0.0, f32::max)
    }

    /// Row text: members left to right, each flattened to one line, space-joined.
    pub fn text(&self) -> String {
        let mut cells: Vec<&Block> = self.cells.iter().collect();
        cells.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
        cells
            .iter()
            .map(|c| c.flat_text())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Greedy first-fit row clusterer.
///
/// Blocks are visited in `(y_center, x0)` order and attached to the first
/// existing row whose running center lies within the tolerance. The result is
/// deterministic for a given input, not globally optimal.
#[derive(Debug, Clone, Copy)]
pub struct RowClusterer {
    y_tolerance: f32,
}

impl RowClusterer {
    /// Create a clusterer with the given vertical tolerance.
    pub fn new(y_tolerance: f32) -> Self {
        Self { y_tolerance }
    }

    /// Group blocks into rows, in order of row creation.
    pub fn cluster(&self, mut blocks: Vec<Block>) -> Vec<Row> {
        blocks.sort_by(|a, b| {
            match a.bbox.y_center().total_cmp(&b.bbox.y_center()) {
                Ordering::Equal => a.bbox.x0.total_cmp(&b.bbox.x0),
                other => other,
            }
        });

        let mut rows: Vec<Row> = Vec::new();
        for block in blocks {
            let y = block.bbox.y_center();
            match rows.iter_mut().find(|r| r.accepts(y, self.y_tolerance)) {
                Some(row) => row.push(block),
                None => rows.push(Row::new(block)),
            }
        }

        log::debug!("RowClusterer: grouped into {} rows", rows.len());
        rows
    }
}
