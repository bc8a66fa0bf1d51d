//! Table detection over clustered rows.
//!
//! A table is a maximal run of consecutive multi-cell rows. The left edges of
//! every cell in the run are collapsed into a column set, then each cell is
//! snapped to its nearest column. Runs that resolve to fewer than two columns
//! are left alone and end up as ordinary paragraphs.

use std::ops::Range;

use crate::model::{Table, TableRow};

use super::options::LayoutOptions;
use super::rows::Row;

/// Sorted column boundaries, each more than the gap tolerance from its neighbour.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSet {
    positions: Vec<f32>,
}

impl ColumnSet {
    /// Collapse x positions into column boundaries.
    ///
    /// Positions are sorted; a position within `gap_tolerance` of the last
    /// retained boundary merges into it.
    pub fn from_positions(positions: impl IntoIterator<Item = f32>, gap_tolerance: f32) -> Self {
        let mut sorted: Vec<f32> = positions.into_iter().collect();
        sorted.sort_by(f32::total_cmp);

        let mut columns: Vec<f32> = Vec::new();
        for x in sorted {
            match columns.last() {
                Some(last) if (x - last).abs() <= gap_tolerance => {}
                _ => columns.push(x),
            }
        }
        Self { positions: columns }
    }

    /// Index of the boundary nearest to `x`; ties go to the lower index.
    pub fn nearest(&self, x: f32) -> usize {
        let mut best = 0;
        let mut best_distance = f32::INFINITY;
        for (i, col) in self.positions.iter().enumerate() {
            let distance = (x - col).abs();
            if distance < best_distance {
                best = i;
                best_distance = distance;
            }
        }
        best
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }
}

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Positions closer than this collapse into one column
    pub x_gap_tolerance: f32,
    /// Rows whose largest font exceeds this are flagged as header rows
    pub header_font_size: f32,
    /// Fewer resolved columns than this and the run stays paragraphs
    pub min_columns: usize,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self::from(&LayoutOptions::default())
    }
}

impl From<&LayoutOptions> for TableDetectorConfig {
    fn from(options: &LayoutOptions) -> Self {
        Self {
            x_gap_tolerance: options.x_gap_tolerance,
            header_font_size: options.table_header_font_size,
            min_columns: 2,
        }
    }
}

/// A table found on a page.
#[derive(Debug, Clone)]
pub struct DetectedTable {
    /// Indices of the rows the table was built from
    pub rows: Range<usize>,
    /// Topmost edge of any cell in the table
    pub top: f32,
    /// Leftmost edge of any cell in the table
    pub left: f32,
    /// The resolved matrix
    pub table: Table,
}

/// Detects tables in a page's rows.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Maximal runs of consecutive multi-cell rows.
    pub fn find_runs(rows: &[Row]) -> Vec<Range<usize>> {
        let mut runs = Vec::new();
        let mut i = 0;
        while i < rows.len() {
            if !rows[i].is_multi_cell() {
                i += 1;
                continue;
            }
            let start = i;
            while i < rows.len() && rows[i].is_multi_cell() {
                i += 1;
            }
            runs.push(start..i);
        }
        runs
    }

    /// Resolve a run of rows into a table, or `None` if too few columns resolve.
    pub fn resolve(&self, rows: &[Row]) -> Option<Table> {
        let columns = ColumnSet::from_positions(
            rows.iter().flat_map(|r| r.cells.iter().map(|c| c.bbox.x0)),
            self.config.x_gap_tolerance,
        );

        if columns.len() < self.config.min_columns {
            log::debug!(
                "TableDetector: run of {} rows resolved to {} column(s), keeping as text",
                rows.len(),
                columns.len()
            );
            return None;
        }

        let mut table = Table::new(columns.positions().to_vec());
        for (idx, row) in rows.iter().enumerate() {
            let mut cells = vec![String::new(); columns.len()];
            for cell in &row.cells {
                let text = cell.flat_text();
                let slot = &mut cells[columns.nearest(cell.bbox.x0)];
                if slot.is_empty() {
                    *slot = text;
                } else {
                    slot.push(' ');
                    slot.push_str(&text);
                }
            }

            let emphasized = idx == 0 || row.max_font_size() > self.config.header_font_size;
            table.add_row(if emphasized {
                TableRow::header(cells)
            } else {
                TableRow::new(cells)
            });
        }

        Some(table)
    }

    /// Detect every table on a page.
    ///
    /// Rows outside the returned ranges are body text.
    pub fn detect(&self, rows: &[Row]) -> Vec<DetectedTable> {
        let tables: Vec<DetectedTable> = Self::find_runs(rows)
            .into_iter()
            .filter_map(|range| {
                let run = &rows[range.clone()];
                self.resolve(run).map(|table| DetectedTable {
                    top: run.iter().map(Row::top).fold(f32::INFINITY, f32::min),
                    left: run.iter().map(Row::left).fold(f32::INFINITY, f32::min),
                    rows: range,
                    table,
                })
            })
            .collect();

        log::debug!("TableDetector: found {} tables", tables.len());
        tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::rows::RowClusterer;
    use crate::model::{BBox, Block};

    fn cell(x0: f32, y0: f32, text: &str) -> Block {
        Block::text(BBox::new(x0, y0, x0 + 40.0, y0 + 10.0), text, 9.0)
    }

    fn rows(blocks: Vec<Block>) -> Vec<Row> {
        RowClusterer::new(3.0).cluster(blocks)
    }

    #[test]
    fn test_column_set_collapse() {
        let cols = ColumnSet::from_positions([200.0, 10.0, 14.0, 205.0, 17.0, 100.0], 8.0);
        assert_eq!(cols.positions(), &[10.0, 100.0, 200.0]);
    }

    #[test]
    fn test_column_set_strictly_separated() {
        let cols = ColumnSet::from_positions([0.0, 8.0, 8.5, 17.0], 8.0);
        assert_eq!(cols.positions(), &[0.0, 17.0]);
        for pair in cols.positions().windows(2) {
            assert!(pair[1] - pair[0] > 8.0);
        }
    }

    #[test]
    fn test_nearest_ties_to_lower_index() {
        let cols = ColumnSet::from_positions([10.0, 30.0], 8.0);
        assert_eq!(cols.nearest(20.0), 0);
        assert_eq!(cols.nearest(21.0), 1);
        assert_eq!(cols.nearest(-50.0), 0);
    }

    #[test]
    fn test_two_by_two_table() {
        let rows = rows(vec![
            cell(10.0, 100.0, "Modèle"),
            cell(200.0, 100.0, "Portée"),
            cell(11.0, 120.0, "107253"),
            cell(201.0, 120.0, "100 m"),
        ]);
        let tables = TableDetector::new().detect(&rows);
        assert_eq!(tables.len(), 1);
        let table = &tables[0].table;
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.header_row_index, 0);
        assert_eq!(table.rows[0].cells, vec!["Modèle", "Portée"]);
        assert_eq!(table.rows[1].cells, vec!["107253", "100 m"]);
        assert!(table.rows[0].is_header);
        assert!(!table.rows[1].is_header);
        assert_eq!(tables[0].rows, 0..2);
        assert_eq!(tables[0].top, 100.0);
    }

    #[test]
    fn test_maximal_run_between_single_rows() {
        let rows = rows(vec![
            cell(10.0, 10.0, "Intro"),
            cell(10.0, 30.0, "a1"),
            cell(200.0, 30.0, "b1"),
            cell(10.0, 50.0, "a2"),
            cell(200.0, 50.0, "b2"),
            cell(10.0, 70.0, "a3"),
            cell(200.0, 70.0, "b3"),
            cell(10.0, 90.0, "Outro"),
        ]);
        assert_eq!(TableDetector::find_runs(&rows), vec![1..4]);
        let tables = TableDetector::new().detect(&rows);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].table.row_count(), 3);
    }

    #[test]
    fn test_cells_sharing_column_are_joined() {
        let rows = rows(vec![
            cell(10.0, 10.0, "Alimentation"),
            cell(14.0, 11.0, "secteur"),
            cell(200.0, 10.0, "230 V"),
        ]);
        let table = TableDetector::new().resolve(&rows).unwrap();
        assert_eq!(table.rows[0].cells, vec!["Alimentation secteur", "230 V"]);
    }

    #[test]
    fn test_single_column_run_falls_back() {
        let rows = rows(vec![cell(10.0, 10.0, "haut"), cell(12.0, 11.0, "bas")]);
        assert!(rows[0].is_multi_cell());
        assert!(TableDetector::new().resolve(&rows).is_none());
        assert!(TableDetector::new().detect(&rows).is_empty());
    }

    #[test]
    fn test_single_row_table() {
        let rows = rows(vec![cell(10.0, 10.0, "Poids"), cell(200.0, 10.0, "1,2 kg")]);
        let tables = TableDetector::new().detect(&rows);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].table.row_count(), 1);
    }

    #[test]
    fn test_large_font_row_flagged_header() {
        let mut blocks = vec![
            cell(10.0, 10.0, "a"),
            cell(200.0, 10.0, "b"),
            cell(10.0, 30.0, "c"),
            cell(200.0, 30.0, "d"),
        ];
        blocks[2].max_font_size = 11.0;
        let table = TableDetector::new().resolve(&rows(blocks)).unwrap();
        assert!(table.rows[1].is_header);
        assert_eq!(table.header_row_index, 0);
    }
}
