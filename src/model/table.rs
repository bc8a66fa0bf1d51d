//! Table types.

use serde::{Deserialize, Serialize};

/// A table resolved from a run of multi-cell rows.
///
/// Serializes as `{rows: [[string]], headerRowIndex, emphasizedRows}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TableRepr", into = "TableRepr")]
pub struct Table {
    /// Rows in the table, top to bottom
    pub rows: Vec<TableRow>,

    /// Index of the header row
    pub header_row_index: usize,

    /// Left edge of each resolved column in points
    pub columns: Vec<f32>,
}

/// Serialized table shape: plain string rows plus the emphasized row indices.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TableRepr {
    rows: Vec<Vec<String>>,
    #[serde(default)]
    header_row_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    emphasized_rows: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    columns: Vec<f32>,
}

impl From<Table> for TableRepr {
    fn from(table: Table) -> Self {
        let emphasized_rows = table
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.is_header)
            .map(|(i, _)| i)
            .collect();
        Self {
            rows: table.rows.into_iter().map(|row| row.cells).collect(),
            header_row_index: table.header_row_index,
            emphasized_rows: Some(emphasized_rows),
            columns: table.columns,
        }
    }
}

impl From<TableRepr> for Table {
    fn from(repr: TableRepr) -> Self {
        // Without explicit emphasis only the header row is emphasized.
        let emphasized = repr
            .emphasized_rows
            .unwrap_or_else(|| vec![repr.header_row_index]);
        let rows = repr
            .rows
            .into_iter()
            .enumerate()
            .map(|(i, cells)| TableRow {
                cells,
                is_header: emphasized.contains(&i),
            })
            .collect();
        Self {
            rows,
            header_row_index: repr.header_row_index,
            columns: repr.columns,
        }
    }
}

impl Table {
    /// Create an empty table over the given column positions.
    pub fn new(columns: Vec<f32>) -> Self {
        Self {
            rows: Vec::new(),
            header_row_index: 0,
            columns,
        }
    }

    /// Create a table from string rows; the first row is the header.
    pub fn from_rows<S: Into<String>>(rows: impl IntoIterator<Item = Vec<S>>) -> Self {
        let mut table = Self::new(Vec::new());
        for (i, cells) in rows.into_iter().enumerate() {
            let cells = cells.into_iter().map(Into::into).collect();
            table.add_row(if i == 0 {
                TableRow::header(cells)
            } else {
                TableRow::new(cells)
            });
        }
        table
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (widest row).
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the header row.
    pub fn header(&self) -> Option<&TableRow> {
        self.rows.get(self.header_row_index)
    }

    /// Get the rows after the header.
    pub fn body(&self) -> &[TableRow] {
        self.rows
            .get(self.header_row_index + 1..)
            .unwrap_or_default()
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table row; one string per resolved column, empty where no cell landed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    /// Cell texts
    pub cells: Vec<String>,

    /// Whether this row is emphasized as a header
    pub is_header: bool,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<String>) -> Self {
        Self {
            cells,
            is_header: false,
        }
    }

    /// Create a header row.
    pub fn header(cells: Vec<String>) -> Self {
        Self {
            cells,
            is_header: true,
        }
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        self.cells.join("\t")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_new() {
        let table = Table::new(vec![]);
        assert!(table.is_empty());
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
        assert!(table.header().is_none());
        assert!(table.body().is_empty());
    }

    #[test]
    fn test_table_with_data() {
        let table = Table::from_rows(vec![
            vec!["Référence", "Tension"],
            vec!["107253", "230 V"],
            vec!["107254", "12 V"],
        ]);

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.header().map(|r| r.is_header), Some(true));
        assert_eq!(table.body().len(), 2);
        assert_eq!(table.plain_text(), "Référence\tTension\n107253\t230 V\n107254\t12 V");
    }

    #[test]
    fn test_table_serializes_string_rows() {
        let mut table = Table::from_rows(vec![vec!["Réf", "Qté"], vec!["Vis", "4"]]);
        table.add_row(TableRow::header(vec!["Total".to_string(), "4".to_string()]));

        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(
            value["rows"],
            serde_json::json!([["Réf", "Qté"], ["Vis", "4"], ["Total", "4"]])
        );
        assert_eq!(value["headerRowIndex"], 0);
        assert_eq!(value["emphasizedRows"], serde_json::json!([0, 2]));
        assert!(value.get("columns").is_none());

        let back: Table = serde_json::from_value(value).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_table_without_emphasis_marks_header_row() {
        let table: Table = serde_json::from_str(
            r#"{"rows": [["A", "B"], ["1", "2"]], "headerRowIndex": 0}"#,
        )
        .unwrap();
        assert_eq!(table.header().map(|r| r.is_header), Some(true));
        assert!(!table.rows[1].is_header);
    }
}
