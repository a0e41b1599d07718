//! Table types.

use serde::{Deserialize, Serialize};

/// A table normalized to a dense `rows × cols` grid.
///
/// Each position holds exactly one [`TableCell`]. A cell whose span covers
/// several positions is stored once, at its top-left corner; the other
/// positions it covers hold placeholder cells with `covered` set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableBlock {
    /// Number of rows
    pub rows: usize,

    /// Number of columns
    pub cols: usize,

    /// Cell grid, indexed `[row][col]`
    pub cells: Vec<Vec<TableCell>>,

    /// Whether the first row is a header row
    pub has_header: bool,
}

impl TableBlock {
    /// Create a table whose positions are all placeholders.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![vec![TableCell::placeholder(); cols]; rows],
            has_header: false,
        }
    }

    /// Mark the first row as a header row.
    pub fn set_header_row(&mut self) {
        self.has_header = true;
    }

    /// Get a cell by position.
    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    /// Check if the table has no positions.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Get the header row, if any.
    pub fn header(&self) -> Option<&[TableCell]> {
        if self.has_header {
            self.cells.first().map(|r| r.as_slice())
        } else {
            None
        }
    }

    /// Get body rows (non-header).
    pub fn body(&self) -> &[Vec<TableCell>] {
        if self.has_header && !self.cells.is_empty() {
            &self.cells[1..]
        } else {
            &self.cells
        }
    }

    /// Check if the table has merged cells.
    pub fn has_merged_cells(&self) -> bool {
        self.cells
            .iter()
            .flatten()
            .any(|c| !c.covered && c.is_merged())
    }

    /// Re-flatten the grid into per-row owner cells.
    ///
    /// Covered positions are omitted, so the result has the same shape as
    /// the sparse row input the grid was built from.
    pub fn to_rows(&self) -> Vec<Vec<TableCell>> {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|c| !c.covered).cloned().collect())
            .collect()
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .filter(|c| !c.covered)
                    .map(|c| c.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell text, trimmed
    pub text: String,

    /// Number of columns this cell spans
    pub col_span: u32,

    /// Number of rows this cell spans
    pub row_span: u32,

    /// Position is covered by another cell's span or was never filled
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub covered: bool,
}

impl TableCell {
    /// Create a new cell with text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            col_span: 1,
            row_span: 1,
            covered: false,
        }
    }

    /// Create a placeholder for a position no cell owns.
    pub fn placeholder() -> Self {
        Self {
            covered: true,
            ..Self::text("")
        }
    }

    /// Set col_span and return self.
    pub fn col_span(mut self, span: u32) -> Self {
        self.col_span = span;
        self
    }

    /// Set row_span and return self.
    pub fn row_span(mut self, span: u32) -> Self {
        self.row_span = span;
        self
    }

    /// Check if the cell has no text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Check if this cell spans multiple rows or columns.
    pub fn is_merged(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }
}
