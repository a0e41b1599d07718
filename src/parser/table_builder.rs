//! Table grid reconstruction.
//!
//! Section XML lists, per row, only the cells whose top-left corner lies in
//! that row. Cells owned by a span from an earlier row are not repeated, so
//! the real column of a cell is only known after replaying placement of all
//! the cells before it. The builder does this twice: once to discover the
//! grid width, once to write cells into a grid of that width.

use crate::model::{TableBlock, TableCell};

/// Upper bound on the discovered grid width.
pub(crate) const MAX_COLUMNS: usize = 1024;

/// A cell as collected from section XML, before placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawCell {
    pub text: String,
    pub col_span: u32,
    pub row_span: u32,
}

impl RawCell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            col_span: 1,
            row_span: 1,
        }
    }

    pub fn spans(mut self, col_span: u32, row_span: u32) -> Self {
        self.col_span = col_span;
        self.row_span = row_span;
        self
    }

    fn width(&self) -> usize {
        self.col_span.max(1) as usize
    }

    fn height(&self) -> usize {
        self.row_span.max(1) as usize
    }
}

/// Per-row occupancy bitmap, growing column-wise up to `limit`.
struct Occupancy {
    rows: Vec<Vec<bool>>,
    limit: usize,
}

impl Occupancy {
    fn new(rows: usize, limit: usize) -> Self {
        Self {
            rows: vec![Vec::new(); rows],
            limit,
        }
    }

    fn is_set(&self, row: usize, col: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// First free column at or after `col` in `row`.
    fn next_free(&self, row: usize, mut col: usize) -> usize {
        while col < self.limit && self.is_set(row, col) {
            col += 1;
        }
        col
    }

    /// Mark a footprint, clipped to the row count and the width limit.
    fn mark(&mut self, row: usize, col: usize, height: usize, width: usize) {
        let row_end = (row + height).min(self.rows.len());
        let col_end = (col + width).min(self.limit);
        for r in &mut self.rows[row.min(row_end)..row_end] {
            if r.len() < col_end {
                r.resize(col_end, false);
            }
            for slot in &mut r[col.min(col_end)..col_end] {
                *slot = true;
            }
        }
    }
}

/// Replay left-to-right placement, calling `place` for every cell that fits.
///
/// Returns the widest column cursor reached.
fn place_cells<F>(rows: &[Vec<RawCell>], limit: usize, mut place: F) -> usize
where
    F: FnMut(usize, usize, &RawCell),
{
    let mut occupancy = Occupancy::new(rows.len(), limit);
    let mut width = 0;

    for (r, row) in rows.iter().enumerate() {
        let mut cursor = 0;
        for cell in row {
            cursor = occupancy.next_free(r, cursor);
            if cursor >= limit {
                break;
            }
            occupancy.mark(r, cursor, cell.height(), cell.width());
            place(r, cursor, cell);
            cursor += cell.width();
            width = width.max(cursor);
        }
    }

    width.min(limit)
}

/// Build a dense grid from span-sparse rows.
///
/// Returns `None` when there are no rows or no columns.
pub(crate) fn build_table(rows: &[Vec<RawCell>]) -> Option<TableBlock> {
    if rows.is_empty() {
        return None;
    }

    let cols = place_cells(rows, MAX_COLUMNS, |_, _, _| {});
    if cols == 0 {
        return None;
    }

    let row_count = rows.len();
    let mut table = TableBlock::new(row_count, cols);
    place_cells(rows, cols, |r, c, cell| {
        // Stored spans never reach past the grid.
        let col_span = cell.width().min(cols - c);
        let row_span = cell.height().min(row_count - r);
        table.cells[r][c] = TableCell::text(cell.text.trim())
            .col_span(col_span as u32)
            .row_span(row_span as u32);
    });

    if table.rows > 1 {
        table.set_header_row();
    }

    Some(table)
}

/// Render a nested table as inline text for its hosting cell.
///
/// Blank cells are skipped, cell newlines become spaces, cells are joined
/// with " | " and rows with newlines.
pub(crate) fn flatten_nested(rows: &[Vec<RawCell>]) -> String {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|c| c.text.trim())
                .filter(|t| !t.is_empty())
                .map(|t| t.replace('\n', " "))
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<RawCell> {
        cells.iter().map(|t| RawCell::new(*t)).collect()
    }

    #[test]
    fn test_plain_grid() {
        let table = build_table(&[row(&["A1", "B1"]), row(&["A2", "B2"])]).unwrap();
        assert_eq!((table.rows, table.cols), (2, 2));
        assert!(table.has_header);
        assert_eq!(table.cells[0][0].text, "A1");
        assert_eq!(table.cells[1][1].text, "B2");
        assert!(table.cells.iter().flatten().all(|c| !c.covered));
    }

    #[test]
    fn test_ragged_rows_use_widest() {
        let table = build_table(&[row(&["A", "B", "C"]), row(&["D"])]).unwrap();
        assert_eq!(table.cols, 3);
        assert_eq!(table.cells[1][0].text, "D");
        assert!(table.cells[1][1].covered);
    }

    #[test]
    fn test_col_span_advances_cursor() {
        let rows = vec![
            vec![RawCell::new("Wide").spans(2, 1), RawCell::new("Next")],
            row(&["a", "b", "c"]),
        ];
        let table = build_table(&rows).unwrap();
        assert_eq!(table.cols, 3);
        assert_eq!(table.cells[0][0].col_span, 2);
        assert!(table.cells[0][1].covered);
        assert_eq!(table.cells[0][2].text, "Next");
    }

    #[test]
    fn test_row_span_occupies_next_row() {
        let rows = vec![
            vec![RawCell::new("Tall").spans(1, 2), RawCell::new("B1")],
            row(&["B2"]),
        ];
        let table = build_table(&rows).unwrap();
        assert_eq!(table.cols, 2);
        assert_eq!(table.cells[0][0].row_span, 2);
        assert!(table.cells[1][0].covered);
        assert_eq!(table.cells[1][1].text, "B2");
    }

    #[test]
    fn test_row_span_clipped_to_row_count() {
        let rows = vec![vec![RawCell::new("Only").spans(1, 5)]];
        let table = build_table(&rows).unwrap();
        assert_eq!((table.rows, table.cols), (1, 1));
        assert!(!table.has_header);
    }

    #[test]
    fn test_spans_clipped_to_grid() {
        let rows = vec![
            vec![RawCell::new("huge").spans(5000, 1)],
            vec![RawCell::new("tall").spans(1, 9)],
        ];
        let table = build_table(&rows).unwrap();
        assert_eq!(table.cols, MAX_COLUMNS);
        assert_eq!(table.cells[0][0].col_span as usize, MAX_COLUMNS);
        assert_eq!(table.cells[1][0].row_span, 1);
    }

    #[test]
    fn test_zero_span_treated_as_one() {
        let rows = vec![vec![RawCell::new("x").spans(0, 0), RawCell::new("y")]];
        let table = build_table(&rows).unwrap();
        assert_eq!(table.cols, 2);
        assert_eq!(table.cells[0][0].col_span, 1);
        assert_eq!(table.cells[0][1].text, "y");
    }

    #[test]
    fn test_empty_input() {
        assert!(build_table(&[]).is_none());
        assert!(build_table(&[Vec::new()]).is_none());
    }

    #[test]
    fn test_rebuild_from_rows_is_lossless() {
        let rows = vec![
            vec![RawCell::new(" Head ").spans(2, 1), RawCell::new("C")],
            vec![RawCell::new("Tall").spans(1, 2), RawCell::new("x"), RawCell::new("y")],
            row(&["p", "q"]),
        ];
        let table = build_table(&rows).unwrap();

        let flattened: Vec<Vec<RawCell>> = table
            .to_rows()
            .into_iter()
            .map(|r| {
                r.into_iter()
                    .map(|c| RawCell::new(c.text).spans(c.col_span, c.row_span))
                    .collect()
            })
            .collect();
        assert_eq!(flattened[0][0], RawCell::new("Head").spans(2, 1));
        assert_eq!(build_table(&flattened), Some(table));
    }

    #[test]
    fn test_flatten_nested() {
        let rows = vec![
            vec![RawCell::new("a"), RawCell::new(" "), RawCell::new("b\nc")],
            row(&["", ""]),
            row(&["d"]),
        ];
        assert_eq!(flatten_nested(&rows), "a | b c\nd");
    }
}
