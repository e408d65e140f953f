//! Buffered query result model.

use crate::error::{DbError, DbResult};
use unicode_width::UnicodeWidthStr;

/// A fully materialized result set with per-column display widths.
///
/// Every row has exactly one cell per column, and each width is at least the
/// display width of the column name and of every cell in that column.
/// Widths are measured in terminal columns, not bytes; the two agree for ASCII.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    widths: Vec<usize>,
}

impl ResultTable {
    /// Create an empty table with the given column names.
    pub fn new(columns: Vec<String>) -> Self {
        let widths = columns.iter().map(|c| c.width()).collect();
        Self {
            columns,
            rows: Vec::new(),
            widths,
        }
    }

    /// Append a row, widening columns as needed.
    ///
    /// Fails if the row does not have one cell per column.
    pub fn push_row(&mut self, cells: Vec<String>) -> DbResult<()> {
        if cells.len() != self.columns.len() {
            return Err(DbError::execution(format!(
                "row has {} values but the result has {} columns",
                cells.len(),
                self.columns.len()
            )));
        }

        for (width, cell) in self.widths.iter_mut().zip(&cells) {
            *width = (*width).max(cell.width());
        }
        self.rows.push(cells);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// True when no rows were produced.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
