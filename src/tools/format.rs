//! Plain-text table rendering for query results.

use crate::models::ResultTable;
use unicode_width::UnicodeWidthStr;

/// Text returned when a statement produces no rows.
pub const NO_ROWS_MESSAGE: &str = "Query executed successfully. No rows returned.";

/// Spaces between adjacent columns.
const COLUMN_GAP: usize = 2;

/// Render a result table as aligned plain text.
///
/// The header and every row pad each cell, the last one included, to the
/// column width plus two spaces. The separator line is a run of dashes per
/// column joined by two spaces with no trailing whitespace. Every line ends
/// with a newline.
pub fn format_as_text(table: &ResultTable) -> String {
    if table.is_empty() {
        return NO_ROWS_MESSAGE.to_string();
    }

    let widths = table.widths();
    let mut output = String::new();

    push_padded_line(&mut output, table.columns(), widths);

    let separator = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join(&" ".repeat(COLUMN_GAP));
    output.push_str(&separator);
    output.push('\n');

    for row in table.rows() {
        push_padded_line(&mut output, row, widths);
    }

    output
}

fn push_padded_line(output: &mut String, cells: &[String], widths: &[usize]) {
    for (cell, width) in cells.iter().zip(widths) {
        output.push_str(cell);
        let pad = width.saturating_sub(cell.width()) + COLUMN_GAP;
        output.extend(std::iter::repeat_n(' ', pad));
    }
    output.push('\n');
}
