//! Text rendering of tabular results.
//!
//! Output is a header line of comma-joined column names followed by one
//! comma-joined line per row, separated by `\n` with no trailing newline.
//! Cells are written verbatim: commas and newlines inside a value are not
//! escaped, so values containing them make the output ambiguous.

use crate::models::TabularResult;

const FIELD_SEPARATOR: &str = ",";
const ROW_SEPARATOR: &str = "\n";

/// Render column names and rows as comma/newline separated text.
pub fn format_rows<S: AsRef<str>>(columns: &[S], rows: &[Vec<S>]) -> String {
    let mut output = join_fields(columns);
    for row in rows {
        output.push_str(ROW_SEPARATOR);
        output.push_str(&join_fields(row));
    }
    output
}

fn join_fields<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR)
}

impl TabularResult {
    /// Render this result with [`format_rows`].
    pub fn to_text(&self) -> String {
        format_rows(&self.columns, &self.rows)
    }
}
