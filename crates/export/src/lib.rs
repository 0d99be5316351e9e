//! Converts a CSV export of the article table into `INSERT` statements.
//!
//! Every value has `'` and `"` backslash-escaped. Values of textual columns
//! are single-quoted, numeric columns are emitted bare and empty cells become
//! `NULL`. Zero-width spaces (U+200B) are stripped from the statement text.

use std::io::{Read, Write};

use common::{PipelineError, PipelineResult};
use csv::StringRecord;
use tracing::debug;

pub const DEFAULT_TABLE: &str = "NAP.article";

const ZERO_WIDTH_SPACE: char = '\u{200B}';

fn csv_err(e: csv::Error) -> PipelineError {
    PipelineError::Export(e.to_string())
}

fn escape(value: &str) -> String {
    value.replace('\'', "\\'").replace('"', "\\\"")
}

fn is_numeric(value: &str) -> bool {
    value.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}

/// A column is numeric when every non-empty cell in it parses as a number.
fn numeric_columns(width: usize, rows: &[StringRecord]) -> Vec<bool> {
    (0..width)
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .filter(|cell| !cell.is_empty())
                .all(is_numeric)
        })
        .collect()
}

fn render_value(cell: &str, numeric: bool) -> String {
    if cell.is_empty() {
        "NULL".to_string()
    } else if numeric {
        escape(cell)
    } else {
        format!("'{}'", escape(cell))
    }
}

pub fn insert_statement(table: &str, columns: &[&str], values: &[String]) -> String {
    let statement = format!(
        "INSERT INTO {} ({}) VALUES ({});",
        table,
        columns.join(", "),
        values.join(", ")
    );
    statement.replace(ZERO_WIDTH_SPACE, "")
}

/// Reads CSV with a header row from `input` and writes one statement per
/// line to `output`. Returns the number of statements written.
pub fn export_inserts<R: Read, W: Write>(
    input: R,
    mut output: W,
    table: &str,
) -> PipelineResult<usize> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader.headers().map_err(csv_err)?.clone();
    let rows = reader
        .records()
        .collect::<Result<Vec<StringRecord>, _>>()
        .map_err(csv_err)?;

    let columns: Vec<&str> = headers.iter().collect();
    let numeric = numeric_columns(columns.len(), &rows);
    debug!("Exporting {} rows of {} columns", rows.len(), columns.len());

    for row in &rows {
        let values: Vec<String> = (0..columns.len())
            .map(|col| render_value(row.get(col).unwrap_or(""), numeric[col]))
            .collect();
        writeln!(output, "{}", insert_statement(table, &columns, &values))?;
    }
    output.flush()?;

    Ok(rows.len())
}
