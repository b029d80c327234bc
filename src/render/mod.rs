//! Table rendering: CSV, JSON records, and fixed-width grids.
//!
//! Every format works from the same record view of a table: the trailing
//! empty row is dropped, then each row is lined up positionally against the
//! headers. CSV writes those records as they are; JSON and grids key them by
//! header, so a repeated header becomes one column. Rendered blocks are
//! wrapped in a leading and trailing newline so they stand apart from the
//! surrounding paragraphs.

mod delimited;
mod grid;
mod json;
mod options;

pub use delimited::to_delimited;
pub use grid::to_grid;
pub use json::{to_json, to_records_json, JsonFormat};
pub use options::TableFormat;

use crate::error::Result;
use crate::model::StructuredTable;

/// Render a table as a standalone output block.
///
/// Formatting never mutates the table, so repeated calls return identical text.
pub fn format_table(table: &StructuredTable, format: TableFormat) -> Result<String> {
    let body = match format {
        TableFormat::Delimited => to_delimited(table)?,
        TableFormat::StructuredRecord => to_records_json(table)?,
        TableFormat::Grid => to_grid(table),
    };

    Ok(format!("\n{}\n", body))
}

/// One cell per header; `None` where the row ran out of cells.
type Record<'a> = Vec<Option<&'a str>>;

fn records(table: &StructuredTable) -> Vec<Record<'_>> {
    let columns = table.column_count();

    table
        .body_rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            if row.len() > columns {
                log::warn!(
                    "Row {} has {} cells but the table has {} headers; extra cells dropped",
                    i + 1,
                    row.len(),
                    columns
                );
            }
            (0..columns).map(|c| row.get(c).map(String::as_str)).collect()
        })
        .collect()
}

/// Records keyed by header, as JSON objects and grids see them.
///
/// A repeated header keeps its first position and takes the value of its
/// last occurrence, even when that value is absent.
struct KeyedRecords<'a> {
    headers: Vec<&'a str>,
    records: Vec<Record<'a>>,
}

fn keyed_records(table: &StructuredTable) -> KeyedRecords<'_> {
    let mut headers: Vec<&str> = Vec::with_capacity(table.headers.len());
    let slots: Vec<usize> = table
        .headers
        .iter()
        .map(|header| match headers.iter().position(|h| *h == header.as_str()) {
            Some(slot) => slot,
            None => {
                headers.push(header.as_str());
                headers.len() - 1
            }
        })
        .collect();

    if headers.len() < slots.len() {
        log::debug!(
            "Collapsed {} repeated header(s) into {} key(s)",
            slots.len() - headers.len(),
            headers.len()
        );
    }

    let records = records(table)
        .into_iter()
        .map(|record| {
            let mut keyed = vec![None; headers.len()];
            for (cell, &slot) in record.into_iter().zip(&slots) {
                keyed[slot] = cell;
            }
            keyed
        })
        .collect();

    KeyedRecords { headers, records }
}
