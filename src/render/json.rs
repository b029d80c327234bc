//! JSON rendering.

use std::io;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::ser::Formatter;

use super::keyed_records;
use crate::error::{Error, Result};
use crate::model::StructuredTable;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize any value to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Render a table as a single-line JSON array of records.
///
/// Keys follow header order and missing cells are `null`. Items are separated
/// by `", "` and keys by `": "`. A table without headers renders as an empty
/// string.
pub fn to_records_json(table: &StructuredTable) -> Result<String> {
    if table.headers.is_empty() {
        return Ok(String::new());
    }

    let keyed = keyed_records(table);
    let rows: Vec<RecordMap<'_, '_>> = keyed
        .records
        .iter()
        .map(|cells| RecordMap {
            headers: &keyed.headers,
            cells,
        })
        .collect();

    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    rows.serialize(&mut ser)
        .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))?;

    String::from_utf8(buf).map_err(|e| Error::Render(format!("JSON encoding error: {}", e)))
}

/// One record as a header-ordered JSON object.
struct RecordMap<'h, 'a> {
    headers: &'h [&'a str],
    cells: &'h [Option<&'a str>],
}

impl Serialize for RecordMap<'_, '_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.headers.len()))?;
        for (key, value) in self.headers.iter().zip(self.cells) {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Compact layout with a space after each separator.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}
