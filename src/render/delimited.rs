//! CSV rendering for tables.

use csv::{Terminator, WriterBuilder};

use super::records;
use crate::error::{Error, Result};
use crate::model::StructuredTable;

/// Render a table as CSV: a header line, then one line per record.
///
/// Fields are quoted only when they contain a delimiter, quote, or line break.
/// Missing cells are written as empty fields.
pub fn to_delimited(table: &StructuredTable) -> Result<String> {
    if table.headers.is_empty() {
        return Ok(String::new());
    }

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(&table.headers)?;
    for record in records(table) {
        writer.write_record(record.iter().map(|cell| cell.unwrap_or("")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Render(format!("CSV flush error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::Render(format!("CSV encoding error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_delimited() {
        let table = StructuredTable::from_parts(
            ["HeaderA", "HeaderB"],
            vec![vec!["A1", "B1"], vec!["A2", "B2"], vec![]],
        );
        assert_eq!(
            to_delimited(&table).unwrap(),
            "HeaderA,HeaderB\nA1,B1\nA2,B2\n"
        );
    }

    #[test]
    fn test_to_delimited_quotes_when_needed() {
        let table = StructuredTable::from_parts(
            ["Name", "Note"],
            vec![vec!["Smith, J.", "said \"hi\""], vec!["Lee", "two\nlines"]],
        );
        assert_eq!(
            to_delimited(&table).unwrap(),
            "Name,Note\n\"Smith, J.\",\"said \"\"hi\"\"\"\nLee,\"two\nlines\"\n"
        );
    }

    #[test]
    fn test_to_delimited_headers_only() {
        let table = StructuredTable::from_parts(["H1", "H2"], vec![Vec::<&str>::new()]);
        assert_eq!(to_delimited(&table).unwrap(), "H1,H2\n");
    }

    #[test]
    fn test_to_delimited_short_row() {
        let table = StructuredTable::from_parts(["H1", "H2", "H3"], vec![vec!["x"]]);
        assert_eq!(to_delimited(&table).unwrap(), "H1,H2,H3\nx,,\n");
    }

    #[test]
    fn test_to_delimited_without_headers() {
        let table = StructuredTable::from_parts(Vec::<&str>::new(), vec![vec!["orphan"]]);
        assert_eq!(to_delimited(&table).unwrap(), "");
    }
}
