//! Structured tables rebuilt from the cells the analysis service reports.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{CellKind, RawTable, SpanLocation};
use crate::error::{Error, Result};

/// Position of a table in the materialized table list.
///
/// Tables are identified by position, never by content: two tables with the
/// same cells are still two tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableId(pub usize);

impl TableId {
    /// Index into the table list.
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A table with ordered headers, ordered rows and a span index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredTable {
    /// Column headers in encounter order
    pub headers: Vec<String>,

    /// Body rows; row `i` holds the content cells of service row `i + 1`
    pub rows: Vec<Vec<String>>,

    /// Page number to the span offsets of the table's cells on that page
    pub page_spans: BTreeMap<u32, BTreeSet<usize>>,
}

impl StructuredTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from headers and rows.
    pub fn from_parts<H, R, C>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
            page_spans: BTreeMap::new(),
        }
    }

    /// Register a span offset on a page and return self.
    pub fn with_span(mut self, page: u32, offset: usize) -> Self {
        self.add_span(page, offset);
        self
    }

    /// Register a span offset on a page.
    pub fn add_span(&mut self, page: u32, offset: usize) {
        self.page_spans.entry(page).or_default().insert(offset);
    }

    /// Whether one of this table's cells starts at the given location.
    pub fn contains(&self, location: SpanLocation) -> bool {
        self.page_spans
            .get(&location.page)
            .is_some_and(|offsets| offsets.contains(&location.offset))
    }

    /// Iterate every registered (page, offset) pair in page order.
    pub fn spans(&self) -> impl Iterator<Item = SpanLocation> + '_ {
        self.page_spans
            .iter()
            .flat_map(|(&page, offsets)| offsets.iter().map(move |&o| SpanLocation::new(page, o)))
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Rows as they are rendered: a trailing empty row is dropped.
    ///
    /// Row slots are pre-sized to the service's row count, which includes the
    /// header row, so the last slot is usually empty. Only the last row is
    /// considered; sparse interior rows are kept.
    pub fn body_rows(&self) -> &[Vec<String>] {
        match self.rows.split_last() {
            Some((last, rest)) if last.is_empty() => rest,
            _ => &self.rows,
        }
    }
}

/// Rebuild a table from the service's cells.
///
/// Fails with [`Error::MalformedTable`] when the table has no bounding regions;
/// `index` is the table's position in the analysis result.
pub fn materialize(raw: &RawTable, index: usize) -> Result<StructuredTable> {
    if raw.bounding_regions.is_empty() {
        return Err(Error::MalformedTable { index });
    }

    let mut table = StructuredTable {
        headers: Vec::new(),
        rows: vec![Vec::new(); raw.row_count],
        page_spans: BTreeMap::new(),
    };

    for cell in &raw.cells {
        if let Some(location) = cell.location() {
            table.add_span(location.page, location.offset);
        }
    }

    for cell in &raw.cells {
        match cell.kind {
            CellKind::ColumnHeader => table.headers.push(cell.content.clone()),
            CellKind::Content => {
                // Row 0 wraps around to the last pre-sized row slot.
                let row = match cell.row_index {
                    0 => {
                        log::warn!(
                            "Table {}: content cell in header row 0, appending it to the last row",
                            index
                        );
                        raw.row_count.saturating_sub(1)
                    }
                    r => r - 1,
                };
                if row >= table.rows.len() {
                    log::warn!(
                        "Table {}: content cell row {} exceeds row count {}",
                        index,
                        cell.row_index,
                        raw.row_count
                    );
                    table.rows.resize(row + 1, Vec::new());
                }
                table.rows[row].push(cell.content.clone());
            }
            CellKind::Other => {}
        }
    }

    log::debug!(
        "Materialized table {}: {} headers, {} rows, spans on {} page(s)",
        index,
        table.headers.len(),
        table.rows.len(),
        table.page_spans.len()
    );

    Ok(table)
}

/// Materialize every table, failing on the first malformed one.
pub fn materialize_all(raw_tables: &[RawTable]) -> Result<Vec<StructuredTable>> {
    raw_tables
        .iter()
        .enumerate()
        .map(|(index, raw)| materialize(raw, index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TableCell;

    fn sample_raw() -> RawTable {
        RawTable::new(3, 1)
            .with_cell(TableCell::header("Column 1", 0).at(1, 1000))
            .with_cell(TableCell::header("Column 2", 1).at(1, 2000))
            .with_cell(TableCell::content("row1 col1", 1, 0).at(1, 3000))
            .with_cell(TableCell::content("row1 col2", 1, 1).at(1, 4000))
            .with_cell(TableCell::content("row2 col1", 2, 0).at(1, 5000))
            .with_cell(TableCell::content("row2 col2", 2, 1).at(1, 6000))
    }

    #[test]
    fn test_materialize() {
        let table = materialize(&sample_raw(), 0).unwrap();

        assert_eq!(table.headers, vec!["Column 1", "Column 2"]);
        assert_eq!(
            table.rows,
            vec![
                vec!["row1 col1".to_string(), "row1 col2".to_string()],
                vec!["row2 col1".to_string(), "row2 col2".to_string()],
                vec![],
            ]
        );
        let offsets: Vec<usize> = table.page_spans[&1].iter().copied().collect();
        assert_eq!(offsets, vec![1000, 2000, 3000, 4000, 5000, 6000]);
    }

    #[test]
    fn test_materialize_no_bounding_regions() {
        let mut raw = sample_raw();
        raw.bounding_regions.clear();

        let err = materialize(&raw, 4).unwrap_err();
        assert!(matches!(err, Error::MalformedTable { index: 4 }));
        assert!(err.to_string().contains("table has no bounding regions"));
    }

    #[test]
    fn test_materialize_keeps_cell_order_within_row() {
        // Column index is not used for ordering; iteration order is.
        let raw = RawTable::new(2, 1)
            .with_cell(TableCell::header("A", 0))
            .with_cell(TableCell::header("B", 1))
            .with_cell(TableCell::content("second", 1, 1))
            .with_cell(TableCell::content("first", 1, 0));

        let table = materialize(&raw, 0).unwrap();
        assert_eq!(table.rows[0], vec!["second", "first"]);
    }

    #[test]
    fn test_materialize_ignores_other_kinds() {
        let raw = RawTable::new(2, 1)
            .with_cell(TableCell::header("A", 0))
            .with_cell(TableCell::content("stub", 1, 0).with_kind(CellKind::Other))
            .with_cell(TableCell::content("value", 1, 1));

        let table = materialize(&raw, 0).unwrap();
        assert_eq!(table.headers, vec!["A"]);
        assert_eq!(table.rows[0], vec!["value"]);
    }

    #[test]
    fn test_materialize_spans_need_region_and_span() {
        let mut no_region = TableCell::content("x", 1, 0).at(2, 70);
        no_region.bounding_regions.clear();
        let raw = RawTable::new(2, 1)
            .with_cell(TableCell::content("y", 1, 1).at(2, 80))
            .with_cell(no_region)
            .with_cell(TableCell::content("z", 1, 2));

        let table = materialize(&raw, 0).unwrap();
        assert_eq!(table.page_spans.len(), 1);
        assert!(table.contains(SpanLocation::new(2, 80)));
        assert!(!table.contains(SpanLocation::new(2, 70)));
    }

    #[test]
    fn test_materialize_header_row_content_goes_to_last_row() {
        // Headerless tables report their first row as content cells at row 0.
        let raw = RawTable::new(3, 1)
            .with_cell(TableCell::content("a", 0, 0))
            .with_cell(TableCell::content("b", 0, 1))
            .with_cell(TableCell::content("c", 1, 0))
            .with_cell(TableCell::content("d", 1, 1));

        let table = materialize(&raw, 0).unwrap();
        assert_eq!(
            table.rows,
            vec![
                vec!["c".to_string(), "d".to_string()],
                vec![],
                vec!["a".to_string(), "b".to_string()],
            ]
        );
        assert_eq!(table.body_rows().len(), 3);
    }

    #[test]
    fn test_materialize_header_row_content_without_rows() {
        let raw = RawTable::new(0, 1).with_cell(TableCell::content("only", 0, 0));

        let table = materialize(&raw, 0).unwrap();
        assert_eq!(table.rows, vec![vec!["only".to_string()]]);
    }

    #[test]
    fn test_materialize_out_of_range_rows() {
        let raw = RawTable::new(1, 1)
            .with_cell(TableCell::content("zero", 0, 0))
            .with_cell(TableCell::content("far", 3, 0));

        let table = materialize(&raw, 0).unwrap();
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0], vec!["zero"]);
        assert_eq!(table.rows[2], vec!["far"]);
    }

    #[test]
    fn test_materialize_all_stops_at_malformed() {
        let mut bad = sample_raw();
        bad.bounding_regions.clear();
        let tables = vec![sample_raw(), bad, sample_raw()];

        let err = materialize_all(&tables).unwrap_err();
        assert!(matches!(err, Error::MalformedTable { index: 1 }));
    }

    #[test]
    fn test_body_rows_drops_only_trailing_empty_row() {
        let table = StructuredTable::from_parts(
            ["H1", "H2"],
            vec![vec!["A1", "B1"], vec![], vec!["A3", "B3"], vec![]],
        );
        assert_eq!(table.body_rows().len(), 3);
        assert!(table.body_rows()[1].is_empty());

        let full = StructuredTable::from_parts(["H1"], vec![vec!["A1"]]);
        assert_eq!(full.body_rows().len(), 1);

        assert!(StructuredTable::new().body_rows().is_empty());
    }

    #[test]
    fn test_identical_tables_are_distinct() {
        let a = StructuredTable::from_parts(["H"], vec![vec!["v"]]).with_span(1, 0);
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(TableId(0), TableId(1));
    }
}
