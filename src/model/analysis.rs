//! Analysis-result types as reported by the document-analysis service.
//!
//! Field names follow the service's camelCase JSON; the SDK's snake_case
//! spelling is accepted as an alias so results dumped from either source load.
//! Anything the linearizer does not consume (polygons, styles, key-value
//! pairs) is ignored on input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Result of analyzing one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    /// Service API version that produced the result
    #[serde(default, alias = "api_version")]
    pub api_version: Option<String>,

    /// Analysis model identifier (e.g. "prebuilt-document")
    #[serde(default, alias = "model_id")]
    pub model_id: Option<String>,

    /// Full concatenated document text that spans index into
    #[serde(default)]
    pub content: String,

    /// Paragraphs in reading order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub paragraphs: Vec<Paragraph>,

    /// Tables in detection order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tables: Vec<RawTable>,
}

impl AnalyzeResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a result from JSON.
    ///
    /// Accepts either the bare result object or the long-running operation
    /// envelope (`{"status": ..., "analyzeResult": {...}}`).
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Load a result from a reader.
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        Self::from_value(serde_json::from_reader(reader)?)
    }

    fn from_value(value: serde_json::Value) -> Result<Self> {
        let is_envelope = value
            .as_object()
            .is_some_and(|o| o.contains_key("analyzeResult") || o.contains_key("analyze_result"));

        if is_envelope {
            let op: AnalyzeOperation = serde_json::from_value(value)?;
            log::debug!(
                "Loaded analyze operation (status: {}, created: {:?})",
                op.status,
                op.created_date_time
            );
            Ok(op.analyze_result)
        } else {
            Ok(serde_json::from_value(value)?)
        }
    }

    /// Add a paragraph.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    /// Add a table.
    pub fn add_table(&mut self, table: RawTable) {
        self.tables.push(table);
    }
}

/// Long-running operation envelope around an [`AnalyzeResult`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOperation {
    /// Operation status ("succeeded", "running", ...)
    pub status: String,

    /// When the operation was submitted
    #[serde(default, alias = "created_date_time")]
    pub created_date_time: Option<DateTime<Utc>>,

    /// When the operation last changed state
    #[serde(default, alias = "last_updated_date_time")]
    pub last_updated_date_time: Option<DateTime<Utc>>,

    /// The analysis payload
    #[serde(alias = "analyze_result")]
    pub analyze_result: AnalyzeResult,
}

/// A (page, offset) position inside the analyzed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpanLocation {
    /// Page number (1-indexed)
    pub page: u32,

    /// Offset of the first span into the document content
    pub offset: usize,
}

impl SpanLocation {
    /// Create a location.
    pub fn new(page: u32, offset: usize) -> Self {
        Self { page, offset }
    }
}

/// Page region a content element occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingRegion {
    /// Page number (1-indexed)
    #[serde(alias = "page_number")]
    pub page_number: u32,
}

impl BoundingRegion {
    /// Create a bounding region on the given page.
    pub fn page(page_number: u32) -> Self {
        Self { page_number }
    }
}

/// Contiguous range of the document content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Start offset into the document content
    pub offset: usize,

    /// Length of the span
    #[serde(default)]
    pub length: usize,
}

impl Span {
    /// Create a span.
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }
}

/// Semantic role the service assigns to a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParagraphRole {
    /// Document title
    Title,
    /// Section heading
    SectionHeading,
    /// Footnote text
    Footnote,
    /// Running page header
    PageHeader,
    /// Running page footer
    PageFooter,
    /// Page number marker
    PageNumber,
    /// Displayed formula
    FormulaBlock,
    /// Any role this crate does not know about
    #[serde(other)]
    Other,
}

impl ParagraphRole {
    /// Page furniture that never belongs in the linearized text.
    pub fn is_excluded(self) -> bool {
        matches!(self, ParagraphRole::PageNumber | ParagraphRole::PageFooter)
    }
}

/// A paragraph of text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    /// Paragraph text
    #[serde(default)]
    pub content: String,

    /// Semantic role (absent for body text)
    #[serde(default)]
    pub role: Option<ParagraphRole>,

    /// Page regions the paragraph occupies
    #[serde(default, alias = "bounding_regions", deserialize_with = "null_as_empty")]
    pub bounding_regions: Vec<BoundingRegion>,

    /// Content spans of the paragraph
    #[serde(default, deserialize_with = "null_as_empty")]
    pub spans: Vec<Span>,
}

impl Paragraph {
    /// Create a body-text paragraph at the given position.
    pub fn new(content: impl Into<String>, page: u32, offset: usize) -> Self {
        let content = content.into();
        let length = content.len();
        Self {
            content,
            role: None,
            bounding_regions: vec![BoundingRegion::page(page)],
            spans: vec![Span::new(offset, length)],
        }
    }

    /// Create a paragraph with no position information.
    pub fn unlocated(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Set the role and return self.
    pub fn with_role(mut self, role: ParagraphRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Page of the first bounding region and offset of the first span.
    ///
    /// `None` when either is missing; such paragraphs cannot be placed.
    pub fn location(&self) -> Option<SpanLocation> {
        first_location(&self.bounding_regions, &self.spans)
    }

    /// Whether the role marks this paragraph as page furniture.
    pub fn is_excluded(&self) -> bool {
        self.role.is_some_and(ParagraphRole::is_excluded)
    }
}

/// Kind of a table cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellKind {
    /// Column header cell
    ColumnHeader,
    /// Ordinary content cell (the service omits `kind` for these)
    #[default]
    Content,
    /// Row headers, stub heads, descriptions and anything else
    #[serde(other)]
    Other,
}

/// A table as reported by the analysis service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTable {
    /// Number of rows, header rows included
    #[serde(alias = "row_count")]
    pub row_count: usize,

    /// Number of columns
    #[serde(default, alias = "column_count")]
    pub column_count: usize,

    /// Cells in service order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cells: Vec<TableCell>,

    /// Page regions the table occupies
    #[serde(default, alias = "bounding_regions", deserialize_with = "null_as_empty")]
    pub bounding_regions: Vec<BoundingRegion>,

    /// Content spans of the table
    #[serde(default, deserialize_with = "null_as_empty")]
    pub spans: Vec<Span>,
}

impl RawTable {
    /// Create a table with the given row count on a page.
    pub fn new(row_count: usize, page: u32) -> Self {
        Self {
            row_count,
            bounding_regions: vec![BoundingRegion::page(page)],
            ..Self::default()
        }
    }

    /// Add a cell.
    pub fn add_cell(&mut self, cell: TableCell) {
        self.cells.push(cell);
    }

    /// Add a cell and return self.
    pub fn with_cell(mut self, cell: TableCell) -> Self {
        self.cells.push(cell);
        self
    }
}

/// A table cell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    /// Cell kind
    #[serde(default)]
    pub kind: CellKind,

    /// Row index (0 is the header row)
    #[serde(alias = "row_index")]
    pub row_index: usize,

    /// Column index
    #[serde(default, alias = "column_index")]
    pub column_index: usize,

    /// Cell text
    #[serde(default)]
    pub content: String,

    /// Page regions the cell occupies
    #[serde(default, alias = "bounding_regions", deserialize_with = "null_as_empty")]
    pub bounding_regions: Vec<BoundingRegion>,

    /// Content spans of the cell (empty cells have none)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub spans: Vec<Span>,
}

impl TableCell {
    /// Create a column header cell.
    pub fn header(content: impl Into<String>, column_index: usize) -> Self {
        Self {
            kind: CellKind::ColumnHeader,
            row_index: 0,
            column_index,
            content: content.into(),
            ..Self::default()
        }
    }

    /// Create a content cell.
    pub fn content(content: impl Into<String>, row_index: usize, column_index: usize) -> Self {
        Self {
            kind: CellKind::Content,
            row_index,
            column_index,
            content: content.into(),
            ..Self::default()
        }
    }

    /// Anchor the cell at a page and span offset and return self.
    pub fn at(mut self, page: u32, offset: usize) -> Self {
        self.bounding_regions = vec![BoundingRegion::page(page)];
        self.spans = vec![Span::new(offset, self.content.len())];
        self
    }

    /// Set the kind and return self.
    pub fn with_kind(mut self, kind: CellKind) -> Self {
        self.kind = kind;
        self
    }

    /// Page of the first bounding region and offset of the first span.
    pub fn location(&self) -> Option<SpanLocation> {
        first_location(&self.bounding_regions, &self.spans)
    }
}

fn first_location(regions: &[BoundingRegion], spans: &[Span]) -> Option<SpanLocation> {
    let region = regions.first()?;
    let span = spans.first()?;
    Some(SpanLocation::new(region.page_number, span.offset))
}

/// The SDK serializes absent collections as `null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_location() {
        let p = Paragraph::new("Hello", 2, 40);
        assert_eq!(p.location(), Some(SpanLocation::new(2, 40)));

        let p = Paragraph::unlocated("Floating");
        assert_eq!(p.location(), None);

        let mut p = Paragraph::new("No spans", 1, 0);
        p.spans.clear();
        assert_eq!(p.location(), None);
    }

    #[test]
    fn test_excluded_roles() {
        assert!(Paragraph::new("3", 1, 0)
            .with_role(ParagraphRole::PageNumber)
            .is_excluded());
        assert!(Paragraph::new("Confidential", 1, 0)
            .with_role(ParagraphRole::PageFooter)
            .is_excluded());
        assert!(!Paragraph::new("Header", 1, 0)
            .with_role(ParagraphRole::PageHeader)
            .is_excluded());
        assert!(!Paragraph::new("Body", 1, 0).is_excluded());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "apiVersion": "2023-07-31",
            "modelId": "prebuilt-document",
            "paragraphs": [
                {
                    "content": "Page 1",
                    "role": "pageNumber",
                    "boundingRegions": [{"pageNumber": 1, "polygon": [0, 0, 1, 0, 1, 1, 0, 1]}],
                    "spans": [{"offset": 0, "length": 6}]
                },
                {
                    "content": "Intro",
                    "role": "somethingNew",
                    "boundingRegions": [{"pageNumber": 1}],
                    "spans": [{"offset": 7, "length": 5}]
                }
            ],
            "tables": [{
                "rowCount": 2,
                "columnCount": 1,
                "cells": [
                    {"kind": "columnHeader", "rowIndex": 0, "columnIndex": 0, "content": "H"},
                    {"rowIndex": 1, "columnIndex": 0, "content": "V"},
                    {"kind": "rowHeader", "rowIndex": 1, "columnIndex": 0, "content": "R"}
                ],
                "boundingRegions": [{"pageNumber": 1}]
            }]
        }"#;

        let result = AnalyzeResult::from_json(json).unwrap();
        assert_eq!(result.model_id.as_deref(), Some("prebuilt-document"));
        assert_eq!(result.paragraphs.len(), 2);
        assert_eq!(result.paragraphs[0].role, Some(ParagraphRole::PageNumber));
        assert_eq!(result.paragraphs[1].role, Some(ParagraphRole::Other));

        let table = &result.tables[0];
        assert_eq!(table.row_count, 2);
        assert_eq!(table.cells[0].kind, CellKind::ColumnHeader);
        assert_eq!(table.cells[1].kind, CellKind::Content);
        assert_eq!(table.cells[2].kind, CellKind::Other);
        assert_eq!(table.cells[1].location(), None);
    }

    #[test]
    fn test_deserialize_snake_case_with_nulls() {
        let json = r#"{
            "paragraphs": [
                {"content": "x", "role": null, "bounding_regions": [{"page_number": 3}], "spans": [{"offset": 9, "length": 1}]}
            ],
            "tables": null
        }"#;

        let result = AnalyzeResult::from_json(json).unwrap();
        assert_eq!(
            result.paragraphs[0].location(),
            Some(SpanLocation::new(3, 9))
        );
        assert!(result.tables.is_empty());
    }

    #[test]
    fn test_deserialize_operation_envelope() {
        let json = r#"{
            "status": "succeeded",
            "createdDateTime": "2024-03-01T10:00:00Z",
            "lastUpdatedDateTime": "2024-03-01T10:00:05Z",
            "analyzeResult": {
                "paragraphs": [{"content": "Wrapped", "boundingRegions": [{"pageNumber": 1}], "spans": [{"offset": 0, "length": 7}]}]
            }
        }"#;

        let result = AnalyzeResult::from_json(json).unwrap();
        assert_eq!(result.paragraphs.len(), 1);
        assert_eq!(result.paragraphs[0].content, "Wrapped");
    }

    #[test]
    fn test_invalid_json() {
        assert!(AnalyzeResult::from_json("[1, 2, 3]").is_err());
        assert!(AnalyzeResult::from_json("not json").is_err());
    }
}
