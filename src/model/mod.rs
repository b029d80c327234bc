//! Data model for analysis results and the tables rebuilt from them.
//!
//! [`AnalyzeResult`] and its parts mirror what the document-analysis service
//! reports: paragraphs and tables as two independently ordered collections,
//! both anchored to (page, span offset) positions. [`StructuredTable`] is the
//! header/row form the linearizer renders.

mod analysis;
mod table;

pub use analysis::{
    AnalyzeOperation, AnalyzeResult, BoundingRegion, CellKind, Paragraph, ParagraphRole, RawTable,
    Span, SpanLocation, TableCell,
};
pub use table::{materialize, materialize_all, StructuredTable, TableId};
