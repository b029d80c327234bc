//! # docweave
//!
//! Reading-order text reconstruction from document-analysis results.
//!
//! A layout-analysis service reports a document's paragraphs and its tables
//! as two separate lists, each element anchored to a page and a span offset.
//! docweave merges them back into one reading-order sequence: paragraphs are
//! emitted verbatim, and each table is rendered once, as CSV, JSON records,
//! or a text grid, in place of the first paragraph that falls inside it.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docweave::{parse_file, TableFormat};
//!
//! fn main() -> docweave::Result<()> {
//!     let blocks = parse_file("analysis.json", TableFormat::Grid)?;
//!     println!("{}", blocks.join("\n"));
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Single emission**: each table appears exactly once, where it is first read
//! - **Three table formats**: CSV, JSON records, bordered grid
//! - **Page furniture removal**: page numbers and footers are dropped
//! - **Batch processing**: many results in parallel with Rayon
//! - **Service seams**: traits for the analysis and language-model services,
//!   plus a content-safety evaluator for completion responses

pub mod error;
pub mod linearize;
pub mod model;
pub mod options;
pub mod render;
pub mod services;

// Re-export commonly used types
pub use error::{Error, Result};
pub use linearize::{Linearization, LinearizeStats, OutputUnit};
pub use model::{AnalyzeResult, Paragraph, RawTable, StructuredTable, TableId};
pub use options::ParseOptions;
pub use render::{format_table, JsonFormat, TableFormat};
pub use services::DocumentAnalyzer;

use std::io::Read;
use std::path::Path;

use rayon::prelude::*;

use services::JsonFileAnalyzer;

/// Linearize an analysis result into ordered text blocks.
///
/// Fails with [`Error::MalformedTable`] if any table lacks bounding regions;
/// no partial output is returned in that case.
///
/// # Example
///
/// ```
/// use docweave::{parse, AnalyzeResult, Paragraph, TableFormat};
///
/// let mut result = AnalyzeResult::new();
/// result.add_paragraph(Paragraph::new("Hello", 1, 0));
///
/// let blocks = parse(&result, TableFormat::Delimited).unwrap();
/// assert_eq!(blocks, vec!["Hello"]);
/// ```
pub fn parse(result: &AnalyzeResult, format: TableFormat) -> Result<Vec<String>> {
    parse_with_stats(result, format).map(Linearization::into_strings)
}

/// Linearize an analysis result, keeping unit kinds and pass statistics.
pub fn parse_with_stats(result: &AnalyzeResult, format: TableFormat) -> Result<Linearization> {
    let tables = model::materialize_all(&result.tables)?;
    let linearization = linearize::linearize_units(&result.paragraphs, &tables, format)?;

    log::debug!(
        "Linearized {} paragraph(s) and {} table(s) into {} unit(s)",
        result.paragraphs.len(),
        tables.len(),
        linearization.units.len()
    );

    Ok(linearization)
}

/// Linearize an analysis result serialized as JSON.
pub fn parse_json(json: &str, format: TableFormat) -> Result<Vec<String>> {
    let result = AnalyzeResult::from_json(json)?;
    parse(&result, format)
}

/// Linearize an analysis result read from a reader.
pub fn parse_reader<R: Read>(reader: R, format: TableFormat) -> Result<Vec<String>> {
    let result = AnalyzeResult::from_reader(reader)?;
    parse(&result, format)
}

/// Linearize an analysis result saved as a JSON file.
///
/// # Example
///
/// ```no_run
/// use docweave::{parse_file, TableFormat};
///
/// let blocks = parse_file("analysis.json", TableFormat::Delimited).unwrap();
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P, format: TableFormat) -> Result<Vec<String>> {
    analyze_and_parse(&JsonFileAnalyzer::new(), path.as_ref(), format)
}

/// Analyze a document with the given analyzer, then linearize the result.
pub fn analyze_and_parse(
    analyzer: &dyn DocumentAnalyzer,
    path: &Path,
    format: TableFormat,
) -> Result<Vec<String>> {
    log::debug!("Analyzing {} with {}", path.display(), analyzer.name());
    let result = analyzer.analyze_document(path)?;
    parse(&result, format)
}

/// Linearize an analysis result and join the blocks with newlines.
pub fn to_text(result: &AnalyzeResult, format: TableFormat) -> Result<String> {
    parse_with_stats(result, format).map(|l| l.to_text())
}

/// Linearize many saved analysis results.
///
/// Each file is an independent unit of work; one failure does not affect the
/// others. Results come back in input order.
pub fn parse_files<P>(paths: &[P], options: &ParseOptions) -> Vec<Result<Vec<String>>>
where
    P: AsRef<Path> + Sync,
{
    let format = options.table_format;
    if options.parallel {
        paths.par_iter().map(|p| parse_file(p, format)).collect()
    } else {
        paths.iter().map(|p| parse_file(p, format)).collect()
    }
}
