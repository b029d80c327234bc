//! Document-analysis collaborator.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::Result;
use crate::model::AnalyzeResult;

/// Something that turns a document into an analysis result.
///
/// Implement this for a remote analysis service; the crate ships only
/// [`JsonFileAnalyzer`], which replays results saved to disk.
pub trait DocumentAnalyzer: Send + Sync {
    /// Name of this analyzer, for logs.
    fn name(&self) -> &str;

    /// Analyze the document at `path`.
    fn analyze_document(&self, path: &Path) -> Result<AnalyzeResult>;
}

/// Analyzer that loads a previously saved analysis result (JSON).
#[derive(Debug, Clone, Default)]
pub struct JsonFileAnalyzer {
    _private: (),
}

impl JsonFileAnalyzer {
    /// Create a new JSON file analyzer.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentAnalyzer for JsonFileAnalyzer {
    fn name(&self) -> &str {
        "json-file"
    }

    fn analyze_document(&self, path: &Path) -> Result<AnalyzeResult> {
        log::debug!("Loading analysis result from {}", path.display());
        let file = File::open(path)?;
        AnalyzeResult::from_reader(BufReader::new(file))
    }
}
