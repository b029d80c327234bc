//! Parsing options and configuration.

use crate::render::TableFormat;

/// Options for linearizing analysis results.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// How tables are rendered in the output
    pub table_format: TableFormat,

    /// Whether batch parsing spreads files across threads
    pub parallel: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table format.
    pub fn with_table_format(mut self, format: TableFormat) -> Self {
        self.table_format = format;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            table_format: TableFormat::Delimited,
            parallel: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new()
            .with_table_format(TableFormat::Grid)
            .sequential();

        assert_eq!(options.table_format, TableFormat::Grid);
        assert!(!options.parallel);
        assert!(options.with_parallel(true).parallel);
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.table_format, TableFormat::Delimited);
        assert!(options.parallel);
    }
}
