//! Table output formats.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Textual encoding used for tables in the linearized output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableFormat {
    /// Comma-separated values with a header line
    #[default]
    Delimited,
    /// JSON array of header-keyed records
    StructuredRecord,
    /// Fixed-width grid with borders
    Grid,
}

impl TableFormat {
    /// All formats, in documentation order.
    pub const ALL: [TableFormat; 3] = [
        TableFormat::Delimited,
        TableFormat::StructuredRecord,
        TableFormat::Grid,
    ];

    /// Short name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            TableFormat::Delimited => "csv",
            TableFormat::StructuredRecord => "json",
            TableFormat::Grid => "grid",
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TableFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" | "delimited" => Ok(TableFormat::Delimited),
            "json" | "record" | "records" | "structured_record" => {
                Ok(TableFormat::StructuredRecord)
            }
            "grid" => Ok(TableFormat::Grid),
            other => Err(Error::UnknownTableFormat(other.to_string())),
        }
    }
}
