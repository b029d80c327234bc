//! Reading-order reconstruction.
//!
//! Paragraphs arrive in reading order; tables arrive as a separate list. The
//! linearizer walks the paragraphs once and, whenever a paragraph turns out
//! to sit inside a table, emits that table's rendering in its place. A table
//! is emitted at most once, at its first paragraph; later paragraphs inside
//! it are swallowed.

mod locator;

pub use locator::{locate, SpanIndex};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Paragraph, StructuredTable, TableId};
use crate::render::{format_table, TableFormat};

/// One block of linearized output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputUnit {
    /// Paragraph text, verbatim
    Paragraph {
        /// Paragraph content
        text: String,
    },
    /// A rendered table block
    Table {
        /// Which table was rendered
        table: TableId,
        /// Rendered block, wrapped in newlines
        text: String,
    },
}

impl OutputUnit {
    /// Text of the unit.
    pub fn as_str(&self) -> &str {
        match self {
            OutputUnit::Paragraph { text } | OutputUnit::Table { text, .. } => text,
        }
    }

    /// Consume the unit, returning its text.
    pub fn into_text(self) -> String {
        match self {
            OutputUnit::Paragraph { text } | OutputUnit::Table { text, .. } => text,
        }
    }

    /// Whether this unit is a table block.
    pub fn is_table(&self) -> bool {
        matches!(self, OutputUnit::Table { .. })
    }
}

/// Counters collected during one linearization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearizeStats {
    /// Paragraphs examined
    pub paragraphs: usize,

    /// Paragraphs skipped for lacking a bounding region or span
    pub skipped_unlocated: usize,

    /// Paragraphs skipped as page numbers or page footers
    pub skipped_role: usize,

    /// Paragraphs emitted verbatim
    pub text_units: usize,

    /// Paragraphs absorbed by an already-emitted table
    pub absorbed: usize,

    /// Tables available to the pass
    pub tables: usize,

    /// Tables emitted
    pub tables_emitted: usize,

    /// Tables no paragraph pointed into; these are absent from the output
    pub unreferenced_tables: Vec<TableId>,
}

/// Output units plus the statistics of the pass that produced them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Linearization {
    /// Ordered output
    pub units: Vec<OutputUnit>,

    /// Pass statistics
    pub stats: LinearizeStats,
}

impl Linearization {
    /// Output as plain strings.
    pub fn into_strings(self) -> Vec<String> {
        self.units.into_iter().map(OutputUnit::into_text).collect()
    }

    /// Output joined with newlines.
    pub fn to_text(&self) -> String {
        self.units
            .iter()
            .map(OutputUnit::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Single-pass merger of paragraphs and tables.
///
/// Emission state lives in the linearizer, not in the tables, so the same
/// table list can be linearized again with a fresh linearizer.
pub struct Linearizer<'a> {
    tables: &'a [StructuredTable],
    index: SpanIndex,
    format: TableFormat,
    emitted: HashSet<TableId>,
    units: Vec<OutputUnit>,
    stats: LinearizeStats,
}

impl<'a> Linearizer<'a> {
    /// Create a linearizer over materialized tables.
    pub fn new(tables: &'a [StructuredTable], format: TableFormat) -> Self {
        Self {
            tables,
            index: SpanIndex::build(tables),
            format,
            emitted: HashSet::new(),
            units: Vec::new(),
            stats: LinearizeStats {
                tables: tables.len(),
                ..LinearizeStats::default()
            },
        }
    }

    /// Feed the next paragraph in reading order.
    pub fn push(&mut self, paragraph: &Paragraph) -> Result<()> {
        self.stats.paragraphs += 1;

        let Some(location) = paragraph.location() else {
            self.stats.skipped_unlocated += 1;
            return Ok(());
        };
        if paragraph.is_excluded() {
            self.stats.skipped_role += 1;
            return Ok(());
        }

        match self.index.locate(location) {
            Some(id) if self.emitted.contains(&id) => {
                self.stats.absorbed += 1;
            }
            Some(id) => {
                let text = format_table(&self.tables[id.index()], self.format)?;
                log::debug!(
                    "Placing table {} at page {} offset {}",
                    id,
                    location.page,
                    location.offset
                );
                self.emitted.insert(id);
                self.stats.tables_emitted += 1;
                self.units.push(OutputUnit::Table { table: id, text });
            }
            None => {
                self.stats.text_units += 1;
                self.units.push(OutputUnit::Paragraph {
                    text: paragraph.content.clone(),
                });
            }
        }

        Ok(())
    }

    /// Finish the pass.
    ///
    /// Tables that were never reached are reported, not appended.
    pub fn finish(mut self) -> Linearization {
        self.stats.unreferenced_tables = (0..self.tables.len())
            .map(TableId)
            .filter(|id| !self.emitted.contains(id))
            .collect();

        if !self.stats.unreferenced_tables.is_empty() {
            log::warn!(
                "{} table(s) not referenced by any paragraph and left out of the output: {:?}",
                self.stats.unreferenced_tables.len(),
                self.stats.unreferenced_tables
            );
        }

        Linearization {
            units: self.units,
            stats: self.stats,
        }
    }
}

/// Linearize paragraphs against materialized tables.
pub fn linearize_units(
    paragraphs: &[Paragraph],
    tables: &[StructuredTable],
    format: TableFormat,
) -> Result<Linearization> {
    let mut linearizer = Linearizer::new(tables, format);
    for paragraph in paragraphs {
        linearizer.push(paragraph)?;
    }
    Ok(linearizer.finish())
}

/// Linearize paragraphs against materialized tables, returning plain text units.
pub fn linearize(
    paragraphs: &[Paragraph],
    tables: &[StructuredTable],
    format: TableFormat,
) -> Result<Vec<String>> {
    linearize_units(paragraphs, tables, format).map(Linearization::into_strings)
}
