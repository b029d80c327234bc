//! Span lookup: which table, if any, owns a (page, offset) position.

use std::collections::HashMap;

use crate::model::{SpanLocation, StructuredTable, TableId};

/// Find the table containing a location by scanning the list in order.
///
/// The first table whose span set holds the location wins; overlapping span
/// sets are resolved by list order alone.
pub fn locate(
    location: SpanLocation,
    tables: &[StructuredTable],
) -> Option<(TableId, &StructuredTable)> {
    tables
        .iter()
        .enumerate()
        .find(|(_, table)| table.contains(location))
        .map(|(i, table)| (TableId(i), table))
}

/// Precomputed (page, offset) to table map.
///
/// Built once per pass; an offset claimed by several tables stays with the
/// first one registered, which keeps lookups in agreement with [`locate`].
#[derive(Debug, Clone, Default)]
pub struct SpanIndex {
    owners: HashMap<SpanLocation, TableId>,
}

impl SpanIndex {
    /// Index every span of every table.
    pub fn build(tables: &[StructuredTable]) -> Self {
        let mut owners = HashMap::new();
        for (i, table) in tables.iter().enumerate() {
            for location in table.spans() {
                let owner = *owners.entry(location).or_insert(TableId(i));
                if owner != TableId(i) {
                    log::debug!(
                        "Span {}:{} claimed by table {} and table {}; keeping {}",
                        location.page,
                        location.offset,
                        owner,
                        TableId(i),
                        owner
                    );
                }
            }
        }
        Self { owners }
    }

    /// Table owning the location, if any.
    pub fn locate(&self, location: SpanLocation) -> Option<TableId> {
        self.owners.get(&location).copied()
    }

    /// Number of indexed positions.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Whether no table registered any span.
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
