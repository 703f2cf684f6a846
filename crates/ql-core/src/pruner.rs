//! Schema pruning: narrow each selected table to its essential columns

use crate::catalog::RuleCatalog;
use crate::table::{Table, TableSet};
use serde::Serialize;
use std::collections::BTreeMap;

/// Essential columns per selected table, in catalog order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PrunedSchema(BTreeMap<Table, Vec<&'static str>>);

impl PrunedSchema {
    /// Kept columns of a table, if the table survived pruning
    pub fn columns(&self, table: Table) -> Option<&[&'static str]> {
        self.0.get(&table).map(Vec::as_slice)
    }

    /// Whether `table.column` survived pruning
    pub fn contains(&self, table: Table, column: &str) -> bool {
        self.columns(table)
            .is_some_and(|cols| cols.iter().any(|c| *c == column))
    }

    /// Tables in the pruned schema
    pub fn tables(&self) -> impl Iterator<Item = Table> + '_ {
        self.0.keys().copied()
    }

    /// Iterate `(table, columns)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (Table, &[&'static str])> + '_ {
        self.0.iter().map(|(t, cols)| (*t, cols.as_slice()))
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no table survived
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Prune the schema of a table set.
///
/// Advisory only: a table without an allow-list is dropped, never an error.
pub fn prune_schema(catalog: &RuleCatalog, tables: &TableSet) -> PrunedSchema {
    let mut pruned = BTreeMap::new();
    for table in tables {
        match catalog.essential_columns(table) {
            Some(columns) => {
                pruned.insert(table, columns.to_vec());
            }
            None => log::warn!("No essential columns for {}, dropping from schema", table),
        }
    }
    PrunedSchema(pruned)
}

#[cfg(test)]
#[path = "pruner_test.rs"]
mod tests;
