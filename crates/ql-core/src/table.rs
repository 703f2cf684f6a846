//! Catalog tables and the resolved table set.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A table known to the rule catalog.
///
/// Declaration order is catalog order: facts first, then masters, then the
/// mapping and reference tables. [`TableSet`] iterates in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Table {
    /// Detailed personnel financial transactions
    #[serde(rename = "a_personnel_details")]
    PersonnelDetails,
    /// Personnel headcount movements and snapshots
    #[serde(rename = "a_personnel_headcount")]
    PersonnelHeadcount,
    /// Aggregated personnel data for GL reconciliation
    #[serde(rename = "a_personnel_summary")]
    PersonnelSummary,
    /// Department master
    #[serde(rename = "m_department")]
    Department,
    /// Location master
    #[serde(rename = "m_location")]
    Location,
    /// Accounting period master
    #[serde(rename = "m_accounting_period")]
    AccountingPeriod,
    /// Category rollup hierarchy and negation flags
    #[serde(rename = "master_rollup_mapping_details")]
    RollupMapping,
    /// Currency conversion rates
    #[serde(rename = "currency_master")]
    CurrencyMaster,
}

/// What part a table plays in a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableRole {
    /// Measure-bearing fact table
    Fact,
    /// Dimension master joined by key
    Master,
    /// Category rollup mapping
    Mapping,
    /// Reference data (currency rates)
    Reference,
}

impl fmt::Display for TableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TableRole::Fact => "fact",
            TableRole::Master => "master",
            TableRole::Mapping => "mapping",
            TableRole::Reference => "reference",
        })
    }
}

impl Table {
    /// Every table, in catalog order
    pub const ALL: [Table; 8] = [
        Table::PersonnelDetails,
        Table::PersonnelHeadcount,
        Table::PersonnelSummary,
        Table::Department,
        Table::Location,
        Table::AccountingPeriod,
        Table::RollupMapping,
        Table::CurrencyMaster,
    ];

    /// The three masters that every resolved table set carries
    pub const MASTERS: [Table; 3] = [Table::Department, Table::Location, Table::AccountingPeriod];

    /// Physical table name
    pub fn name(self) -> &'static str {
        match self {
            Table::PersonnelDetails => "a_personnel_details",
            Table::PersonnelHeadcount => "a_personnel_headcount",
            Table::PersonnelSummary => "a_personnel_summary",
            Table::Department => "m_department",
            Table::Location => "m_location",
            Table::AccountingPeriod => "m_accounting_period",
            Table::RollupMapping => "master_rollup_mapping_details",
            Table::CurrencyMaster => "currency_master",
        }
    }

    /// SQL alias used by templates and the custom builder
    pub fn alias(self) -> &'static str {
        match self {
            Table::PersonnelDetails => "pd",
            Table::PersonnelHeadcount => "ph",
            Table::PersonnelSummary => "ps",
            Table::Department => "d",
            Table::Location => "l",
            Table::AccountingPeriod => "ap",
            Table::RollupMapping => "mrm",
            Table::CurrencyMaster => "cm",
        }
    }

    /// Role of the table in a query
    pub fn role(self) -> TableRole {
        match self {
            Table::PersonnelDetails | Table::PersonnelHeadcount | Table::PersonnelSummary => {
                TableRole::Fact
            }
            Table::Department | Table::Location | Table::AccountingPeriod => TableRole::Master,
            Table::RollupMapping => TableRole::Mapping,
            Table::CurrencyMaster => TableRole::Reference,
        }
    }

    /// Whether this is a measure-bearing fact table
    pub fn is_fact(self) -> bool {
        self.role() == TableRole::Fact
    }

    /// Look up a table by its physical name
    pub fn from_name(name: &str) -> Option<Table> {
        Table::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Table {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Table::from_name(s).ok_or_else(|| CoreError::CatalogLookup {
            kind: "table",
            key: s.to_string(),
        })
    }
}

/// A set of tables needed to answer a question.
///
/// Semantically unordered; iteration follows catalog order so every stage
/// that walks the set is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableSet(BTreeSet<Table>);

impl TableSet {
    /// Create an empty table set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a table, returning whether it was newly added
    pub fn insert(&mut self, table: Table) -> bool {
        self.0.insert(table)
    }

    /// Whether the set contains `table`
    pub fn contains(&self, table: Table) -> bool {
        self.0.contains(&table)
    }

    /// Iterate tables in catalog order
    pub fn iter(&self) -> impl Iterator<Item = Table> + '_ {
        self.0.iter().copied()
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fact tables in the set, in catalog order
    pub fn facts(&self) -> impl Iterator<Item = Table> + '_ {
        self.iter().filter(|t| t.is_fact())
    }

    /// The fact table a query is anchored on, if any
    pub fn primary_fact(&self) -> Option<Table> {
        self.facts().next()
    }
}

impl FromIterator<Table> for TableSet {
    fn from_iter<I: IntoIterator<Item = Table>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TableSet {
    type Item = Table;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, Table>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_roundtrip() {
        for table in Table::ALL {
            assert_eq!(Table::from_name(table.name()), Some(table));
        }
    }

    #[test]
    fn test_unknown_table_is_lookup_error() {
        let err = "payroll_raw".parse::<Table>().unwrap_err();
        assert!(matches!(err, CoreError::CatalogLookup { kind: "table", .. }));
    }

    #[test]
    fn test_aliases_are_unique() {
        let aliases: BTreeSet<&str> = Table::ALL.iter().map(|t| t.alias()).collect();
        assert_eq!(aliases.len(), Table::ALL.len());
    }

    #[test]
    fn test_table_set_iterates_in_catalog_order() {
        let set: TableSet = [
            Table::CurrencyMaster,
            Table::Department,
            Table::PersonnelDetails,
        ]
        .into_iter()
        .collect();
        let order: Vec<Table> = set.iter().collect();
        assert_eq!(
            order,
            vec![
                Table::PersonnelDetails,
                Table::Department,
                Table::CurrencyMaster
            ]
        );
    }

    #[test]
    fn test_table_set_deduplicates() {
        let mut set = TableSet::new();
        assert!(set.insert(Table::Location));
        assert!(!set.insert(Table::Location));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_primary_fact_prefers_details() {
        let set: TableSet = [Table::PersonnelSummary, Table::PersonnelDetails]
            .into_iter()
            .collect();
        assert_eq!(set.primary_fact(), Some(Table::PersonnelDetails));

        let masters: TableSet = Table::MASTERS.into_iter().collect();
        assert_eq!(masters.primary_fact(), None);
    }

    #[test]
    fn test_table_set_serializes_as_names() {
        let set: TableSet = [Table::Department, Table::RollupMapping]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["m_department","master_rollup_mapping_details"]"#);
    }
}
