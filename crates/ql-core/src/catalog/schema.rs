//! Table and column catalog

use crate::table::Table;
use serde::Serialize;

/// A column with its declared SQL type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: &'static str,
}

/// How a fact table joins a master, mapping or reference table.
///
/// Pairs are `(fact column, table column)`, combined with `AND`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinKey {
    pub columns: &'static [(&'static str, &'static str)],
}

impl JoinKey {
    /// Render the `ON` condition between two aliases
    pub fn on_clause(&self, fact_alias: &str, table_alias: &str) -> String {
        self.columns
            .iter()
            .map(|(fact_col, table_col)| {
                format!("{fact_alias}.{fact_col} = {table_alias}.{table_col}")
            })
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    /// Columns required on the fact side
    pub fn fact_columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|(fact_col, _)| *fact_col)
    }

    /// Columns required on the joined table's side
    pub fn table_columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|(_, table_col)| *table_col)
    }
}

/// Catalog entry for one table
#[derive(Debug, Clone, Serialize)]
pub struct TableDef {
    pub table: Table,
    pub description: &'static str,
    /// Full column list in declaration order
    pub columns: Vec<ColumnDef>,
    /// Hand-curated columns kept by the schema pruner
    pub essential_columns: Option<Vec<&'static str>>,
    /// Key used to join this table from a fact table
    pub join_key: Option<JoinKey>,
    /// Measure columns, primary measure first
    pub measures: Vec<&'static str>,
}

impl TableDef {
    /// Whether the table declares `name`
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Look up a column definition
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The first measure column, if the table carries one
    pub fn primary_measure(&self) -> Option<&'static str> {
        self.measures.first().copied()
    }
}

fn cols(defs: &[(&'static str, &'static str)]) -> Vec<ColumnDef> {
    defs.iter()
        .map(|&(name, sql_type)| ColumnDef { name, sql_type })
        .collect()
}

pub(crate) fn builtin_tables() -> Vec<TableDef> {
    vec![
        TableDef {
            table: Table::PersonnelDetails,
            description: "Detailed personnel financial transactions",
            columns: cols(&[
                ("employee_id", "INTEGER PRIMARY KEY"),
                ("department_id", "INTEGER"),
                ("location_id", "INTEGER"),
                ("accounting_period", "VARCHAR(7)"),
                ("amount", "DECIMAL(15,2)"),
                ("currency_id", "VARCHAR(3)"),
                ("category", "VARCHAR(50)"),
                ("category_rollup", "VARCHAR(50)"),
                ("closed", "BOOLEAN"),
                ("plan_version_name", "VARCHAR(50)"),
                ("aggregation_type", "VARCHAR(20)"),
                ("created_date", "DATE"),
                ("fiscal_year", "INTEGER"),
            ]),
            essential_columns: Some(vec![
                "employee_id",
                "department_id",
                "location_id",
                "accounting_period",
                "amount",
                "currency_id",
                "category",
                "category_rollup",
                "closed",
                "plan_version_name",
                "fiscal_year",
            ]),
            join_key: None,
            measures: vec!["amount"],
        },
        TableDef {
            table: Table::PersonnelHeadcount,
            description: "Personnel headcount movements and snapshots",
            columns: cols(&[
                ("employee_id", "INTEGER PRIMARY KEY"),
                ("department_id", "INTEGER"),
                ("location_id", "INTEGER"),
                ("accounting_period", "VARCHAR(7)"),
                ("headcount", "INTEGER"),
                ("movement_type", "VARCHAR(20)"),
                ("effective_date", "DATE"),
                ("fiscal_year", "INTEGER"),
            ]),
            essential_columns: Some(vec![
                "employee_id",
                "department_id",
                "location_id",
                "accounting_period",
                "headcount",
                "movement_type",
                "fiscal_year",
            ]),
            join_key: None,
            measures: vec!["headcount"],
        },
        TableDef {
            table: Table::PersonnelSummary,
            description: "Aggregated personnel data for GL reconciliation",
            columns: cols(&[
                ("department_id", "INTEGER"),
                ("location_id", "INTEGER"),
                ("accounting_period", "VARCHAR(7)"),
                ("total_amount", "DECIMAL(15,2)"),
                ("currency_id", "VARCHAR(3)"),
                ("category_rollup", "VARCHAR(50)"),
                ("plan_version_name", "VARCHAR(50)"),
                ("headcount", "INTEGER"),
                ("fiscal_year", "INTEGER"),
            ]),
            essential_columns: Some(vec![
                "department_id",
                "location_id",
                "accounting_period",
                "total_amount",
                "currency_id",
                "category_rollup",
                "plan_version_name",
                "headcount",
                "fiscal_year",
            ]),
            join_key: Some(JoinKey {
                columns: &[
                    ("department_id", "department_id"),
                    ("location_id", "location_id"),
                    ("accounting_period", "accounting_period"),
                ],
            }),
            measures: vec!["total_amount", "headcount"],
        },
        TableDef {
            table: Table::Department,
            description: "Department master data",
            columns: cols(&[
                ("department_id", "INTEGER PRIMARY KEY"),
                ("department_name", "VARCHAR(100)"),
                ("department_code", "VARCHAR(20)"),
                ("parent_department_id", "INTEGER"),
                ("is_active", "BOOLEAN"),
            ]),
            essential_columns: Some(vec!["department_id", "department_name"]),
            join_key: Some(JoinKey {
                columns: &[("department_id", "department_id")],
            }),
            measures: vec![],
        },
        TableDef {
            table: Table::Location,
            description: "Location master data",
            columns: cols(&[
                ("location_id", "INTEGER PRIMARY KEY"),
                ("location_name", "VARCHAR(100)"),
                ("location_code", "VARCHAR(20)"),
                ("country", "VARCHAR(50)"),
                ("region", "VARCHAR(50)"),
                ("is_active", "BOOLEAN"),
            ]),
            essential_columns: Some(vec!["location_id", "location_name", "country"]),
            join_key: Some(JoinKey {
                columns: &[("location_id", "location_id")],
            }),
            measures: vec![],
        },
        TableDef {
            table: Table::AccountingPeriod,
            description: "Accounting period master",
            columns: cols(&[
                ("period_id", "INTEGER PRIMARY KEY"),
                ("name", "VARCHAR(7)"),
                ("fiscal_year", "INTEGER"),
                ("fiscal_quarter", "INTEGER"),
                ("fiscal_month", "INTEGER"),
                ("start_date", "DATE"),
                ("end_date", "DATE"),
                ("is_closed", "BOOLEAN"),
            ]),
            essential_columns: Some(vec![
                "period_id",
                "name",
                "fiscal_year",
                "fiscal_quarter",
                "fiscal_month",
            ]),
            // Periods join on the YYYY-MM name, not on period_id.
            join_key: Some(JoinKey {
                columns: &[("accounting_period", "name")],
            }),
            measures: vec![],
        },
        TableDef {
            table: Table::RollupMapping,
            description: "Category rollup hierarchy and rules",
            columns: cols(&[
                ("category", "VARCHAR(50)"),
                ("category_rollup", "VARCHAR(50)"),
                ("rollup_level_1", "VARCHAR(50)"),
                ("rollup_level_2", "VARCHAR(50)"),
                ("is_compensation", "BOOLEAN"),
                ("requires_negation", "BOOLEAN"),
            ]),
            essential_columns: Some(vec![
                "category",
                "category_rollup",
                "rollup_level_1",
                "is_compensation",
                "requires_negation",
            ]),
            join_key: Some(JoinKey {
                columns: &[("category", "category")],
            }),
            measures: vec!["requires_negation", "is_compensation"],
        },
        TableDef {
            table: Table::CurrencyMaster,
            description: "Currency conversion rates",
            columns: cols(&[
                ("currency_id", "VARCHAR(3) PRIMARY KEY"),
                ("currency_name", "VARCHAR(50)"),
                ("conversion_rate_to_usd", "DECIMAL(10,6)"),
                ("effective_date", "DATE"),
            ]),
            essential_columns: Some(vec!["currency_id", "conversion_rate_to_usd"]),
            join_key: Some(JoinKey {
                columns: &[("currency_id", "currency_id")],
            }),
            measures: vec!["conversion_rate_to_usd"],
        },
    ]
}
