//! Structural query validation.
//!
//! A fixed set of independent textual checks over the lower-cased SQL. This
//! is a fast safety net, not a correctness prover: nothing is executed and
//! nothing is resolved against a database.

use crate::synthesizer::GeneratedQuery;
use ql_core::{PrunedSchema, Table, TableSet};
use serde::Serialize;

/// Category of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// V001: a selected table is never referenced
    MissingTable,
    /// V002: a master join lacks its ID-equality condition
    JoinCondition,
    /// V003: periods are not joined on `accounting_period = name`
    PeriodMapping,
    /// V004: no WHERE clause
    MissingWhere,
    /// V005: cost amounts are not sign-corrected
    MissingNegation,
    /// V006: varchar-to-integer cast
    UnsafeCast,
}

impl IssueKind {
    /// Stable diagnostic code
    pub fn code(self) -> &'static str {
        match self {
            IssueKind::MissingTable => "V001",
            IssueKind::JoinCondition => "V002",
            IssueKind::PeriodMapping => "V003",
            IssueKind::MissingWhere => "V004",
            IssueKind::MissingNegation => "V005",
            IssueKind::UnsafeCast => "V006",
        }
    }

    /// Remediation shared by every issue of this kind
    pub fn recommendation(self) -> &'static str {
        match self {
            IssueKind::MissingTable => "Reference every selected table in FROM or JOIN clauses",
            IssueKind::JoinCondition => "Add missing join conditions",
            IssueKind::PeriodMapping => "Join periods via accounting_period = name",
            IssueKind::MissingWhere => "Apply the scenario filter in a WHERE clause",
            IssueKind::MissingNegation => {
                "Wrap cost amounts in a CASE expression on requires_negation"
            }
            IssueKind::UnsafeCast => "Remove varchar-to-integer casts on name fields",
        }
    }
}

/// One failed check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind.code(), self.message)
    }
}

/// Outcome of validating one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// True exactly when `issues` is empty
    pub is_valid: bool,
    pub issues: Vec<ValidationIssue>,
    /// One entry per issue kind, in order of first appearance
    pub recommendations: Vec<String>,
}

impl ValidationReport {
    /// Build a report from accumulated issues
    pub fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        let mut kinds: Vec<IssueKind> = Vec::new();
        for issue in &issues {
            if !kinds.contains(&issue.kind) {
                kinds.push(issue.kind);
            }
        }
        Self {
            is_valid: issues.is_empty(),
            recommendations: kinds
                .into_iter()
                .map(|k| k.recommendation().to_string())
                .collect(),
            issues,
        }
    }

    /// Whether any issue has the given kind
    pub fn has_issue(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }
}

/// Inputs every check sees
pub struct ValidationContext<'a> {
    /// Lower-cased SQL text
    pub sql: String,
    pub tables: &'a TableSet,
    /// Pruned columns of the question, for checks added with
    /// [`Validator::add_check`]. None of the built-in checks read it.
    pub schema: &'a PrunedSchema,
}

/// A single structural check
pub trait QueryCheck: Send + Sync {
    /// Check name (used for filtering and display)
    fn name(&self) -> &'static str;
    /// Human-readable description
    fn description(&self) -> &'static str;
    /// Run the check, returning any issues found
    fn run(&self, ctx: &ValidationContext<'_>) -> Vec<ValidationIssue>;
}

/// Runs the registered checks in order
pub struct Validator {
    checks: Vec<Box<dyn QueryCheck>>,
}

impl Validator {
    /// Create a validator with the six built-in checks
    pub fn with_defaults() -> Self {
        Self {
            checks: vec![
                Box::new(TablesReferenced),
                Box::new(MasterJoinConditions),
                Box::new(PeriodMapping),
                Box::new(WhereClause),
                Box::new(NegationLogic),
                Box::new(UnsafeCast),
            ],
        }
    }

    /// Append a check after the registered ones
    pub fn add_check(&mut self, check: Box<dyn QueryCheck>) {
        self.checks.push(check);
    }

    /// Validate a generated query
    pub fn validate(
        &self,
        query: &GeneratedQuery,
        tables: &TableSet,
        schema: &PrunedSchema,
    ) -> ValidationReport {
        self.validate_sql(&query.sql_text, tables, schema)
    }

    /// Validate SQL text from any producer
    pub fn validate_sql(&self, sql: &str, tables: &TableSet, schema: &PrunedSchema) -> ValidationReport {
        let ctx = ValidationContext {
            sql: sql.to_lowercase(),
            tables,
            schema,
        };
        let issues: Vec<ValidationIssue> = self
            .checks
            .iter()
            .flat_map(|check| {
                let found = check.run(&ctx);
                if !found.is_empty() {
                    log::debug!("Check {} found {} issue(s)", check.name(), found.len());
                }
                found
            })
            .collect();
        ValidationReport::from_issues(issues)
    }

    /// Names of the registered checks, in run order
    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// `(name, description)` of the registered checks
    pub fn describe(&self) -> Vec<(&'static str, &'static str)> {
        self.checks
            .iter()
            .map(|c| (c.name(), c.description()))
            .collect()
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::with_defaults()
    }
}

struct TablesReferenced;

impl QueryCheck for TablesReferenced {
    fn name(&self) -> &'static str {
        "tables_referenced"
    }

    fn description(&self) -> &'static str {
        "Every selected table appears in the query"
    }

    fn run(&self, ctx: &ValidationContext<'_>) -> Vec<ValidationIssue> {
        ctx.tables
            .iter()
            .filter(|table| !ctx.sql.contains(table.name()))
            .map(|table| {
                ValidationIssue::new(
                    IssueKind::MissingTable,
                    format!("Expected table '{}' not found in query", table),
                )
            })
            .collect()
    }
}

struct MasterJoinConditions;

impl QueryCheck for MasterJoinConditions {
    fn name(&self) -> &'static str {
        "master_join_conditions"
    }

    fn description(&self) -> &'static str {
        "Department and location joins use ID equality"
    }

    fn run(&self, ctx: &ValidationContext<'_>) -> Vec<ValidationIssue> {
        if !ctx.sql.contains("join") {
            return Vec::new();
        }
        [
            (Table::Department, ".department_id = ", "department"),
            (Table::Location, ".location_id = ", "location"),
        ]
        .into_iter()
        .filter(|(table, pattern, _)| ctx.tables.contains(*table) && !ctx.sql.contains(*pattern))
        .map(|(_, _, label)| {
            ValidationIssue::new(
                IssueKind::JoinCondition,
                format!("Missing proper join condition for {}", label),
            )
        })
        .collect()
    }
}

struct PeriodMapping;

impl QueryCheck for PeriodMapping {
    fn name(&self) -> &'static str {
        "period_mapping"
    }

    fn description(&self) -> &'static str {
        "Accounting periods join on accounting_period = name"
    }

    fn run(&self, ctx: &ValidationContext<'_>) -> Vec<ValidationIssue> {
        if ctx.tables.contains(Table::AccountingPeriod)
            && !(ctx.sql.contains(".accounting_period = ") && ctx.sql.contains(".name"))
        {
            vec![ValidationIssue::new(
                IssueKind::PeriodMapping,
                "Incorrect period mapping - should join on accounting_period = name",
            )]
        } else {
            Vec::new()
        }
    }
}

struct WhereClause;

impl QueryCheck for WhereClause {
    fn name(&self) -> &'static str {
        "where_clause"
    }

    fn description(&self) -> &'static str {
        "A WHERE clause carries the scenario filter"
    }

    fn run(&self, ctx: &ValidationContext<'_>) -> Vec<ValidationIssue> {
        if ctx.sql.contains("where") {
            Vec::new()
        } else {
            vec![ValidationIssue::new(
                IssueKind::MissingWhere,
                "Missing WHERE clause for scenario filter",
            )]
        }
    }
}

struct NegationLogic;

impl QueryCheck for NegationLogic {
    fn name(&self) -> &'static str {
        "negation_logic"
    }

    fn description(&self) -> &'static str {
        "Cost queries over the rollup mapping negate amounts with CASE"
    }

    fn run(&self, ctx: &ValidationContext<'_>) -> Vec<ValidationIssue> {
        // The rollup mapping stands in for "this is a fully loaded cost".
        if ctx.tables.contains(Table::RollupMapping) && !ctx.sql.contains("case when") {
            vec![ValidationIssue::new(
                IssueKind::MissingNegation,
                "Missing negation logic for fully loaded cost calculation",
            )]
        } else {
            Vec::new()
        }
    }
}

struct UnsafeCast;

impl QueryCheck for UnsafeCast {
    fn name(&self) -> &'static str {
        "unsafe_cast"
    }

    fn description(&self) -> &'static str {
        "No varchar-to-integer casts"
    }

    fn run(&self, ctx: &ValidationContext<'_>) -> Vec<ValidationIssue> {
        if ctx.sql.contains("cast(") && ctx.sql.contains("as integer") {
            vec![ValidationIssue::new(
                IssueKind::UnsafeCast,
                "Avoid casting varchar to integer on name fields",
            )]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
#[path = "validator_test.rs"]
mod tests;
