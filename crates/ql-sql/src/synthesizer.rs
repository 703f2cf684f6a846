//! Query synthesis.
//!
//! An intent with a catalog template is answered by instantiating that
//! template. Everything else goes through the compositional builder, which
//! anchors on the fact table, joins what the catalog says can be joined and
//! assembles SELECT / FROM / JOIN / WHERE / GROUP BY line by line.

use crate::error::{SqlError, SqlResult};
use ql_core::{
    AggregationLevel, CoreError, CurrencyCode, Intent, JoinKey, MetricType, PrunedSchema,
    RuleCatalog, Table, TableSet, TemplateSlot, Year,
};
use ql_jinja::{SlotValues, SqlTemplate};
use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::OnceLock;

/// Name of the CTE holding fact totals in a reconciliation query
const FACT_TOTALS: &str = "fact_totals";

/// String literals, qualified names and bare identifiers, in that order of
/// preference so that only bare identifiers reach the column lookup intact.
fn predicate_token_pattern() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| {
        Regex::new(r"'[^']*'|[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)+|[A-Za-z_][A-Za-z0-9_]*")
            .expect("valid regex")
    })
}

/// Whether cost amounts were sign-corrected through the rollup mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NegationDecision {
    Applied,
    NotApplied,
}

/// How amounts were converted between currencies
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurrencyDecision {
    NoConversion,
    Converted {
        target: CurrencyCode,
        rate_source: String,
    },
}

/// Why the generated SQL looks the way it does
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionRecord {
    pub negation: NegationDecision,
    /// Name of the scenario filter applied
    pub scenario: String,
    pub currency: CurrencyDecision,
    /// Compensation categories folded into the measure
    pub rollups: Vec<String>,
}

/// Which synthesis path produced a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    /// Instantiated from the named catalog template
    Template { key: String },
    /// Built clause by clause
    Custom,
}

/// SQL text plus the decisions behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedQuery {
    pub sql_text: String,
    pub decisions: DecisionRecord,
    pub provenance: Provenance,
}

impl GeneratedQuery {
    /// Whether the query came from a catalog template
    pub fn is_template(&self) -> bool {
        matches!(self.provenance, Provenance::Template { .. })
    }
}

/// Maps an intent and its resolved tables to SQL
pub struct Synthesizer<'a> {
    catalog: &'a RuleCatalog,
    default_year: Year,
}

impl<'a> Synthesizer<'a> {
    /// Create a synthesizer over a catalog
    pub fn new(catalog: &'a RuleCatalog, default_year: Year) -> Self {
        Self {
            catalog,
            default_year,
        }
    }

    /// Generate a query for an intent.
    ///
    /// Only a catalog template failing to render can make this fail.
    pub fn synthesize(
        &self,
        intent: &Intent,
        tables: &TableSet,
        schema: &PrunedSchema,
    ) -> SqlResult<GeneratedQuery> {
        match self
            .catalog
            .template(intent.metric_type, intent.aggregation_level)
        {
            Some(template) => {
                log::debug!("Using template {}", template.key());
                self.instantiate(intent, template, tables.primary_fact())
            }
            None => {
                log::debug!(
                    "No template for {} at {} level, building custom query",
                    intent.metric_type,
                    intent.aggregation_level
                );
                self.build_custom(intent, tables, schema)
            }
        }
    }

    fn instantiate(
        &self,
        intent: &Intent,
        template: &SqlTemplate,
        fact: Option<Table>,
    ) -> SqlResult<GeneratedQuery> {
        let filter = self.catalog.scenario_filter(intent.scenario);
        let values = SlotValues::new()
            .with(
                TemplateSlot::ScenarioFilter.as_str(),
                self.qualify_predicate(filter.predicate_expression, fact),
            )
            .with(
                TemplateSlot::Year.as_str(),
                self.reporting_year(intent).to_string(),
            );

        let sql_text = self
            .catalog
            .render(template, &values)
            .map_err(|source| SqlError::TemplateError {
                key: template.key().to_string(),
                source,
            })?;

        if intent.requires_currency_conversion {
            log::warn!(
                "Template {} does not convert currencies; amounts stay in source currency",
                template.key()
            );
        }

        let negation = if self.catalog.negation_rule(intent.metric_type).applies {
            NegationDecision::Applied
        } else {
            NegationDecision::NotApplied
        };

        Ok(GeneratedQuery {
            sql_text,
            decisions: DecisionRecord {
                negation,
                scenario: filter.name().to_string(),
                currency: CurrencyDecision::NoConversion,
                rollups: self.rollups(intent),
            },
            provenance: Provenance::Template {
                key: template.key().to_string(),
            },
        })
    }

    fn build_custom(
        &self,
        intent: &Intent,
        tables: &TableSet,
        schema: &PrunedSchema,
    ) -> SqlResult<GeneratedQuery> {
        // Facts sort first, so without one the first master anchors the query.
        let anchor = tables
            .primary_fact()
            .or_else(|| tables.iter().next())
            .unwrap_or(Table::Department);
        let fact_alias = anchor.alias();

        // The GL summary is never joined row by row; see `reconcile`.
        let joins: Vec<(Table, &JoinKey)> = tables
            .iter()
            .filter(|&table| {
                table != anchor
                    && table != Table::PersonnelSummary
                    && self.catalog.can_join(anchor, table)
            })
            .filter_map(|table| Some((table, self.catalog.join_key(table)?)))
            .collect();
        let is_joined = |table: Table| table == anchor || joins.iter().any(|(t, _)| *t == table);

        log::debug!(
            "Custom query anchored on {} with {} joins",
            anchor,
            joins.len()
        );

        let dimension = |table: Table, column: &'static str| {
            (is_joined(table) && schema.contains(table, column)).then_some((table, column))
        };
        let dimensions: Vec<(Table, &'static str)> = match intent.aggregation_level {
            AggregationLevel::EmployeeLevel => dimension(anchor, "employee_id"),
            AggregationLevel::Department => dimension(Table::Department, "department_name"),
            AggregationLevel::Location => dimension(Table::Location, "location_name"),
            AggregationLevel::Company => None,
        }
        .into_iter()
        .collect();
        if dimensions.is_empty() && intent.aggregation_level != AggregationLevel::Company {
            log::warn!(
                "No grouping column for {} level on {}; returning a single row",
                intent.aggregation_level,
                anchor
            );
        }

        let negation_rule = self.catalog.negation_rule(intent.metric_type);
        let mut negation = NegationDecision::NotApplied;
        let mut currency = CurrencyDecision::NoConversion;
        // (expression, output column)
        let mut measures: Vec<(String, String)> = Vec::new();

        match self
            .catalog
            .table(anchor)
            .primary_measure()
            .filter(|_| anchor.is_fact())
        {
            Some(measure) => {
                let mut value = format!("{fact_alias}.{measure}");

                let target = intent
                    .requires_currency_conversion
                    .then(|| intent.target_currency.unwrap_or(CurrencyCode::Usd));
                match target {
                    Some(target) if is_joined(Table::CurrencyMaster) => {
                        value = self.convert(&value, target)?;
                        currency = CurrencyDecision::Converted {
                            target,
                            rate_source: self.catalog.currency_rule().rate_source.to_string(),
                        };
                    }
                    Some(target) => log::warn!(
                        "{} cannot join {}; skipping conversion to {}",
                        anchor,
                        Table::CurrencyMaster,
                        target
                    ),
                    None => {}
                }

                if negation_rule.applies && is_joined(Table::RollupMapping) {
                    let mrm = Table::RollupMapping.alias();
                    measures.push((
                        format!("SUM(CASE WHEN {mrm}.requires_negation = 1 THEN -{value} ELSE {value} END)"),
                        "total_cost".to_string(),
                    ));
                    negation = NegationDecision::Applied;
                } else {
                    if negation_rule.applies {
                        log::warn!(
                            "Negation for {} needs {}; summing unsigned amounts",
                            intent.metric_type,
                            Table::RollupMapping
                        );
                    }
                    measures.push((format!("SUM({value})"), format!("total_{measure}")));
                }
            }
            None => measures.push(("COUNT(*)".to_string(), "row_count".to_string())),
        }

        let filter = self.catalog.scenario_filter(intent.scenario);
        let mut predicates = vec![self.qualify_predicate(filter.predicate_expression, Some(anchor))];
        if negation == NegationDecision::Applied {
            predicates.push(format!(
                "{}.is_compensation = 1",
                Table::RollupMapping.alias()
            ));
        }
        if let Some(window) = intent.time_window {
            if is_joined(Table::AccountingPeriod) {
                let ap = Table::AccountingPeriod.alias();
                predicates.push(format!("{ap}.fiscal_year = {}", self.reporting_year(intent)));
                match (window.quarter(), window.reporting_year()) {
                    (Some(quarter), Some(_)) => {
                        predicates.push(format!("{ap}.fiscal_quarter = {quarter}"))
                    }
                    (Some(quarter), None) => log::warn!(
                        "Q{} {} is not a reporting year; dropping the quarter filter",
                        quarter,
                        window.year()
                    ),
                    (None, _) => {}
                }
            }
        }

        let summary_key = self.reconciliation_key(intent, tables, anchor);

        let mut group_by: Vec<String> = dimensions
            .iter()
            .map(|(table, column)| format!("{}.{}", table.alias(), column))
            .collect();
        if let Some(key) = summary_key {
            group_by.extend(key.fact_columns().map(|c| format!("{fact_alias}.{c}")));
        }
        let select: Vec<String> = group_by
            .iter()
            .cloned()
            .chain(measures.iter().map(|(expr, name)| format!("{expr} AS {name}")))
            .collect();

        let mut lines = vec![
            format!("SELECT {}", select.join(", ")),
            format!("FROM {} {}", anchor.name(), fact_alias),
        ];
        for (table, key) in &joins {
            lines.push(format!(
                "JOIN {} {} ON {}",
                table.name(),
                table.alias(),
                key.on_clause(fact_alias, table.alias())
            ));
        }
        lines.push(format!("WHERE {}", predicates.join(" AND ")));
        if !group_by.is_empty() {
            lines.push(format!("GROUP BY {}", group_by.join(", ")));
        }

        if let Some(key) = summary_key {
            lines = self.reconcile(lines, key, &dimensions, &measures);
        }

        Ok(GeneratedQuery {
            sql_text: lines.join("\n"),
            decisions: DecisionRecord {
                negation,
                scenario: filter.name().to_string(),
                currency,
                rollups: self.rollups(intent),
            },
            provenance: Provenance::Custom,
        })
    }

    /// Join key to the GL summary when the query should reconcile against it
    fn reconciliation_key(
        &self,
        intent: &Intent,
        tables: &TableSet,
        anchor: Table,
    ) -> Option<&'a JoinKey> {
        let summary = Table::PersonnelSummary;
        if anchor == summary
            || !tables.contains(summary)
            || !self.catalog.can_join(anchor, summary)
        {
            return None;
        }
        if intent.aggregation_level == AggregationLevel::EmployeeLevel {
            log::warn!("{} has no employee grain; skipping GL reconciliation", summary);
            return None;
        }
        self.catalog.join_key(summary)
    }

    /// Wrap the fact query, aggregated to the summary's key, and compare it
    /// with the summary pre-aggregated to the same key.
    ///
    /// The summary holds one row per category rollup, so joining it directly
    /// would repeat both sides of the comparison.
    fn reconcile(
        &self,
        fact_lines: Vec<String>,
        key: &JoinKey,
        dimensions: &[(Table, &'static str)],
        measures: &[(String, String)],
    ) -> Vec<String> {
        let summary = Table::PersonnelSummary;
        let ps = summary.alias();
        let key_columns: Vec<&str> = key.table_columns().collect();

        let mut select: Vec<String> = dimensions
            .iter()
            .map(|(_, column)| format!("{FACT_TOTALS}.{column}"))
            .collect();
        let group_by = select.clone();
        select.extend(
            measures
                .iter()
                .map(|(_, name)| format!("SUM({FACT_TOTALS}.{name}) AS {name}")),
        );
        if let Some(gl) = self.catalog.table(summary).primary_measure() {
            select.push(format!("SUM({ps}.{gl}) AS gl_{gl}"));
        }
        let gl = self
            .catalog
            .table(summary)
            .primary_measure()
            .map(|gl| format!(", SUM({gl}) AS {gl}"))
            .unwrap_or_default();

        let mut lines = vec![format!("WITH {FACT_TOTALS} AS (")];
        lines.extend(fact_lines);
        lines.push(")".to_string());
        lines.push(format!("SELECT {}", select.join(", ")));
        lines.push(format!("FROM {FACT_TOTALS}"));
        lines.push(format!(
            "LEFT JOIN (SELECT {cols}{gl} FROM {name} GROUP BY {cols}) {ps} ON {on}",
            cols = key_columns.join(", "),
            name = summary.name(),
            on = key.on_clause(FACT_TOTALS, ps)
        ));
        if !group_by.is_empty() {
            lines.push(format!("GROUP BY {}", group_by.join(", ")));
        }
        lines
    }

    /// Prefix the bare column names of a catalog predicate that `table`
    /// declares with its alias.
    fn qualify_predicate(&self, predicate: &str, table: Option<Table>) -> String {
        let Some(table) = table else {
            return predicate.to_string();
        };
        let def = self.catalog.table(table);
        predicate_token_pattern()
            .replace_all(predicate, |caps: &Captures<'_>| {
                let token = &caps[0];
                if def.has_column(token) {
                    format!("{}.{}", table.alias(), token)
                } else {
                    token.to_string()
                }
            })
            .into_owned()
    }

    /// Express `amount` in the target currency through `currency_master`
    fn convert(&self, amount: &str, target: CurrencyCode) -> SqlResult<String> {
        let rate_column = self
            .catalog
            .table(Table::CurrencyMaster)
            .primary_measure()
            .ok_or_else(|| CoreError::CatalogLookup {
                kind: "measure",
                key: Table::CurrencyMaster.to_string(),
            })?;
        let rate = format!("{}.{}", Table::CurrencyMaster.alias(), rate_column);
        let usd = self.catalog.conversion_expression(amount, &rate)?;
        Ok(match target {
            CurrencyCode::Usd => usd,
            CurrencyCode::Inr => format!(
                "{usd} / (SELECT {rate_column} FROM {} WHERE currency_id = '{}')",
                Table::CurrencyMaster.name(),
                target.as_str()
            ),
        })
    }

    /// Year from the time window, else the configured default
    fn reporting_year(&self, intent: &Intent) -> Year {
        intent
            .time_window
            .and_then(|window| window.reporting_year())
            .unwrap_or_else(|| {
                log::warn!("No reporting year in question, using {}", self.default_year);
                self.default_year
            })
    }

    fn rollups(&self, intent: &Intent) -> Vec<String> {
        if intent.metric_type == MetricType::FullyLoadedCost {
            self.catalog
                .fully_loaded_rollups()
                .iter()
                .map(|r| r.to_string())
                .collect()
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
#[path = "synthesizer_test.rs"]
mod tests;
