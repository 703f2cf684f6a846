//! Business rules: negation, scenario filters, currency and join rules

use crate::intent::{MetricType, Scenario};
use ql_jinja::SqlTemplate;
use serde::Serialize;

/// Whether cost amounts are sign-flipped for a metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NegationRule {
    pub metric_type: MetricType,
    pub applies: bool,
    /// Compensation categories the rule folds in
    pub compensation_categories: &'static [&'static str],
    /// Calculation the metric uses instead of a signed sum, if any
    pub calculation: Option<&'static str>,
    pub description: &'static str,
}

/// Predicate applied to fact data for a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioFilter {
    pub scenario: Scenario,
    pub predicate_expression: &'static str,
    pub description: &'static str,
}

impl ScenarioFilter {
    /// Catalog name of the filter
    pub fn name(&self) -> &'static str {
        self.scenario.as_str()
    }
}

/// Currency handling for multi-currency amounts
#[derive(Debug, Clone, Serialize)]
pub struct CurrencyRule {
    pub multi_currency_join_required: bool,
    pub description: &'static str,
    /// Expression template with `amount` and `rate` slots
    pub conversion_expression: SqlTemplate,
    /// Column the conversion rate is read from
    pub rate_source: &'static str,
}

/// A join-construction constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinConstraint {
    /// Masters are joined by their ID columns only
    MastersById,
    /// Periods map via `accounting_period = name`
    PeriodByName,
    /// Large fact tables take partition filters
    PartitionFilters,
}

/// An ordered join rule with its human-readable statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinRule {
    pub constraint: JoinConstraint,
    pub description: &'static str,
}

/// Categories folded into a fully loaded cost
pub(crate) const FULLY_LOADED_ROLLUPS: &[&str] = &["salary", "benefits", "taxes"];

pub(crate) fn negation_rule_for(metric_type: MetricType) -> NegationRule {
    match metric_type {
        MetricType::FullyLoadedCost => NegationRule {
            metric_type,
            applies: true,
            compensation_categories: &["salary", "benefits", "taxes", "other_compensation"],
            calculation: None,
            description: "Sum of all compensation categories with negation applied",
        },
        MetricType::BenefitsRatio => NegationRule {
            metric_type,
            applies: false,
            compensation_categories: &["benefits", "salary"],
            calculation: Some("benefits / salary"),
            description: "Ratio calculations don't apply negation",
        },
        MetricType::HeadcountMovement => NegationRule {
            metric_type,
            applies: false,
            compensation_categories: &[],
            calculation: None,
            description: "Headcount counts employees, not amounts",
        },
        MetricType::Salary => NegationRule {
            metric_type,
            applies: false,
            compensation_categories: &["salary"],
            calculation: None,
            description: "Salary amounts are reported as booked",
        },
        MetricType::Unknown => NegationRule {
            metric_type,
            applies: false,
            compensation_categories: &[],
            calculation: None,
            description: "No metric recognized; amounts are left unsigned",
        },
    }
}

pub(crate) fn scenario_filter_for(scenario: Scenario) -> ScenarioFilter {
    match scenario {
        Scenario::HistoricalActualsOnly => ScenarioFilter {
            scenario,
            predicate_expression: "plan_version_name = 'actual' AND closed = 1",
            description: "Only closed actual periods",
        },
        Scenario::CurrentYearTotals => ScenarioFilter {
            scenario,
            predicate_expression:
                "fiscal_year = YEAR(CURRENT_DATE) AND plan_version_name IN ('actual', 'forecast')",
            description: "Current fiscal year actuals and forecast",
        },
        Scenario::BudgetVsActual => ScenarioFilter {
            scenario,
            predicate_expression: "plan_version_name IN ('actual', 'budget')",
            description: "Compare budget to actuals",
        },
    }
}

pub(crate) fn builtin_join_rules() -> Vec<JoinRule> {
    vec![
        JoinRule {
            constraint: JoinConstraint::MastersById,
            description: "Always join masters by ID fields only",
        },
        JoinRule {
            constraint: JoinConstraint::PeriodByName,
            description: "Map periods via a_personnel_details.accounting_period = m_accounting_period.name",
        },
        JoinRule {
            constraint: JoinConstraint::PartitionFilters,
            description: "Include partition filters for large tables",
        },
    ]
}
