//! Intent classification.
//!
//! Each axis of an [`Intent`] is decided by its own ordered rule list. Rules
//! are checked top to bottom against the lower-cased question and the first
//! match wins; there is no scoring and no backtracking. A question that
//! matches nothing keeps the axis default, so classification never fails.

use crate::intent::{AggregationLevel, CurrencyCode, Intent, MetricType, Scenario, TimeWindow, Year};
use regex::Regex;
use std::sync::OnceLock;

/// Phrase condition for a rule
#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    /// Any one of the phrases appears
    Any(&'static [&'static str]),
    /// Every phrase appears
    All(&'static [&'static str]),
}

impl Trigger {
    /// Whether the trigger fires on normalized text
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Trigger::Any(phrases) => phrases.iter().any(|p| text.contains(p)),
            Trigger::All(phrases) => phrases.iter().all(|p| text.contains(p)),
        }
    }
}

/// One entry of an ordered rule list
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule<T> {
    pub trigger: Trigger,
    pub value: T,
}

/// Metric rules, in precedence order
pub const METRIC_RULES: &[KeywordRule<MetricType>] = &[
    KeywordRule {
        trigger: Trigger::Any(&["fully loaded cost", "total cost"]),
        value: MetricType::FullyLoadedCost,
    },
    KeywordRule {
        trigger: Trigger::All(&["benefits", "ratio"]),
        value: MetricType::BenefitsRatio,
    },
    KeywordRule {
        trigger: Trigger::Any(&["headcount", "movement"]),
        value: MetricType::HeadcountMovement,
    },
    KeywordRule {
        trigger: Trigger::Any(&["salary"]),
        value: MetricType::Salary,
    },
];

/// Scenario rules, in precedence order
pub const SCENARIO_RULES: &[KeywordRule<Scenario>] = &[
    KeywordRule {
        trigger: Trigger::Any(&["current year", "to date"]),
        value: Scenario::CurrentYearTotals,
    },
    KeywordRule {
        trigger: Trigger::Any(&["budget"]),
        value: Scenario::BudgetVsActual,
    },
    KeywordRule {
        trigger: Trigger::Any(&["forecast"]),
        value: Scenario::CurrentYearTotals,
    },
];

/// Aggregation rules, in precedence order.
///
/// Department and location only trigger on grouping phrases; a bare name
/// such as "Engineering department" is a filter subject, not a grain.
pub const AGGREGATION_RULES: &[KeywordRule<AggregationLevel>] = &[
    KeywordRule {
        trigger: Trigger::Any(&["per employee", "by employee"]),
        value: AggregationLevel::EmployeeLevel,
    },
    KeywordRule {
        trigger: Trigger::Any(&[
            "by department",
            "per department",
            "each department",
            "departments",
            "department level",
            "department-wise",
            "department wise",
        ]),
        value: AggregationLevel::Department,
    },
    KeywordRule {
        trigger: Trigger::Any(&[
            "by location",
            "per location",
            "each location",
            "locations",
            "location level",
            "location-wise",
            "location wise",
        ]),
        value: AggregationLevel::Location,
    },
];

/// Currency rules, in precedence order
pub const CURRENCY_RULES: &[KeywordRule<CurrencyCode>] = &[
    KeywordRule {
        trigger: Trigger::Any(&["inr", "rupees"]),
        value: CurrencyCode::Inr,
    },
    KeywordRule {
        trigger: Trigger::Any(&["usd", "dollars"]),
        value: CurrencyCode::Usd,
    },
];

/// Return the value of the first rule whose trigger fires
pub fn first_match<T: Copy>(rules: &[KeywordRule<T>], text: &str) -> Option<T> {
    rules
        .iter()
        .find(|rule| rule.trigger.matches(text))
        .map(|rule| rule.value)
}

fn normalize(question: &str) -> String {
    question.to_lowercase()
}

/// Classify the metric axis
pub fn classify_metric(question: &str) -> MetricType {
    first_match(METRIC_RULES, &normalize(question)).unwrap_or_default()
}

/// Classify the scenario axis
pub fn classify_scenario(question: &str) -> Scenario {
    first_match(SCENARIO_RULES, &normalize(question)).unwrap_or_default()
}

/// Classify the aggregation axis
pub fn classify_aggregation(question: &str) -> AggregationLevel {
    first_match(AGGREGATION_RULES, &normalize(question)).unwrap_or_default()
}

/// Detect a requested reporting currency
pub fn classify_currency(question: &str) -> Option<CurrencyCode> {
    first_match(CURRENCY_RULES, &normalize(question))
}

fn quarter_pattern() -> &'static Regex {
    static QUARTER_RE: OnceLock<Regex> = OnceLock::new();
    QUARTER_RE.get_or_init(|| Regex::new(r"\bq([1-4])(?:\s*(\d{4}))?\b").expect("valid regex"))
}

fn reconciliation_pattern() -> &'static Regex {
    static RECONCILE_RE: OnceLock<Regex> = OnceLock::new();
    RECONCILE_RE.get_or_init(|| {
        Regex::new(r"\breconcil|\bgeneral ledger\b|\bgl\b").expect("valid regex")
    })
}

/// Whether the question asks to reconcile against the GL summary
pub fn requests_reconciliation(question: &str) -> bool {
    reconciliation_pattern().is_match(&question.to_lowercase())
}

fn year_pattern() -> &'static Regex {
    static YEAR_RE: OnceLock<Regex> = OnceLock::new();
    YEAR_RE.get_or_init(|| Regex::new(r"\b(20\d{2})\b").expect("valid regex"))
}

/// Extract the reporting period.
///
/// A quarter without its own year borrows the first `20xx` year in the
/// text, else `default_year`. A bare `20xx` year is a whole-year window.
pub fn extract_time_window(question: &str, default_year: Year) -> Option<TimeWindow> {
    let text = question.to_lowercase();
    let year_in_text = year_pattern()
        .captures(&text)
        .and_then(|caps| Year::parse(&caps[1]));

    if let Some(caps) = quarter_pattern().captures(&text) {
        let quarter = caps[1].parse::<u8>().ok()?;
        let year = caps
            .get(2)
            .and_then(|m| Year::parse(m.as_str()))
            .or(year_in_text)
            .unwrap_or_else(|| {
                log::warn!(
                    "Quarter Q{} has no year, defaulting to {}",
                    quarter,
                    default_year
                );
                default_year
            });
        return Some(TimeWindow::Quarter { quarter, year });
    }

    year_in_text.map(TimeWindow::Year)
}

/// Classify a question into an [`Intent`].
///
/// Never fails: empty or unrecognized text yields the all-defaults intent
/// with an unknown metric.
pub fn classify_intent(question: &str, default_year: Year) -> Intent {
    let text = normalize(question);
    let target_currency = first_match(CURRENCY_RULES, &text);

    let intent = Intent {
        metric_type: first_match(METRIC_RULES, &text).unwrap_or_default(),
        scenario: first_match(SCENARIO_RULES, &text).unwrap_or_default(),
        aggregation_level: first_match(AGGREGATION_RULES, &text).unwrap_or_default(),
        time_window: extract_time_window(question, default_year),
        requires_currency_conversion: target_currency.is_some(),
        target_currency,
        include_gl_reconciliation: requests_reconciliation(question),
    };

    log::debug!(
        "Classified intent: metric={} scenario={} aggregation={} window={}",
        intent.metric_type,
        intent.scenario,
        intent.aggregation_level,
        intent
            .time_window
            .map(|w| w.to_string())
            .unwrap_or_else(|| "none".to_string())
    );

    intent
}

#[cfg(test)]
#[path = "classifier_test.rs"]
mod tests;
