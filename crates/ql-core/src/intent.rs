//! Structured classification of a natural-language question

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which business metric a question asks about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    /// Salary, benefits and taxes with negation applied
    FullyLoadedCost,
    /// Benefits relative to salary
    BenefitsRatio,
    /// Hires, terminations and transfers
    HeadcountMovement,
    /// Salary amounts only
    Salary,
    /// Nothing recognizable
    #[default]
    Unknown,
}

impl MetricType {
    /// Every metric type
    pub const ALL: [MetricType; 5] = [
        MetricType::FullyLoadedCost,
        MetricType::BenefitsRatio,
        MetricType::HeadcountMovement,
        MetricType::Salary,
        MetricType::Unknown,
    ];

    /// Catalog key
    pub fn as_str(self) -> &'static str {
        match self {
            MetricType::FullyLoadedCost => "fully_loaded_cost",
            MetricType::BenefitsRatio => "benefits_ratio",
            MetricType::HeadcountMovement => "headcount_movement",
            MetricType::Salary => "salary",
            MetricType::Unknown => "unknown",
        }
    }

    /// Whether the classifier recognized a metric
    pub fn is_known(self) -> bool {
        self != MetricType::Unknown
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricType {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        MetricType::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| CoreError::CatalogLookup {
                kind: "metric type",
                key: s.to_string(),
            })
    }
}

/// Named filter profile applied to the fact data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Closed actual periods only
    #[default]
    HistoricalActualsOnly,
    /// Current fiscal year actuals plus forecast
    CurrentYearTotals,
    /// Budget alongside actuals
    BudgetVsActual,
}

impl Scenario {
    /// Every scenario
    pub const ALL: [Scenario; 3] = [
        Scenario::HistoricalActualsOnly,
        Scenario::CurrentYearTotals,
        Scenario::BudgetVsActual,
    ];

    /// Catalog key
    pub fn as_str(self) -> &'static str {
        match self {
            Scenario::HistoricalActualsOnly => "historical_actuals_only",
            Scenario::CurrentYearTotals => "current_year_totals",
            Scenario::BudgetVsActual => "budget_vs_actual",
        }
    }

    /// Look up a scenario by catalog key
    pub fn from_name(name: &str) -> Option<Scenario> {
        Scenario::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grouping grain of the answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationLevel {
    /// One row per employee
    EmployeeLevel,
    /// One row per department
    Department,
    /// One row per location
    Location,
    /// A single company-wide row
    #[default]
    Company,
}

impl AggregationLevel {
    /// Catalog key
    pub fn as_str(self) -> &'static str {
        match self {
            AggregationLevel::EmployeeLevel => "employee_level",
            AggregationLevel::Department => "department",
            AggregationLevel::Location => "location",
            AggregationLevel::Company => "company",
        }
    }
}

impl fmt::Display for AggregationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A four-digit calendar year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Year(u16);

impl Year {
    /// Fixed fallback used when a question names no year. A placeholder in
    /// the business rules, not the current calendar year.
    pub const FALLBACK: Year = Year(2025);

    /// Create a year, returning `None` unless it has exactly four digits
    pub fn new(year: u16) -> Option<Self> {
        (1000..=9999).contains(&year).then_some(Self(year))
    }

    /// Parse a year from exactly four ASCII digits
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse().ok().and_then(Self::new)
    }

    /// The numeric value
    pub fn value(self) -> u16 {
        self.0
    }

    /// Whether the year matches the `20xx` reporting pattern
    pub fn is_reporting_year(self) -> bool {
        (2000..=2099).contains(&self.0)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Year {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Year::parse(&s).ok_or_else(|| format!("'{}' is not a four-digit year", s))
    }
}

impl From<Year> for String {
    fn from(year: Year) -> Self {
        year.to_string()
    }
}

/// Reporting period extracted from a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeWindow {
    /// A fiscal quarter (1-4) of a year
    Quarter { quarter: u8, year: Year },
    /// A whole year
    Year(Year),
}

impl TimeWindow {
    /// The window's year, whatever its shape
    pub fn year(self) -> Year {
        match self {
            TimeWindow::Quarter { year, .. } | TimeWindow::Year(year) => year,
        }
    }

    /// The window's quarter, if any
    pub fn quarter(self) -> Option<u8> {
        match self {
            TimeWindow::Quarter { quarter, .. } => Some(quarter),
            TimeWindow::Year(_) => None,
        }
    }

    /// The year when it matches the `20xx` reporting pattern
    pub fn reporting_year(self) -> Option<Year> {
        Some(self.year()).filter(|y| y.is_reporting_year())
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeWindow::Quarter { quarter, year } => write!(f, "Q{} {}", quarter, year),
            TimeWindow::Year(year) => write!(f, "{}", year),
        }
    }
}

impl FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(rest) = s.strip_prefix(['Q', 'q']) {
            let (quarter, year) = rest
                .split_once(' ')
                .ok_or_else(|| format!("'{}' is missing a year", s))?;
            let quarter = quarter
                .parse::<u8>()
                .ok()
                .filter(|q| (1..=4).contains(q))
                .ok_or_else(|| format!("'{}' has no quarter between 1 and 4", s))?;
            let year = Year::parse(year.trim())
                .ok_or_else(|| format!("'{}' has no four-digit year", s))?;
            return Ok(TimeWindow::Quarter { quarter, year });
        }
        Year::parse(s)
            .map(TimeWindow::Year)
            .ok_or_else(|| format!("'{}' is not a quarter or a year", s))
    }
}

impl TryFrom<String> for TimeWindow {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TimeWindow> for String {
    fn from(window: TimeWindow) -> Self {
        window.to_string()
    }
}

/// Target reporting currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    /// Indian rupee
    Inr,
    /// US dollar
    Usd,
}

impl CurrencyCode {
    /// Three-letter ISO code
    pub fn as_str(self) -> &'static str {
        match self {
            CurrencyCode::Inr => "INR",
            CurrencyCode::Usd => "USD",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured intent of a question.
///
/// Every axis always has a value; unmatched text leaves the documented
/// defaults in place.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Intent {
    pub metric_type: MetricType,
    pub scenario: Scenario,
    pub aggregation_level: AggregationLevel,
    #[serde(default)]
    pub time_window: Option<TimeWindow>,
    #[serde(default)]
    pub requires_currency_conversion: bool,
    #[serde(default)]
    pub target_currency: Option<CurrencyCode>,
    /// Whether the question asks to reconcile against the GL summary
    #[serde(default)]
    pub include_gl_reconciliation: bool,
}

impl Intent {
    /// Whether a template variant keyed by employee grain applies
    pub fn is_per_employee(&self) -> bool {
        self.aggregation_level == AggregationLevel::EmployeeLevel
    }
}

#[cfg(test)]
#[path = "intent_test.rs"]
mod tests;
