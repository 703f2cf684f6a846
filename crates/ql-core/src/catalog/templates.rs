//! Pre-authored metric templates

use crate::intent::{AggregationLevel, MetricType};
use serde::Serialize;
use std::fmt;

/// Named slot a metric or expression template may reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateSlot {
    /// Scenario predicate expression
    ScenarioFilter,
    /// Four-digit reporting year
    Year,
    /// Amount expression being converted
    Amount,
    /// Conversion rate expression
    Rate,
}

impl TemplateSlot {
    /// Slots available to metric templates
    pub const METRIC: [TemplateSlot; 2] = [TemplateSlot::ScenarioFilter, TemplateSlot::Year];

    /// Slots available to the currency conversion expression
    pub const CONVERSION: [TemplateSlot; 2] = [TemplateSlot::Amount, TemplateSlot::Rate];

    /// Variable name used in template text
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateSlot::ScenarioFilter => "scenario_filter",
            TemplateSlot::Year => "year",
            TemplateSlot::Amount => "amount",
            TemplateSlot::Rate => "rate",
        }
    }

    pub(crate) fn names(slots: &[TemplateSlot]) -> Vec<&'static str> {
        slots.iter().map(|s| s.as_str()).collect()
    }
}

/// Lookup key for a metric template.
///
/// `per_employee` selects the employee-grain variant; every other
/// aggregation level shares the non-employee variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TemplateKey {
    pub metric_type: MetricType,
    pub per_employee: bool,
}

impl TemplateKey {
    /// Key for a metric at an aggregation level
    pub fn for_intent(metric_type: MetricType, aggregation_level: AggregationLevel) -> Self {
        Self {
            metric_type,
            per_employee: aggregation_level == AggregationLevel::EmployeeLevel,
        }
    }

    /// Catalog name, e.g. `fully_loaded_cost_per_employee`
    pub fn name(&self) -> String {
        if self.per_employee {
            format!("{}_per_employee", self.metric_type)
        } else {
            self.metric_type.to_string()
        }
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

const FULLY_LOADED_COST_PER_EMPLOYEE: &str = r#"
SELECT
    d.department_name,
    l.location_name,
    SUM(CASE WHEN mrm.requires_negation = 1 THEN -pd.amount ELSE pd.amount END) / COUNT(DISTINCT pd.employee_id) AS cost_per_employee
FROM a_personnel_details pd
JOIN m_department d ON pd.department_id = d.department_id
JOIN m_location l ON pd.location_id = l.location_id
JOIN m_accounting_period ap ON pd.accounting_period = ap.name
JOIN master_rollup_mapping_details mrm ON pd.category = mrm.category
WHERE {{ scenario_filter }}
    AND mrm.is_compensation = 1
    AND pd.fiscal_year = {{ year }}
GROUP BY d.department_name, l.location_name
"#;

const HEADCOUNT_MOVEMENT: &str = r#"
SELECT
    ap.fiscal_quarter,
    ph.movement_type,
    COUNT(DISTINCT ph.employee_id) AS employee_count
FROM a_personnel_headcount ph
JOIN m_accounting_period ap ON ph.accounting_period = ap.name
WHERE ph.fiscal_year = {{ year }}
    AND ph.movement_type IN ('hire', 'termination')
GROUP BY ap.fiscal_quarter, ph.movement_type
ORDER BY ap.fiscal_quarter
"#;

pub(crate) const CONVERSION_EXPRESSION: &str = "{{ amount }} * {{ rate }}";

pub(crate) fn builtin_template_texts() -> [(TemplateKey, &'static str); 2] {
    [
        (
            TemplateKey {
                metric_type: MetricType::FullyLoadedCost,
                per_employee: true,
            },
            FULLY_LOADED_COST_PER_EMPLOYEE,
        ),
        (
            TemplateKey {
                metric_type: MetricType::HeadcountMovement,
                per_employee: false,
            },
            HEADCOUNT_MOVEMENT,
        ),
    ]
}
