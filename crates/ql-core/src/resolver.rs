//! Table resolution: which catalog tables a query over an intent needs

use crate::intent::{Intent, MetricType};
use crate::table::{Table, TableSet};

/// Fact table carrying the measures for a metric, if any
pub fn fact_table_for(metric_type: MetricType) -> Option<Table> {
    match metric_type {
        MetricType::FullyLoadedCost | MetricType::Salary | MetricType::BenefitsRatio => {
            Some(Table::PersonnelDetails)
        }
        MetricType::HeadcountMovement => Some(Table::PersonnelHeadcount),
        MetricType::Unknown => None,
    }
}

/// Whether a metric folds compensation categories through the rollup mapping
pub fn needs_rollup_mapping(metric_type: MetricType) -> bool {
    matches!(
        metric_type,
        MetricType::FullyLoadedCost | MetricType::BenefitsRatio
    )
}

/// Resolve the table set for an intent.
///
/// The three masters are always present, so the result is never empty. An
/// unknown metric resolves to the masters alone.
pub fn resolve_tables(intent: &Intent) -> TableSet {
    let mut tables: TableSet = Table::MASTERS.into_iter().collect();

    if let Some(fact) = fact_table_for(intent.metric_type) {
        tables.insert(fact);
    }
    if needs_rollup_mapping(intent.metric_type) {
        tables.insert(Table::RollupMapping);
    }
    if intent.requires_currency_conversion {
        tables.insert(Table::CurrencyMaster);
    }
    if intent.include_gl_reconciliation {
        tables.insert(Table::PersonnelSummary);
    }

    log::debug!(
        "Resolved {} tables: {}",
        tables.len(),
        tables
            .iter()
            .map(Table::name)
            .collect::<Vec<_>>()
            .join(", ")
    );
    tables
}
