//! The business rule catalog.
//!
//! Closed-world knowledge shared by every pipeline stage: table schemas,
//! negation rules, scenario filters, currency rules, join rules and SQL
//! templates. A catalog is built once with [`RuleCatalog::builtin`] and then
//! only ever read, so a single instance can be shared across threads.

mod rules;
mod schema;
mod templates;

pub use rules::{CurrencyRule, JoinConstraint, JoinRule, NegationRule, ScenarioFilter};
pub use schema::{ColumnDef, JoinKey, TableDef};
pub use templates::{TemplateKey, TemplateSlot};

use crate::error::{CoreError, CoreResult};
use crate::intent::{AggregationLevel, MetricType, Scenario};
use crate::table::Table;
use ql_jinja::{SlotValues, SqlTemplate, TemplateEnvironment};

/// Immutable rule catalog
pub struct RuleCatalog {
    tables: Vec<TableDef>,
    negation_rules: Vec<NegationRule>,
    scenario_filters: Vec<ScenarioFilter>,
    currency_rule: CurrencyRule,
    join_rules: Vec<JoinRule>,
    templates: Vec<(TemplateKey, SqlTemplate)>,
    env: TemplateEnvironment,
}

impl RuleCatalog {
    /// Build the compiled-in catalog.
    ///
    /// Fails only if a built-in template references a slot it may not use.
    pub fn builtin() -> CoreResult<Self> {
        let env = TemplateEnvironment::new();

        let metric_slots = TemplateSlot::names(&TemplateSlot::METRIC);
        let metric_templates = templates::builtin_template_texts()
            .into_iter()
            .map(|(key, text)| Ok((key, env.compile(&key.name(), text, &metric_slots)?)))
            .collect::<CoreResult<Vec<_>>>()?;

        let conversion_expression = env.compile(
            "currency_conversion",
            templates::CONVERSION_EXPRESSION,
            &TemplateSlot::names(&TemplateSlot::CONVERSION),
        )?;

        let currency_rule = CurrencyRule {
            multi_currency_join_required: true,
            description: "Always join currency_master when multiple currencies exist; amount * conversion_rate_to_usd for USD reporting",
            conversion_expression,
            rate_source: "currency_master.conversion_rate_to_usd",
        };

        Ok(Self {
            tables: schema::builtin_tables(),
            negation_rules: MetricType::ALL
                .into_iter()
                .map(rules::negation_rule_for)
                .collect(),
            scenario_filters: Scenario::ALL
                .into_iter()
                .map(rules::scenario_filter_for)
                .collect(),
            currency_rule,
            join_rules: rules::builtin_join_rules(),
            templates: metric_templates,
            env,
        })
    }

    /// All table definitions in catalog order
    pub fn tables(&self) -> &[TableDef] {
        &self.tables
    }

    /// Definition of one table
    pub fn table(&self, table: Table) -> &TableDef {
        // Rule vectors are indexed by enum discriminant; builtin() fills them
        // in declaration order.
        &self.tables[table as usize]
    }

    /// Columns the schema pruner keeps for a table, if it has an allow-list
    pub fn essential_columns(&self, table: Table) -> Option<&[&'static str]> {
        self.table(table).essential_columns.as_deref()
    }

    /// Key for joining `table` from a fact table
    pub fn join_key(&self, table: Table) -> Option<&JoinKey> {
        self.table(table).join_key.as_ref()
    }

    /// Whether `fact` carries every column needed to join `table`
    pub fn can_join(&self, fact: Table, table: Table) -> bool {
        let fact_def = self.table(fact);
        self.join_key(table)
            .is_some_and(|key| key.fact_columns().all(|c| fact_def.has_column(c)))
    }

    /// Negation rule for a metric type
    pub fn negation_rule(&self, metric_type: MetricType) -> &NegationRule {
        &self.negation_rules[metric_type as usize]
    }

    /// All negation rules
    pub fn negation_rules(&self) -> &[NegationRule] {
        &self.negation_rules
    }

    /// Scenario filter for a scenario
    pub fn scenario_filter(&self, scenario: Scenario) -> &ScenarioFilter {
        &self.scenario_filters[scenario as usize]
    }

    /// Scenario filter by catalog name, falling back to historical actuals
    pub fn scenario_filter_by_name(&self, name: &str) -> &ScenarioFilter {
        match Scenario::from_name(name) {
            Some(scenario) => self.scenario_filter(scenario),
            None => {
                log::warn!(
                    "Unknown scenario '{}', falling back to {}",
                    name,
                    Scenario::HistoricalActualsOnly
                );
                self.scenario_filter(Scenario::HistoricalActualsOnly)
            }
        }
    }

    /// All scenario filters
    pub fn scenario_filters(&self) -> &[ScenarioFilter] {
        &self.scenario_filters
    }

    /// Currency conversion rule
    pub fn currency_rule(&self) -> &CurrencyRule {
        &self.currency_rule
    }

    /// Ordered join rules
    pub fn join_rules(&self) -> &[JoinRule] {
        &self.join_rules
    }

    /// Categories folded into a fully loaded cost
    pub fn fully_loaded_rollups(&self) -> &'static [&'static str] {
        rules::FULLY_LOADED_ROLLUPS
    }

    /// Template for a metric type at an aggregation level, if one exists
    pub fn template(
        &self,
        metric_type: MetricType,
        aggregation_level: AggregationLevel,
    ) -> Option<&SqlTemplate> {
        let key = TemplateKey::for_intent(metric_type, aggregation_level);
        self.templates
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, tmpl)| tmpl)
    }

    /// Template by catalog name
    pub fn template_by_name(&self, name: &str) -> CoreResult<&SqlTemplate> {
        self.templates
            .iter()
            .find(|(k, _)| k.name() == name)
            .map(|(_, tmpl)| tmpl)
            .ok_or_else(|| CoreError::CatalogLookup {
                kind: "template",
                key: name.to_string(),
            })
    }

    /// All templates with their keys
    pub fn templates(&self) -> impl Iterator<Item = (&TemplateKey, &SqlTemplate)> + '_ {
        self.templates.iter().map(|(k, t)| (k, t))
    }

    /// Metric type by catalog key
    pub fn metric_type_by_name(&self, name: &str) -> CoreResult<MetricType> {
        name.parse()
    }

    /// Render a template with the given slot values
    pub fn render(&self, template: &SqlTemplate, values: &SlotValues) -> CoreResult<String> {
        Ok(self.env.render(template, values)?)
    }

    /// Render the currency conversion expression for an amount and a rate
    pub fn conversion_expression(&self, amount: &str, rate: &str) -> CoreResult<String> {
        let values = SlotValues::new()
            .with(TemplateSlot::Amount.as_str(), amount)
            .with(TemplateSlot::Rate.as_str(), rate);
        self.render(&self.currency_rule.conversion_expression, &values)
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
