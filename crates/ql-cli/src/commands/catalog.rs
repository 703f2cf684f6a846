//! Catalog command implementation

use crate::cli::{CatalogArgs, CatalogSection, GlobalArgs, OutputFormat};
use crate::commands::common::{self, format_table, print_json, print_lines};
use anyhow::Result;
use ql_core::{
    CurrencyRule, JoinRule, MetricType, NegationRule, RuleCatalog, ScenarioFilter, TableDef,
};
use ql_sql::Validator;
use serde::Serialize;

/// JSON view of the selected catalog sections
#[derive(Serialize)]
struct CatalogView<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    tables: Option<&'a [TableDef]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rules: Option<RulesView<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    templates: Option<Vec<TemplateView<'a>>>,
}

#[derive(Serialize)]
struct RulesView<'a> {
    negation: &'a [NegationRule],
    scenario_filters: &'a [ScenarioFilter],
    currency: &'a CurrencyRule,
    joins: &'a [JoinRule],
    fully_loaded_rollups: &'static [&'static str],
    checks: Vec<CheckView>,
}

#[derive(Serialize)]
struct CheckView {
    name: &'static str,
    description: &'static str,
}

#[derive(Serialize)]
struct TemplateView<'a> {
    key: String,
    metric_type: MetricType,
    per_employee: bool,
    slots: Vec<&'a str>,
    text: &'a str,
}

/// Execute the catalog command
pub(crate) fn execute(args: &CatalogArgs, global: &GlobalArgs) -> Result<()> {
    let pipeline = common::build_pipeline(global)?;
    let catalog = pipeline.catalog();
    let validator = pipeline.validator();

    match args.output {
        OutputFormat::Json => print_json(&catalog_view(catalog, validator, args.section))?,
        OutputFormat::Text => {
            print_lines(&format_catalog(catalog, validator, args.section, args.columns))
        }
    }
    Ok(())
}

fn catalog_view<'a>(
    catalog: &'a RuleCatalog,
    validator: &Validator,
    section: CatalogSection,
) -> CatalogView<'a> {
    CatalogView {
        tables: section
            .includes(CatalogSection::Tables)
            .then(|| catalog.tables()),
        rules: section
            .includes(CatalogSection::Rules)
            .then(|| RulesView {
                negation: catalog.negation_rules(),
                scenario_filters: catalog.scenario_filters(),
                currency: catalog.currency_rule(),
                joins: catalog.join_rules(),
                fully_loaded_rollups: catalog.fully_loaded_rollups(),
                checks: validator
                    .describe()
                    .into_iter()
                    .map(|(name, description)| CheckView { name, description })
                    .collect(),
            }),
        templates: section.includes(CatalogSection::Templates).then(|| {
            catalog
                .templates()
                .map(|(key, template)| TemplateView {
                    key: key.name(),
                    metric_type: key.metric_type,
                    per_employee: key.per_employee,
                    slots: template.slots().collect(),
                    text: template.text(),
                })
                .collect()
        }),
    }
}

/// Render the selected sections as text
fn format_catalog(
    catalog: &RuleCatalog,
    validator: &Validator,
    section: CatalogSection,
    show_columns: bool,
) -> Vec<String> {
    let mut lines = Vec::new();
    if section.includes(CatalogSection::Tables) {
        lines.extend(format_tables(catalog, show_columns));
    }
    if section.includes(CatalogSection::Rules) {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(format_rules(catalog, validator));
    }
    if section.includes(CatalogSection::Templates) {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(format_templates(catalog));
    }
    lines
}

fn format_tables(catalog: &RuleCatalog, show_columns: bool) -> Vec<String> {
    let rows: Vec<Vec<String>> = catalog
        .tables()
        .iter()
        .map(|def| {
            vec![
                def.table.to_string(),
                def.table.alias().to_string(),
                def.table.role().to_string(),
                def.columns.len().to_string(),
                def.essential_columns
                    .as_ref()
                    .map_or_else(|| "-".to_string(), |cols| cols.len().to_string()),
                def.description.to_string(),
            ]
        })
        .collect();

    let mut lines = vec!["Tables:".to_string()];
    lines.extend(format_table(
        &["TABLE", "ALIAS", "ROLE", "COLUMNS", "ESSENTIAL", "DESCRIPTION"],
        &rows,
    ));

    if show_columns {
        for def in catalog.tables() {
            lines.push(String::new());
            lines.push(format!("{} ({})", def.table, def.table.alias()));
            let essential = def.essential_columns.as_deref().unwrap_or(&[]);
            let rows: Vec<Vec<String>> = def
                .columns
                .iter()
                .map(|col| {
                    let marker = if essential.contains(&col.name) { "yes" } else { "" };
                    vec![col.name.to_string(), col.sql_type.to_string(), marker.to_string()]
                })
                .collect();
            lines.extend(
                format_table(&["COLUMN", "TYPE", "ESSENTIAL"], &rows)
                    .into_iter()
                    .map(|l| format!("  {}", l)),
            );
        }
    }
    lines
}

fn format_rules(catalog: &RuleCatalog, validator: &Validator) -> Vec<String> {
    let mut lines = vec!["Negation rules:".to_string()];
    let rows: Vec<Vec<String>> = catalog
        .negation_rules()
        .iter()
        .map(|rule| {
            vec![
                rule.metric_type.to_string(),
                if rule.applies { "yes" } else { "no" }.to_string(),
                rule.compensation_categories.join(", "),
                rule.description.to_string(),
            ]
        })
        .collect();
    lines.extend(format_table(
        &["METRIC", "NEGATES", "CATEGORIES", "DESCRIPTION"],
        &rows,
    ));

    lines.push(String::new());
    lines.push("Scenario filters:".to_string());
    let rows: Vec<Vec<String>> = catalog
        .scenario_filters()
        .iter()
        .map(|f| vec![f.name().to_string(), f.predicate_expression.to_string()])
        .collect();
    lines.extend(format_table(&["SCENARIO", "PREDICATE"], &rows));

    let currency = catalog.currency_rule();
    lines.push(String::new());
    lines.push("Currency:".to_string());
    lines.push(format!(
        "  conversion:     {}",
        currency.conversion_expression.text()
    ));
    lines.push(format!("  rate source:    {}", currency.rate_source));
    lines.push(format!(
        "  join required:  {}",
        if currency.multi_currency_join_required { "yes" } else { "no" }
    ));

    lines.push(String::new());
    lines.push("Join rules:".to_string());
    lines.extend(
        catalog
            .join_rules()
            .iter()
            .enumerate()
            .map(|(i, rule)| format!("  {}. {}", i + 1, rule.description)),
    );

    lines.push(String::new());
    lines.push(format!(
        "Fully loaded rollups: {}",
        catalog.fully_loaded_rollups().join(", ")
    ));

    lines.push(String::new());
    lines.push("Validation checks:".to_string());
    let rows: Vec<Vec<String>> = validator
        .describe()
        .into_iter()
        .map(|(name, description)| vec![name.to_string(), description.to_string()])
        .collect();
    lines.extend(format_table(&["CHECK", "DESCRIPTION"], &rows));
    lines
}

fn format_templates(catalog: &RuleCatalog) -> Vec<String> {
    let mut lines = vec!["Templates:".to_string()];
    for (key, template) in catalog.templates() {
        lines.push(String::new());
        lines.push(format!(
            "{} (slots: {})",
            key,
            template.slots().collect::<Vec<_>>().join(", ")
        ));
        lines.extend(template.text().trim().lines().map(|l| format!("    {}", l)));
    }
    lines
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
