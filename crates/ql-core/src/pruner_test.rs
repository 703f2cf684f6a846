use super::*;
use crate::catalog::TemplateKey;
use crate::intent::{Intent, MetricType};
use crate::resolver::resolve_tables;
use regex::Regex;

fn catalog() -> RuleCatalog {
    RuleCatalog::builtin().unwrap()
}

fn all_tables() -> TableSet {
    Table::ALL.into_iter().collect()
}

#[test]
fn test_prunes_to_selected_tables() {
    let catalog = catalog();
    let tables = resolve_tables(&Intent {
        metric_type: MetricType::Salary,
        ..Intent::default()
    });
    let schema = prune_schema(&catalog, &tables);
    assert_eq!(schema.tables().collect::<TableSet>(), tables);
    assert_eq!(
        schema.columns(Table::Department),
        Some(&["department_id", "department_name"][..])
    );
    assert!(schema.columns(Table::RollupMapping).is_none());
}

#[test]
fn test_pruned_columns_are_declared_columns() {
    let catalog = catalog();
    let schema = prune_schema(&catalog, &all_tables());
    for (table, columns) in schema.iter() {
        let def = catalog.table(table);
        for column in columns {
            assert!(def.has_column(column), "{}.{} is not declared", table, column);
        }
        assert!(columns.len() <= def.columns.len());
    }
}

#[test]
fn test_pruning_drops_non_essential_columns() {
    let catalog = catalog();
    let schema = prune_schema(&catalog, &all_tables());
    assert!(!schema.contains(Table::Department, "parent_department_id"));
    assert!(!schema.contains(Table::Location, "region"));
    assert!(schema.contains(Table::AccountingPeriod, "name"));
}

#[test]
fn test_empty_table_set_prunes_to_empty() {
    assert!(prune_schema(&catalog(), &TableSet::new()).is_empty());
}

#[test]
fn test_serializes_by_table_name() {
    let catalog = catalog();
    let tables: TableSet = [Table::CurrencyMaster].into_iter().collect();
    let json = serde_json::to_string(&prune_schema(&catalog, &tables)).unwrap();
    assert_eq!(
        json,
        r#"{"currency_master":["currency_id","conversion_rate_to_usd"]}"#
    );
}

// Conformance: every column a join key, measure or template touches must
// survive pruning.

#[test]
fn test_join_key_columns_are_essential() {
    let catalog = catalog();
    let schema = prune_schema(&catalog, &all_tables());
    let facts = [Table::PersonnelDetails, Table::PersonnelHeadcount];

    for table in Table::ALL {
        let Some(key) = catalog.join_key(table) else {
            continue;
        };
        for column in key.table_columns() {
            assert!(schema.contains(table, column), "{}.{}", table, column);
        }
        for fact in facts {
            if catalog.can_join(fact, table) {
                for column in key.fact_columns() {
                    assert!(schema.contains(fact, column), "{}.{}", fact, column);
                }
            }
        }
    }
}

#[test]
fn test_measure_columns_are_essential() {
    let catalog = catalog();
    let schema = prune_schema(&catalog, &all_tables());
    for def in catalog.tables() {
        for measure in &def.measures {
            assert!(
                schema.contains(def.table, measure),
                "{}.{}",
                def.table,
                measure
            );
        }
    }
}

#[test]
fn test_template_columns_are_essential() {
    let catalog = catalog();
    let schema = prune_schema(&catalog, &all_tables());
    let column_ref = Regex::new(r"\b([a-z]+)\.([a-z_0-9]+)\b").unwrap();

    for (key, template) in catalog.templates() {
        let mut checked = 0;
        for caps in column_ref.captures_iter(template.text()) {
            let Some(table) = Table::ALL.into_iter().find(|t| t.alias() == &caps[1]) else {
                continue;
            };
            assert!(
                schema.contains(table, &caps[2]),
                "template {} uses {}.{} which pruning drops",
                key,
                table,
                &caps[2]
            );
            checked += 1;
        }
        assert!(checked > 0, "template {} references no columns", key);
    }
}

#[test]
fn test_template_tables_are_resolved() {
    let catalog = catalog();
    for (key, template) in catalog.templates() {
        let TemplateKey { metric_type, .. } = *key;
        let tables = resolve_tables(&Intent {
            metric_type,
            ..Intent::default()
        });
        for table in Table::ALL {
            let from = format!(" {} {}", table.name(), table.alias());
            if template.text().contains(&from) {
                assert!(tables.contains(table), "{} needs {}", key, table);
            }
        }
    }
}
