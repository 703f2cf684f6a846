use super::*;

fn catalog() -> RuleCatalog {
    RuleCatalog::builtin().unwrap()
}

#[test]
fn test_tables_section_lists_every_table() {
    let catalog = catalog();
    let lines = format_catalog(&catalog, &Validator::default(), CatalogSection::Tables, false);
    assert_eq!(lines[0], "Tables:");
    assert!(lines[1].starts_with("TABLE"));
    // header, separator, then one row per table
    assert_eq!(lines.len(), 3 + catalog.tables().len());
    assert!(lines
        .iter()
        .any(|l| l.starts_with("master_rollup_mapping_details  mrm")));
    assert!(!lines.iter().any(|l| l == "Negation rules:"));
}

#[test]
fn test_tables_section_with_columns() {
    let catalog = catalog();
    let lines = format_catalog(&catalog, &Validator::default(), CatalogSection::Tables, true);
    assert!(lines.contains(&"m_accounting_period (ap)".to_string()));
    assert!(lines.iter().any(|l| l.starts_with("  region") && l.trim_end().ends_with("VARCHAR(50)")));
    assert!(lines
        .iter()
        .any(|l| l.starts_with("  location_name") && l.ends_with("yes")));
}

#[test]
fn test_rules_section() {
    let lines = format_catalog(&catalog(), &Validator::default(), CatalogSection::Rules, false);
    assert_eq!(lines[0], "Negation rules:");
    assert!(lines
        .iter()
        .any(|l| l.starts_with("fully_loaded_cost") && l.contains("salary, benefits, taxes, other_compensation")));
    assert!(lines
        .iter()
        .any(|l| l.starts_with("historical_actuals_only") && l.ends_with("plan_version_name = 'actual' AND closed = 1")));
    assert!(lines.contains(&"  conversion:     {{ amount }} * {{ rate }}".to_string()));
    assert!(lines.contains(&"Fully loaded rollups: salary, benefits, taxes".to_string()));
    assert!(lines.iter().any(|l| l.starts_with("unsafe_cast")));
    assert!(lines.iter().any(|l| l.starts_with("  3. ")));
}

#[test]
fn test_templates_section() {
    let lines = format_catalog(
        &catalog(),
        &Validator::default(),
        CatalogSection::Templates,
        false,
    );
    assert!(lines.contains(&"fully_loaded_cost_per_employee (slots: scenario_filter, year)".to_string()));
    assert!(lines.contains(&"headcount_movement (slots: year)".to_string()));
    assert!(lines.iter().any(|l| l == "    FROM a_personnel_headcount ph"));
}

#[test]
fn test_json_view_respects_section() {
    let catalog = catalog();
    let validator = Validator::default();

    let templates_only =
        serde_json::to_value(catalog_view(&catalog, &validator, CatalogSection::Templates)).unwrap();
    assert!(templates_only.get("tables").is_none());
    assert!(templates_only.get("rules").is_none());
    assert_eq!(templates_only["templates"][0]["key"], "fully_loaded_cost_per_employee");
    assert_eq!(templates_only["templates"][1]["slots"][0], "year");

    let all = serde_json::to_value(catalog_view(&catalog, &validator, CatalogSection::All)).unwrap();
    assert_eq!(all["tables"].as_array().unwrap().len(), 8);
    assert_eq!(all["rules"]["checks"].as_array().unwrap().len(), 6);
    assert_eq!(all["rules"]["fully_loaded_rollups"][2], "taxes");
}
