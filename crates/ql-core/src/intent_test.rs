use super::*;

#[test]
fn test_intent_defaults() {
    let intent = Intent::default();
    assert_eq!(intent.metric_type, MetricType::Unknown);
    assert_eq!(intent.scenario, Scenario::HistoricalActualsOnly);
    assert_eq!(intent.aggregation_level, AggregationLevel::Company);
    assert_eq!(intent.time_window, None);
    assert!(!intent.requires_currency_conversion);
    assert_eq!(intent.target_currency, None);
}

#[test]
fn test_metric_type_from_catalog_key() {
    assert_eq!(
        "benefits_ratio".parse::<MetricType>().unwrap(),
        MetricType::BenefitsRatio
    );
    let err = "attrition_rate".parse::<MetricType>().unwrap_err();
    assert!(
        matches!(err, CoreError::CatalogLookup { kind: "metric type", ref key } if key == "attrition_rate")
    );
}

#[test]
fn test_scenario_from_name() {
    assert_eq!(
        Scenario::from_name("budget_vs_actual"),
        Some(Scenario::BudgetVsActual)
    );
    assert_eq!(Scenario::from_name("what_if"), None);
}

#[test]
fn test_year_requires_four_digits() {
    assert_eq!(Year::parse("2025").map(Year::value), Some(2025));
    assert!(Year::parse("25").is_none());
    assert!(Year::parse("20255").is_none());
    assert!(Year::parse("20x5").is_none());
    assert!(Year::new(999).is_none());
}

#[test]
fn test_reporting_year_pattern() {
    assert!(Year::parse("2031").unwrap().is_reporting_year());
    assert!(!Year::parse("1999").unwrap().is_reporting_year());

    let old = TimeWindow::Quarter {
        quarter: 2,
        year: Year::parse("1998").unwrap(),
    };
    assert_eq!(old.reporting_year(), None);
    assert_eq!(old.quarter(), Some(2));
}

#[test]
fn test_time_window_display_and_parse() {
    let q1: TimeWindow = "Q1 2025".parse().unwrap();
    assert_eq!(
        q1,
        TimeWindow::Quarter {
            quarter: 1,
            year: Year::parse("2025").unwrap()
        }
    );
    assert_eq!(q1.to_string(), "Q1 2025");

    let year: TimeWindow = "2024".parse().unwrap();
    assert_eq!(year.to_string(), "2024");
    assert_eq!(year.quarter(), None);

    assert!("Q5 2025".parse::<TimeWindow>().is_err());
    assert!("Q3".parse::<TimeWindow>().is_err());
    assert!("next year".parse::<TimeWindow>().is_err());
}

#[test]
fn test_intent_serializes_with_catalog_keys() {
    let intent = Intent {
        metric_type: MetricType::FullyLoadedCost,
        aggregation_level: AggregationLevel::EmployeeLevel,
        time_window: Some("Q1 2025".parse().unwrap()),
        requires_currency_conversion: true,
        target_currency: Some(CurrencyCode::Inr),
        ..Intent::default()
    };
    let json = serde_json::to_value(&intent).unwrap();
    assert_eq!(json["metric_type"], "fully_loaded_cost");
    assert_eq!(json["scenario"], "historical_actuals_only");
    assert_eq!(json["aggregation_level"], "employee_level");
    assert_eq!(json["time_window"], "Q1 2025");
    assert_eq!(json["target_currency"], "INR");

    let back: Intent = serde_json::from_value(json).unwrap();
    assert_eq!(back, intent);
}

#[test]
fn test_intent_deserialize_rejects_unknown_metric() {
    let json = r#"{"metric_type":"attrition","scenario":"budget_vs_actual","aggregation_level":"company"}"#;
    assert!(serde_json::from_str::<Intent>(json).is_err());
}
