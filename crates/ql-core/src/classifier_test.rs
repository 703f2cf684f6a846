use super::*;

fn classify(question: &str) -> Intent {
    classify_intent(question, Year::FALLBACK)
}

fn year(y: u16) -> Year {
    Year::new(y).unwrap()
}

#[test]
fn test_fully_loaded_cost_per_employee() {
    let intent = classify("What is the fully loaded cost per employee by department for Q1 2025?");
    assert_eq!(intent.metric_type, MetricType::FullyLoadedCost);
    assert_eq!(intent.scenario, Scenario::HistoricalActualsOnly);
    assert_eq!(intent.aggregation_level, AggregationLevel::EmployeeLevel);
    assert_eq!(
        intent.time_window,
        Some(TimeWindow::Quarter {
            quarter: 1,
            year: year(2025)
        })
    );
    assert!(!intent.requires_currency_conversion);
    assert_eq!(intent.time_window.unwrap().to_string(), "Q1 2025");
}

#[test]
fn test_department_name_is_not_a_grouping() {
    let intent = classify("Show me the total salary costs for Engineering department in 2025");
    assert_eq!(intent.metric_type, MetricType::Salary);
    assert_eq!(intent.aggregation_level, AggregationLevel::Company);
    assert_eq!(intent.time_window, Some(TimeWindow::Year(year(2025))));
}

#[test]
fn test_empty_question_is_all_defaults() {
    assert_eq!(classify(""), Intent::default());
    assert_eq!(classify("   "), Intent::default());
}

#[test]
fn test_unrecognized_question_is_all_defaults() {
    let intent = classify("How is the weather today?");
    assert_eq!(intent.metric_type, MetricType::Unknown);
    assert_eq!(intent.scenario, Scenario::HistoricalActualsOnly);
    assert_eq!(intent.aggregation_level, AggregationLevel::Company);
    assert_eq!(intent.time_window, None);
}

#[test]
fn test_metric_precedence() {
    // "total cost" outranks headcount and salary
    assert_eq!(
        classify_metric("total cost and headcount by salary band"),
        MetricType::FullyLoadedCost
    );
    assert_eq!(
        classify_metric("benefits to salary ratio"),
        MetricType::BenefitsRatio
    );
    // "benefits" alone is not a ratio
    assert_eq!(classify_metric("benefits paid"), MetricType::Unknown);
    assert_eq!(
        classify_metric("headcount movement and salary"),
        MetricType::HeadcountMovement
    );
    assert_eq!(classify_metric("SALARY"), MetricType::Salary);
}

#[test]
fn test_scenario_precedence() {
    assert_eq!(
        classify_scenario("budget for the current year"),
        Scenario::CurrentYearTotals
    );
    assert_eq!(
        classify_scenario("budget versus forecast"),
        Scenario::BudgetVsActual
    );
    assert_eq!(classify_scenario("forecast"), Scenario::CurrentYearTotals);
    assert_eq!(classify_scenario("year to date"), Scenario::CurrentYearTotals);
    assert_eq!(classify_scenario("last year"), Scenario::HistoricalActualsOnly);
}

#[test]
fn test_aggregation_precedence() {
    assert_eq!(
        classify_aggregation("cost by employee by department"),
        AggregationLevel::EmployeeLevel
    );
    assert_eq!(
        classify_aggregation("cost by department and by location"),
        AggregationLevel::Department
    );
    assert_eq!(
        classify_aggregation("cost across all locations"),
        AggregationLevel::Location
    );
    assert_eq!(
        classify_aggregation("Salary per Location"),
        AggregationLevel::Location
    );
    assert_eq!(
        classify_aggregation("cost for the Pune location"),
        AggregationLevel::Company
    );
}

#[test]
fn test_quarter_borrows_year_from_text() {
    assert_eq!(
        extract_time_window("Q3 of fiscal 2024", Year::FALLBACK),
        Some(TimeWindow::Quarter {
            quarter: 3,
            year: year(2024)
        })
    );
}

#[test]
fn test_quarter_without_year_uses_default() {
    assert_eq!(
        extract_time_window("cost in q2", Year::FALLBACK),
        Some(TimeWindow::Quarter {
            quarter: 2,
            year: year(2025)
        })
    );
    assert_eq!(
        extract_time_window("cost in q2", year(2030)),
        Some(TimeWindow::Quarter {
            quarter: 2,
            year: year(2030)
        })
    );
}

#[test]
fn test_quarter_attached_year() {
    assert_eq!(
        extract_time_window("Q42026 totals", Year::FALLBACK),
        Some(TimeWindow::Quarter {
            quarter: 4,
            year: year(2026)
        })
    );
}

#[test]
fn test_out_of_range_quarter_is_ignored() {
    assert_eq!(extract_time_window("Q5 plan", Year::FALLBACK), None);
    assert_eq!(
        extract_time_window("Q5 2024 plan", Year::FALLBACK),
        Some(TimeWindow::Year(year(2024)))
    );
}

#[test]
fn test_non_reporting_year_is_ignored() {
    assert_eq!(extract_time_window("headcount in 1999", Year::FALLBACK), None);
    assert_eq!(extract_time_window("invoice 120250", Year::FALLBACK), None);
}

#[test]
fn test_currency_detection() {
    let inr = classify("total cost in rupees");
    assert!(inr.requires_currency_conversion);
    assert_eq!(inr.target_currency, Some(CurrencyCode::Inr));

    let usd = classify("salary in USD");
    assert!(usd.requires_currency_conversion);
    assert_eq!(usd.target_currency, Some(CurrencyCode::Usd));

    assert_eq!(classify_currency("salary in dollars and INR"), Some(CurrencyCode::Inr));
    assert_eq!(classify_currency("salary"), None);
}

#[test]
fn test_gl_reconciliation_detection() {
    assert!(classify("Reconcile total cost with the summary").include_gl_reconciliation);
    assert!(classify("total cost vs general ledger").include_gl_reconciliation);
    assert!(classify("total cost against GL").include_gl_reconciliation);
    assert!(!classify("global total cost").include_gl_reconciliation);
    assert!(classify("Compare salary to the GL.").include_gl_reconciliation);
    assert!(classify("GL check for salary").include_gl_reconciliation);
    assert!(classify("salary (gl)").include_gl_reconciliation);
    assert!(!classify("salary in glasgow").include_gl_reconciliation);
    assert!(requests_reconciliation("Reconciliation of salary"));
}

#[test]
fn test_scenario_and_aggregation_always_populated() {
    for question in ["", "?", "budget", "by location", "Q1", "2025 INR"] {
        let intent = classify(question);
        assert!(Scenario::ALL.contains(&intent.scenario));
        assert!(matches!(
            intent.aggregation_level,
            AggregationLevel::EmployeeLevel
                | AggregationLevel::Department
                | AggregationLevel::Location
                | AggregationLevel::Company
        ));
    }
}
