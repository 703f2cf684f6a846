//! Ask command implementation

use crate::cli::{AskArgs, GlobalArgs, OutputFormat};
use crate::commands::common::{self, exit_if_invalid, print_json, print_lines};
use anyhow::{Context, Result};
use ql_sql::{CurrencyDecision, DecisionRecord, NegationDecision, PipelineRun, Provenance};

/// Execute the ask command
pub(crate) fn execute(args: &AskArgs, global: &GlobalArgs) -> Result<()> {
    let pipeline = common::build_pipeline(global)?;
    let run = pipeline
        .run(&args.question)
        .context("Failed to generate SQL")?;

    if global.verbose {
        eprintln!(
            "[verbose] {} table(s), {} issue(s)",
            run.tables.len(),
            run.report.issues.len()
        );
    }

    if args.sql_only {
        println!("{}", run.query.sql_text);
    } else {
        match args.output {
            OutputFormat::Json => print_json(&run)?,
            OutputFormat::Text => print_lines(&format_run(&run, args.show_schema)),
        }
    }

    exit_if_invalid(&run.report)
}

/// Render a pipeline run for the terminal
pub(crate) fn format_run(run: &PipelineRun, show_schema: bool) -> Vec<String> {
    let mut lines = vec!["Intent:".to_string()];
    lines.extend(common::format_intent(&run.intent));
    lines.push(format!("Tables: {}", common::format_tables(&run.tables)));
    if show_schema {
        lines.push("Schema:".to_string());
        lines.extend(common::format_schema(&run.schema));
    }
    lines.push(match &run.query.provenance {
        Provenance::Template { key } => format!("Path: template {}", key),
        Provenance::Custom => "Path: custom".to_string(),
    });
    lines.push("Decisions:".to_string());
    lines.extend(format_decisions(&run.query.decisions));
    lines.push(String::new());
    lines.push("SQL:".to_string());
    lines.extend(run.query.sql_text.lines().map(str::to_string));
    lines.push(String::new());
    lines.extend(common::format_report(&run.report, &run.syntax));
    lines
}

fn format_decisions(decisions: &DecisionRecord) -> Vec<String> {
    let negation = match decisions.negation {
        NegationDecision::Applied => "applied",
        NegationDecision::NotApplied => "not applied",
    };
    let currency = match &decisions.currency {
        CurrencyDecision::NoConversion => "no conversion".to_string(),
        CurrencyDecision::Converted {
            target,
            rate_source,
        } => format!("converted to {} via {}", target, rate_source),
    };
    let rollups = if decisions.rollups.is_empty() {
        "-".to_string()
    } else {
        decisions.rollups.join(", ")
    };
    vec![
        format!("  negation:  {}", negation),
        format!("  scenario:  {}", decisions.scenario),
        format!("  currency:  {}", currency),
        format!("  rollups:   {}", rollups),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ql_core::Config;
    use ql_sql::Pipeline;

    fn run(question: &str) -> PipelineRun {
        Pipeline::new(Config::default())
            .unwrap()
            .run(question)
            .unwrap()
    }

    #[test]
    fn test_format_template_run() {
        let lines = format_run(
            &run("What is the fully loaded cost per employee by department for Q1 2025?"),
            false,
        );
        assert!(lines.contains(&"  metric:        fully_loaded_cost".to_string()));
        assert!(lines.contains(&"  time window:   Q1 2025".to_string()));
        assert!(lines.contains(&"Path: template fully_loaded_cost_per_employee".to_string()));
        assert!(lines.contains(&"  negation:  applied".to_string()));
        assert!(lines.contains(&"  rollups:   salary, benefits, taxes".to_string()));
        assert!(lines.contains(&"Validation: passed".to_string()));
        assert!(lines.contains(&"Syntax (duckdb): ok".to_string()));
        assert!(!lines.contains(&"Schema:".to_string()));
    }

    #[test]
    fn test_format_custom_run_with_schema() {
        let lines = format_run(&run("salary by location in USD"), true);
        assert!(lines.contains(&"Path: custom".to_string()));
        assert!(lines.contains(&"Schema:".to_string()));
        assert!(lines.contains(&"  m_location: location_id, location_name, country".to_string()));
        assert!(lines.contains(
            &"  currency:  converted to USD via currency_master.conversion_rate_to_usd".to_string()
        ));
        assert!(lines.contains(&"  rollups:   -".to_string()));
    }

    #[test]
    fn test_format_invalid_run_lists_recommendations() {
        let lines = format_run(&run(""), false);
        assert!(lines.iter().any(|l| l.starts_with("Validation: ") && l.ends_with("issue(s)")));
        assert!(lines.contains(&"Recommendations:".to_string()));
        assert!(lines.contains(&"  - Join periods via accounting_period = name".to_string()));
    }
}
