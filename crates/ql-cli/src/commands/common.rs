//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use ql_core::{Config, Intent, PrunedSchema, TableSet};
use ql_sql::{Pipeline, SyntaxCheck, ValidationReport};
use serde::Serialize;
use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Return `Err(ExitCode(N).into())` instead of calling `std::process::exit`
/// inside a command; `main` downcasts it.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; nothing user-facing to print.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Load configuration from `--config`, or `./ql.yml` when present
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    match &global.config {
        Some(path) => Config::load(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path)),
        None => Config::load_from_dir(Path::new(".")).context("Failed to load ql.yml"),
    }
}

/// Build a pipeline from the global configuration
pub(crate) fn build_pipeline(global: &GlobalArgs) -> Result<Pipeline> {
    let config = load_config(global)?;
    if global.verbose {
        eprintln!(
            "[verbose] Config: default_year={} dialect={} syntax_check={}",
            config.default_year, config.dialect, config.syntax_check
        );
    }
    Pipeline::new(config).context("Failed to build rule catalog")
}

/// Read SQL from a file, or stdin for `-`
pub(crate) fn read_sql(path: &str) -> Result<String> {
    if path == "-" {
        let mut sql = String::new();
        std::io::stdin()
            .read_to_string(&mut sql)
            .context("Failed to read SQL from stdin")?;
        return Ok(sql);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))
}

/// Print any serializable value as pretty JSON
pub(crate) fn print_json<T: Serialize + ?Sized>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}

/// Fail with exit code 1 when a report has issues
pub(crate) fn exit_if_invalid(report: &ValidationReport) -> Result<()> {
    if report.is_valid {
        Ok(())
    } else {
        Err(ExitCode(1).into())
    }
}

/// Render an intent as aligned `key: value` lines
pub(crate) fn format_intent(intent: &Intent) -> Vec<String> {
    let window = intent
        .time_window
        .map(|w| w.to_string())
        .unwrap_or_else(|| "-".to_string());
    let currency = match (intent.requires_currency_conversion, intent.target_currency) {
        (true, Some(code)) => code.to_string(),
        (true, None) => "USD".to_string(),
        (false, _) => "-".to_string(),
    };
    vec![
        format!("  metric:        {}", intent.metric_type),
        format!("  scenario:      {}", intent.scenario),
        format!("  aggregation:   {}", intent.aggregation_level),
        format!("  time window:   {}", window),
        format!("  currency:      {}", currency),
        format!(
            "  reconcile GL:  {}",
            if intent.include_gl_reconciliation { "yes" } else { "no" }
        ),
    ]
}

/// Comma-separated table names
pub(crate) fn format_tables(tables: &TableSet) -> String {
    tables
        .iter()
        .map(|t| t.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the pruned schema one table per line
pub(crate) fn format_schema(schema: &PrunedSchema) -> Vec<String> {
    schema
        .iter()
        .map(|(table, columns)| format!("  {}: {}", table, columns.join(", ")))
        .collect()
}

/// Render a validation report and syntax check
pub(crate) fn format_report(report: &ValidationReport, syntax: &SyntaxCheck) -> Vec<String> {
    let mut lines = Vec::new();
    if report.is_valid {
        lines.push("Validation: passed".to_string());
    } else {
        lines.push(format!("Validation: {} issue(s)", report.issues.len()));
        lines.extend(report.issues.iter().map(|issue| format!("  {}", issue)));
        lines.push("Recommendations:".to_string());
        lines.extend(report.recommendations.iter().map(|r| format!("  - {}", r)));
    }
    lines.push(match syntax {
        SyntaxCheck::Passed { dialect } => format!("Syntax ({}): ok", dialect),
        SyntaxCheck::Failed {
            dialect,
            message,
            line,
            column,
        } => format!(
            "Syntax ({}): error at line {}, column {}: {}",
            dialect, line, column, message
        ),
        SyntaxCheck::Skipped => "Syntax: skipped".to_string(),
    });
    lines
}

/// Calculate column widths for a table given headers and row data
pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }
    widths
}

/// Format a left-aligned table: header, dashes, rows; two-space gutters
pub(crate) fn format_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let widths = calculate_column_widths(headers, rows);
    let separator: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();

    let mut out = vec![pad_row(headers, &widths), pad_row(separator.as_slice(), &widths)];
    out.extend(rows.iter().map(|row| pad_row(row.as_slice(), &widths)));
    out
}

fn pad_row<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{:<width$}", cell.as_ref(), width = w))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Print lines to stdout
pub(crate) fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
