//! Validate command implementation
//!
//! Checks SQL produced outside the synthesizer (by hand, or by another
//! service) against the tables a question resolves to.

use crate::cli::{GlobalArgs, OutputFormat, ValidateArgs};
use crate::commands::common::{self, exit_if_invalid, print_json, print_lines};
use anyhow::Result;

/// Execute the validate command
pub(crate) fn execute(args: &ValidateArgs, global: &GlobalArgs) -> Result<()> {
    let sql = common::read_sql(&args.sql_file)?;
    let pipeline = common::build_pipeline(global)?;

    if global.verbose {
        eprintln!(
            "[verbose] Validating {} bytes of SQL from {}",
            sql.len(),
            args.sql_file
        );
    }

    let review = pipeline.review_sql(&args.question, &sql);

    match args.output {
        OutputFormat::Json => print_json(&review)?,
        OutputFormat::Text => {
            let mut lines = vec![format!(
                "Tables: {}",
                common::format_tables(&review.tables)
            )];
            lines.extend(common::format_report(&review.report, &review.syntax));
            print_lines(&lines);
        }
    }

    exit_if_invalid(&review.report)
}
