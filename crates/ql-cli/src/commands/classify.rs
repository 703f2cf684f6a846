//! Classify command implementation

use crate::cli::{ClassifyArgs, GlobalArgs, OutputFormat};
use crate::commands::common::{self, print_json, print_lines};
use anyhow::Result;
use ql_core::{prune_schema, resolve_tables, Intent, PrunedSchema, TableSet};
use serde::Serialize;

/// Classification output: the first three pipeline stages
#[derive(Debug, Serialize)]
struct Classification<'a> {
    question: &'a str,
    intent: Intent,
    tables: TableSet,
    schema: PrunedSchema,
}

/// Execute the classify command
pub(crate) fn execute(args: &ClassifyArgs, global: &GlobalArgs) -> Result<()> {
    let pipeline = common::build_pipeline(global)?;
    let intent = pipeline.classify(&args.question);
    let tables = resolve_tables(&intent);
    let schema = prune_schema(pipeline.catalog(), &tables);

    let classification = Classification {
        question: &args.question,
        intent,
        tables,
        schema,
    };

    match args.output {
        OutputFormat::Json => print_json(&classification)?,
        OutputFormat::Text => {
            let mut lines = vec!["Intent:".to_string()];
            lines.extend(common::format_intent(&classification.intent));
            lines.push(format!(
                "Tables: {}",
                common::format_tables(&classification.tables)
            ));
            lines.push("Schema:".to_string());
            lines.extend(common::format_schema(&classification.schema));
            print_lines(&lines);
        }
    }
    Ok(())
}
