//! The linear question-to-SQL pipeline.
//!
//! classify -> resolve tables -> prune schema -> synthesize -> validate,
//! then an optional syntax check. Each stage only reads the previous
//! stage's output and the shared catalog, so one `Pipeline` can serve any
//! number of questions, including concurrently.

use crate::error::SqlResult;
use crate::parser::{SqlParser, SyntaxCheck};
use crate::synthesizer::{GeneratedQuery, Synthesizer};
use crate::validator::{ValidationReport, Validator};
use ql_core::{
    classify_intent, prune_schema, resolve_tables, Config, Intent, PrunedSchema, RuleCatalog,
    TableSet,
};
use serde::Serialize;

/// Every stage output of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    /// Absent when the intent was supplied directly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    pub intent: Intent,
    pub tables: TableSet,
    pub schema: PrunedSchema,
    pub query: GeneratedQuery,
    pub report: ValidationReport,
    pub syntax: SyntaxCheck,
}

impl PipelineRun {
    /// Whether the structural checks passed
    pub fn is_valid(&self) -> bool {
        self.report.is_valid
    }
}

/// Validation of SQL produced outside the synthesizer
#[derive(Debug, Clone, Serialize)]
pub struct ExternalReview {
    pub question: String,
    pub intent: Intent,
    pub tables: TableSet,
    pub schema: PrunedSchema,
    pub sql_text: String,
    pub report: ValidationReport,
    pub syntax: SyntaxCheck,
}

/// Question-to-SQL pipeline over one catalog and configuration
pub struct Pipeline {
    catalog: RuleCatalog,
    config: Config,
    validator: Validator,
    parser: SqlParser,
}

impl Pipeline {
    /// Build a pipeline over the compiled-in catalog
    pub fn new(config: Config) -> SqlResult<Self> {
        Ok(Self::with_catalog(RuleCatalog::builtin()?, config))
    }

    /// Build a pipeline over an existing catalog
    pub fn with_catalog(catalog: RuleCatalog, config: Config) -> Self {
        Self {
            catalog,
            validator: Validator::with_defaults(),
            parser: SqlParser::new(config.dialect),
            config,
        }
    }

    /// The rule catalog
    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The structural validator
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Classify a question with the configured default year
    pub fn classify(&self, question: &str) -> Intent {
        classify_intent(question, self.config.default_year)
    }

    /// Run every stage for a question
    pub fn run(&self, question: &str) -> SqlResult<PipelineRun> {
        let intent = self.classify(question);
        let mut run = self.run_intent(intent)?;
        run.question = Some(question.to_string());
        Ok(run)
    }

    /// Run every stage after classification for an externally supplied intent
    pub fn run_intent(&self, intent: Intent) -> SqlResult<PipelineRun> {
        let tables = resolve_tables(&intent);
        let schema = prune_schema(&self.catalog, &tables);
        let query = Synthesizer::new(&self.catalog, self.config.default_year)
            .synthesize(&intent, &tables, &schema)?;
        let report = self.validator.validate(&query, &tables, &schema);
        let syntax = self.check_syntax(&query.sql_text);

        log::debug!(
            "Pipeline finished: valid={} issues={}",
            report.is_valid,
            report.issues.len()
        );

        Ok(PipelineRun {
            question: None,
            intent,
            tables,
            schema,
            query,
            report,
            syntax,
        })
    }

    /// Validate SQL supplied by another producer against a question's tables
    pub fn review_sql(&self, question: &str, sql: &str) -> ExternalReview {
        let intent = self.classify(question);
        let tables = resolve_tables(&intent);
        let schema = prune_schema(&self.catalog, &tables);
        let report = self.validator.validate_sql(sql, &tables, &schema);
        let syntax = self.check_syntax(sql);

        ExternalReview {
            question: question.to_string(),
            intent,
            tables,
            schema,
            sql_text: sql.to_string(),
            report,
            syntax,
        }
    }

    fn check_syntax(&self, sql: &str) -> SyntaxCheck {
        if !self.config.syntax_check {
            return SyntaxCheck::Skipped;
        }
        let check = self.parser.check_syntax(sql);
        if let SyntaxCheck::Failed { message, .. } = &check {
            log::warn!("SQL does not parse: {}", message);
        }
        check
    }
}
