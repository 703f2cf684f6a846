//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Quill - turn personnel cost questions into validated SQL
#[derive(Parser, Debug)]
#[command(name = "ql")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override config file path (default: ./ql.yml when present)
    #[arg(short, long, global = true, env = "QL_CONFIG")]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full pipeline: question in, validated SQL out
    Ask(AskArgs),

    /// Show the intent and tables resolved for a question
    Classify(ClassifyArgs),

    /// Validate SQL written elsewhere against a question
    Validate(ValidateArgs),

    /// Browse tables, business rules and templates
    Catalog(CatalogArgs),
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Arguments for the ask command
#[derive(Args, Debug)]
pub struct AskArgs {
    /// Natural-language question
    pub question: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Print only the SQL text
    #[arg(long, conflicts_with = "output")]
    pub sql_only: bool,

    /// Include the pruned schema in text output
    #[arg(long)]
    pub show_schema: bool,
}

/// Arguments for the classify command
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Natural-language question
    pub question: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Question the SQL is meant to answer
    pub question: String,

    /// File containing the SQL to validate (`-` for stdin)
    #[arg(short, long)]
    pub sql_file: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the catalog command
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Section to show
    #[arg(short, long, value_enum, default_value = "all")]
    pub section: CatalogSection,

    /// Show every column of each table
    #[arg(long)]
    pub columns: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Catalog sections
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSection {
    /// Tables with descriptions and columns
    Tables,
    /// Negation, scenario, currency and join rules
    Rules,
    /// SQL templates
    Templates,
    /// Everything
    All,
}

impl CatalogSection {
    /// Whether `other` is shown when this section is selected
    pub fn includes(self, other: CatalogSection) -> bool {
        self == CatalogSection::All || self == other
    }
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
