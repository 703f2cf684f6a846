//! ql-sql - SQL layer for Quill
//!
//! This crate turns a resolved intent into SQL text, checks that text with a
//! fixed set of structural checks, and runs the whole question-to-SQL
//! pipeline end to end. A `sqlparser` syntax check reports separately from
//! the structural checks.

pub mod error;
pub mod parser;
pub mod pipeline;
pub mod synthesizer;
pub mod validator;

pub use error::{SqlError, SqlResult};
pub use parser::{SqlParser, SyntaxCheck};
pub use pipeline::{ExternalReview, Pipeline, PipelineRun};
pub use synthesizer::{
    CurrencyDecision, DecisionRecord, GeneratedQuery, NegationDecision, Provenance, Synthesizer,
};
pub use validator::{IssueKind, QueryCheck, ValidationIssue, ValidationReport, Validator};
