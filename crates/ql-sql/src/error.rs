//! Error types for ql-sql

use ql_core::CoreError;
use thiserror::Error;

/// SQL synthesis and parsing errors
#[derive(Error, Debug)]
pub enum SqlError {
    /// SQL parse error (S001)
    #[error("[S001] SQL parse error at line {line}, column {column}: {message}")]
    ParseError {
        message: String,
        line: usize,
        column: usize,
    },

    /// Empty SQL (S002)
    #[error("[S002] SQL is empty")]
    EmptySql,

    /// Template instantiation failed (S005)
    #[error("[S005] Failed to instantiate template '{key}': {source}")]
    TemplateError {
        key: String,
        #[source]
        source: CoreError,
    },

    /// Catalog or configuration error (S006)
    #[error("[S006] {0}")]
    Core(#[from] CoreError),
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
