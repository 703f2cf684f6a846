//! Error types for ql-core

use thiserror::Error;

/// Errors raised while loading the catalog or ql.yml
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: A catalog key that was never defined
    #[error("[C001] Catalog lookup failed: unknown {kind} '{key}'")]
    CatalogLookup { kind: &'static str, key: String },

    /// C002: A built-in template failed to compile or render
    #[error("[C002] Catalog template error: {0}")]
    CatalogTemplate(#[from] ql_jinja::JinjaError),

    /// E001: `--config` points at a missing file
    #[error("[E001] No config file at {path}")]
    ConfigNotFound { path: String },

    /// E002: ql.yml is not valid config YAML
    #[error("[E002] Could not parse ql.yml: {message}")]
    ConfigParseError { message: String },

    /// E003: A config value is out of range
    #[error("[E003] Invalid ql.yml value: {message}")]
    ConfigInvalid { message: String },

    /// E014: Reading the config file failed
    #[error("[E014] IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
