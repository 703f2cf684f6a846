//! Error types for ql-jinja

use thiserror::Error;

/// Template errors
#[derive(Error, Debug)]
pub enum JinjaError {
    /// Template render error (J001)
    #[error("[J001] Template render error: {0}")]
    RenderError(String),

    /// Template text references a slot outside its declared set (J002)
    #[error("[J002] Template '{key}' references unknown slot '{slot}'. Known slots: {known}")]
    UnknownSlot {
        key: String,
        slot: String,
        known: String,
    },

    /// Template text failed to parse (J003)
    #[error("[J003] Template '{key}' has a syntax error: {message}")]
    SyntaxError { key: String, message: String },

    /// A slot used by the template was not given a value (J004)
    #[error("[J004] Template '{key}' is missing a value for slot '{slot}'")]
    MissingSlot { key: String, slot: String },
}

/// Result type alias for JinjaError
pub type JinjaResult<T> = Result<T, JinjaError>;

impl From<minijinja::Error> for JinjaError {
    fn from(err: minijinja::Error) -> Self {
        JinjaError::RenderError(err.to_string())
    }
}
