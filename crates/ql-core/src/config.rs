//! Configuration types and parsing for ql.yml

use crate::error::{CoreError, CoreResult};
use crate::intent::Year;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "ql.yml";

/// Pipeline configuration from ql.yml
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Fallback reporting year when a question names none
    pub default_year: Year,

    /// SQL dialect for the syntax check
    pub dialect: Dialect,

    /// Whether to parse generated SQL after synthesis
    pub syntax_check: bool,
}

/// ql.yml as written, before value checks
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    /// Quoted or bare; checked by [`Year::parse`]
    #[serde(default)]
    default_year: Option<serde_yaml::Value>,

    #[serde(default)]
    dialect: Dialect,

    #[serde(default = "default_true")]
    syntax_check: bool,
}

impl TryFrom<RawConfig> for Config {
    type Error = CoreError;

    fn try_from(raw: RawConfig) -> CoreResult<Self> {
        let default_year = match raw.default_year {
            None => default_year(),
            Some(value) => {
                let text = match &value {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    other => format!("{:?}", other),
                };
                Year::parse(text.trim()).ok_or_else(|| CoreError::ConfigInvalid {
                    message: format!("default_year '{}' is not a four-digit year", text),
                })?
            }
        };
        Ok(Self {
            default_year,
            dialect: raw.dialect,
            syntax_check: raw.syntax_check,
        })
    }
}

/// SQL dialect selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// DuckDB (default)
    #[default]
    DuckDb,
    /// Snowflake
    Snowflake,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::DuckDb => write!(f, "duckdb"),
            Dialect::Snowflake => write!(f, "snowflake"),
        }
    }
}

fn default_year() -> Year {
    Year::FALLBACK
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_year: default_year(),
            dialect: Dialect::default(),
            syntax_check: true,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from YAML text
    pub fn parse(content: &str) -> CoreResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| CoreError::ConfigParseError {
                message: e.to_string(),
            })?;
        raw.try_into()
    }

    /// Load `ql.yml` from a directory, or defaults when it has none
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            log::debug!("Loading config from {}", path.display());
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
