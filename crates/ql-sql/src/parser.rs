//! SQL parser wrapper and syntax check

use crate::error::{SqlError, SqlResult};
use ql_core::Dialect;
use regex::Regex;
use serde::Serialize;
use sqlparser::ast::Statement;
use sqlparser::dialect::{
    Dialect as ParserDialect, DuckDbDialect as SqlParserDuckDb,
    SnowflakeDialect as SqlParserSnowflake,
};
use sqlparser::parser::Parser;
use std::sync::OnceLock;

/// SQL parser for one configured dialect
pub struct SqlParser {
    dialect: Dialect,
    parser_dialect: Box<dyn ParserDialect + Send + Sync>,
}

impl SqlParser {
    /// Create a parser for a dialect
    pub fn new(dialect: Dialect) -> Self {
        let parser_dialect: Box<dyn ParserDialect + Send + Sync> = match dialect {
            Dialect::DuckDb => Box::new(SqlParserDuckDb {}),
            Dialect::Snowflake => Box::new(SqlParserSnowflake {}),
        };
        Self {
            dialect,
            parser_dialect,
        }
    }

    /// The configured dialect
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Parse SQL into AST statements
    pub fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(SqlError::EmptySql);
        }

        Parser::parse_sql(self.parser_dialect.as_ref(), sql).map_err(|e| {
            let message = e.to_string();
            let (line, column) = parse_location_from_error(&message);
            SqlError::ParseError {
                message,
                line,
                column,
            }
        })
    }

    /// Parse SQL and report the outcome as a value rather than an error
    pub fn check_syntax(&self, sql: &str) -> SyntaxCheck {
        match self.parse(sql) {
            Ok(_) => SyntaxCheck::Passed {
                dialect: self.dialect,
            },
            Err(SqlError::ParseError {
                message,
                line,
                column,
            }) => SyntaxCheck::Failed {
                dialect: self.dialect,
                message,
                line,
                column,
            },
            Err(e) => SyntaxCheck::Failed {
                dialect: self.dialect,
                message: e.to_string(),
                line: 0,
                column: 0,
            },
        }
    }
}

impl Default for SqlParser {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}

/// Outcome of parsing generated SQL.
///
/// Reported next to the validation report; it never affects `is_valid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyntaxCheck {
    /// The SQL parsed
    Passed { dialect: Dialect },
    /// The SQL did not parse
    Failed {
        dialect: Dialect,
        message: String,
        line: usize,
        column: usize,
    },
    /// Disabled by `syntax_check: false`
    Skipped,
}

impl SyntaxCheck {
    /// Whether the check ran and failed
    pub fn is_failed(&self) -> bool {
        matches!(self, SyntaxCheck::Failed { .. })
    }
}

/// Extract "Line: N, Column: M" from a sqlparser error message.
///
/// `ParserError` carries no structured location; (0, 0) when absent.
fn parse_location_from_error(msg: &str) -> (usize, usize) {
    static LOCATION_RE: OnceLock<Regex> = OnceLock::new();
    let re = LOCATION_RE
        .get_or_init(|| Regex::new(r"Line: (\d+), Column: (\d+)").expect("valid regex"));
    re.captures(msg)
        .and_then(|caps| Some((caps[1].parse().ok()?, caps[2].parse().ok()?)))
        .unwrap_or((0, 0))
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
