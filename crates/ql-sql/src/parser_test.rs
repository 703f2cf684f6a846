use super::*;

#[test]
fn test_parse_select() {
    let parser = SqlParser::new(Dialect::DuckDb);
    let stmts = parser
        .parse("SELECT d.department_name FROM m_department d WHERE d.department_id = 1")
        .unwrap();
    assert_eq!(stmts.len(), 1);
}

#[test]
fn test_parse_empty() {
    let parser = SqlParser::default();
    assert!(matches!(parser.parse("  \n"), Err(SqlError::EmptySql)));
}

#[test]
fn test_parse_error_location() {
    let parser = SqlParser::new(Dialect::DuckDb);
    let result = parser.parse("SELECT\nFROM m_department");
    match result {
        Err(SqlError::ParseError { line, message, .. }) => {
            assert_eq!(line, 2, "Expected line 2 (message: {})", message);
        }
        other => panic!("Expected ParseError, got: {:?}", other),
    }
}

#[test]
fn test_location_from_message() {
    assert_eq!(
        parse_location_from_error("Expected: an expression, found: FROM at Line: 3, Column: 7"),
        (3, 7)
    );
    assert_eq!(parse_location_from_error("sql parser error"), (0, 0));
}

#[test]
fn test_syntax_check_reports_dialect() {
    let parser = SqlParser::new(Dialect::Snowflake);
    assert_eq!(parser.dialect(), Dialect::Snowflake);
    assert_eq!(
        parser.check_syntax("SELECT 1"),
        SyntaxCheck::Passed {
            dialect: Dialect::Snowflake
        }
    );
}

#[test]
fn test_syntax_check_failure_is_a_value() {
    let parser = SqlParser::default();
    let check = parser.check_syntax("SELECT FROM WHERE");
    assert!(check.is_failed());

    let empty = parser.check_syntax("");
    assert!(empty.is_failed());
    assert!(!SyntaxCheck::Skipped.is_failed());
}

#[test]
fn test_syntax_check_serializes_with_status_tag() {
    let json = serde_json::to_value(SyntaxCheck::Passed {
        dialect: Dialect::DuckDb,
    })
    .unwrap();
    assert_eq!(json["status"], "passed");
    assert_eq!(json["dialect"], "duckdb");
}
