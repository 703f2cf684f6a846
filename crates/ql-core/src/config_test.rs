use super::*;
use std::io::Write;

#[test]
fn test_parse_empty_config_is_default() {
    let config = Config::parse("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.default_year.to_string(), "2025");
    assert_eq!(config.dialect, Dialect::DuckDb);
    assert!(config.syntax_check);
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
default_year: "2024"
dialect: snowflake
syntax_check: false
"#;
    let config = Config::parse(yaml).unwrap();
    assert_eq!(config.default_year.value(), 2024);
    assert_eq!(config.dialect, Dialect::Snowflake);
    assert!(!config.syntax_check);
}

#[test]
fn test_invalid_year_is_config_invalid() {
    let err = Config::parse("default_year: \"next\"").unwrap_err();
    assert!(
        matches!(err, CoreError::ConfigInvalid { .. }),
        "Expected ConfigInvalid, got: {:?}",
        err
    );
}

#[test]
fn test_unquoted_year_accepted() {
    let config = Config::parse("default_year: 2026").unwrap();
    assert_eq!(config.default_year.value(), 2026);
}

#[test]
fn test_out_of_range_years_are_config_invalid() {
    for yaml in [
        "default_year: 99999",
        "default_year: \"25\"",
        "default_year: [2025]",
    ] {
        let err = Config::parse(yaml).unwrap_err();
        assert!(
            matches!(err, CoreError::ConfigInvalid { .. }),
            "{}: expected ConfigInvalid, got {:?}",
            yaml,
            err
        );
        assert!(err.to_string().starts_with("[E003]"));
    }
}

#[test]
fn test_malformed_yaml_is_parse_error() {
    let err = Config::parse("default_year: [").unwrap_err();
    assert!(matches!(err, CoreError::ConfigParseError { .. }));
}

#[test]
fn test_unknown_field_rejected() {
    let err = Config::parse("default_yaer: \"2024\"").unwrap_err();
    assert!(matches!(err, CoreError::ConfigParseError { .. }));
}

#[test]
fn test_unknown_dialect_rejected() {
    assert!(Config::parse("dialect: oracle").is_err());
}

#[test]
fn test_load_missing_file() {
    let err = Config::load(Path::new("/nonexistent/ql.yml")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_from_dir() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(Config::load_from_dir(dir.path()).unwrap(), Config::default());

    let mut file = std::fs::File::create(dir.path().join(CONFIG_FILE_NAME)).unwrap();
    writeln!(file, "default_year: \"2026\"").unwrap();
    drop(file);

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.default_year.value(), 2026);
}
