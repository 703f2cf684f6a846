use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_parse_ask() {
    let cli = Cli::try_parse_from(["ql", "ask", "total cost by department", "-o", "json"]).unwrap();
    match cli.command {
        Commands::Ask(args) => {
            assert_eq!(args.question, "total cost by department");
            assert_eq!(args.output, OutputFormat::Json);
            assert!(!args.sql_only);
        }
        other => panic!("Expected Ask, got: {:?}", other),
    }
    assert!(!cli.global.verbose);
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["ql", "classify", "salary", "--verbose", "-c", "other.yml"]).unwrap();
    assert!(cli.global.verbose);
    assert_eq!(cli.global.config.as_deref(), Some("other.yml"));
}

#[test]
fn test_validate_requires_sql_file() {
    assert!(Cli::try_parse_from(["ql", "validate", "salary"]).is_err());
    let cli = Cli::try_parse_from(["ql", "validate", "salary", "--sql-file", "q.sql"]).unwrap();
    assert!(matches!(cli.command, Commands::Validate(ref a) if a.sql_file == "q.sql"));
}

#[test]
fn test_sql_only_conflicts_with_output() {
    assert!(Cli::try_parse_from(["ql", "ask", "salary", "--sql-only", "-o", "json"]).is_err());
}

#[test]
fn test_catalog_section_default_is_all() {
    let cli = Cli::try_parse_from(["ql", "catalog"]).unwrap();
    match cli.command {
        Commands::Catalog(args) => {
            assert_eq!(args.section, CatalogSection::All);
            assert!(args.section.includes(CatalogSection::Rules));
        }
        other => panic!("Expected Catalog, got: {:?}", other),
    }
    assert!(!CatalogSection::Tables.includes(CatalogSection::Templates));
}
