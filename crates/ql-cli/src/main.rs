//! Quill CLI - turn personnel cost questions into validated SQL

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands, GlobalArgs};
use commands::common::ExitCode;
use commands::{ask, catalog, classify, validate};

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.global);

    if let Err(err) = run(&cli) {
        if let Some(ExitCode(code)) = err.downcast_ref::<ExitCode>() {
            std::process::exit(*code);
        }
        eprintln!("Error: {:#}", err);
        std::process::exit(2);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Ask(args) => ask::execute(args, &cli.global),
        Commands::Classify(args) => classify::execute(args, &cli.global),
        Commands::Validate(args) => validate::execute(args, &cli.global),
        Commands::Catalog(args) => catalog::execute(args, &cli.global),
    }
}

/// `RUST_LOG` wins; otherwise warnings, or debug with `--verbose`
fn init_logging(global: &GlobalArgs) {
    let default_filter = if global.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}
