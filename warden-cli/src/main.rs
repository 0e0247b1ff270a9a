//! Warden CLI -- scan, parse and validate monit-style control files.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use colored::Colorize;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // A broken config file still gets default logging; the command reports the error.
    let mut general = match commands::load_config(&cli.config).await {
        Ok(config) => config.general,
        Err(_) => Default::default(),
    };
    if let Some(level) = &cli.log_level {
        general.log_level = level.clone();
    }
    if let Err(e) = logging::init_tracing(&general) {
        eprintln!("{} {}", "warning:".yellow().bold(), e);
    }

    warden_core::metrics::describe_all();
    tracing::debug!(config = %cli.config.display(), "warden starting");

    let writer = OutputWriter::new(cli.output);
    if let Err(e) = run(cli, &writer).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli, writer: &OutputWriter) -> Result<(), CliError> {
    match cli.command {
        Commands::Parse(args) => commands::parse::execute(args, &cli.config, writer).await,
        Commands::Tokens(args) => commands::tokens::execute(args, &cli.config, writer).await,
        Commands::Validate(args) => commands::validate::execute(args, &cli.config, writer).await,
        Commands::Config(args) => commands::config::execute(args, &cli.config, writer).await,
    }
}
