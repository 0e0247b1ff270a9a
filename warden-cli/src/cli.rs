//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Warden -- scanner and parser for monit-style control files.
///
/// Use `warden <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "warden", version, about, long_about = None)]
pub struct Cli {
    /// Path to the warden.toml configuration file.
    #[arg(short, long, default_value = "warden.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a control file and print the resulting checks.
    Parse(FileArgs),

    /// Print the token stream produced by the scanner.
    Tokens(FileArgs),

    /// Check that a control file parses without errors.
    Validate(FileArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- parse / tokens / validate ----

/// A control file to read.
#[derive(Args, Debug)]
pub struct FileArgs {
    /// Path to the control file (e.g. /etc/monitrc).
    pub file: PathBuf,
}

// ---- config ----

/// Manage warden configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, parser).
        #[arg(long)]
        section: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_parse_command() {
        let cli = Cli::try_parse_from(["warden", "parse", "/etc/monitrc"]).expect("parse succeeded");
        match cli.command {
            Commands::Parse(args) => {
                assert_eq!(args.file, PathBuf::from("/etc/monitrc"));
            }
            _ => panic!("expected Parse command"),
        }
    }

    #[test]
    fn test_cli_parse_tokens_command() {
        let cli = Cli::try_parse_from(["warden", "tokens", "monitrc"]).expect("parse succeeded");
        assert!(matches!(cli.command, Commands::Tokens(_)));
    }

    #[test]
    fn test_cli_parse_validate_command() {
        let cli = Cli::try_parse_from(["warden", "validate", "monitrc"]).expect("parse succeeded");
        assert!(matches!(cli.command, Commands::Validate(_)));
    }

    #[test]
    fn test_cli_file_argument_is_required() {
        let result = Cli::try_parse_from(["warden", "parse"]);
        assert!(result.is_err(), "parse without a file should fail");
    }

    #[test]
    fn test_cli_parse_config_validate() {
        let cli = Cli::try_parse_from(["warden", "config", "validate"]).expect("parse succeeded");
        match cli.command {
            Commands::Config(config_args) => {
                assert!(matches!(config_args.action, ConfigAction::Validate));
            }
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_cli_parse_config_show_with_section() {
        let cli = Cli::try_parse_from(["warden", "config", "show", "--section", "parser"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Config(config_args) => match config_args.action {
                ConfigAction::Show { section } => {
                    assert_eq!(section.as_deref(), Some("parser"));
                }
                _ => panic!("expected Show action"),
            },
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from([
            "warden",
            "--config",
            "/tmp/custom.toml",
            "parse",
            "monitrc",
            "--output",
            "json",
            "--log-level",
            "debug",
        ])
        .expect("parse succeeded");
        assert_eq!(cli.config, PathBuf::from("/tmp/custom.toml"));
        assert!(matches!(cli.output, OutputFormat::Json));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["warden", "parse", "monitrc"]).expect("parse succeeded");
        assert_eq!(cli.config, PathBuf::from("warden.toml"));
        assert!(matches!(cli.output, OutputFormat::Text));
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn test_cli_invalid_output_format() {
        let result = Cli::try_parse_from(["warden", "--output", "yaml", "parse", "monitrc"]);
        assert!(result.is_err(), "unknown output format should fail");
    }

    #[test]
    fn test_cli_command_factory_is_valid() {
        Cli::command().debug_assert();
    }
}
