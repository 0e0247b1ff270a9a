//! Command handlers -- one module per subcommand

pub mod config;
pub mod parse;
pub mod tokens;
pub mod validate;

use std::path::Path;

use tracing::debug;

use warden_core::config::WardenConfig;
use warden_monitrc::{MonitrcParser, ParserConfig};

use crate::error::CliError;

/// Load the configuration for control-file commands.
///
/// A missing file falls back to defaults with env overrides applied.
/// A file that exists but fails to parse or validate is an error.
pub async fn load_config(config_path: &Path) -> Result<WardenConfig, CliError> {
    if tokio::fs::try_exists(config_path).await? {
        return Ok(WardenConfig::load(config_path).await?);
    }

    debug!(path = %config_path.display(), "config file not found, using defaults");
    let mut config = WardenConfig::default();
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Build a parser from the `[parser]` section.
pub fn parser_from(config: &WardenConfig) -> Result<MonitrcParser, CliError> {
    Ok(MonitrcParser::with_config(ParserConfig::from_core(
        &config.parser,
    ))?)
}

/// Read a control file into memory.
pub async fn read_control_file(path: &Path) -> Result<String, CliError> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        CliError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })
}
