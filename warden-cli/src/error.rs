//! CLI-specific error types and exit code mapping

use warden_core::error::WardenError;
use warden_monitrc::MonitrcError;

/// CLI-specific error type.
///
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The control file could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from warden-core.
    #[error("{0}")]
    Core(#[from] WardenError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                  |
    /// |------|--------------------------|
    /// | 0    | Success                  |
    /// | 1    | Command or parse error   |
    /// | 2    | Configuration error      |
    /// | 10   | IO error                 |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(WardenError::Config(_)) => 2,
            Self::Io(_) | Self::Core(WardenError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Parse(_) | Self::Core(_) => 1,
        }
    }
}

impl From<MonitrcError> for CliError {
    fn from(e: MonitrcError) -> Self {
        match e {
            MonitrcError::Config { .. } => Self::Config(e.to_string()),
            MonitrcError::Io(io) => Self::Io(io),
            other => Self::Parse(other.to_string()),
        }
    }
}
