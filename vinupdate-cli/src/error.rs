//! CLI error types.

use std::fmt;

use vinupdate::config::ConfigError;
use vinupdate::UpdateError;

/// Errors that end the CLI with a non-zero exit code.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded or resolved.
    Config(String),

    /// Failed to install the Ctrl-C handler.
    Signal(String),

    /// Query, probe or download failed.
    Update(UpdateError),
}

impl CliError {
    /// Whether rerunning the same command would resume a partial download.
    pub fn is_resumable(&self) -> bool {
        matches!(self, CliError::Update(e) if e.is_resumable())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Signal(msg) => write!(f, "Failed to set signal handler: {}", msg),
            CliError::Update(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Update(e) => Some(e),
            CliError::Config(_) | CliError::Signal(_) => None,
        }
    }
}

impl From<UpdateError> for CliError {
    fn from(e: UpdateError) -> Self {
        CliError::Update(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}
