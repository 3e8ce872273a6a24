//! CLI command implementations for Invaders.

pub(crate) mod run;
pub(crate) mod show;
pub(crate) mod validate;

use clap::ValueEnum;
use std::error::Error;
use std::fmt;
use std::path::Path;

use invaders::GameConfig;

/// Output format for the `show` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ShowFormat {
    /// Human-readable board and ledger.
    Text,
    /// Machine-readable JSON snapshot.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<invaders::Error> for CliError {
    fn from(e: invaders::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<invaders::ConfigError> for CliError {
    fn from(e: invaders::ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<invaders::store::StoreError> for CliError {
    fn from(e: invaders::store::StoreError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(e.to_string())
    }
}

/// Load and validate a configuration file.
fn load_config(path: &Path) -> Result<GameConfig, CliError> {
    let config = GameConfig::load(path)?;
    config.validate()?;
    Ok(config)
}
