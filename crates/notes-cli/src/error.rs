use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] notes_core::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] notes_core::ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("{0}")]
    Action(String),
    #[error("User ID and note ID must not be blank")]
    BlankIdentifier,
}
