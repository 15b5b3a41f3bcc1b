//! Error types for notes-core

use std::fmt;

use thiserror::Error;

/// Result type alias using notes-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in notes-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input detected before any remote call
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Remote note service failure
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A user-editable field of a note form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    UserId,
    NoteId,
    Content,
}

impl Field {
    /// Wire name of the field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserId => "userId",
            Self::NoteId => "noteId",
            Self::Content => "content",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Local precondition failures. No remote call is made when one is raised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("All fields are required")]
    MissingFields(Vec<Field>),
}

impl ValidationError {
    /// Fields that were empty after trimming.
    pub fn missing(&self) -> &[Field] {
        match self {
            Self::MissingFields(fields) => fields,
        }
    }
}

/// Failure of a single call to the remote note service.
///
/// The controller does not distinguish between the variants; they exist for
/// logging.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Note service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode note service response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Configuration errors raised while resolving client settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
