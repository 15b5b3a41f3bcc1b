//! Note model

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Field, ValidationError};
use crate::util::is_blank;

/// Identity of a note in the store: unique per `(user_id, note_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteKey {
    pub user_id: String,
    pub note_id: String,
}

impl NoteKey {
    #[must_use]
    pub fn new(user_id: impl Into<String>, note_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            note_id: note_id.into(),
        }
    }
}

impl fmt::Display for NoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user_id, self.note_id)
    }
}

/// A note owned by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Owning user
    pub user_id: String,
    /// Identifier, unique per user
    pub note_id: String,
    /// Plain text content
    pub content: String,
    /// Creation timestamp (RFC 3339), stamped by the note service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Note {
    /// Create a note with the given identity and content
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        note_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            note_id: note_id.into(),
            content: content.into(),
            created_at: None,
        }
    }

    /// The `(user_id, note_id)` identity of this note
    #[must_use]
    pub fn key(&self) -> NoteKey {
        NoteKey::new(&self.user_id, &self.note_id)
    }

    /// Whether this note is identified by `key`
    #[must_use]
    pub fn has_key(&self, key: &NoteKey) -> bool {
        self.user_id == key.user_id && self.note_id == key.note_id
    }
}

/// Request body of an update: only the content is replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteUpdate {
    pub content: String,
}

/// Check that every `(field, value)` pair is non-empty after trimming.
///
/// Reports all missing fields at once so a form can highlight each of them.
pub fn validate_fields(fields: &[(Field, &str)]) -> Result<(), ValidationError> {
    let missing = fields
        .iter()
        .filter(|(_, value)| is_blank(value))
        .map(|(field, _)| *field)
        .collect::<Vec<_>>();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(missing))
    }
}
