//! Data models for notes

mod note;

pub use note::{validate_fields, Note, NoteKey, NoteUpdate};
