//! notes-core - Core library for the notes client
//!
//! This crate contains the note model, the contract of the remote note
//! service with its HTTP implementation, and the controller that keeps the
//! locally cached views consistent with the remote store.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod service;
pub mod util;

pub use client::HttpNoteService;
pub use config::{ClientConfig, DeleteStrategy};
pub use controller::{ActionStatus, BatchOutcome, NoteController, RequestState};
pub use error::{ConfigError, Error, Field, RemoteError, Result, ValidationError};
pub use models::{Note, NoteKey};
pub use service::NoteService;
