//! Note controller
//!
//! Owns the two cached views of the note store (every note, and the result
//! of the latest query) together with the request state shown by the UI.
//! Each action validates its input, issues its remote calls one after the
//! other, and only touches a view once the call feeding it has succeeded.
//! A failed call leaves every view at its previous value.

use std::fmt;

use tokio::sync::watch;

use crate::client::HttpNoteService;
use crate::config::{ClientConfig, DeleteStrategy};
use crate::error::{Field, Result, ValidationError};
use crate::models::{validate_fields, Note};
use crate::service::NoteService;

#[cfg(test)]
mod tests;

pub const FETCH_FAILED: &str = "Failed to fetch notes";
pub const CREATE_FAILED: &str = "Failed to add note";
pub const NOT_FOUND: &str = "Note not found";
pub const UPDATE_FAILED: &str = "Update failed";
pub const DELETE_FAILED: &str = "Delete failed";

/// Loading/error state for the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestState {
    /// A request sequence is awaiting the note service
    pub in_flight: bool,
    /// User-facing message of the most recent failure
    pub last_error: Option<String>,
}

/// Counts of a per-note batch delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub deleted: usize,
    pub failed: usize,
}

impl BatchOutcome {
    pub const fn is_partial(&self) -> bool {
        self.failed > 0
    }
}

/// How an action settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStatus {
    /// The remote mutation or query succeeded. Forms may be cleared.
    Completed,
    /// Required input was empty; nothing happened.
    Skipped,
    /// Input failed validation; no remote call was made.
    Rejected(ValidationError),
    /// A remote call failed; see `last_error`.
    Failed,
}

impl ActionStatus {
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
            Self::Skipped => f.write_str("skipped"),
            Self::Rejected(error) => write!(f, "rejected: {error}"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// Client-side controller for the note store.
///
/// Actions take `&mut self`, so one owner runs at most one action at a time.
/// Share it between tasks behind a `tokio::sync::Mutex` to queue actions.
pub struct NoteController<S> {
    service: S,
    delete_strategy: DeleteStrategy,
    all_notes: Vec<Note>,
    results: Vec<Note>,
    request: RequestState,
    last_batch: Option<BatchOutcome>,
    state_tx: watch::Sender<RequestState>,
}

impl NoteController<HttpNoteService> {
    /// Build an HTTP-backed controller and load every note.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let service = HttpNoteService::new(config)?;
        Ok(Self::init(service, config.delete_strategy).await)
    }
}

impl<S: NoteService> NoteController<S> {
    /// Controller with empty views. Nothing is fetched.
    pub fn new(service: S, delete_strategy: DeleteStrategy) -> Self {
        let (state_tx, _) = watch::channel(RequestState::default());
        Self {
            service,
            delete_strategy,
            all_notes: Vec::new(),
            results: Vec::new(),
            request: RequestState::default(),
            last_batch: None,
            state_tx,
        }
    }

    /// Controller whose note list has been loaded once.
    ///
    /// A failed initial load is recorded in `last_error` like any other
    /// refresh failure.
    pub async fn init(service: S, delete_strategy: DeleteStrategy) -> Self {
        let mut controller = Self::new(service, delete_strategy);
        controller.refresh_all().await;
        controller
    }

    pub fn all_notes(&self) -> &[Note] {
        &self.all_notes
    }

    pub fn results(&self) -> &[Note] {
        &self.results
    }

    pub const fn request_state(&self) -> &RequestState {
        &self.request
    }

    pub const fn in_flight(&self) -> bool {
        self.request.in_flight
    }

    pub fn last_error(&self) -> Option<&str> {
        self.request.last_error.as_deref()
    }

    /// Counts of the most recent per-note `delete_by_user`.
    pub const fn last_batch(&self) -> Option<BatchOutcome> {
        self.last_batch
    }

    pub const fn delete_strategy(&self) -> DeleteStrategy {
        self.delete_strategy
    }

    pub const fn service(&self) -> &S {
        &self.service
    }

    /// Receiver of every request state change, for observers on other tasks.
    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.state_tx.subscribe()
    }

    /// Reload the full note list.
    pub async fn refresh_all(&mut self) -> ActionStatus {
        self.begin();
        let status = self.reload_all().await;
        self.finish();
        status
    }

    pub async fn create_note(
        &mut self,
        user_id: &str,
        note_id: &str,
        content: &str,
    ) -> ActionStatus {
        self.clear_error();
        if let Err(error) = validate_fields(&[
            (Field::UserId, user_id),
            (Field::NoteId, note_id),
            (Field::Content, content),
        ]) {
            return self.reject(error);
        }

        self.begin();
        let note = Note::new(user_id.trim(), note_id.trim(), content);
        let status = match self.service.create(&note).await {
            Ok(()) => {
                tracing::info!(key = %note.key(), "Created note");
                self.apply_mutation().await
            }
            Err(error) => self.fail(CREATE_FAILED, &error),
        };
        self.finish();
        status
    }

    /// Replace the results with every note of `user_id`.
    pub async fn fetch_by_user(&mut self, user_id: &str) -> ActionStatus {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return ActionStatus::Skipped;
        }

        self.begin();
        let status = match self.service.list_by_user(user_id).await {
            Ok(notes) => {
                tracing::debug!(user_id, count = notes.len(), "Fetched notes for user");
                self.results = notes;
                ActionStatus::Completed
            }
            Err(error) => self.fail(FETCH_FAILED, &error),
        };
        self.finish();
        status
    }

    /// Replace the results with the single identified note.
    pub async fn fetch_specific(&mut self, user_id: &str, note_id: &str) -> ActionStatus {
        let (user_id, note_id) = (user_id.trim(), note_id.trim());
        if user_id.is_empty() || note_id.is_empty() {
            return ActionStatus::Skipped;
        }

        self.begin();
        let status = match self.service.get(user_id, note_id).await {
            Ok(note) => {
                self.results = vec![note];
                ActionStatus::Completed
            }
            Err(error) => self.fail(NOT_FOUND, &error),
        };
        self.finish();
        status
    }

    pub async fn update_note(
        &mut self,
        user_id: &str,
        note_id: &str,
        content: &str,
    ) -> ActionStatus {
        self.clear_error();
        if let Err(error) = validate_fields(&[
            (Field::UserId, user_id),
            (Field::NoteId, note_id),
            (Field::Content, content),
        ]) {
            return self.reject(error);
        }

        self.begin();
        let (user_id, note_id) = (user_id.trim(), note_id.trim());
        let status = match self.service.update(user_id, note_id, content).await {
            Ok(()) => {
                tracing::info!(user_id, note_id, "Updated note");
                self.apply_mutation().await
            }
            Err(error) => self.fail(UPDATE_FAILED, &error),
        };
        self.finish();
        status
    }

    /// Delete every note of `user_id` using the configured strategy.
    pub async fn delete_by_user(&mut self, user_id: &str) -> ActionStatus {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return ActionStatus::Skipped;
        }

        self.last_batch = None;
        self.begin();
        let status = match self.delete_strategy {
            DeleteStrategy::PerNote => self.delete_each_note_of(user_id).await,
            DeleteStrategy::Bulk => match self.service.delete_by_user(user_id).await {
                Ok(()) => {
                    tracing::info!(user_id, "Deleted notes for user");
                    self.apply_mutation().await
                }
                Err(error) => self.fail(DELETE_FAILED, &error),
            },
        };
        self.finish();
        status
    }

    pub async fn delete_specific(&mut self, user_id: &str, note_id: &str) -> ActionStatus {
        let (user_id, note_id) = (user_id.trim(), note_id.trim());
        if user_id.is_empty() || note_id.is_empty() {
            return ActionStatus::Skipped;
        }

        self.begin();
        let status = match self.service.delete(user_id, note_id).await {
            Ok(()) => {
                tracing::info!(user_id, note_id, "Deleted note");
                self.apply_mutation().await
            }
            Err(error) => self.fail(DELETE_FAILED, &error),
        };
        self.finish();
        status
    }

    /// Fetch the user's notes, then delete them one at a time.
    ///
    /// Not atomic: a failing delete is counted and the loop moves on. The
    /// note list is reloaded afterwards either way so it shows what the store
    /// actually holds.
    async fn delete_each_note_of(&mut self, user_id: &str) -> ActionStatus {
        let notes = match self.service.list_by_user(user_id).await {
            Ok(notes) => notes,
            Err(error) => return self.fail(DELETE_FAILED, &error),
        };

        let mut outcome = BatchOutcome::default();
        for note in &notes {
            match self.service.delete(user_id, &note.note_id).await {
                Ok(()) => outcome.deleted += 1,
                Err(error) => {
                    tracing::warn!(user_id, note_id = %note.note_id, %error, "Failed to delete note");
                    outcome.failed += 1;
                }
            }
        }
        self.last_batch = Some(outcome);

        self.results.clear();
        self.reload_all().await;

        if outcome.is_partial() {
            tracing::warn!(
                user_id,
                deleted = outcome.deleted,
                failed = outcome.failed,
                "Partially deleted notes for user"
            );
            self.request.last_error = Some(DELETE_FAILED.to_string());
            ActionStatus::Failed
        } else {
            tracing::info!(user_id, deleted = outcome.deleted, "Deleted notes for user");
            ActionStatus::Completed
        }
    }

    /// Second step of every successful mutation: drop the now-stale query
    /// results and reload the note list.
    ///
    /// The mutation itself succeeded, so a failed reload only records its
    /// own error.
    async fn apply_mutation(&mut self) -> ActionStatus {
        self.results.clear();
        self.reload_all().await;
        ActionStatus::Completed
    }

    async fn reload_all(&mut self) -> ActionStatus {
        match self.service.list_all().await {
            Ok(notes) => {
                tracing::debug!(count = notes.len(), "Reloaded note list");
                self.all_notes = notes;
                ActionStatus::Completed
            }
            Err(error) => self.fail(FETCH_FAILED, &error),
        }
    }

    fn reject(&mut self, error: ValidationError) -> ActionStatus {
        tracing::debug!(missing = ?error.missing(), "Rejected note input");
        self.request.last_error = Some(error.to_string());
        self.publish();
        ActionStatus::Rejected(error)
    }

    fn fail(&mut self, message: &str, error: &dyn fmt::Display) -> ActionStatus {
        tracing::warn!(%error, "{message}");
        self.request.last_error = Some(message.to_string());
        ActionStatus::Failed
    }

    fn clear_error(&mut self) {
        self.request.last_error = None;
        self.publish();
    }

    fn begin(&mut self) {
        self.request.last_error = None;
        self.request.in_flight = true;
        self.publish();
    }

    fn finish(&mut self) {
        self.request.in_flight = false;
        self.publish();
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.request.clone());
    }
}
