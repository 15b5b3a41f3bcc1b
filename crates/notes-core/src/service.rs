//! Contract of the remote note service.

use crate::error::RemoteError;
use crate::models::Note;

/// Result of a single remote call.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Requests the controller can issue against the note store.
///
/// Every method is one request; any failure (transport, non-2xx status,
/// undecodable body) is reported as a [`RemoteError`].
#[allow(async_fn_in_trait)]
pub trait NoteService {
    /// `GET /notes`
    async fn list_all(&self) -> RemoteResult<Vec<Note>>;

    /// `GET /notes/{userId}`
    async fn list_by_user(&self, user_id: &str) -> RemoteResult<Vec<Note>>;

    /// `GET /notes/{userId}/{noteId}`
    async fn get(&self, user_id: &str, note_id: &str) -> RemoteResult<Note>;

    /// `POST /notes`
    async fn create(&self, note: &Note) -> RemoteResult<()>;

    /// `PUT /notes/{userId}/{noteId}`
    async fn update(&self, user_id: &str, note_id: &str, content: &str) -> RemoteResult<()>;

    /// `DELETE /notes/{userId}`
    async fn delete_by_user(&self, user_id: &str) -> RemoteResult<()>;

    /// `DELETE /notes/{userId}/{noteId}`
    async fn delete(&self, user_id: &str, note_id: &str) -> RemoteResult<()>;
}
