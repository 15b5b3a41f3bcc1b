//! HTTP client for the remote note service.
//!
//! Speaks the REST contract of the note store. Any non-2xx response is a
//! failure; response bodies of mutations are not inspected.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::RemoteError;
use crate::models::{Note, NoteUpdate};
use crate::service::{NoteService, RemoteResult};
use crate::util::compact_text;

/// [`NoteService`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpNoteService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpNoteService {
    pub fn new(config: &ClientConfig) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            base_url: config.base_url.clone(),
            client,
        })
    }

    /// Returns the base URL this client was configured with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn notes_url(&self) -> String {
        format!("{}/notes", self.base_url)
    }

    fn user_url(&self, user_id: &str) -> String {
        format!("{}/notes/{}", self.base_url, urlencoding::encode(user_id))
    }

    fn note_url(&self, user_id: &str, note_id: &str) -> String {
        format!(
            "{}/notes/{}/{}",
            self.base_url,
            urlencoding::encode(user_id),
            urlencoding::encode(note_id)
        )
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: String) -> RemoteResult<T> {
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl NoteService for HttpNoteService {
    async fn list_all(&self) -> RemoteResult<Vec<Note>> {
        self.fetch_json(self.notes_url()).await
    }

    async fn list_by_user(&self, user_id: &str) -> RemoteResult<Vec<Note>> {
        self.fetch_json(self.user_url(user_id)).await
    }

    async fn get(&self, user_id: &str, note_id: &str) -> RemoteResult<Note> {
        self.fetch_json(self.note_url(user_id, note_id)).await
    }

    async fn create(&self, note: &Note) -> RemoteResult<()> {
        let url = self.notes_url();
        tracing::debug!(%url, key = %note.key(), "POST");
        let response = self.client.post(url).json(note).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn update(&self, user_id: &str, note_id: &str, content: &str) -> RemoteResult<()> {
        let url = self.note_url(user_id, note_id);
        tracing::debug!(%url, "PUT");
        let body = NoteUpdate {
            content: content.to_string(),
        };
        let response = self.client.put(url).json(&body).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn delete_by_user(&self, user_id: &str) -> RemoteResult<()> {
        let url = self.user_url(user_id);
        tracing::debug!(%url, "DELETE");
        let response = self.client.delete(url).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn delete(&self, user_id: &str, note_id: &str) -> RemoteResult<()> {
        let url = self.note_url(user_id, note_id);
        tracing::debug!(%url, "DELETE");
        let response = self.client.delete(url).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}

async fn ensure_success(response: Response) -> RemoteResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, &body))
}

fn status_error(status: StatusCode, body: &str) -> RemoteError {
    let body = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|payload| {
            ["error", "detail", "message"]
                .iter()
                .find_map(|key| payload.get(*key).and_then(|value| value.as_str()))
                .map(ToString::to_string)
        })
        .unwrap_or_else(|| body.to_string());

    RemoteError::Status {
        status: status.as_u16(),
        body: compact_text(&body),
    }
}
