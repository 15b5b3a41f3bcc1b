use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use notes_core::util::is_blank;
use notes_core::{Note, NoteKey};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::store::NoteStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    store: NoteStore,
}

impl AppState {
    pub fn from_config(config: Arc<AppConfig>) -> Self {
        Self {
            config,
            store: NoteStore::new(),
        }
    }
}

pub fn app_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/notes", get(list_notes).post(create_note))
        .route(
            "/notes/{user_id}",
            get(list_user_notes).delete(delete_user_notes),
        )
        .route(
            "/notes/{user_id}/{note_id}",
            get(get_note).put(update_note).delete(delete_note),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_headers(Any).allow_methods(Any);
    match &config.allowed_origin {
        Some(origin) => layer.allow_origin(origin.clone()),
        None => layer.allow_origin(Any),
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: i64,
    notes: usize,
}

async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().timestamp(),
        notes: state.store.len().await,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateNoteRequest {
    user_id: Option<String>,
    note_id: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateNoteRequest {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct DeletedResponse {
    deleted: usize,
}

async fn list_notes(State(state): State<AppState>) -> Json<Vec<Note>> {
    Json(state.store.list_all().await)
}

async fn list_user_notes(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<Note>> {
    Json(state.store.list_by_user(&user_id).await)
}

async fn get_note(
    State(state): State<AppState>,
    Path((user_id, note_id)): Path<(String, String)>,
) -> Result<Json<Note>, AppError> {
    state
        .store
        .get(&NoteKey::new(user_id, note_id))
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found("Note not found"))
}

async fn create_note(
    State(state): State<AppState>,
    Json(request): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<Note>), AppError> {
    let user_id = required(request.user_id, "userId")?;
    let content = required(request.content, "content")?;
    let note_id = request
        .note_id
        .filter(|note_id| !is_blank(note_id))
        .unwrap_or_else(|| Uuid::now_v7().to_string());

    let note = state.store.put(Note::new(user_id, note_id, content)).await;
    tracing::info!(note = %note.key(), "Stored note");
    Ok((StatusCode::CREATED, Json(note)))
}

async fn update_note(
    State(state): State<AppState>,
    Path((user_id, note_id)): Path<(String, String)>,
    Json(request): Json<UpdateNoteRequest>,
) -> Result<Json<Note>, AppError> {
    let content = required(request.content, "content")?;
    let key = NoteKey::new(user_id, note_id);
    let note = state
        .store
        .update_content(&key, content)
        .await
        .ok_or_else(|| AppError::not_found("Note not found"))?;
    tracing::info!(note = %key, "Updated note");
    Ok(Json(note))
}

async fn delete_user_notes(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<DeletedResponse> {
    let deleted = state.store.remove_user(&user_id).await;
    tracing::info!(user = %user_id, deleted, "Deleted user notes");
    Json(DeletedResponse { deleted })
}

async fn delete_note(
    State(state): State<AppState>,
    Path((user_id, note_id)): Path<(String, String)>,
) -> Json<MessageResponse> {
    let key = NoteKey::new(user_id, note_id);
    let existed = state.store.remove(&key).await;
    tracing::info!(note = %key, existed, "Deleted note");
    Json(MessageResponse {
        message: "Note deleted",
    })
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value {
        Some(value) if !is_blank(&value) => Ok(value),
        _ => Err(AppError::bad_request(format!("{field} is required"))),
    }
}
