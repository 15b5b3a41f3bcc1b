use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use notes_core::{Note, NoteKey};
use tokio::sync::RwLock;

/// In-memory note table keyed by `(user_id, note_id)`.
///
/// Iteration follows key order, so every listing is sorted by user and then
/// by note id.
#[derive(Debug, Clone, Default)]
pub struct NoteStore {
    notes: Arc<RwLock<BTreeMap<NoteKey, Note>>>,
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list_all(&self) -> Vec<Note> {
        self.notes.read().await.values().cloned().collect()
    }

    pub async fn list_by_user(&self, user_id: &str) -> Vec<Note> {
        let notes = self.notes.read().await;
        user_range(&notes, user_id).cloned().collect()
    }

    pub async fn get(&self, key: &NoteKey) -> Option<Note> {
        self.notes.read().await.get(key).cloned()
    }

    /// Insert or overwrite the note at its key, stamping `created_at`.
    pub async fn put(&self, mut note: Note) -> Note {
        note.created_at = Some(Utc::now().to_rfc3339());
        self.notes.write().await.insert(note.key(), note.clone());
        note
    }

    /// Replace the content of an existing note. `None` when the key is unknown.
    pub async fn update_content(&self, key: &NoteKey, content: String) -> Option<Note> {
        let mut notes = self.notes.write().await;
        let note = notes.get_mut(key)?;
        note.content = content;
        Some(note.clone())
    }

    pub async fn remove(&self, key: &NoteKey) -> bool {
        self.notes.write().await.remove(key).is_some()
    }

    /// Remove every note owned by `user_id`, returning how many were removed.
    pub async fn remove_user(&self, user_id: &str) -> usize {
        let mut notes = self.notes.write().await;
        let before = notes.len();
        notes.retain(|key, _| key.user_id != user_id);
        before - notes.len()
    }

    pub async fn len(&self) -> usize {
        self.notes.read().await.len()
    }
}

fn user_range<'a>(
    notes: &'a BTreeMap<NoteKey, Note>,
    user_id: &'a str,
) -> impl Iterator<Item = &'a Note> + 'a {
    notes
        .range(NoteKey::new(user_id, "")..)
        .take_while(move |(key, _)| key.user_id == user_id)
        .map(|(_, note)| note)
}
