use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use pretty_assertions::assert_eq;
use tokio::sync::watch;

use super::*;
use crate::error::RemoteError;
use crate::models::NoteKey;
use crate::service::RemoteResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Call {
    ListAll,
    ListByUser(String),
    Get(String, String),
    Create(String, String),
    Update(String, String),
    DeleteByUser(String),
    Delete(String, String),
}

/// In-memory note store with failure injection and a call log.
#[derive(Default)]
struct FakeNoteService {
    notes: Mutex<BTreeMap<NoteKey, Note>>,
    failing: Mutex<HashSet<Call>>,
    calls: Mutex<Vec<Call>>,
    observer: Mutex<Option<watch::Receiver<RequestState>>>,
    in_flight_seen: Mutex<Vec<bool>>,
}

impl FakeNoteService {
    fn with_notes(notes: &[Note]) -> Self {
        let service = Self::default();
        {
            let mut store = service.notes.lock().unwrap();
            for note in notes {
                store.insert(note.key(), note.clone());
            }
        }
        service
    }

    fn fail(&self, call: Call) {
        self.failing.lock().unwrap().insert(call);
    }

    fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    fn observe(&self, receiver: watch::Receiver<RequestState>) {
        *self.observer.lock().unwrap() = Some(receiver);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn stored(&self) -> Vec<Note> {
        self.notes.lock().unwrap().values().cloned().collect()
    }

    fn record(&self, call: Call) -> RemoteResult<()> {
        if let Some(receiver) = self.observer.lock().unwrap().as_ref() {
            self.in_flight_seen
                .lock()
                .unwrap()
                .push(receiver.borrow().in_flight);
        }
        self.calls.lock().unwrap().push(call.clone());
        if self.failing.lock().unwrap().contains(&call) {
            return Err(server_error());
        }
        Ok(())
    }
}

fn server_error() -> RemoteError {
    RemoteError::Status {
        status: 500,
        body: "injected failure".to_string(),
    }
}

fn not_found() -> RemoteError {
    RemoteError::Status {
        status: 404,
        body: "Note not found".to_string(),
    }
}

impl NoteService for FakeNoteService {
    async fn list_all(&self) -> RemoteResult<Vec<Note>> {
        self.record(Call::ListAll)?;
        Ok(self.stored())
    }

    async fn list_by_user(&self, user_id: &str) -> RemoteResult<Vec<Note>> {
        self.record(Call::ListByUser(user_id.to_string()))?;
        Ok(self
            .stored()
            .into_iter()
            .filter(|note| note.user_id == user_id)
            .collect())
    }

    async fn get(&self, user_id: &str, note_id: &str) -> RemoteResult<Note> {
        self.record(Call::Get(user_id.to_string(), note_id.to_string()))?;
        self.notes
            .lock()
            .unwrap()
            .get(&NoteKey::new(user_id, note_id))
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create(&self, note: &Note) -> RemoteResult<()> {
        self.record(Call::Create(note.user_id.clone(), note.note_id.clone()))?;
        self.notes.lock().unwrap().insert(note.key(), note.clone());
        Ok(())
    }

    async fn update(&self, user_id: &str, note_id: &str, content: &str) -> RemoteResult<()> {
        self.record(Call::Update(user_id.to_string(), note_id.to_string()))?;
        let mut notes = self.notes.lock().unwrap();
        let note = notes
            .get_mut(&NoteKey::new(user_id, note_id))
            .ok_or_else(not_found)?;
        note.content = content.to_string();
        Ok(())
    }

    async fn delete_by_user(&self, user_id: &str) -> RemoteResult<()> {
        self.record(Call::DeleteByUser(user_id.to_string()))?;
        self.notes
            .lock()
            .unwrap()
            .retain(|key, _| key.user_id != user_id);
        Ok(())
    }

    async fn delete(&self, user_id: &str, note_id: &str) -> RemoteResult<()> {
        self.record(Call::Delete(user_id.to_string(), note_id.to_string()))?;
        self.notes
            .lock()
            .unwrap()
            .remove(&NoteKey::new(user_id, note_id));
        Ok(())
    }
}

fn note(user_id: &str, note_id: &str, content: &str) -> Note {
    Note::new(user_id, note_id, content)
}

async fn controller_with(notes: &[Note]) -> NoteController<FakeNoteService> {
    NoteController::init(FakeNoteService::with_notes(notes), DeleteStrategy::PerNote).await
}

#[tokio::test]
async fn init_loads_every_note() {
    let controller = controller_with(&[note("alice", "n1", "a"), note("bob", "n1", "b")]).await;

    assert_eq!(
        controller.all_notes(),
        &[note("alice", "n1", "a"), note("bob", "n1", "b")]
    );
    assert!(controller.results().is_empty());
    assert_eq!(controller.request_state(), &RequestState::default());
}

#[tokio::test]
async fn create_then_refresh_contains_exactly_one_entry() {
    let mut controller = controller_with(&[]).await;

    let status = controller.create_note("alice", "n1", "hello").await;
    assert_eq!(status, ActionStatus::Completed);

    controller.refresh_all().await;
    let matching = controller
        .all_notes()
        .iter()
        .filter(|n| n.has_key(&NoteKey::new("alice", "n1")))
        .collect::<Vec<_>>();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].content, "hello");
}

#[tokio::test]
async fn create_refreshes_after_the_mutation_response() {
    let mut controller = controller_with(&[]).await;
    controller.service().clear_calls();

    controller.create_note(" alice ", "n1", "hello").await;

    assert_eq!(
        controller.service().calls(),
        vec![
            Call::Create("alice".to_string(), "n1".to_string()),
            Call::ListAll
        ]
    );
}

#[tokio::test]
async fn create_with_missing_field_makes_no_remote_call() {
    let mut controller = controller_with(&[note("bob", "n1", "b")]).await;
    controller.service().clear_calls();
    let before = controller.all_notes().to_vec();

    let status = controller.create_note("", "n1", "x").await;

    assert_eq!(
        status,
        ActionStatus::Rejected(ValidationError::MissingFields(vec![Field::UserId]))
    );
    assert!(controller.service().calls().is_empty());
    assert_eq!(controller.last_error(), Some("All fields are required"));
    assert_eq!(controller.all_notes(), before.as_slice());
    assert!(!controller.in_flight());
}

#[tokio::test]
async fn create_failure_leaves_views_untouched() {
    let mut controller = controller_with(&[note("alice", "n0", "a")]).await;
    controller.fetch_by_user("alice").await;
    controller
        .service()
        .fail(Call::Create("alice".to_string(), "n1".to_string()));

    let status = controller.create_note("alice", "n1", "hello").await;

    assert_eq!(status, ActionStatus::Failed);
    assert_eq!(controller.last_error(), Some(CREATE_FAILED));
    assert_eq!(controller.all_notes(), &[note("alice", "n0", "a")]);
    assert_eq!(controller.results(), &[note("alice", "n0", "a")]);
}

#[tokio::test]
async fn successful_mutation_clears_results() {
    let mut controller = controller_with(&[note("alice", "n0", "a")]).await;
    controller.fetch_by_user("alice").await;
    assert_eq!(controller.results().len(), 1);

    controller.create_note("alice", "n1", "hello").await;

    assert!(controller.results().is_empty());
    assert_eq!(controller.all_notes().len(), 2);
}

#[tokio::test]
async fn failed_refresh_preserves_note_list() {
    let a = note("alice", "n1", "a");
    let b = note("bob", "n1", "b");
    let mut controller = controller_with(&[a.clone(), b.clone()]).await;
    controller.service().fail(Call::ListAll);

    let status = controller.refresh_all().await;

    assert_eq!(status, ActionStatus::Failed);
    assert_eq!(controller.all_notes(), &[a, b]);
    assert_eq!(controller.last_error(), Some(FETCH_FAILED));
    assert!(!controller.in_flight());
}

#[tokio::test]
async fn failed_initial_load_is_reported() {
    let service = FakeNoteService::default();
    service.fail(Call::ListAll);

    let controller = NoteController::init(service, DeleteStrategy::PerNote).await;

    assert!(controller.all_notes().is_empty());
    assert_eq!(controller.last_error(), Some(FETCH_FAILED));
}

#[tokio::test]
async fn last_error_is_cleared_by_the_next_action() {
    let mut controller = controller_with(&[]).await;
    controller.service().fail(Call::ListAll);
    controller.refresh_all().await;
    assert!(controller.last_error().is_some());

    controller.service().heal();
    controller.refresh_all().await;

    assert_eq!(controller.last_error(), None);
}

#[tokio::test]
async fn fetch_by_user_replaces_results_exactly() {
    let mut controller = controller_with(&[
        note("alice", "n1", "a1"),
        note("alice", "n2", "a2"),
        note("bob", "n1", "b1"),
    ])
    .await;

    assert_eq!(controller.fetch_by_user("alice").await, ActionStatus::Completed);
    assert_eq!(
        controller.results(),
        &[note("alice", "n1", "a1"), note("alice", "n2", "a2")]
    );

    assert_eq!(controller.fetch_by_user("carol").await, ActionStatus::Completed);
    assert!(controller.results().is_empty());
}

#[tokio::test]
async fn fetch_by_user_failure_keeps_previous_results() {
    let mut controller = controller_with(&[note("alice", "n1", "a1")]).await;
    controller.fetch_by_user("alice").await;
    controller
        .service()
        .fail(Call::ListByUser("bob".to_string()));

    let status = controller.fetch_by_user("bob").await;

    assert_eq!(status, ActionStatus::Failed);
    assert_eq!(controller.last_error(), Some(FETCH_FAILED));
    assert_eq!(controller.results(), &[note("alice", "n1", "a1")]);
}

#[tokio::test]
async fn empty_query_input_is_a_no_op() {
    let mut controller = controller_with(&[note("alice", "n1", "a1")]).await;
    controller.service().clear_calls();

    assert_eq!(controller.fetch_by_user("  ").await, ActionStatus::Skipped);
    assert_eq!(controller.fetch_specific("alice", "").await, ActionStatus::Skipped);
    assert_eq!(controller.delete_by_user("").await, ActionStatus::Skipped);
    assert_eq!(controller.delete_specific("", "n1").await, ActionStatus::Skipped);

    assert!(controller.service().calls().is_empty());
    assert_eq!(controller.last_error(), None);
}

#[tokio::test]
async fn fetch_specific_missing_note_keeps_results() {
    let mut controller = controller_with(&[note("alice", "n1", "a1")]).await;
    controller.fetch_by_user("alice").await;

    let status = controller.fetch_specific("alice", "missing").await;

    assert_eq!(status, ActionStatus::Failed);
    assert_eq!(controller.last_error(), Some(NOT_FOUND));
    assert_eq!(controller.results(), &[note("alice", "n1", "a1")]);
}

#[tokio::test]
async fn update_then_fetch_specific_round_trips_content() {
    let mut controller = controller_with(&[note("alice", "n1", "hello")]).await;

    assert_eq!(
        controller.update_note("alice", "n1", "world").await,
        ActionStatus::Completed
    );
    controller.fetch_specific("alice", "n1").await;

    assert_eq!(controller.results(), &[note("alice", "n1", "world")]);
    assert_eq!(controller.all_notes(), &[note("alice", "n1", "world")]);
}

#[tokio::test]
async fn update_missing_note_fails_without_touching_views() {
    let mut controller = controller_with(&[note("alice", "n1", "hello")]).await;
    controller.fetch_by_user("alice").await;

    let status = controller.update_note("alice", "n2", "world").await;

    assert_eq!(status, ActionStatus::Failed);
    assert_eq!(controller.last_error(), Some(UPDATE_FAILED));
    assert_eq!(controller.results(), &[note("alice", "n1", "hello")]);
    assert_eq!(controller.all_notes(), &[note("alice", "n1", "hello")]);
}

#[tokio::test]
async fn update_validation_reports_missing_fields() {
    let mut controller = controller_with(&[]).await;
    controller.service().clear_calls();

    let status = controller.update_note("alice", " ", "").await;

    assert_eq!(
        status,
        ActionStatus::Rejected(ValidationError::MissingFields(vec![
            Field::NoteId,
            Field::Content
        ]))
    );
    assert!(controller.service().calls().is_empty());
}

#[tokio::test]
async fn delete_specific_then_fetch_specific_is_not_found() {
    let mut controller = controller_with(&[note("alice", "n1", "hello")]).await;

    assert_eq!(
        controller.delete_specific("alice", "n1").await,
        ActionStatus::Completed
    );
    assert!(controller.all_notes().is_empty());

    assert_eq!(
        controller.fetch_specific("alice", "n1").await,
        ActionStatus::Failed
    );
    assert_eq!(controller.last_error(), Some(NOT_FOUND));
}

#[tokio::test]
async fn delete_specific_failure_reports_delete_failed() {
    let mut controller = controller_with(&[note("alice", "n1", "hello")]).await;
    controller
        .service()
        .fail(Call::Delete("alice".to_string(), "n1".to_string()));

    assert_eq!(
        controller.delete_specific("alice", "n1").await,
        ActionStatus::Failed
    );
    assert_eq!(controller.last_error(), Some(DELETE_FAILED));
    assert_eq!(controller.all_notes(), &[note("alice", "n1", "hello")]);
}

#[tokio::test]
async fn delete_by_user_removes_all_of_their_notes() {
    let mut controller = controller_with(&[
        note("alice", "n1", "a1"),
        note("alice", "n2", "a2"),
        note("alice", "n3", "a3"),
        note("bob", "n1", "b1"),
    ])
    .await;

    assert_eq!(controller.delete_by_user("alice").await, ActionStatus::Completed);
    assert_eq!(
        controller.last_batch(),
        Some(BatchOutcome {
            deleted: 3,
            failed: 0
        })
    );

    controller.fetch_by_user("alice").await;
    assert!(controller.results().is_empty());
    assert_eq!(controller.all_notes(), &[note("bob", "n1", "b1")]);
}

#[tokio::test]
async fn delete_by_user_issues_deletes_in_order_then_refreshes() {
    let mut controller =
        controller_with(&[note("alice", "n1", "a1"), note("alice", "n2", "a2")]).await;
    controller.service().clear_calls();

    controller.delete_by_user("alice").await;

    assert_eq!(
        controller.service().calls(),
        vec![
            Call::ListByUser("alice".to_string()),
            Call::Delete("alice".to_string(), "n1".to_string()),
            Call::Delete("alice".to_string(), "n2".to_string()),
            Call::ListAll,
        ]
    );
}

#[tokio::test]
async fn delete_by_user_partial_failure_still_reflects_store() {
    let mut controller = controller_with(&[
        note("alice", "n1", "a1"),
        note("alice", "n2", "a2"),
        note("alice", "n3", "a3"),
    ])
    .await;
    controller.fetch_by_user("alice").await;
    controller
        .service()
        .fail(Call::Delete("alice".to_string(), "n2".to_string()));

    let status = controller.delete_by_user("alice").await;

    assert_eq!(status, ActionStatus::Failed);
    assert_eq!(controller.last_error(), Some(DELETE_FAILED));
    assert_eq!(
        controller.last_batch(),
        Some(BatchOutcome {
            deleted: 2,
            failed: 1
        })
    );
    assert!(controller.results().is_empty());
    assert_eq!(controller.all_notes(), &[note("alice", "n2", "a2")]);
}

#[tokio::test]
async fn delete_by_user_hard_failure_leaves_views_untouched() {
    let mut controller = controller_with(&[note("alice", "n1", "a1")]).await;
    controller.fetch_by_user("alice").await;
    controller
        .service()
        .fail(Call::ListByUser("alice".to_string()));
    controller.service().clear_calls();

    let status = controller.delete_by_user("alice").await;

    assert_eq!(status, ActionStatus::Failed);
    assert_eq!(controller.last_error(), Some(DELETE_FAILED));
    assert_eq!(controller.all_notes(), &[note("alice", "n1", "a1")]);
    assert_eq!(controller.results(), &[note("alice", "n1", "a1")]);
    assert_eq!(
        controller.service().calls(),
        vec![Call::ListByUser("alice".to_string())]
    );
}

#[tokio::test]
async fn bulk_strategy_issues_a_single_delete() {
    let service = FakeNoteService::with_notes(&[note("alice", "n1", "a1"), note("alice", "n2", "a2")]);
    let mut controller = NoteController::init(service, DeleteStrategy::Bulk).await;
    controller.service().clear_calls();

    assert_eq!(controller.delete_by_user("alice").await, ActionStatus::Completed);

    assert_eq!(
        controller.service().calls(),
        vec![Call::DeleteByUser("alice".to_string()), Call::ListAll]
    );
    assert!(controller.all_notes().is_empty());
    assert_eq!(controller.last_batch(), None);
}

#[tokio::test]
async fn mutation_succeeds_even_when_trailing_refresh_fails() {
    let mut controller = controller_with(&[note("alice", "n1", "a1")]).await;
    controller.service().fail(Call::ListAll);

    let status = controller.delete_specific("alice", "n1").await;

    assert_eq!(status, ActionStatus::Completed);
    assert_eq!(controller.last_error(), Some(FETCH_FAILED));
    assert_eq!(controller.all_notes(), &[note("alice", "n1", "a1")]);
    assert!(controller.service().stored().is_empty());
}

#[tokio::test]
async fn in_flight_is_set_during_every_remote_call() {
    let mut controller = controller_with(&[note("alice", "n1", "a1")]).await;
    let receiver = controller.subscribe();
    controller.service().observe(receiver);

    controller.fetch_by_user("alice").await;
    controller.update_note("alice", "n1", "b").await;
    controller.delete_by_user("alice").await;

    let seen = controller.service().in_flight_seen.lock().unwrap().clone();
    assert!(!seen.is_empty());
    assert!(seen.iter().all(|in_flight| *in_flight));
    assert!(!controller.in_flight());
    assert!(!controller.subscribe().borrow().in_flight);
}

#[tokio::test]
async fn concrete_scenario_round_trip() {
    let mut controller = controller_with(&[]).await;

    controller.create_note("alice", "n1", "hello").await;
    controller.refresh_all().await;
    assert_eq!(controller.all_notes(), &[note("alice", "n1", "hello")]);

    controller.update_note("alice", "n1", "world").await;
    controller.fetch_specific("alice", "n1").await;
    assert_eq!(controller.results(), &[note("alice", "n1", "world")]);

    controller.delete_specific("alice", "n1").await;
    controller.refresh_all().await;
    assert!(controller.all_notes().is_empty());
    assert_eq!(controller.last_error(), None);
}
