use notes_core::{BatchOutcome, NoteController, NoteService};

use crate::commands::common::{open_controller, settle};
use crate::error::CliError;

pub async fn run_delete(
    user_id: &str,
    note_id: Option<&str>,
    api_url: Option<String>,
) -> Result<(), CliError> {
    let mut controller = open_controller(api_url).await?;

    match note_id {
        Some(note_id) => {
            let status = controller.delete_specific(user_id, note_id).await;
            settle(&status, &controller)?;
            println!("{}/{}", user_id.trim(), note_id.trim());
        }
        None => {
            let status = controller.delete_by_user(user_id).await;
            if let Some(summary) = batch_summary(&controller) {
                println!("{summary}");
            }
            settle(&status, &controller)?;
        }
    }
    Ok(())
}

/// One-line summary of the last per-note batch delete, if one ran.
pub fn batch_summary<S: NoteService>(controller: &NoteController<S>) -> Option<String> {
    controller.last_batch().map(|BatchOutcome { deleted, failed }| {
        if failed == 0 {
            format!("Deleted {deleted} note(s)")
        } else {
            format!("Deleted {deleted} note(s), {failed} failed")
        }
    })
}
