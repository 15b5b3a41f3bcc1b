use std::io::{self, IsTerminal, Read};

use notes_core::{ActionStatus, ClientConfig, HttpNoteService, Note, NoteController, NoteService};

use crate::error::CliError;

pub type Controller = NoteController<HttpNoteService>;

/// Resolve client config and load the note list once.
pub async fn open_controller(api_url: Option<String>) -> Result<Controller, CliError> {
    let config = ClientConfig::from_env_with_override(api_url)?;
    tracing::debug!(base_url = %config.base_url, strategy = %config.delete_strategy, "Connecting");
    Ok(NoteController::connect(&config).await?)
}

/// Turn an action's status into the CLI result.
///
/// A completed mutation whose trailing reload failed still succeeds, but the
/// reload error is reported on stderr.
pub fn settle<S: NoteService>(
    status: &ActionStatus,
    controller: &NoteController<S>,
) -> Result<(), CliError> {
    match status {
        ActionStatus::Completed => {
            if let Some(message) = controller.last_error() {
                eprintln!("Warning: {message}");
            }
            Ok(())
        }
        ActionStatus::Skipped => Err(CliError::BlankIdentifier),
        ActionStatus::Rejected(error) => Err(CliError::Action(error.to_string())),
        ActionStatus::Failed => Err(CliError::Action(
            controller
                .last_error()
                .unwrap_or("Request failed")
                .to_string(),
        )),
    }
}

/// Note content from the CLI words, or piped stdin when no words were given.
pub fn resolve_note_content(content_parts: &[String]) -> Result<String, CliError> {
    let joined = content_parts.join(" ");
    if !joined.trim().is_empty() {
        return Ok(joined);
    }

    Ok(read_piped_stdin()?.unwrap_or_default())
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn format_note_lines(notes: &[Note]) -> Vec<String> {
    notes
        .iter()
        .map(|note| {
            format!(
                "{} | {} → {}",
                note.user_id,
                note.note_id,
                note_preview(note, 60)
            )
        })
        .collect()
}

pub fn render_notes(notes: &[Note], as_json: bool) -> Result<Vec<String>, CliError> {
    if as_json {
        return Ok(vec![serde_json::to_string_pretty(notes)?]);
    }
    if notes.is_empty() {
        return Ok(vec!["No notes.".to_string()]);
    }
    Ok(format_note_lines(notes))
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

pub fn note_preview(note: &Note, max_chars: usize) -> String {
    let collapsed = note.content.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}
