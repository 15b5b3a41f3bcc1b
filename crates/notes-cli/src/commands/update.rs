use crate::commands::common::{open_controller, resolve_note_content, settle};
use crate::error::CliError;

pub async fn run_update(
    user_id: &str,
    note_id: &str,
    content_parts: &[String],
    api_url: Option<String>,
) -> Result<(), CliError> {
    let content = resolve_note_content(content_parts)?;

    let mut controller = open_controller(api_url).await?;
    let status = controller.update_note(user_id, note_id, &content).await;
    settle(&status, &controller)?;

    println!("Note updated successfully");
    Ok(())
}
