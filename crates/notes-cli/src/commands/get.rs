use crate::commands::common::{open_controller, print_lines, render_notes, settle};
use crate::error::CliError;

pub async fn run_get(
    user_id: &str,
    note_id: Option<&str>,
    as_json: bool,
    api_url: Option<String>,
) -> Result<(), CliError> {
    let mut controller = open_controller(api_url).await?;
    let status = match note_id {
        Some(note_id) => controller.fetch_specific(user_id, note_id).await,
        None => controller.fetch_by_user(user_id).await,
    };
    settle(&status, &controller)?;

    print_lines(&render_notes(controller.results(), as_json)?);
    Ok(())
}
