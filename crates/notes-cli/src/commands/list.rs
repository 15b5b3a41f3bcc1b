use crate::commands::common::{open_controller, print_lines, render_notes};
use crate::error::CliError;

pub async fn run_list(as_json: bool, api_url: Option<String>) -> Result<(), CliError> {
    let controller = open_controller(api_url).await?;
    if let Some(message) = controller.last_error() {
        return Err(CliError::Action(message.to_string()));
    }

    print_lines(&render_notes(controller.all_notes(), as_json)?);
    Ok(())
}
