//! Interactive session.
//!
//! Keeps one controller alive so both note views stay cached between
//! commands, and prints them after every action.

use notes_core::{ActionStatus, NoteController, NoteService};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::common::{format_note_lines, open_controller, print_lines};
use crate::commands::delete::batch_summary;
use crate::error::CliError;

const HELP: &str = "\
Commands:
  list                          show every note
  results                       show the latest query results
  refresh                       reload every note
  add <user> <note> <content>   create a note
  get <user> [note]             query a user's notes or one note
  update <user> <note> <content> replace a note's content
  delete <user> [note]          delete a user's notes or one note
  help                          show this help
  quit                          leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Results,
    Refresh,
    Add {
        user_id: String,
        note_id: String,
        content: String,
    },
    Get {
        user_id: String,
        note_id: Option<String>,
    },
    Update {
        user_id: String,
        note_id: String,
        content: String,
    },
    Delete {
        user_id: String,
        note_id: Option<String>,
    },
    Help,
    Quit,
}

pub async fn run_shell(api_url: Option<String>) -> Result<(), CliError> {
    let mut controller = open_controller(api_url).await?;
    println!("Connected. Type `help` for commands.");
    if let Some(message) = controller.last_error() {
        println!("Error: {message}");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_shell_line(&line) {
            Ok(ShellCommand::Quit) => break,
            Ok(command) => print_lines(&execute(&mut controller, command).await),
            Err(message) => println!("{message}"),
        }
    }

    Ok(())
}

/// Parse one input line. Content arguments keep their inner spacing.
pub fn parse_shell_line(line: &str) -> Result<ShellCommand, String> {
    let (verb, rest) = split_word(line);
    let usage = |text: &str| format!("usage: {text}");

    match verb.to_ascii_lowercase().as_str() {
        "list" | "ls" => Ok(ShellCommand::List),
        "results" => Ok(ShellCommand::Results),
        "refresh" => Ok(ShellCommand::Refresh),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        "add" | "update" => {
            let (user_id, rest) = split_word(rest);
            let (note_id, content) = split_word(rest);
            if user_id.is_empty() || note_id.is_empty() {
                return Err(usage(&format!("{verb} <user> <note> <content>")));
            }
            let (user_id, note_id, content) =
                (user_id.to_string(), note_id.to_string(), content.to_string());
            if verb.eq_ignore_ascii_case("add") {
                Ok(ShellCommand::Add {
                    user_id,
                    note_id,
                    content,
                })
            } else {
                Ok(ShellCommand::Update {
                    user_id,
                    note_id,
                    content,
                })
            }
        }
        "get" | "delete" | "rm" => {
            let (user_id, rest) = split_word(rest);
            let (note_id, extra) = split_word(rest);
            if user_id.is_empty() || !extra.is_empty() {
                return Err(usage(&format!("{verb} <user> [note]")));
            }
            let user_id = user_id.to_string();
            let note_id = (!note_id.is_empty()).then(|| note_id.to_string());
            if verb.eq_ignore_ascii_case("get") {
                Ok(ShellCommand::Get { user_id, note_id })
            } else {
                Ok(ShellCommand::Delete { user_id, note_id })
            }
        }
        other => Err(format!("Unknown command `{other}`. Type `help`.")),
    }
}

/// Run a command against the controller and return the lines to print.
pub async fn execute<S: NoteService>(
    controller: &mut NoteController<S>,
    command: ShellCommand,
) -> Vec<String> {
    let mut summary = None;
    let status = match command {
        ShellCommand::List => {
            return view_lines("All notes", &format_note_lines(controller.all_notes()));
        }
        ShellCommand::Results => {
            return view_lines("Results", &format_note_lines(controller.results()));
        }
        ShellCommand::Help | ShellCommand::Quit => return vec![HELP.to_string()],
        ShellCommand::Refresh => controller.refresh_all().await,
        ShellCommand::Add {
            user_id,
            note_id,
            content,
        } => controller.create_note(&user_id, &note_id, &content).await,
        ShellCommand::Get { user_id, note_id } => match note_id {
            Some(note_id) => controller.fetch_specific(&user_id, &note_id).await,
            None => controller.fetch_by_user(&user_id).await,
        },
        ShellCommand::Update {
            user_id,
            note_id,
            content,
        } => controller.update_note(&user_id, &note_id, &content).await,
        ShellCommand::Delete { user_id, note_id } => match note_id {
            Some(note_id) => controller.delete_specific(&user_id, &note_id).await,
            None => {
                let status = controller.delete_by_user(&user_id).await;
                summary = batch_summary(controller);
                status
            }
        },
    };

    let mut lines = Vec::new();
    lines.extend(summary);
    match &status {
        ActionStatus::Completed | ActionStatus::Skipped => lines.push(format!("ok ({status})")),
        ActionStatus::Rejected(_) | ActionStatus::Failed => {}
    }
    if let Some(message) = controller.last_error() {
        lines.push(format!("Error: {message}"));
    }
    lines.extend(view_lines("All notes", &format_note_lines(controller.all_notes())));
    lines.extend(view_lines("Results", &format_note_lines(controller.results())));
    lines
}

fn view_lines(title: &str, notes: &[String]) -> Vec<String> {
    let mut lines = vec![format!("{title} ({}):", notes.len())];
    lines.extend(notes.iter().map(|line| format!("  {line}")));
    lines
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (input, ""),
    }
}
