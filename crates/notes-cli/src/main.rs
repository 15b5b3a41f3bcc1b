//! notes CLI - Command-line front end for the note service
//!
//! Every subcommand drives one `NoteController` action and prints the view
//! it produced; `notes shell` keeps a controller alive across commands.

mod cli;
mod commands;
mod error;

use clap::{CommandFactory, Parser};

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::completions::run_completions;
use crate::commands::delete::run_delete;
use crate::commands::get::run_get;
use crate::commands::list::run_list;
use crate::commands::shell::run_shell;
use crate::commands::update::run_update;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("notes_core=warn".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();
    let api_url = cli.api_url;

    match cli.command {
        Some(Commands::List { json }) => run_list(json, api_url).await?,
        Some(Commands::Add {
            user_id,
            note_id,
            content,
        }) => run_add(&user_id, &note_id, &content, api_url).await?,
        Some(Commands::Get {
            user_id,
            note_id,
            json,
        }) => run_get(&user_id, note_id.as_deref(), json, api_url).await?,
        Some(Commands::Update {
            user_id,
            note_id,
            content,
        }) => run_update(&user_id, &note_id, &content, api_url).await?,
        Some(Commands::Delete { user_id, note_id }) => {
            run_delete(&user_id, note_id.as_deref(), api_url).await?;
        }
        Some(Commands::Shell) => run_shell(api_url).await?,
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        None => {
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
