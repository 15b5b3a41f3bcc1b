use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "notes")]
#[command(about = "Manage notes stored in a remote note service")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the note service (overrides NOTES_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every note in the store
    #[command(alias = "ls")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a note
    #[command(alias = "new")]
    Add {
        /// Owning user ID
        user_id: String,
        /// Note ID, unique per user
        note_id: String,
        /// Note content (read from piped stdin when omitted)
        content: Vec<String>,
    },
    /// Show the notes of a user, or one specific note
    Get {
        /// Owning user ID
        user_id: String,
        /// Optional note ID
        note_id: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace the content of a note
    #[command(alias = "edit")]
    Update {
        /// Owning user ID
        user_id: String,
        /// Note ID
        note_id: String,
        /// New content (read from piped stdin when omitted)
        content: Vec<String>,
    },
    /// Delete every note of a user, or one specific note
    #[command(alias = "rm")]
    Delete {
        /// Owning user ID
        user_id: String,
        /// Optional note ID
        note_id: Option<String>,
    },
    /// Start an interactive session that keeps the note views cached
    Shell,
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
