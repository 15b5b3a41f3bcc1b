pub mod add;
pub mod common;
pub mod completions;
pub mod delete;
pub mod get;
pub mod list;
pub mod shell;
pub mod update;
