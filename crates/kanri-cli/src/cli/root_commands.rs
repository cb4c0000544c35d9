use clap::{Args, Subcommand};

use crate::cli::subcommands::{BoardCommands, TaskCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Initialize kanri for a project.
    Init(InitArgs),
    /// Tasks (list view and single-task operations).
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },
    /// Kanban board.
    Board {
        #[command(subcommand)]
        action: BoardCommands,
    },
    /// Dump JSON schema for a registered type.
    Schema(SchemaArgs),
}

/// Arguments for `kanri init`.
#[derive(Clone, Debug, Args)]
pub struct InitArgs {
    /// Directory to initialize (defaults to the current directory).
    #[arg(default_value = ".")]
    pub path: String,
}

/// Arguments for `kanri schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Type name: task, new-task, task-update, audit, page, bulk, sweep,
    /// status-changed
    pub type_name: String,
}
