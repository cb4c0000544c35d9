use clap::Subcommand;
use kanri_core::ids::TaskId;

/// Kanban board commands.
#[derive(Clone, Debug, Subcommand)]
pub enum BoardCommands {
    /// Show every column with its first pages loaded.
    Show {
        /// Pages to load per column.
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Load the next page of one column.
    More {
        status: String,
        /// Pages already shown.
        #[arg(long, default_value_t = 1)]
        after: u32,
    },
    /// Drag a card to a column or onto another card, then drop it.
    #[command(group(clap::ArgGroup::new("target").required(true).args(["to", "onto"])))]
    Move {
        id: TaskId,
        /// Destination column; the card goes to its end.
        to: Option<String>,
        /// Drop onto this card's slot.
        #[arg(long)]
        onto: Option<TaskId>,
    },
}
