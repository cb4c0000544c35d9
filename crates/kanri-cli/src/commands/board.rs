mod more;
mod move_card;
mod show;

use kanri_board::board::BoardState;
use kanri_core::entities::Task;
use kanri_core::responses::ColumnSummary;
use serde::Serialize;

use crate::cli::subcommands::BoardCommands;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::{output, table, table_options};

/// Handle `kanri board`.
pub async fn handle(
    action: &BoardCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        BoardCommands::Show { pages } => show::run(*pages, ctx, flags).await,
        BoardCommands::More { status, after } => more::run(status, *after, ctx, flags).await,
        BoardCommands::Move { id, to, onto } => {
            move_card::run(*id, to.as_deref(), *onto, ctx, flags).await
        }
    }
}

/// One column as shown to the user.
#[derive(Debug, Serialize)]
pub struct ColumnView {
    #[serde(flatten)]
    pub summary: ColumnSummary,
    pub cards: Vec<Task>,
}

#[derive(Debug, Serialize)]
pub struct BoardView {
    pub columns: Vec<ColumnView>,
}

impl BoardView {
    pub fn of(board: &BoardState) -> Self {
        Self {
            columns: board
                .columns()
                .iter()
                .map(|column| ColumnView {
                    summary: column.summary(),
                    cards: column.cards.clone(),
                })
                .collect(),
        }
    }

    /// Column headers with their counts, cards listed underneath.
    fn to_columns(&self) -> Vec<(String, Vec<String>)> {
        self.columns
            .iter()
            .map(|column| {
                let s = &column.summary;
                let more = if s.has_more { "+" } else { "" };
                (
                    format!("{} ({}/{}{more})", s.status, s.loaded, s.total),
                    column
                        .cards
                        .iter()
                        .map(|task| format!("#{} {}", task.id, task.title))
                        .collect(),
                )
            })
            .collect()
    }
}

/// Print a board, side by side in table mode.
fn output_board(view: &BoardView, flags: &GlobalFlags) -> anyhow::Result<()> {
    if flags.format == OutputFormat::Table {
        println!("{}", table::render_columns(&view.to_columns(), table_options()));
        return Ok(());
    }
    output(view, flags.format)
}
