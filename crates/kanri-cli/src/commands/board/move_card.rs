use anyhow::bail;
use kanri_board::drag::DropTarget;
use kanri_board::notify::Notification;
use kanri_core::entities::Task;
use kanri_core::enums::Surface;
use kanri_core::ids::TaskId;
use kanri_core::responses::ColumnSummary;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_status_on;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct MoveReport {
    task: Option<Task>,
    notifications: Vec<Notification>,
    columns: Vec<ColumnSummary>,
}

pub async fn run(
    id: TaskId,
    to: Option<&str>,
    onto: Option<TaskId>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let target = match (to, onto) {
        (_, Some(card)) => DropTarget::Card(card),
        (Some(status), None) => DropTarget::Column(parse_status_on(status, Surface::Board)?),
        (None, None) => bail!("a destination column or --onto card is required"),
    };

    let mut session = ctx.board_session();
    session.load().await?;
    if !session.ensure_loaded(id).await? {
        bail!("task {id} is not on the board");
    }
    if let DropTarget::Card(card) = target {
        if !session.ensure_loaded(card).await? {
            bail!("task {card} is not on the board");
        }
    }

    if let Err(error) = session.move_card(id, target) {
        for note in session.take_notifications() {
            tracing::warn!(task_id = ?note.task_id, "{}", note.message);
        }
        return Err(error.into());
    }
    let notifications = session.settle().await;
    let failure = notifications
        .iter()
        .find(|note| note.is_error())
        .map(|note| note.message.clone());

    let report = MoveReport {
        task: session.board().task(id).cloned(),
        notifications,
        columns: session.board().summaries(),
    };
    output(&report, flags.format)?;
    if let Some(message) = failure {
        bail!(message);
    }
    Ok(())
}
