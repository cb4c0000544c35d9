use kanri_core::enums::TaskStatus;
use kanri_core::ids::TaskId;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    id: TaskId,
    status: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let status = parse_enum::<TaskStatus>(status, "status")?;
    let task = ctx.service.update_task_status(id, status).await?;
    output(&task, flags.format)
}
