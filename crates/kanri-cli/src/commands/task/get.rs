use kanri_core::ids::TaskId;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(id: TaskId, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let task = ctx.service.get_task(id).await?;
    output(&task, flags.format)
}
