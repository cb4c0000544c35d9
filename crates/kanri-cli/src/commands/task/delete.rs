use kanri_core::ids::TaskId;
use kanri_core::responses::DeleteResponse;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(id: TaskId, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.service.delete_task(id).await?;
    output(
        &DeleteResponse {
            deleted: true,
            task_id: id,
        },
        flags.format,
    )
}
