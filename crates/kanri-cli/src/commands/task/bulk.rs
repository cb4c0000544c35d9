use kanri_core::enums::TaskStatus;
use kanri_core::ids::TaskId;
use kanri_core::responses::BulkUpdateResponse;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    status: &str,
    ids: &[TaskId],
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let status = parse_enum::<TaskStatus>(status, "status")?;
    let updated_count = ctx.service.bulk_update_status(ids, status).await?;
    tracing::info!(%status, requested = ids.len(), updated_count, "bulk status update");
    output(&BulkUpdateResponse { updated_count }, flags.format)
}
