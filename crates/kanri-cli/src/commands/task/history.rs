use kanri_core::ids::TaskId;
use kanri_core::responses::TaskHistoryResponse;
use kanri_db::repos::audit::AuditFilter;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    id: TaskId,
    limit: Option<u32>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let task = ctx.service.get_task(id).await?;
    let entries = ctx
        .service
        .query_audit(&AuditFilter {
            task_id: Some(id),
            limit: Some(effective_limit(
                limit,
                flags.limit,
                ctx.config.general.default_limit,
            )),
            ..AuditFilter::default()
        })
        .await?;
    output(&TaskHistoryResponse { task, entries }, flags.format)
}
