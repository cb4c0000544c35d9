use kanri_core::enums::Surface;
use kanri_core::query::PageRequest;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_status_on;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    status: &str,
    after: u32,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let status = parse_status_on(status, Surface::Board)?;
    let request = PageRequest::new(after.saturating_add(1), ctx.config.board.page_size);
    let page = ctx.service.list_tasks_by_status(status, request).await?;
    output(&page, flags.format)
}
