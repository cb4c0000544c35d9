use chrono::{Local, NaiveDate};
use kanri_core::responses::SweepResponse;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    as_of: Option<NaiveDate>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
    let marked_overdue = ctx.service.mark_overdue(as_of).await?;
    output(
        &SweepResponse {
            marked_overdue,
            as_of,
        },
        flags.format,
    )
}
