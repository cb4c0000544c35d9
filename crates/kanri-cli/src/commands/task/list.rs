use chrono::NaiveDate;
use kanri_core::enums::{Priority, TaskStatus};
use kanri_core::query::{PageRequest, SortDirection, SortField, TaskFilter, TaskSort};

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub struct Params {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub patient: Option<String>,
    pub owner: Option<String>,
    pub search: Option<String>,
    pub due_from: Option<NaiveDate>,
    pub due_to: Option<NaiveDate>,
    pub sort: Option<String>,
    pub desc: bool,
    pub page: u32,
    pub limit: Option<u32>,
}

pub async fn run(params: Params, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let per_page = effective_limit(params.limit, flags.limit, ctx.config.general.default_limit);
    let page = PageRequest::new(params.page, per_page);
    let sort = build_sort(params.sort.as_deref(), params.desc)?;
    let filter = build_filter(params)?;

    let tasks = ctx.service.list_tasks(&filter, sort, page).await?;
    output(&tasks, flags.format)
}

fn build_filter(params: Params) -> anyhow::Result<TaskFilter> {
    if let (Some(from), Some(to)) = (params.due_from, params.due_to) {
        if from > to {
            anyhow::bail!("--due-from {from} is after --due-to {to}");
        }
    }
    Ok(TaskFilter {
        status: params
            .status
            .as_deref()
            .map(|raw| parse_enum::<TaskStatus>(raw, "status"))
            .transpose()?,
        priority: params
            .priority
            .as_deref()
            .map(|raw| parse_enum::<Priority>(raw, "priority"))
            .transpose()?,
        patient_id: params.patient,
        owner_id: params.owner,
        search: params.search.filter(|s| !s.trim().is_empty()),
        due_from: params.due_from,
        due_to: params.due_to,
    })
}

fn build_sort(field: Option<&str>, desc: bool) -> anyhow::Result<TaskSort> {
    let field = field
        .map(|raw| parse_enum::<SortField>(raw, "sort"))
        .transpose()?
        .unwrap_or_default();
    let direction = if desc {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };
    Ok(TaskSort::new(field, direction))
}
