use chrono::NaiveDate;
use kanri_core::entities::NewTask;
use kanri_core::enums::{Priority, TaskStatus};

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub struct Params {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub start: Option<NaiveDate>,
    pub due: Option<NaiveDate>,
    pub patient: Option<String>,
    pub owner: Option<String>,
}

pub async fn run(params: Params, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let new = build_new_task(params, &ctx.config.general.user)?;
    let task = ctx.service.create_task(new).await?;
    output(&task, flags.format)
}

fn build_new_task(params: Params, default_owner: &str) -> anyhow::Result<NewTask> {
    let owner = params.owner.as_deref().unwrap_or(default_owner);
    let mut new = NewTask::new(params.title, owner);
    new.description = params.description;
    if let Some(priority) = params.priority.as_deref() {
        new = new.with_priority(parse_enum::<Priority>(priority, "priority")?);
    }
    if let Some(status) = params.status.as_deref() {
        new = new.with_status(parse_enum::<TaskStatus>(status, "status")?);
    }
    if let Some(start) = params.start {
        new = new.starting(start);
    }
    if let Some(due) = params.due {
        new = new.due(due);
    }
    if let Some(patient) = params.patient {
        new = new.with_patient(patient);
    }
    Ok(new)
}
