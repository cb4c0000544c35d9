use chrono::NaiveDate;
use kanri_core::enums::{Priority, TaskStatus};
use kanri_core::ids::TaskId;
use kanri_core::updates::{TaskUpdate, TaskUpdateBuilder};

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub struct Params {
    pub id: TaskId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub start: Option<NaiveDate>,
    pub clear_start: bool,
    pub due: Option<NaiveDate>,
    pub patient: Option<String>,
}

pub async fn run(params: Params, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    validate_update_params(&params)?;
    let id = params.id;
    let update = build_update(params)?;
    let task = ctx.service.update_task(id, update).await?;
    output(&task, flags.format)
}

fn build_update(params: Params) -> anyhow::Result<TaskUpdate> {
    let mut builder = TaskUpdateBuilder::new();
    if let Some(title) = params.title {
        builder = builder.title(title);
    }
    if let Some(description) = params.description {
        // An empty string clears the description.
        builder = builder.description(Some(description).filter(|d| !d.is_empty()));
    }
    if let Some(priority) = params.priority.as_deref() {
        builder = builder.priority(parse_enum::<Priority>(priority, "priority")?);
    }
    if let Some(status) = params.status.as_deref() {
        builder = builder.status(parse_enum::<TaskStatus>(status, "status")?);
    }
    if params.clear_start {
        builder = builder.start_date(None);
    } else if let Some(start) = params.start {
        builder = builder.start_date(Some(start));
    }
    if let Some(due) = params.due {
        builder = builder.due_date(due);
    }
    if let Some(patient) = params.patient {
        builder = builder.patient_id(Some(patient).filter(|p| !p.is_empty()));
    }
    Ok(builder.build())
}

fn validate_update_params(params: &Params) -> anyhow::Result<()> {
    if params.title.is_none()
        && params.description.is_none()
        && params.priority.is_none()
        && params.status.is_none()
        && params.start.is_none()
        && !params.clear_start
        && params.due.is_none()
        && params.patient.is_none()
    {
        anyhow::bail!(
            "At least one of --title, --description, --priority, --status, --start, --clear-start, --due, or --patient must be provided"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use kanri_core::enums::TaskStatus;
    use kanri_core::ids::TaskId;
    use pretty_assertions::assert_eq;

    use super::{Params, build_update, validate_update_params};

    fn empty() -> Params {
        Params {
            id: TaskId(1),
            title: None,
            description: None,
            priority: None,
            status: None,
            start: None,
            clear_start: false,
            due: None,
            patient: None,
        }
    }

    #[test]
    fn rejects_noop_update() {
        assert!(validate_update_params(&empty()).is_err());
    }

    #[test]
    fn accepts_update_with_any_field() {
        let params = Params {
            description: Some(String::from("desc")),
            ..empty()
        };
        assert!(validate_update_params(&params).is_ok());

        let params = Params {
            clear_start: true,
            ..empty()
        };
        assert!(validate_update_params(&params).is_ok());
    }

    #[test]
    fn empty_strings_clear_optional_fields() {
        let update = build_update(Params {
            description: Some(String::new()),
            patient: Some(String::new()),
            clear_start: true,
            ..empty()
        })
        .expect("should build");
        assert_eq!(update.description, Some(None));
        assert_eq!(update.patient_id, Some(None));
        assert_eq!(update.start_date, Some(None));
    }

    #[test]
    fn parses_status() {
        let update = build_update(Params {
            status: Some(String::from("done")),
            ..empty()
        })
        .expect("should build");
        assert_eq!(update.status, Some(TaskStatus::Done));
    }
}
