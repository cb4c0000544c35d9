mod bulk;
mod create;
mod delete;
mod get;
mod history;
mod list;
mod status;
mod sweep;
mod update;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TaskCommands;
use crate::context::AppContext;

/// Handle `kanri task`.
pub async fn handle(
    action: &TaskCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        TaskCommands::Create {
            title,
            description,
            priority,
            status,
            start,
            due,
            patient,
            owner,
        } => {
            create::run(
                create::Params {
                    title: title.clone(),
                    description: description.clone(),
                    priority: priority.clone(),
                    status: status.clone(),
                    start: *start,
                    due: *due,
                    patient: patient.clone(),
                    owner: owner.clone(),
                },
                ctx,
                flags,
            )
            .await
        }
        TaskCommands::Get { id } => get::run(*id, ctx, flags).await,
        TaskCommands::Update {
            id,
            title,
            description,
            priority,
            status,
            start,
            clear_start,
            due,
            patient,
        } => {
            update::run(
                update::Params {
                    id: *id,
                    title: title.clone(),
                    description: description.clone(),
                    priority: priority.clone(),
                    status: status.clone(),
                    start: *start,
                    clear_start: *clear_start,
                    due: *due,
                    patient: patient.clone(),
                },
                ctx,
                flags,
            )
            .await
        }
        TaskCommands::Status { id, status } => status::run(*id, status, ctx, flags).await,
        TaskCommands::BulkStatus { status, ids } => bulk::run(status, ids, ctx, flags).await,
        TaskCommands::Delete { id } => delete::run(*id, ctx, flags).await,
        TaskCommands::List {
            status,
            priority,
            patient,
            owner,
            search,
            due_from,
            due_to,
            sort,
            desc,
            page,
            limit,
        } => {
            list::run(
                list::Params {
                    status: status.clone(),
                    priority: priority.clone(),
                    patient: patient.clone(),
                    owner: owner.clone(),
                    search: search.clone(),
                    due_from: *due_from,
                    due_to: *due_to,
                    sort: sort.clone(),
                    desc: *desc,
                    page: *page,
                    limit: *limit,
                },
                ctx,
                flags,
            )
            .await
        }
        TaskCommands::SweepOverdue { as_of } => sweep::run(*as_of, ctx, flags).await,
        TaskCommands::History { id, limit } => history::run(*id, *limit, ctx, flags).await,
    }
}
