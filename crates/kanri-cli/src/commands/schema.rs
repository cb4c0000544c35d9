use schemars::schema_for;
use serde_json::Value;

use kanri_core::audit_detail::StatusChangedDetail;
use kanri_core::entities::{AuditEntry, NewTask, Task};
use kanri_core::query::Page;
use kanri_core::responses::{BulkUpdateResponse, SweepResponse};
use kanri_core::updates::TaskUpdate;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Names accepted by `kanri schema`.
pub const TYPE_NAMES: &[&str] = &[
    "task",
    "new-task",
    "task-update",
    "audit",
    "page",
    "bulk",
    "sweep",
    "status-changed",
];

macro_rules! schema_value {
    ($ty:ty) => {
        serde_json::to_value(schema_for!($ty))?
    };
}

/// Handle `kanri schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = lookup(&args.type_name)?;
    output(&schema, flags.format)
}

fn lookup(type_name: &str) -> anyhow::Result<Value> {
    let schema = match type_name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
        "task" => schema_value!(Task),
        "new-task" => schema_value!(NewTask),
        "task-update" => schema_value!(TaskUpdate),
        "audit" => schema_value!(AuditEntry),
        "page" => schema_value!(Page<Task>),
        "bulk" => schema_value!(BulkUpdateResponse),
        "sweep" => schema_value!(SweepResponse),
        "status-changed" => schema_value!(StatusChangedDetail),
        _ => anyhow::bail!(
            "unknown schema type '{type_name}' (expected one of: {})",
            TYPE_NAMES.join(", ")
        ),
    };
    Ok(schema)
}
