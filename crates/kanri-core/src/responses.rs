//! Response types returned as JSON by `kanri` commands and store operations.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{AuditEntry, Task};
use crate::enums::TaskStatus;

/// Result of a bulk status action.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BulkUpdateResponse {
    pub updated_count: u64,
}

/// Result of the overdue sweep.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SweepResponse {
    pub marked_overdue: u64,
    pub as_of: chrono::NaiveDate,
}

/// Response from `kanri task delete`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub task_id: crate::ids::TaskId,
}

/// Response from `kanri task history`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TaskHistoryResponse {
    pub task: Task,
    pub entries: Vec<AuditEntry>,
}

/// Per-column card count on a board snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ColumnSummary {
    pub status: TaskStatus,
    pub loaded: usize,
    pub total: u64,
    pub has_more: bool,
}
