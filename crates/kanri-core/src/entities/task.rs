use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Priority, TaskStatus};
use crate::ids::TaskId;

/// A unit of work tracked on the board and in the task list.
///
/// `patient_id` is a lookup-only reference into the clinic side of the CRM;
/// the task neither owns nor cascades to the patient.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub start_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
    pub patient_id: Option<String>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task. Run it through
/// [`validate_new_task`](crate::validation::validate_new_task) before storing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    /// Pre-selected column. `None` means `pending`.
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Defaults to `start_date` when omitted.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub patient_id: Option<String>,
    pub owner_id: String,
}

impl NewTask {
    #[must_use]
    pub fn new(title: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            owner_id: owner_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn due(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    #[must_use]
    pub fn starting(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_patient(mut self, patient_id: impl Into<String>) -> Self {
        self.patient_id = Some(patient_id.into());
        self
    }
}
