//! Task update builder.
//!
//! `Option<Option<T>>` fields distinguish "leave unchanged" (`None`) from
//! "clear the value" (`Some(None)`).

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Priority, TaskStatus};

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TaskUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<Option<String>>,
}

impl TaskUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.start_date.is_none()
            && self.due_date.is_none()
            && self.patient_id.is_none()
    }
}

#[derive(Debug, Default)]
pub struct TaskUpdateBuilder(TaskUpdate);

impl TaskUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(TaskUpdate::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.0.description = Some(description);
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: Priority) -> Self {
        self.0.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn status(mut self, status: TaskStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub fn start_date(mut self, start_date: Option<NaiveDate>) -> Self {
        self.0.start_date = Some(start_date);
        self
    }

    #[must_use]
    pub fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.0.due_date = Some(due_date);
        self
    }

    #[must_use]
    pub fn patient_id(mut self, patient_id: Option<String>) -> Self {
        self.0.patient_id = Some(patient_id);
        self
    }

    #[must_use]
    pub fn build(self) -> TaskUpdate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_update_is_empty() {
        assert!(TaskUpdate::default().is_empty());
        assert!(!TaskUpdateBuilder::new().title("x").build().is_empty());
    }

    #[test]
    fn clearing_is_serialized_as_null() {
        let update = TaskUpdateBuilder::new().description(None).build();
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({ "description": null }));
    }
}
