//! User-facing notifications raised by reconciliation and guard rejections.

use kanri_core::ids::TaskId;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    pub message: String,
}

impl Notification {
    pub fn success(task_id: TaskId, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            task_id: Some(task_id),
            message: message.into(),
        }
    }

    pub fn error(task_id: Option<TaskId>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            task_id,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.level, NotificationLevel::Error)
    }
}
