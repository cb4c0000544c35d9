//! Status, priority, surface, and audit enums for Kanri.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`,
//! which is also the representation stored in SQL columns.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

/// Status of a task.
///
/// One enumeration serves every surface. The kanban board shows
/// `pending`, `in_progress`, `done`, `overdue`; the task list offers
/// `pending`, `in_progress`, `done`, `cancelled`.
///
/// ```text
/// pending ⇄ in_progress ⇄ done ⇄ cancelled     (any order, user-driven)
/// pending | in_progress ──(due date passed)──▶ overdue   (system only)
/// overdue ──▶ done | cancelled                  (bulk action only)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Done,
    Overdue,
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::InProgress,
        Self::Done,
        Self::Overdue,
        Self::Cancelled,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Overdue => "overdue",
            Self::Cancelled => "cancelled",
        }
    }

    /// Statuses only the system may assign. Users can neither move a task
    /// into nor out of them through a status update.
    #[must_use]
    pub const fn is_system_assigned(self) -> bool {
        matches!(self, Self::Overdue)
    }

    /// Current statuses from which a bulk action may move a task to `target`.
    ///
    /// Rows in any other status are skipped and not counted.
    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub const fn bulk_sources(target: Self) -> &'static [Self] {
        match target {
            Self::Pending => &[Self::Done, Self::Cancelled],
            Self::InProgress => &[Self::Pending],
            Self::Done => &[Self::Pending, Self::InProgress, Self::Overdue],
            Self::Cancelled => &[Self::Pending, Self::InProgress, Self::Overdue],
            Self::Overdue => &[],
        }
    }

    #[must_use]
    pub fn is_bulk_eligible(self, target: Self) -> bool {
        Self::bulk_sources(target).contains(&self)
    }

    /// Statuses the overdue sweep moves to `overdue` once the due date passes.
    #[must_use]
    pub const fn sweepable() -> &'static [Self] {
        &[Self::Pending, Self::InProgress]
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// A UI surface that displays tasks grouped or filtered by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Board,
    List,
}

impl Surface {
    /// Statuses shown on this surface, in display order.
    #[must_use]
    pub const fn statuses(self) -> &'static [TaskStatus] {
        match self {
            Self::Board => &[
                TaskStatus::Pending,
                TaskStatus::InProgress,
                TaskStatus::Done,
                TaskStatus::Overdue,
            ],
            Self::List => &[
                TaskStatus::Pending,
                TaskStatus::InProgress,
                TaskStatus::Done,
                TaskStatus::Cancelled,
            ],
        }
    }

    #[must_use]
    pub fn shows(self, status: TaskStatus) -> bool {
        self.statuses().contains(&status)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Board => "board",
            Self::List => "list",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Task priority.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Numeric rank used when sorting (`high` sorts last ascending).
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Mutation recorded in the task audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    StatusChanged,
    Deleted,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::StatusChanged => "status_changed",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
