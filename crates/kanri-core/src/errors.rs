//! Cross-cutting error types for Kanri.
//!
//! `CoreError` is also the error type of the `TaskStore` port, so every
//! adapter converts its own failures into it at the boundary. Storage-specific
//! errors (e.g. `DatabaseError`) live in their respective crates.

use thiserror::Error;

use crate::enums::TaskStatus;
use crate::ids::TaskId;

/// Errors that can be raised by any Kanri crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A status change touched a system-assigned status.
    #[error("cannot move overdue task: task {id} from {from} to {to}")]
    GuardedTransition {
        id: TaskId,
        from: TaskStatus,
        to: TaskStatus,
    },

    /// A single input field failed validation.
    #[error("Validation error on {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    /// Catch-all for unexpected errors (backend down, network, corrupt rows).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    #[must_use]
    pub fn task_not_found(id: TaskId) -> Self {
        Self::NotFound {
            entity_type: "task".to_string(),
            id: id.to_string(),
        }
    }

    #[must_use]
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }

    /// Name of the offending input field, for inline display.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidField { field, .. } => Some(field),
            _ => None,
        }
    }
}
