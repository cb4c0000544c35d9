//! Typed audit detail payloads.
//!
//! Each audit action can carry a structured `detail` JSON blob. These types
//! give the common shapes a schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::TaskStatus;

/// Detail for `AuditAction::StatusChanged`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from: TaskStatus,
    pub to: TaskStatus,
    pub reason: Option<String>,
}

/// Detail for `AuditAction::Updated`: the names of the fields that changed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UpdatedDetail {
    pub fields: Vec<String>,
}
