//! Paging, filtering, and sorting for task listings.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::enums::{Priority, TaskStatus};

/// Default number of cards fetched per board column page.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Upper bound on a single page; larger requests are clamped.
pub const MAX_PER_PAGE: u32 = 200;

// ---------------------------------------------------------------------------
// Paging
// ---------------------------------------------------------------------------

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Build a request, clamping `page` to at least 1 and `per_page` to
    /// `1..=MAX_PER_PAGE`.
    #[must_use]
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    #[must_use]
    pub fn first(per_page: u32) -> Self {
        Self::new(1, per_page)
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::new(self.page.saturating_add(1), self.per_page)
    }

    #[must_use]
    pub const fn offset(self) -> u64 {
        (self.page.saturating_sub(1) as u64) * self.per_page as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PER_PAGE)
    }
}

/// One page of results plus the total across all pages.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub has_more: bool,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        let seen = request.offset() + items.len() as u64;
        Self {
            items,
            page: request.page,
            per_page: request.per_page,
            total,
            has_more: seen < total,
        }
    }

    #[must_use]
    pub fn request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Task list filter. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub patient_id: Option<String>,
    pub owner_id: Option<String>,
    /// Case-insensitive substring match on title or description.
    pub search: Option<String>,
    /// Inclusive lower bound on `due_date`.
    pub due_from: Option<NaiveDate>,
    /// Inclusive upper bound on `due_date`.
    pub due_to: Option<NaiveDate>,
}

impl TaskFilter {
    #[must_use]
    pub fn by_status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    DueDate,
    Priority,
    CreatedAt,
    Title,
    Status,
}

impl SortField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DueDate => "due_date",
            Self::Priority => "priority",
            Self::CreatedAt => "created_at",
            Self::Title => "title",
            Self::Status => "status",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Sort order for listings. Ties always break on ascending id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaskSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl TaskSort {
    #[must_use]
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}
