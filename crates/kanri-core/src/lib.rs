//! # kanri-core
//!
//! Core types for the Kanri task workflow.
//!
//! This crate provides the types shared across all Kanri crates:
//! - The `Task` entity and its creation/update payloads
//! - The unified `TaskStatus` enum with per-surface subsets
//! - The status transition guard used by the board and the store
//! - Paging, filtering, and sorting types for task listings
//! - Cross-cutting error types
//! - The async `TaskStore` port implemented by storage adapters

pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod guard;
pub mod ids;
pub mod query;
pub mod responses;
pub mod store;
pub mod updates;
pub mod validation;
