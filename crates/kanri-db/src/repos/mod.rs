//! Repository modules for tasks and their audit trail.
//!
//! Each module adds methods to `KanriService` via `impl KanriService` blocks.

pub mod audit;
pub mod overdue;
pub mod task;
