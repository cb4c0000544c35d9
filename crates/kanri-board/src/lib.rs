//! # kanri-board
//!
//! The kanban side of the task workflow.
//!
//! - [`board::BoardState`]: per-column ordered cards, relocated optimistically
//! - [`drag`]: drag sessions, drop-target resolution, guarded drag-over
//! - [`dispatcher::Dispatcher`]: fires status updates at the store in the
//!   background and reports outcomes over a channel
//! - [`session::BoardSession`]: owns the board and the dispatcher, applies
//!   outcomes (confirm, roll back, notify) on one task
//! - [`memory::InMemoryTaskStore`]: a `TaskStore` for tests and offline use
//!
//! Board state is never shared between tasks. Only store calls run
//! concurrently, and their results come back to the session's owner.

pub mod board;
pub mod dispatcher;
pub mod drag;
pub mod error;
pub mod memory;
pub mod notify;
pub mod session;
