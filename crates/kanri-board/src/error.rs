//! Board-local rejections. None of these reach the store.

use kanri_core::enums::TaskStatus;
use kanri_core::ids::TaskId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    /// The guard rejected the move.
    #[error("cannot move overdue task: task {task_id} from {from} to {to}")]
    Guarded {
        task_id: TaskId,
        from: TaskStatus,
        to: TaskStatus,
    },

    /// Overdue cards cannot be picked up.
    #[error("cannot move overdue task: task {task_id} is {status}")]
    Locked { task_id: TaskId, status: TaskStatus },

    #[error("task {task_id} is not in column {status}")]
    NotInColumn { task_id: TaskId, status: TaskStatus },

    #[error("{0} is not a board column")]
    NotABoardColumn(TaskStatus),

    #[error("task {0} is not on the board")]
    UnknownTask(TaskId),

    #[error("no drag in progress")]
    NoActiveDrag,

    #[error("task {0} is already being dragged")]
    DragInProgress(TaskId),
}
