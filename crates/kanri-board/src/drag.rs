//! Drag sessions.
//!
//! A drag starts on a card, relocates it live while it hovers over columns
//! or other cards, and ends with either a drop (which produces a
//! [`ReconcileRequest`]) or a cancel (which puts the card back).

use kanri_core::enums::TaskStatus;
use kanri_core::guard::{can_start_move, can_transition};
use kanri_core::ids::TaskId;

use crate::board::BoardState;
use crate::dispatcher::ReconcileRequest;
use crate::error::BoardError;

/// What the pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Empty space in a column. The card goes to the end.
    Column(TaskStatus),
    /// Another card. The dragged card takes its slot.
    Card(TaskId),
}

/// Where a dragged card came from and where it is now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub task_id: TaskId,
    pub original_status: TaskStatus,
    pub original_index: usize,
    pub current_status: TaskStatus,
}

impl DragSession {
    /// The reconcile request this drag would produce if dropped now.
    #[must_use]
    pub const fn request(&self) -> ReconcileRequest {
        ReconcileRequest {
            task_id: self.task_id,
            original_status: self.original_status,
            final_status: self.current_status,
            original_index: self.original_index,
        }
    }
}

/// Result of hovering over a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOver {
    Moved { status: TaskStatus, index: usize },
    /// Nothing changed: the target is the card itself, unknown, hidden, or
    /// the guard refused it.
    Ignored,
}

impl BoardState {
    /// Pick up a card.
    ///
    /// # Errors
    ///
    /// `UnknownTask` if the card is not on the board, `Locked` if its status
    /// cannot be moved out of.
    pub fn begin_drag(&self, id: TaskId) -> Result<DragSession, BoardError> {
        let (status, index) = self.locate(id).ok_or(BoardError::UnknownTask(id))?;
        if !can_start_move(status) {
            return Err(BoardError::Locked {
                task_id: id,
                status,
            });
        }
        Ok(DragSession {
            task_id: id,
            original_status: status,
            original_index: index,
            current_status: status,
        })
    }

    /// Column and slot a target stands for.
    ///
    /// A column target means "append", so its index is the column length.
    /// A card target infers the column from the card under the pointer.
    #[must_use]
    pub fn resolve_target(&self, target: DropTarget) -> Option<(TaskStatus, usize)> {
        match target {
            DropTarget::Column(status) => self.column(status).map(|c| (status, c.cards.len())),
            DropTarget::Card(id) => self.locate(id),
        }
    }

    /// Relocate the dragged card to the hovered target if the guard allows.
    pub fn drag_over(&mut self, session: &mut DragSession, target: DropTarget) -> DragOver {
        if target == DropTarget::Card(session.task_id) {
            return DragOver::Ignored;
        }
        let Some((status, index)) = self.resolve_target(target) else {
            return DragOver::Ignored;
        };
        if !can_transition(session.current_status, status) {
            tracing::debug!(
                task_id = %session.task_id,
                from = %session.current_status,
                to = %status,
                "drag over guarded column ignored"
            );
            return DragOver::Ignored;
        }
        match self.move_task(session.task_id, session.current_status, status, index) {
            Ok(index) => {
                session.current_status = status;
                DragOver::Moved { status, index }
            }
            Err(_) => DragOver::Ignored,
        }
    }

    /// Put a dragged card back where it started.
    ///
    /// # Errors
    ///
    /// `UnknownTask` if the card left the board mid-drag.
    pub fn cancel_drag(&mut self, session: &DragSession) -> Result<(), BoardError> {
        self.revert(
            session.task_id,
            session.original_status,
            session.original_index,
        )?;
        Ok(())
    }
}
