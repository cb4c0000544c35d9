//! A board bound to a store.
//!
//! `BoardSession` is the single owner of board state. Drags mutate the board
//! synchronously; drops hand a request to the [`Dispatcher`]; outcomes are
//! pulled back with [`BoardSession::next_outcome`] or [`BoardSession::settle`]
//! and applied here, so every board mutation happens on the caller's task.
//!
//! While a card has unanswered calls the session remembers where the server
//! last had it. Once every call for the card has answered, and the card is
//! not being dragged, the card is settled against that position.

use std::collections::HashMap;
use std::sync::Arc;

use kanri_core::entities::Task;
use kanri_core::enums::{Surface, TaskStatus};
use kanri_core::errors::CoreError;
use kanri_core::ids::TaskId;
use kanri_core::query::{DEFAULT_PER_PAGE, PageRequest};
use kanri_core::store::TaskStore;

use crate::board::BoardState;
use crate::dispatcher::{Dispatcher, ReconcileOutcome, Ticket};
use crate::drag::{DragOver, DragSession, DropTarget};
use crate::error::BoardError;
use crate::notify::Notification;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Cards fetched per column page.
    pub per_page: u32,
    /// Put a card back where it came from when its update fails.
    pub rollback_on_failure: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            rollback_on_failure: true,
        }
    }
}

/// Server-side position of a card whose calls have not all answered.
#[derive(Debug)]
struct Unsettled {
    status: TaskStatus,
    index: usize,
    outstanding: usize,
    /// Server copy from the newest successful answer.
    confirmed: Option<Task>,
    /// Whether the newest answer was a failure.
    failed: bool,
}

pub struct BoardSession {
    store: Arc<dyn TaskStore>,
    board: BoardState,
    dispatcher: Dispatcher,
    drag: Option<DragSession>,
    unsettled: HashMap<TaskId, Unsettled>,
    options: SessionOptions,
    notifications: Vec<Notification>,
}

impl BoardSession {
    #[must_use]
    pub fn new(store: Arc<dyn TaskStore>, options: SessionOptions) -> Self {
        Self {
            dispatcher: Dispatcher::new(Arc::clone(&store)),
            store,
            board: BoardState::new(),
            drag: None,
            unsettled: HashMap::new(),
            options,
            notifications: Vec::new(),
        }
    }

    #[must_use]
    pub const fn board(&self) -> &BoardState {
        &self.board
    }

    #[must_use]
    pub const fn options(&self) -> SessionOptions {
        self.options
    }

    #[must_use]
    pub const fn active_drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Fetch the first page of every board column.
    ///
    /// # Errors
    ///
    /// Returns the store's error for the first column that fails to load.
    pub async fn load(&mut self) -> Result<(), CoreError> {
        for status in Surface::Board.statuses() {
            let page = self
                .store
                .list_tasks_by_status(*status, PageRequest::first(self.options.per_page))
                .await?;
            self.board
                .load_page(*status, page)
                .map_err(|e| CoreError::Other(e.into()))?;
        }
        tracing::debug!(columns = ?self.board.summaries(), "board loaded");
        Ok(())
    }

    /// Fetch the next page of one column. Returns the number of new cards;
    /// 0 when the column is exhausted.
    ///
    /// # Errors
    ///
    /// `NotABoardColumn` for a hidden status, or the store's error.
    pub async fn load_more(&mut self, status: TaskStatus) -> Result<usize, CoreError> {
        if self.board.column(status).is_none() {
            return Err(CoreError::Other(BoardError::NotABoardColumn(status).into()));
        }
        let Some(request) = self.board.next_page(status) else {
            return Ok(0);
        };
        let page = self.store.list_tasks_by_status(status, request).await?;
        self.board
            .load_page(status, page)
            .map_err(|e| CoreError::Other(e.into()))
    }

    /// Make sure a card is on the board, fetching it if its page is not
    /// loaded yet. Returns `false` when the board does not show its status.
    ///
    /// # Errors
    ///
    /// The store's error, e.g. `NotFound`.
    pub async fn ensure_loaded(&mut self, id: TaskId) -> Result<bool, CoreError> {
        if self.board.task(id).is_some() {
            return Ok(true);
        }
        let task = self.store.get_task(id).await?;
        Ok(self.board.attach(task))
    }

    /// Pick up a card. A locked card raises an error notification as well.
    ///
    /// # Errors
    ///
    /// `DragInProgress`, `UnknownTask`, or `Locked`.
    pub fn drag_start(&mut self, id: TaskId) -> Result<(), BoardError> {
        if let Some(active) = &self.drag {
            return Err(BoardError::DragInProgress(active.task_id));
        }
        match self.board.begin_drag(id) {
            Ok(session) => {
                self.drag = Some(session);
                Ok(())
            }
            Err(err) => {
                if matches!(err, BoardError::Locked { .. }) {
                    self.notify(Notification::error(Some(id), err.to_string()));
                }
                Err(err)
            }
        }
    }

    /// # Errors
    ///
    /// `NoActiveDrag` if nothing is being dragged.
    pub fn drag_over(&mut self, target: DropTarget) -> Result<DragOver, BoardError> {
        let session = self.drag.as_mut().ok_or(BoardError::NoActiveDrag)?;
        Ok(self.board.drag_over(session, target))
    }

    /// End the drag where the card is now.
    ///
    /// Returns the ticket of the dispatched update, or `None` when the card
    /// is back in its original column and no call was made.
    ///
    /// # Errors
    ///
    /// `NoActiveDrag` if nothing is being dragged.
    pub fn drop_card(&mut self) -> Result<Option<Ticket>, BoardError> {
        let session = self.drag.take().ok_or(BoardError::NoActiveDrag)?;
        let request = session.request();
        let ticket = self.dispatcher.reconcile(request);
        if ticket.is_some() {
            self.unsettled
                .entry(request.task_id)
                .or_insert(Unsettled {
                    status: request.original_status,
                    index: request.original_index,
                    outstanding: 0,
                    confirmed: None,
                    failed: false,
                })
                .outstanding += 1;
        } else {
            self.settle_card(request.task_id);
        }
        Ok(ticket)
    }

    /// Abandon the drag and restore the card's original slot.
    ///
    /// # Errors
    ///
    /// `NoActiveDrag` if nothing is being dragged.
    pub fn cancel_drag(&mut self) -> Result<(), BoardError> {
        let session = self.drag.take().ok_or(BoardError::NoActiveDrag)?;
        self.board.cancel_drag(&session)?;
        self.settle_card(session.task_id);
        Ok(())
    }

    /// Drag `id` onto `target` and drop it in one step.
    ///
    /// # Errors
    ///
    /// `NotABoardColumn` or `UnknownTask` for a target that is not on the
    /// board, anything [`drag_start`](Self::drag_start) can return, and
    /// `Guarded` when the guard refuses the target. The card stays put on
    /// every error.
    pub fn move_card(&mut self, id: TaskId, target: DropTarget) -> Result<Option<Ticket>, BoardError> {
        let (to, _) = self.board.resolve_target(target).ok_or(match target {
            DropTarget::Column(status) => BoardError::NotABoardColumn(status),
            DropTarget::Card(other) => BoardError::UnknownTask(other),
        })?;
        self.drag_start(id)?;
        if self.drag_over(target)? == DragOver::Ignored {
            let from = self.drag.map_or(to, |d| d.original_status);
            self.cancel_drag()?;
            if from != to {
                let err = BoardError::Guarded {
                    task_id: id,
                    from,
                    to,
                };
                self.notify(Notification::error(Some(id), err.to_string()));
                return Err(err);
            }
            return Ok(None);
        }
        self.drop_card()
    }

    /// Wait for the next reconcile outcome and apply it.
    ///
    /// Returns `None` when no update is in flight.
    pub async fn next_outcome(&mut self) -> Option<Notification> {
        let outcome = self.dispatcher.next_outcome().await?;
        Some(self.apply(outcome))
    }

    /// Apply every in-flight outcome, in arrival order.
    pub async fn settle(&mut self) -> Vec<Notification> {
        let mut applied = Vec::new();
        while let Some(notification) = self.next_outcome().await {
            applied.push(notification);
        }
        applied
    }

    #[must_use]
    pub const fn in_flight(&self) -> usize {
        self.dispatcher.in_flight()
    }

    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn apply(&mut self, outcome: ReconcileOutcome) -> Notification {
        let ReconcileOutcome {
            ticket,
            request,
            result,
        } = outcome;
        let latest = self.dispatcher.is_latest(ticket);

        let notification = match &result {
            Ok(task) => Notification::success(
                ticket.task_id,
                format!("Task {} moved to {}", task.id, task.status),
            ),
            Err(err) => {
                tracing::warn!(
                    task_id = %ticket.task_id,
                    seq = ticket.seq,
                    latest,
                    to = %request.final_status,
                    error = %err,
                    "status update failed"
                );
                Notification::error(
                    Some(ticket.task_id),
                    format!("Could not move task {}: {err}", ticket.task_id),
                )
            }
        };

        if let Some(entry) = self.unsettled.get_mut(&ticket.task_id) {
            entry.outstanding = entry.outstanding.saturating_sub(1);
            entry.failed = result.is_err();
            if let Ok(task) = result {
                entry.index = self
                    .board
                    .locate(task.id)
                    .filter(|(status, _)| *status == task.status)
                    .map_or(usize::MAX, |(_, index)| index);
                entry.status = task.status;
                entry.confirmed = Some(task);
            }
        }
        self.settle_card(ticket.task_id);

        self.notify(notification.clone());
        notification
    }

    /// Bring a card in line with the server once nothing is pending for it.
    ///
    /// A card left in another column goes back to the server's column, unless
    /// the newest answer was a failure and rollback is off.
    fn settle_card(&mut self, id: TaskId) {
        if self.drag.is_some_and(|d| d.task_id == id) {
            return;
        }
        if self.unsettled.get(&id).is_none_or(|entry| entry.outstanding > 0) {
            return;
        }
        let Some(entry) = self.unsettled.remove(&id) else {
            return;
        };

        let shown = self.board.locate(id).map(|(status, _)| status);
        if shown != Some(entry.status) {
            if entry.failed && !self.options.rollback_on_failure {
                return;
            }
            if let Err(err) = self.board.revert(id, entry.status, entry.index) {
                tracing::warn!(task_id = %id, error = %err, "rollback skipped");
                return;
            }
            tracing::debug!(task_id = %id, status = %entry.status, "card settled to server column");
        }
        if let Some(task) = entry.confirmed {
            self.board.confirm(task);
        }
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryTaskStore;
    use chrono::NaiveDate;
    use kanri_core::entities::NewTask;
    use pretty_assertions::assert_eq;

    async fn session_with(titles: &[&str]) -> (Arc<InMemoryTaskStore>, BoardSession) {
        let store = Arc::new(InMemoryTaskStore::new());
        for title in titles {
            store
                .create_task(
                    NewTask::new(*title, "dr-lee").due(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()),
                )
                .await
                .unwrap();
        }
        let mut session = BoardSession::new(store.clone(), SessionOptions::default());
        session.load().await.unwrap();
        (store, session)
    }

    #[tokio::test]
    async fn second_drag_is_rejected() {
        let (_, mut session) = session_with(&["a", "b"]).await;
        session.drag_start(TaskId(1)).unwrap();
        assert_eq!(
            session.drag_start(TaskId(2)).unwrap_err(),
            BoardError::DragInProgress(TaskId(1))
        );
    }

    #[tokio::test]
    async fn drop_without_drag_is_an_error() {
        let (_, mut session) = session_with(&["a"]).await;
        assert_eq!(session.drop_card().unwrap_err(), BoardError::NoActiveDrag);
        assert_eq!(session.cancel_drag().unwrap_err(), BoardError::NoActiveDrag);
    }

    #[tokio::test]
    async fn load_more_pages_through_a_column() {
        let store = Arc::new(InMemoryTaskStore::new());
        for n in 0..5 {
            store
                .create_task(
                    NewTask::new(format!("t{n}"), "dr-lee")
                        .due(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()),
                )
                .await
                .unwrap();
        }
        let mut session = BoardSession::new(
            store,
            SessionOptions {
                per_page: 2,
                rollback_on_failure: true,
            },
        );
        session.load().await.unwrap();
        assert_eq!(session.board().cards(TaskStatus::Pending).len(), 2);
        assert_eq!(session.load_more(TaskStatus::Pending).await.unwrap(), 2);
        assert_eq!(session.load_more(TaskStatus::Pending).await.unwrap(), 1);
        assert_eq!(session.load_more(TaskStatus::Pending).await.unwrap(), 0);
        assert!(session.load_more(TaskStatus::Cancelled).await.is_err());
    }

    #[tokio::test]
    async fn ensure_loaded_fetches_cards_beyond_first_page() {
        let store = Arc::new(InMemoryTaskStore::new());
        for n in 0..3 {
            store
                .create_task(
                    NewTask::new(format!("t{n}"), "dr-lee")
                        .due(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()),
                )
                .await
                .unwrap();
        }
        let mut session = BoardSession::new(
            store,
            SessionOptions {
                per_page: 1,
                rollback_on_failure: true,
            },
        );
        session.load().await.unwrap();
        assert!(session.board().task(TaskId(3)).is_none());

        assert!(session.ensure_loaded(TaskId(3)).await.unwrap());
        assert!(session.board().task(TaskId(3)).is_some());
        assert!(session.ensure_loaded(TaskId(99)).await.is_err());
    }

    #[tokio::test]
    async fn success_confirms_and_notifies() {
        let (store, mut session) = session_with(&["a"]).await;
        session
            .move_card(TaskId(1), DropTarget::Column(TaskStatus::InProgress))
            .unwrap();
        let notes = session.settle().await;
        assert_eq!(notes.len(), 1);
        assert!(!notes[0].is_error());
        assert_eq!(
            store.get_task(TaskId(1)).await.unwrap().status,
            TaskStatus::InProgress
        );
        assert_eq!(session.notifications(), notes.as_slice());
    }
}
