//! Background reconciliation of optimistic moves.
//!
//! [`Dispatcher::reconcile`] issues at most one `update_task_status` call per
//! drop. The call runs on its own tokio task; its outcome comes back over an
//! unbounded channel and is read by whoever owns the board, so board state
//! itself never crosses a task boundary.
//!
//! Every dispatched call gets a per-task sequence number. The owner compares
//! it against the newest number issued for that task to tell a stale outcome
//! from a current one.

use std::collections::HashMap;
use std::sync::Arc;

use kanri_core::entities::Task;
use kanri_core::enums::TaskStatus;
use kanri_core::errors::CoreError;
use kanri_core::ids::TaskId;
use kanri_core::store::TaskStore;
use tokio::sync::mpsc;

/// A finished drag, as far as the server is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileRequest {
    pub task_id: TaskId,
    pub original_status: TaskStatus,
    pub final_status: TaskStatus,
    /// Slot the card came from, for rollback.
    pub original_index: usize,
}

impl ReconcileRequest {
    /// The card ended in the column it started in. Reordering within a
    /// column is not persisted, so there is nothing to send.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.original_status == self.final_status
    }
}

/// Handle for one dispatched call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub task_id: TaskId,
    pub seq: u64,
}

#[derive(Debug)]
pub struct ReconcileOutcome {
    pub ticket: Ticket,
    pub request: ReconcileRequest,
    pub result: Result<Task, CoreError>,
}

pub struct Dispatcher {
    store: Arc<dyn TaskStore>,
    tx: mpsc::UnboundedSender<ReconcileOutcome>,
    rx: mpsc::UnboundedReceiver<ReconcileOutcome>,
    latest: HashMap<TaskId, u64>,
    in_flight: usize,
}

impl Dispatcher {
    #[must_use]
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            store,
            tx,
            rx,
            latest: HashMap::new(),
            in_flight: 0,
        }
    }

    /// Send the status change in `request` to the store.
    ///
    /// Returns `None` without touching the store when the request is a
    /// no-op. Must be called from within a tokio runtime.
    pub fn reconcile(&mut self, request: ReconcileRequest) -> Option<Ticket> {
        if request.is_noop() {
            return None;
        }

        let seq = self.latest.get(&request.task_id).map_or(1, |s| s + 1);
        self.latest.insert(request.task_id, seq);
        let ticket = Ticket {
            task_id: request.task_id,
            seq,
        };
        self.in_flight += 1;

        tracing::debug!(
            task_id = %request.task_id,
            seq,
            from = %request.original_status,
            to = %request.final_status,
            "dispatching status update"
        );

        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = store
                .update_task_status(request.task_id, request.final_status)
                .await;
            // Fails only once the dispatcher is dropped.
            let _ = tx.send(ReconcileOutcome {
                ticket,
                request,
                result,
            });
        });

        Some(ticket)
    }

    /// Whether `ticket` is the newest call issued for its task.
    #[must_use]
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest.get(&ticket.task_id) == Some(&ticket.seq)
    }

    /// Wait for the next outcome. Returns `None` when nothing is in flight.
    pub async fn next_outcome(&mut self) -> Option<ReconcileOutcome> {
        if self.in_flight == 0 {
            return None;
        }
        let outcome = self.rx.recv().await?;
        self.in_flight -= 1;
        Some(outcome)
    }

    #[must_use]
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }
}
