//! Column-ordered board state.
//!
//! The board holds one column per status the board surface shows. Each
//! column is the ordered list of cards loaded so far plus the paging
//! bookkeeping needed to fetch the next page. Relocations happen here first
//! and are reconciled with the store afterwards.

use kanri_core::entities::Task;
use kanri_core::enums::{Surface, TaskStatus};
use kanri_core::guard::can_transition;
use kanri_core::ids::TaskId;
use kanri_core::query::{Page, PageRequest};
use kanri_core::responses::ColumnSummary;

use crate::error::BoardError;

/// One status column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub status: TaskStatus,
    pub cards: Vec<Task>,
    /// Last page merged into this column; 0 before the first load.
    pub loaded_page: u32,
    pub per_page: u32,
    /// Server-side count for this status.
    pub total: u64,
    pub has_more: bool,
}

impl Column {
    fn empty(status: TaskStatus) -> Self {
        Self {
            status,
            cards: Vec::new(),
            loaded_page: 0,
            per_page: 0,
            total: 0,
            has_more: false,
        }
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.cards.iter().position(|t| t.id == id)
    }

    #[must_use]
    pub fn summary(&self) -> ColumnSummary {
        ColumnSummary {
            status: self.status,
            loaded: self.cards.len(),
            total: self.total,
            has_more: self.has_more,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    columns: Vec<Column>,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardState {
    /// An empty board with one column per board status.
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: Surface::Board
                .statuses()
                .iter()
                .copied()
                .map(Column::empty)
                .collect(),
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn column(&self, status: TaskStatus) -> Option<&Column> {
        self.columns.iter().find(|c| c.status == status)
    }

    fn column_mut(&mut self, status: TaskStatus) -> Result<&mut Column, BoardError> {
        self.columns
            .iter_mut()
            .find(|c| c.status == status)
            .ok_or(BoardError::NotABoardColumn(status))
    }

    /// Cards of a column in display order. Empty for non-board statuses.
    #[must_use]
    pub fn cards(&self, status: TaskStatus) -> &[Task] {
        self.column(status).map_or(&[], |c| c.cards.as_slice())
    }

    /// Column and index of a card.
    #[must_use]
    pub fn locate(&self, id: TaskId) -> Option<(TaskStatus, usize)> {
        self.columns
            .iter()
            .find_map(|c| c.position(id).map(|idx| (c.status, idx)))
    }

    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.columns
            .iter()
            .flat_map(|c| c.cards.iter())
            .find(|t| t.id == id)
    }

    /// Merge a fetched page into its column.
    ///
    /// Cards already on the board (anywhere) are skipped, so a card that was
    /// moved optimistically is not duplicated when its old column pages in.
    /// Returns the number of cards appended.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::NotABoardColumn` for a status the board hides.
    pub fn load_page(&mut self, status: TaskStatus, page: Page<Task>) -> Result<usize, BoardError> {
        // Check before borrowing mutably so `task()` can see every column.
        self.column_mut(status)?;
        let fresh: Vec<Task> = page
            .items
            .into_iter()
            .filter(|t| self.task(t.id).is_none())
            .collect();
        let added = fresh.len();

        let column = self.column_mut(status)?;
        column.cards.extend(fresh);
        column.loaded_page = column.loaded_page.max(page.page);
        column.per_page = page.per_page;
        column.total = page.total;
        column.has_more = page.has_more;
        Ok(added)
    }

    /// The request for a column's next page, if the server has more.
    ///
    /// Paging is by offset. Once a card has moved out of this column since
    /// the last load, the server's page boundary shifts up by one and the
    /// next page starts one card late; that card stays off the board until
    /// the column is reloaded. Cards moved in are never duplicated, since
    /// [`load_page`](Self::load_page) skips ids already on the board.
    #[must_use]
    pub fn next_page(&self, status: TaskStatus) -> Option<PageRequest> {
        self.column(status)
            .filter(|c| c.has_more)
            .map(|c| PageRequest::new(c.loaded_page + 1, c.per_page))
    }

    /// Optimistically relocate a card to `to` at `index`.
    ///
    /// The index is clamped to the destination length. The card's status is
    /// set to `to` and the column totals follow it. Returns the final index.
    ///
    /// # Errors
    ///
    /// - `NotABoardColumn` if `to` is not shown on the board
    /// - `NotInColumn` if the card is not currently in `from`
    /// - `Guarded` if the move touches a system-assigned status
    pub fn move_task(
        &mut self,
        id: TaskId,
        from: TaskStatus,
        to: TaskStatus,
        index: usize,
    ) -> Result<usize, BoardError> {
        self.column_mut(to)?;
        let source = self.column_mut(from).map_err(|_| BoardError::NotInColumn {
            task_id: id,
            status: from,
        })?;
        let position = source.position(id).ok_or(BoardError::NotInColumn {
            task_id: id,
            status: from,
        })?;
        if !can_transition(from, to) {
            return Err(BoardError::Guarded {
                task_id: id,
                from,
                to,
            });
        }
        Ok(self.relocate(from, position, to, index))
    }

    /// Put a card back at `index` in `status` without consulting the guard.
    ///
    /// Used to undo an optimistic move whose server call failed.
    ///
    /// # Errors
    ///
    /// `UnknownTask` if the card is no longer on the board, `NotABoardColumn`
    /// if `status` is not a board column.
    pub fn revert(
        &mut self,
        id: TaskId,
        status: TaskStatus,
        index: usize,
    ) -> Result<usize, BoardError> {
        self.column_mut(status)?;
        let (current, position) = self.locate(id).ok_or(BoardError::UnknownTask(id))?;
        Ok(self.relocate(current, position, status, index))
    }

    fn relocate(&mut self, from: TaskStatus, position: usize, to: TaskStatus, index: usize) -> usize {
        let Ok(source) = self.column_mut(from) else {
            return index;
        };
        let mut card = source.cards.remove(position);
        if from != to {
            source.total = source.total.saturating_sub(1);
        }

        let Ok(target) = self.column_mut(to) else {
            return index;
        };
        card.status = to;
        let index = index.min(target.cards.len());
        target.cards.insert(index, card);
        if from != to {
            target.total += 1;
        }
        index
    }

    /// Replace a card with the server's copy.
    ///
    /// A card whose server status differs from its column is moved to the
    /// end of the right column, or dropped if the board does not show that
    /// status. A card not yet on the board is appended.
    pub fn confirm(&mut self, task: Task) {
        match self.locate(task.id) {
            Some((status, position)) if status == task.status => {
                if let Ok(column) = self.column_mut(status) {
                    column.cards[position] = task;
                }
            }
            Some(_) => {
                self.remove(task.id);
                self.insert(task);
            }
            None => {
                self.insert(task);
            }
        }
    }

    /// Append a card to the end of its status column.
    ///
    /// Returns `false` when the board does not show the task's status.
    pub fn insert(&mut self, task: Task) -> bool {
        match self.column_mut(task.status) {
            Ok(column) => {
                column.cards.push(task);
                column.total += 1;
                true
            }
            Err(_) => false,
        }
    }

    /// Append a card the column total already counts, such as one fetched
    /// on its own from a page that is not loaded yet.
    pub fn attach(&mut self, task: Task) -> bool {
        match self.column_mut(task.status) {
            Ok(column) => {
                column.cards.push(task);
                true
            }
            Err(_) => false,
        }
    }

    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let (status, position) = self.locate(id)?;
        let column = self.column_mut(status).ok()?;
        column.total = column.total.saturating_sub(1);
        Some(column.cards.remove(position))
    }

    #[must_use]
    pub fn summaries(&self) -> Vec<ColumnSummary> {
        self.columns.iter().map(Column::summary).collect()
    }

    /// Card ids per column, in display order.
    #[must_use]
    pub fn layout(&self) -> Vec<(TaskStatus, Vec<TaskId>)> {
        self.columns
            .iter()
            .map(|c| (c.status, c.cards.iter().map(|t| t.id).collect()))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use kanri_core::enums::Priority;
    use pretty_assertions::assert_eq;

    pub(crate) fn card(id: i64, status: TaskStatus) -> Task {
        Task {
            id: TaskId(id),
            title: format!("Task {id}"),
            description: None,
            priority: Priority::Medium,
            status,
            start_date: None,
            due_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            patient_id: None,
            owner_id: "dr-lee".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub(crate) fn board_with(cards: &[(i64, TaskStatus)]) -> BoardState {
        let mut board = BoardState::new();
        for (id, status) in cards {
            assert!(board.insert(card(*id, *status)));
        }
        board
    }

    fn ids(board: &BoardState, status: TaskStatus) -> Vec<i64> {
        board.cards(status).iter().map(|t| t.id.get()).collect()
    }

    #[test]
    fn new_board_has_board_columns_only() {
        let board = BoardState::new();
        let statuses: Vec<_> = board.columns().iter().map(|c| c.status).collect();
        assert_eq!(statuses, Surface::Board.statuses().to_vec());
        assert!(board.column(TaskStatus::Cancelled).is_none());
    }

    #[test]
    fn move_places_card_at_index_and_updates_status() {
        let mut board = board_with(&[
            (1, TaskStatus::Pending),
            (2, TaskStatus::Done),
            (3, TaskStatus::Done),
        ]);
        let idx = board
            .move_task(TaskId(1), TaskStatus::Pending, TaskStatus::Done, 1)
            .unwrap();
        assert_eq!(idx, 1);
        assert_eq!(ids(&board, TaskStatus::Done), vec![2, 1, 3]);
        assert!(ids(&board, TaskStatus::Pending).is_empty());
        assert_eq!(board.task(TaskId(1)).unwrap().status, TaskStatus::Done);
        assert_eq!(board.column(TaskStatus::Done).unwrap().total, 3);
        assert_eq!(board.column(TaskStatus::Pending).unwrap().total, 0);
    }

    #[test]
    fn move_clamps_index() {
        let mut board = board_with(&[(1, TaskStatus::Pending), (2, TaskStatus::Done)]);
        let idx = board
            .move_task(TaskId(1), TaskStatus::Pending, TaskStatus::Done, 99)
            .unwrap();
        assert_eq!(idx, 1);
        assert_eq!(ids(&board, TaskStatus::Done), vec![2, 1]);
    }

    #[test]
    fn reorder_within_column() {
        let mut board = board_with(&[
            (1, TaskStatus::Pending),
            (2, TaskStatus::Pending),
            (3, TaskStatus::Pending),
        ]);
        board
            .move_task(TaskId(1), TaskStatus::Pending, TaskStatus::Pending, 2)
            .unwrap();
        assert_eq!(ids(&board, TaskStatus::Pending), vec![2, 3, 1]);
        assert_eq!(board.column(TaskStatus::Pending).unwrap().total, 3);
    }

    #[test]
    fn move_rejects_wrong_source_column() {
        let mut board = board_with(&[(1, TaskStatus::Pending)]);
        let err = board
            .move_task(TaskId(1), TaskStatus::Done, TaskStatus::InProgress, 0)
            .unwrap_err();
        assert_eq!(
            err,
            BoardError::NotInColumn {
                task_id: TaskId(1),
                status: TaskStatus::Done
            }
        );
    }

    #[test]
    fn overdue_card_does_not_move() {
        let mut board = board_with(&[(7, TaskStatus::Overdue)]);
        let before = board.clone();
        let err = board
            .move_task(TaskId(7), TaskStatus::Overdue, TaskStatus::Done, 0)
            .unwrap_err();
        assert!(matches!(err, BoardError::Guarded { .. }));
        assert_eq!(board, before);
    }

    #[test]
    fn cannot_move_into_overdue() {
        let mut board = board_with(&[(1, TaskStatus::Pending)]);
        let err = board
            .move_task(TaskId(1), TaskStatus::Pending, TaskStatus::Overdue, 0)
            .unwrap_err();
        assert!(matches!(err, BoardError::Guarded { .. }));
        assert_eq!(ids(&board, TaskStatus::Pending), vec![1]);
    }

    #[test]
    fn cancelled_is_not_a_board_column() {
        let mut board = board_with(&[(1, TaskStatus::Pending)]);
        let err = board
            .move_task(TaskId(1), TaskStatus::Pending, TaskStatus::Cancelled, 0)
            .unwrap_err();
        assert_eq!(err, BoardError::NotABoardColumn(TaskStatus::Cancelled));
        assert!(!board.insert(card(2, TaskStatus::Cancelled)));
    }

    #[test]
    fn revert_restores_original_position() {
        let mut board = board_with(&[
            (1, TaskStatus::Pending),
            (2, TaskStatus::Pending),
            (3, TaskStatus::Done),
        ]);
        board
            .move_task(TaskId(2), TaskStatus::Pending, TaskStatus::Done, 0)
            .unwrap();
        board.revert(TaskId(2), TaskStatus::Pending, 1).unwrap();
        assert_eq!(ids(&board, TaskStatus::Pending), vec![1, 2]);
        assert_eq!(ids(&board, TaskStatus::Done), vec![3]);
        assert_eq!(board.task(TaskId(2)).unwrap().status, TaskStatus::Pending);
    }

    #[test]
    fn load_page_skips_cards_already_on_board() {
        let mut board = board_with(&[(1, TaskStatus::Done)]);
        let page = Page::new(
            vec![card(1, TaskStatus::Pending), card(2, TaskStatus::Pending)],
            PageRequest::new(1, 2),
            5,
        );
        let added = board.load_page(TaskStatus::Pending, page).unwrap();
        assert_eq!(added, 1);
        assert_eq!(ids(&board, TaskStatus::Pending), vec![2]);
        assert_eq!(
            board.next_page(TaskStatus::Pending),
            Some(PageRequest::new(2, 2))
        );
    }

    #[test]
    fn next_page_is_offset_based_after_a_card_leaves() {
        let mut board = BoardState::new();
        let page = Page::new(
            vec![card(1, TaskStatus::Pending), card(2, TaskStatus::Pending)],
            PageRequest::new(1, 2),
            4,
        );
        board.load_page(TaskStatus::Pending, page).unwrap();
        board
            .move_task(TaskId(1), TaskStatus::Pending, TaskStatus::Done, 0)
            .unwrap();

        // The server now holds pending [2, 3, 4]; offset 2 lands on 4.
        assert_eq!(
            board.next_page(TaskStatus::Pending),
            Some(PageRequest::new(2, 2))
        );
    }

    #[test]
    fn load_page_rejects_hidden_status() {
        let mut board = BoardState::new();
        let page = Page::new(vec![], PageRequest::first(10), 0);
        assert_eq!(
            board.load_page(TaskStatus::Cancelled, page).unwrap_err(),
            BoardError::NotABoardColumn(TaskStatus::Cancelled)
        );
    }

    #[test]
    fn confirm_moves_card_when_server_disagrees() {
        let mut board = board_with(&[(1, TaskStatus::Pending), (2, TaskStatus::Done)]);
        let mut server = card(1, TaskStatus::Done);
        server.title = "Renamed".into();
        board.confirm(server);
        assert_eq!(ids(&board, TaskStatus::Done), vec![2, 1]);
        assert_eq!(board.task(TaskId(1)).unwrap().title, "Renamed");

        board.confirm(card(2, TaskStatus::Cancelled));
        assert_eq!(ids(&board, TaskStatus::Done), vec![1]);
        assert!(board.task(TaskId(2)).is_none());
    }

    #[test]
    fn summaries_report_loaded_and_total() {
        let mut board = BoardState::new();
        let page = Page::new(
            vec![card(1, TaskStatus::InProgress)],
            PageRequest::new(1, 1),
            4,
        );
        board.load_page(TaskStatus::InProgress, page).unwrap();
        let summary = board
            .summaries()
            .into_iter()
            .find(|s| s.status == TaskStatus::InProgress)
            .unwrap();
        assert_eq!(summary.loaded, 1);
        assert_eq!(summary.total, 4);
        assert!(summary.has_more);
    }
}
