//! Status transition guard.
//!
//! The board and the store share one rule: a task whose current status is
//! system-assigned cannot be moved, and no task can be moved into a
//! system-assigned status. Every other pair is allowed, including moving
//! backwards and moving to the same status.

use crate::enums::TaskStatus;
use crate::errors::CoreError;
use crate::ids::TaskId;

/// Whether a user-initiated move from `current` to `requested` is allowed.
#[must_use]
pub const fn can_transition(current: TaskStatus, requested: TaskStatus) -> bool {
    !current.is_system_assigned() && !requested.is_system_assigned()
}

/// Whether a task in `status` may be picked up at all.
#[must_use]
pub const fn can_start_move(status: TaskStatus) -> bool {
    !status.is_system_assigned()
}

/// [`can_transition`] as a `Result`, for callers that propagate.
///
/// # Errors
///
/// Returns `CoreError::GuardedTransition` when the guard rejects the move.
pub fn check_transition(
    id: TaskId,
    current: TaskStatus,
    requested: TaskStatus,
) -> Result<(), CoreError> {
    if can_transition(current, requested) {
        Ok(())
    } else {
        Err(CoreError::GuardedTransition {
            id,
            from: current,
            to: requested,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn nothing_leaves_overdue() {
        for requested in TaskStatus::ALL {
            assert!(!can_transition(TaskStatus::Overdue, requested));
        }
    }

    #[test]
    fn nothing_enters_overdue() {
        for current in TaskStatus::ALL {
            assert!(!can_transition(current, TaskStatus::Overdue));
        }
    }

    #[test]
    fn every_other_pair_is_allowed() {
        for current in TaskStatus::ALL {
            for requested in TaskStatus::ALL {
                if current != TaskStatus::Overdue && requested != TaskStatus::Overdue {
                    assert!(
                        can_transition(current, requested),
                        "{current} -> {requested} should be allowed"
                    );
                }
            }
        }
    }

    #[rstest]
    #[case(TaskStatus::Pending, TaskStatus::Done)]
    #[case(TaskStatus::Done, TaskStatus::Pending)]
    #[case(TaskStatus::InProgress, TaskStatus::InProgress)]
    #[case(TaskStatus::Cancelled, TaskStatus::InProgress)]
    fn no_forward_only_ordering(#[case] current: TaskStatus, #[case] requested: TaskStatus) {
        assert!(check_transition(TaskId(1), current, requested).is_ok());
    }

    #[test]
    fn rejection_carries_both_statuses() {
        let err = check_transition(TaskId(7), TaskStatus::Overdue, TaskStatus::Done).unwrap_err();
        assert!(matches!(
            err,
            CoreError::GuardedTransition {
                id: TaskId(7),
                from: TaskStatus::Overdue,
                to: TaskStatus::Done,
            }
        ));
    }

    #[test]
    fn overdue_cards_cannot_be_picked_up() {
        assert!(!can_start_move(TaskStatus::Overdue));
        assert!(can_start_move(TaskStatus::Pending));
    }
}
