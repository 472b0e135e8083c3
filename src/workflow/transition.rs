use crate::error::BoardError;
use crate::models::{Column, TaskStatus};

/// Statuses reachable from `from` in one step. `done → in-progress` is a reopen.
pub fn allowed_transitions(from: TaskStatus) -> &'static [TaskStatus] {
    use TaskStatus::*;
    match from {
        Todo => &[InProgress],
        InProgress => &[Review],
        Review => &[InProgress, Done],
        Done => &[InProgress],
    }
}

pub fn validate_transition(from: TaskStatus, to: TaskStatus) -> Result<(), BoardError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(BoardError::illegal_transition(from.as_str(), to.as_str()))
    }
}

/// The status a task takes when it enters `column`.
///
/// A task keeps its status when the column accepts it. Otherwise the first status the
/// column declares that is one legal step away is used.
pub fn resolve_target_status(
    current: TaskStatus,
    column: &Column,
) -> Result<TaskStatus, BoardError> {
    if column.accepts(current) {
        return Ok(current);
    }
    column
        .statuses
        .iter()
        .copied()
        .find(|to| allowed_transitions(current).contains(to))
        .ok_or_else(|| {
            let to = column.statuses.first().map_or("?", TaskStatus::as_str);
            BoardError::illegal_transition(current.as_str(), to)
        })
}
