//! Column membership and capacity predicates. Nothing here mutates the store.

use crate::error::BoardError;
use crate::models::TaskStatus;
use crate::store::EntityStore;

/// Number of board tasks currently held by the column.
pub fn occupancy(store: &EntityStore, column_id: &str) -> usize {
    store.active_tasks().filter(|t| t.column == column_id).count()
}

/// True iff one more task fits in the column.
pub fn can_enter(store: &EntityStore, column_id: &str) -> Result<bool, BoardError> {
    let column = store.column(column_id)?;
    Ok(match column.effective_limit() {
        Some(limit) => occupancy(store, column_id) < limit,
        None => true,
    })
}

/// True iff the column declares `status`.
pub fn validate_status_column(
    store: &EntityStore,
    status: TaskStatus,
    column_id: &str,
) -> Result<bool, BoardError> {
    Ok(store.column(column_id)?.accepts(status))
}

/// [`can_enter`] as a command guard.
pub fn ensure_can_enter(store: &EntityStore, column_id: &str) -> Result<(), BoardError> {
    if can_enter(store, column_id)? {
        return Ok(());
    }
    let limit = store.column(column_id)?.wip_limit.unwrap_or_default();
    Err(BoardError::wip_limit_exceeded(column_id, limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::{column, task_in};
    use TaskStatus::*;

    fn store() -> EntityStore {
        let mut store = EntityStore::new();
        store.put(column("todo", &[Todo], Some(2)));
        store.put(column("done", &[Done], Some(1)));
        store.put(task_in("a", Todo, "todo"));
        store.put(task_in("b", Done, "done"));
        store
    }

    #[test]
    fn test_can_enter_below_limit() {
        let mut store = store();
        assert!(can_enter(&store, "todo").unwrap());
        store.put(task_in("c", Todo, "todo"));
        assert!(!can_enter(&store, "todo").unwrap());
        let err = ensure_can_enter(&store, "todo").unwrap_err();
        assert_eq!(err.code, ErrorCode::WipLimitExceeded);
    }

    #[test]
    fn test_terminal_column_is_unbounded() {
        let mut store = store();
        store.put(task_in("c", Done, "done"));
        assert!(can_enter(&store, "done").unwrap());
    }

    #[test]
    fn test_archived_tasks_do_not_occupy() {
        let mut store = store();
        let mut c = task_in("c", Todo, "todo");
        c.archived = true;
        store.put(c);
        assert_eq!(occupancy(&store, "todo"), 1);
    }

    #[test]
    fn test_status_column_membership() {
        let store = store();
        assert!(validate_status_column(&store, Todo, "todo").unwrap());
        assert!(!validate_status_column(&store, Review, "todo").unwrap());
        assert_eq!(
            validate_status_column(&store, Todo, "nope").unwrap_err().code,
            ErrorCode::UnknownColumn
        );
    }
}
