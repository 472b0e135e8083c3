use std::cmp::Reverse;

use crate::error::BoardError;
use crate::graph::DependencyGraph;
use crate::models::{Task, TaskStatus};
use crate::store::EntityStore;

/// Dependencies of `task_id` that are not done yet, in id order.
pub fn blocking_dependencies(
    store: &EntityStore,
    task_id: &str,
) -> Result<Vec<String>, BoardError> {
    let task = store.task(task_id)?;
    Ok(task
        .dependencies
        .iter()
        .filter(|dep| {
            store
                .task(dep)
                .map(|d| !d.status.is_done())
                .unwrap_or(false)
        })
        .cloned()
        .collect())
}

/// True iff every dependency of the task is done.
pub fn is_ready(store: &EntityStore, task_id: &str) -> Result<bool, BoardError> {
    Ok(blocking_dependencies(store, task_id)?.is_empty())
}

fn deps_done(store: &EntityStore, task: &Task) -> bool {
    task.dependencies.iter().all(|dep| {
        store
            .task(dep)
            .map(|d| d.status.is_done())
            .unwrap_or(true)
    })
}

/// Todo tasks that can be picked up now: highest priority first, then earliest due
/// date (undated last), then board order.
pub fn ready_to_start(store: &EntityStore) -> Vec<&Task> {
    let mut ready: Vec<&Task> = store
        .active_tasks()
        .filter(|t| t.status == TaskStatus::Todo && deps_done(store, t))
        .collect();
    ready.sort_by_key(|t| (Reverse(t.priority), t.due_date.is_none(), t.due_date));
    ready
}

/// Cascade view after `completed_id` is done: its todo dependents whose dependencies
/// are now all satisfied, in id order.
pub fn newly_ready<'a>(
    store: &'a EntityStore,
    completed_id: &str,
) -> Result<Vec<&'a Task>, BoardError> {
    let completed = store.task(completed_id)?;
    if !completed.status.is_done() {
        return Ok(Vec::new());
    }
    let graph = DependencyGraph::from_store(store);
    Ok(graph
        .dependents_of(completed_id)
        .filter_map(|id| store.task(id).ok())
        .filter(|t| !t.archived && t.status == TaskStatus::Todo && deps_done(store, t))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use crate::test_support::{store_with, task_after};

    #[test]
    fn test_blocking_lists_open_dependencies() {
        let store = store_with(vec![
            task_after("a", TaskStatus::Done, &[]),
            task_after("b", TaskStatus::InProgress, &[]),
            task_after("c", TaskStatus::Todo, &["a", "b"]),
        ]);
        assert_eq!(blocking_dependencies(&store, "c").unwrap(), vec!["b"]);
        assert!(!is_ready(&store, "c").unwrap());
        assert!(is_ready(&store, "a").unwrap());
    }

    #[test]
    fn test_ready_to_start_ordering() {
        let mut low = task_after("low", TaskStatus::Todo, &[]);
        low.priority = Priority::Low;
        let mut crit = task_after("crit", TaskStatus::Todo, &[]);
        crit.priority = Priority::Critical;
        let blocked = task_after("blocked", TaskStatus::Todo, &["open"]);
        let open = task_after("open", TaskStatus::InProgress, &[]);
        let store = store_with(vec![low, blocked, open, crit]);

        let ids: Vec<&str> = ready_to_start(&store).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["crit", "low"]);
    }

    #[test]
    fn test_newly_ready_after_completion() {
        let store = store_with(vec![
            task_after("a", TaskStatus::Done, &[]),
            task_after("b", TaskStatus::InProgress, &[]),
            task_after("c", TaskStatus::Todo, &["a"]),
            task_after("d", TaskStatus::Todo, &["a", "b"]),
        ]);
        let ids: Vec<&str> = newly_ready(&store, "a")
            .unwrap()
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["c"]);
        assert!(newly_ready(&store, "b").unwrap().is_empty());
    }
}
