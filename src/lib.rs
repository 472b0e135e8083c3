pub mod aggregate;
pub mod board;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod graph;
pub mod logging;
pub mod models;
pub mod output;
pub mod store;
pub mod workflow;

pub use board::{Board, BoardSnapshot};
pub use config::BoardConfig;
pub use error::{BoardError, ErrorCode};

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::BTreeSet;

    use chrono::Utc;

    use crate::config::BoardConfig;
    use crate::models::{Column, Priority, Task, TaskStatus};
    use crate::store::EntityStore;

    /// A task sitting in the default column for its status.
    pub fn task(id: &str, status: TaskStatus) -> Task {
        task_in(id, status, status.as_str())
    }

    pub fn task_in(id: &str, status: TaskStatus, column: &str) -> Task {
        let now = Utc::now();
        Task {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            priority: Priority::Medium,
            status,
            column: column.to_string(),
            assignee: None,
            estimate_hours: 0.0,
            spent_hours: 0.0,
            due_date: None,
            dependencies: BTreeSet::new(),
            tags: BTreeSet::new(),
            archived: false,
            version: 1,
            created_at: now,
            updated_at: now,
            started_at: None,
            completed_at: None,
        }
    }

    pub fn task_after(id: &str, status: TaskStatus, deps: &[&str]) -> Task {
        let mut t = task(id, status);
        t.dependencies = deps.iter().map(|d| d.to_string()).collect();
        t
    }

    pub fn column(id: &str, statuses: &[TaskStatus], wip_limit: Option<usize>) -> Column {
        Column {
            id: id.to_string(),
            title: id.to_string(),
            wip_limit,
            statuses: statuses.to_vec(),
            order: 0,
        }
    }

    /// The default four columns plus the given tasks.
    pub fn store_with(tasks: Vec<Task>) -> EntityStore {
        let mut store = EntityStore::new();
        for column in BoardConfig::default().to_columns() {
            store.put(column);
        }
        for task in tasks {
            store.put(task);
        }
        store
    }
}
