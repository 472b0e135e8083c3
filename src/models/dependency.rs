use serde::{Deserialize, Serialize};

/// An edge of the dependency graph: `task_id` cannot complete before `dependency_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDependency {
    pub task_id: String,
    pub dependency_id: String,
}
