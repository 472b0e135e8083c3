use serde::{Deserialize, Serialize};

use super::TaskStatus;

/// A workflow stage. A column declares which statuses its tasks may carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
    pub wip_limit: Option<usize>,
    pub statuses: Vec<TaskStatus>,
    pub order: usize,
}

impl Column {
    pub fn accepts(&self, status: TaskStatus) -> bool {
        self.statuses.contains(&status)
    }

    /// Columns that hold finished work are never capacity-limited.
    pub fn is_terminal(&self) -> bool {
        self.accepts(TaskStatus::Done)
    }

    /// The limit that is actually enforced.
    pub fn effective_limit(&self) -> Option<usize> {
        if self.is_terminal() {
            None
        } else {
            self.wip_limit
        }
    }
}
