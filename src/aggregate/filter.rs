use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{Priority, Task, TaskStatus};

/// Conjunction of field predicates. An empty set places no constraint on its field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskFilter {
    #[serde(default)]
    pub priorities: BTreeSet<Priority>,
    #[serde(default)]
    pub assignees: BTreeSet<String>,
    #[serde(default)]
    pub statuses: BTreeSet<TaskStatus>,
    /// Matches when the task carries any of these tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Case-insensitive substring of the title or description.
    #[serde(default)]
    pub text: Option<String>,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priorities.insert(priority);
        self
    }

    pub fn assignee(mut self, member_id: impl Into<String>) -> Self {
        self.assignees.insert(member_id.into());
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.statuses.insert(status);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn matches(&self, task: &Task) -> bool {
        if !self.priorities.is_empty() && !self.priorities.contains(&task.priority) {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&task.status) {
            return false;
        }
        if !self.assignees.is_empty() {
            match task.assignee {
                Some(ref a) if self.assignees.contains(a) => {}
                _ => return false,
            }
        }
        if !self.tags.is_empty() && self.tags.is_disjoint(&task.tags) {
            return false;
        }
        if let Some(ref text) = self.text {
            let needle = text.to_lowercase();
            if !needle.is_empty()
                && !task.title.to_lowercase().contains(&needle)
                && !task.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

/// The matching subset in input order.
pub fn filter<'a, I>(tasks: I, predicate: &TaskFilter) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks.into_iter().filter(|t| predicate.matches(t)).collect()
}
