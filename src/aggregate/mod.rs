//! Read-only views derived from tasks. Nothing in here touches the store.

pub mod burndown;
pub mod filter;
pub mod stats;
pub mod workload;

use std::cmp::Reverse;

use chrono::NaiveDate;

use crate::models::Task;

pub use burndown::{burndown, BurndownPoint};
pub use filter::{filter, TaskFilter};
pub use stats::{column_counts, progress, Progress};
pub use workload::{allocated_hours, workload, Workload};

/// Open tasks whose due date is before `today`.
pub fn overdue<'a>(tasks: impl IntoIterator<Item = &'a Task>, today: NaiveDate) -> Vec<&'a Task> {
    tasks.into_iter().filter(|t| t.is_overdue(today)).collect()
}

pub fn over_budget<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<&'a Task> {
    tasks.into_iter().filter(|t| t.is_over_budget()).collect()
}

/// Highest priority first; equal priorities keep their input order.
pub fn prioritized<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<&'a Task> {
    let mut tasks: Vec<&Task> = tasks.into_iter().collect();
    tasks.sort_by_key(|t| Reverse(t.priority));
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, TaskStatus};
    use crate::test_support::task;

    #[test]
    fn test_overdue_ignores_done() {
        let due = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 1, 11).unwrap();
        let mut late = task("late", TaskStatus::InProgress);
        late.due_date = Some(due);
        let mut finished = task("finished", TaskStatus::Done);
        finished.due_date = Some(due);
        let tasks = vec![late, finished];
        let ids: Vec<&str> = overdue(&tasks, today).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["late"]);
    }

    #[test]
    fn test_over_budget_and_priority_order() {
        let mut a = task("a", TaskStatus::Todo);
        a.estimate_hours = 2.0;
        a.spent_hours = 3.0;
        a.priority = Priority::Low;
        let mut b = task("b", TaskStatus::Todo);
        b.priority = Priority::Critical;
        let tasks = vec![a, b];
        assert_eq!(over_budget(&tasks).len(), 1);
        let ids: Vec<&str> = prioritized(&tasks).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
