use indexmap::IndexMap;
use serde::Serialize;

use crate::models::{Column, Task, TaskStatus};

/// Column id → number of tasks. Every given column is present, in the given order;
/// tasks pointing at other columns are appended after them.
pub fn column_counts<'a, C, T>(columns: C, tasks: T) -> IndexMap<String, usize>
where
    C: IntoIterator<Item = &'a Column>,
    T: IntoIterator<Item = &'a Task>,
{
    let mut counts: IndexMap<String, usize> =
        columns.into_iter().map(|c| (c.id.clone(), 0)).collect();
    for task in tasks {
        *counts.entry(task.column.clone()).or_insert(0) += 1;
    }
    counts
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub total: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub review: usize,
    pub done: usize,
    pub completed_pct: u32,
    /// In progress and under review together.
    pub in_progress_pct: u32,
    pub remaining_pct: u32,
}

/// Whole percent, rounding halves up.
fn percent(count: usize, total: usize) -> u32 {
    ((count * 200 + total) / (2 * total)) as u32
}

/// Status counts and whole-percent shares. For a non-empty set the three percentages
/// sum to exactly 100; the rounding remainder lands in `remaining_pct`.
pub fn progress<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Progress {
    let mut p = Progress::default();
    for task in tasks {
        p.total += 1;
        match task.status {
            TaskStatus::Todo => p.todo += 1,
            TaskStatus::InProgress => p.in_progress += 1,
            TaskStatus::Review => p.review += 1,
            TaskStatus::Done => p.done += 1,
        }
    }
    if p.total == 0 {
        return p;
    }
    p.completed_pct = percent(p.done, p.total);
    p.in_progress_pct = percent(p.in_progress + p.review, p.total).min(100 - p.completed_pct);
    p.remaining_pct = 100 - p.completed_pct - p.in_progress_pct;
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{column, task, task_in};

    fn with_statuses(statuses: &[(usize, TaskStatus)]) -> Vec<Task> {
        let mut tasks = Vec::new();
        for &(n, status) in statuses {
            for _ in 0..n {
                tasks.push(task(&format!("t{}", tasks.len()), status));
            }
        }
        tasks
    }

    #[test]
    fn test_counts_include_empty_columns() {
        let columns = vec![
            column("todo", &[TaskStatus::Todo], Some(3)),
            column("doing", &[TaskStatus::InProgress], None),
        ];
        let tasks = vec![
            task_in("a", TaskStatus::Todo, "todo"),
            task_in("b", TaskStatus::Todo, "todo"),
        ];
        let counts = column_counts(&columns, &tasks);
        assert_eq!(counts.get("todo"), Some(&2));
        assert_eq!(counts.get("doing"), Some(&0));
        assert_eq!(counts.keys().collect::<Vec<_>>(), vec!["todo", "doing"]);
    }

    #[test]
    fn test_progress_thirds() {
        let tasks = with_statuses(&[
            (1, TaskStatus::Done),
            (1, TaskStatus::Review),
            (1, TaskStatus::Todo),
        ]);
        let p = progress(&tasks);
        assert_eq!((p.completed_pct, p.in_progress_pct, p.remaining_pct), (33, 33, 34));
    }

    #[test]
    fn test_progress_double_round_up_still_sums_to_100() {
        // 50.5% done, 49.5% active, nothing left
        let tasks = with_statuses(&[(101, TaskStatus::Done), (99, TaskStatus::InProgress)]);
        let p = progress(&tasks);
        assert_eq!(p.completed_pct + p.in_progress_pct + p.remaining_pct, 100);
        assert_eq!(p.completed_pct, 51);
    }

    #[test]
    fn test_progress_empty() {
        let p = progress(&Vec::new());
        assert_eq!(p, Progress::default());
    }
}
