use chrono::NaiveDate;
use serde::Serialize;

use crate::error::BoardError;
use crate::models::Task;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BurndownPoint {
    pub date: NaiveDate,
    pub remaining_hours: f64,
    pub ideal_hours: f64,
}

fn completed_by(task: &Task, day: NaiveDate) -> bool {
    task.status.is_done()
        && task
            .completed_at
            .is_some_and(|at| at.date_naive() <= day)
}

/// Remaining estimate per day from `from` to `to` inclusive, next to the ideal line
/// that falls linearly from the total scope to zero.
pub fn burndown<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<BurndownPoint>, BoardError> {
    if to < from {
        return Err(BoardError::validation(format!(
            "Burndown range ends ({to}) before it starts ({from})"
        )));
    }
    let tasks: Vec<&Task> = tasks.into_iter().collect();
    let total: f64 = tasks.iter().map(|t| t.estimate_hours).sum();
    let steps = (to - from).num_days();

    let points = from
        .iter_days()
        .take_while(|day| *day <= to)
        .enumerate()
        .map(|(i, day)| {
            let remaining = tasks
                .iter()
                .filter(|t| !completed_by(t, day))
                .map(|t| t.estimate_hours)
                .sum();
            let ideal = if steps == 0 {
                0.0
            } else {
                total * (steps - i as i64) as f64 / steps as f64
            };
            BurndownPoint {
                date: day,
                remaining_hours: remaining,
                ideal_hours: ideal,
            }
        })
        .collect();
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::models::TaskStatus;
    use crate::test_support::task;
    use chrono::{TimeZone, Utc};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn done_on(id: &str, hours: f64, d: u32) -> Task {
        let mut t = task(id, TaskStatus::Done);
        t.estimate_hours = hours;
        t.completed_at = Some(Utc.with_ymd_and_hms(2026, 3, d, 15, 0, 0).unwrap());
        t
    }

    #[test]
    fn test_burndown_series() {
        let mut open = task("c", TaskStatus::InProgress);
        open.estimate_hours = 4.0;
        let tasks = vec![done_on("a", 8.0, 2), done_on("b", 4.0, 3), open];

        let points = burndown(&tasks, date(1), date(5)).unwrap();
        assert_eq!(points.len(), 5);
        let remaining: Vec<f64> = points.iter().map(|p| p.remaining_hours).collect();
        assert_eq!(remaining, vec![16.0, 8.0, 4.0, 4.0, 4.0]);
        assert_eq!(points[0].ideal_hours, 16.0);
        assert_eq!(points[2].ideal_hours, 8.0);
        assert_eq!(points[4].ideal_hours, 0.0);
    }

    #[test]
    fn test_reversed_range_rejected() {
        let err = burndown(&Vec::new(), date(5), date(1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_single_day() {
        let tasks = vec![done_on("a", 8.0, 1)];
        let points = burndown(&tasks, date(1), date(1)).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].remaining_hours, 0.0);
    }
}
