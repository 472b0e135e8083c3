use serde::Serialize;

use crate::models::{Task, TeamMember};

/// Capacity use of one member. `ratio` is never capped so over-allocation stays
/// visible; `display_pct` is the clamped value for progress bars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workload {
    pub member_id: String,
    pub name: String,
    pub capacity_hours: f64,
    pub allocated_hours: f64,
    pub open_tasks: usize,
    pub ratio: f64,
    pub percent: f64,
    pub display_pct: f64,
    pub over_allocated: bool,
}

/// Sum of estimates over the member's open tasks.
pub fn allocated_hours<'a>(member_id: &str, tasks: impl IntoIterator<Item = &'a Task>) -> f64 {
    tasks
        .into_iter()
        .filter(|t| t.is_open() && t.assignee.as_deref() == Some(member_id))
        .map(|t| t.estimate_hours)
        .sum()
}

pub fn workload<'a>(member: &TeamMember, tasks: impl IntoIterator<Item = &'a Task>) -> Workload {
    let mut allocated = 0.0;
    let mut open_tasks = 0;
    for task in tasks {
        if task.is_open() && task.assignee.as_deref() == Some(member.id.as_str()) {
            allocated += task.estimate_hours;
            open_tasks += 1;
        }
    }
    let ratio = if member.capacity_hours > 0.0 {
        allocated / member.capacity_hours
    } else {
        0.0
    };
    let percent = ratio * 100.0;
    Workload {
        member_id: member.id.clone(),
        name: member.name.clone(),
        capacity_hours: member.capacity_hours,
        allocated_hours: allocated,
        open_tasks,
        ratio,
        percent,
        display_pct: percent.clamp(0.0, 100.0),
        over_allocated: ratio > 1.0,
    }
}
