use crate::aggregate::{BurndownPoint, Progress, Workload};
use crate::board::BoardSnapshot;
use crate::models::Task;

fn short_id(id: &str) -> &str {
    &id[..std::cmp::min(8, id.len())]
}

pub fn print_task(t: &Task, blocking: &[String]) {
    println!("Task: {} ({})", t.title, t.id);
    if !t.description.is_empty() {
        println!("  Description: {}", t.description);
    }
    println!("  Status: {} (column {})", t.status.as_str(), t.column);
    println!("  Priority: {}", t.priority.as_str());
    if let Some(ref assignee) = t.assignee {
        println!("  Assignee: {assignee}");
    }
    println!("  Hours: {} spent of {} estimated", t.spent_hours, t.estimate_hours);
    if let Some(due) = t.due_date {
        println!("  Due: {due}");
    }
    if !t.tags.is_empty() {
        let tags: Vec<&str> = t.tags.iter().map(String::as_str).collect();
        println!("  Tags: {}", tags.join(", "));
    }
    if !t.dependencies.is_empty() {
        let deps: Vec<&str> = t.dependencies.iter().map(|d| short_id(d)).collect();
        println!("  After: {}", deps.join(", "));
    }
    if !blocking.is_empty() {
        let ids: Vec<&str> = blocking.iter().map(|d| short_id(d)).collect();
        println!("  Blocked by: {}", ids.join(", "));
    }
    if let Some(ref started) = t.started_at {
        println!("  Started: {started}");
    }
    if let Some(ref completed) = t.completed_at {
        println!("  Completed: {completed}");
    }
    if t.archived {
        println!("  Archived");
    }
    println!("  Version: {}", t.version);
}

pub fn print_task_list(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    for t in tasks {
        let assignee = t.assignee.as_deref().unwrap_or("");
        println!(
            "  [{}] {} ({}) {} {}",
            t.status.as_str(),
            t.title,
            short_id(&t.id),
            t.priority.as_str(),
            if assignee.is_empty() { String::new() } else { format!("@{assignee}") }
        );
    }
}

pub fn print_progress(p: &Progress) {
    println!("Progress: {}% done ({}/{})", p.completed_pct, p.done, p.total);
    println!(
        "  todo={} in_progress={} review={} done={} | {}% active, {}% remaining",
        p.todo, p.in_progress, p.review, p.done, p.in_progress_pct, p.remaining_pct
    );
}

pub fn print_board(s: &BoardSnapshot) {
    for column in &s.columns {
        let count = s.column_counts.get(&column.id).copied().unwrap_or(0);
        let limit = match column.effective_limit() {
            Some(limit) => format!("{count}/{limit}"),
            None => count.to_string(),
        };
        println!("{} [{}]", column.title, limit);
        for t in s.tasks.iter().filter(|t| t.column == column.id) {
            println!("  {} ({}) {}", t.title, short_id(&t.id), t.priority.as_str());
        }
    }
    println!();
    print_progress(&s.progress);
    if !s.members.is_empty() {
        println!();
        print_workloads(&s.members);
    }
}

pub fn print_workloads(workloads: &[Workload]) {
    for w in workloads {
        println!(
            "  {} {:.1}h / {:.1}h ({:.1}%){}",
            w.name,
            w.allocated_hours,
            w.capacity_hours,
            w.percent,
            if w.over_allocated { " OVER" } else { "" }
        );
    }
}

pub fn print_burndown(points: &[BurndownPoint]) {
    for p in points {
        println!(
            "  {}  remaining {:>7.1}h  ideal {:>7.1}h",
            p.date, p.remaining_hours, p.ideal_hours
        );
    }
}
