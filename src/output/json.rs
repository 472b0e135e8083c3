use serde_json::{json, Value};

use crate::aggregate::{BurndownPoint, Progress, Workload};
use crate::board::BoardSnapshot;
use crate::error::BoardError;
use crate::models::{Column, Task};

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &BoardError) -> Value {
    let mut body = json!({
        "code": err.code.as_str(),
        "message": err.message
    });
    if !err.task_ids.is_empty() {
        body["task_ids"] = json!(err.task_ids);
    }
    if err.code.is_retryable() {
        body["retryable"] = json!(true);
    }
    json!({
        "success": false,
        "error": body
    })
}

/// Pretty-print an envelope on stdout.
pub fn print(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Error: failed to render JSON: {e}"),
    }
}

pub fn task_summary(t: &Task) -> Value {
    let mut v = json!({
        "id": t.id,
        "title": t.title,
        "status": t.status.as_str(),
        "column": t.column,
        "priority": t.priority.as_str(),
        "version": t.version
    });
    if let Some(ref assignee) = t.assignee {
        v["assignee"] = json!(assignee);
    }
    v
}

pub fn task_detail(t: &Task, blocking: &[String]) -> Value {
    let mut v = json!(t);
    v["ready"] = json!(blocking.is_empty());
    v["blocked_by"] = json!(blocking);
    v
}

pub fn task_list(tasks: &[Task]) -> Value {
    Value::Array(tasks.iter().map(task_summary).collect())
}

pub fn progress_json(p: &Progress) -> Value {
    json!(p)
}

pub fn column_json(c: &Column, count: usize) -> Value {
    json!({
        "id": c.id,
        "title": c.title,
        "statuses": c.statuses,
        "wip_limit": c.effective_limit(),
        "count": count
    })
}

pub fn snapshot_json(s: &BoardSnapshot) -> Value {
    let columns: Vec<Value> = s
        .columns
        .iter()
        .map(|c| column_json(c, s.column_counts.get(&c.id).copied().unwrap_or(0)))
        .collect();
    json!({
        "columns": columns,
        "tasks": task_list(&s.tasks),
        "members": s.members.iter().map(workload_json).collect::<Vec<_>>(),
        "progress": progress_json(&s.progress)
    })
}

pub fn workload_json(w: &Workload) -> Value {
    json!({
        "member_id": w.member_id,
        "name": w.name,
        "capacity_hours": w.capacity_hours,
        "allocated_hours": w.allocated_hours,
        "open_tasks": w.open_tasks,
        "percent": (w.percent * 10.0).round() / 10.0,
        "display_pct": (w.display_pct * 10.0).round() / 10.0,
        "over_allocated": w.over_allocated
    })
}

pub fn burndown_json(points: &[BurndownPoint]) -> Value {
    json!(points)
}
