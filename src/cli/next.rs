use serde_json::{json, Value};

use crate::aggregate::TaskFilter;
use crate::board::Board;
use crate::cli::{finish, with_board, Context};
use crate::error::BoardError;
use crate::models::{Task, TaskStatus};
use crate::output;

pub fn run(ctx: &Context) -> i32 {
    finish(run_inner(ctx), ctx.json)
}

struct NextView {
    ready: Vec<Task>,
    in_flight: Vec<Task>,
    blocked: Vec<(Task, Vec<String>)>,
}

fn collect(board: &Board) -> Result<NextView, BoardError> {
    let ready = board.ready_to_start();
    let in_flight = board.query(
        &TaskFilter::new()
            .status(TaskStatus::InProgress)
            .status(TaskStatus::Review),
    );
    let mut blocked = Vec::new();
    for task in board.query(&TaskFilter::new().status(TaskStatus::Todo)) {
        let blocking = board.blocking_dependencies(&task.id)?;
        if !blocking.is_empty() {
            blocked.push((task, blocking));
        }
    }
    Ok(NextView {
        ready,
        in_flight,
        blocked,
    })
}

fn run_inner(ctx: &Context) -> Result<i32, BoardError> {
    let view = with_board(ctx, collect)?;
    let in_flight_json = output::json::task_list(&view.in_flight);

    if let Some(task) = view.ready.first() {
        if ctx.json {
            output::json::print(&output::json::success(json!({
                "task": output::json::task_summary(task),
                "ready_count": view.ready.len(),
                "in_progress": in_flight_json
            })));
        } else {
            println!("Next task: {} ({})", task.title, task.id);
            if !task.description.is_empty() {
                println!("  {}", task.description);
            }
            println!("  Priority: {}", task.priority.as_str());
            if let Some(due) = task.due_date {
                println!("  Due: {due}");
            }
        }
        return Ok(0);
    }

    if view.blocked.is_empty() && view.in_flight.is_empty() {
        if ctx.json {
            output::json::print(&output::json::success(json!({
                "task": null,
                "reason": "NOTHING_OPEN"
            })));
        } else {
            println!("Nothing left to start. All tasks are done.");
        }
        return Ok(0);
    }

    let reason = if view.blocked.is_empty() {
        "ALL_IN_PROGRESS"
    } else {
        "BLOCKED_REMAINING"
    };
    if ctx.json {
        let blocked: Vec<Value> = view
            .blocked
            .iter()
            .map(|(t, blocking)| {
                json!({
                    "id": t.id,
                    "title": t.title,
                    "blocked_by": blocking
                })
            })
            .collect();
        output::json::print(&output::json::success(json!({
            "task": null,
            "reason": reason,
            "blocked_tasks": blocked,
            "in_progress": in_flight_json
        })));
    } else {
        println!(
            "No ready tasks. {} blocked, {} in progress.",
            view.blocked.len(),
            view.in_flight.len()
        );
        for (t, blocking) in &view.blocked {
            println!("  {} - {} (waiting on {})", t.id, t.title, blocking.join(", "));
        }
    }
    Ok(2)
}
