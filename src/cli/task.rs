use serde_json::json;

use crate::aggregate::TaskFilter;
use crate::cli::commands::{DepCommands, TaskCommands};
use crate::cli::{finish, parse_priority, parse_status, with_board, with_board_mut, Context};
use crate::error::BoardError;
use crate::models::{NewTask, Task, TaskUpdate};
use crate::output;

pub fn run(cmd: TaskCommands, ctx: &Context) -> i32 {
    let result = match cmd {
        TaskCommands::Add {
            title,
            description,
            priority,
            assignee,
            estimate,
            spent,
            due,
            tag,
            after,
        } => parse_priority(&priority).and_then(|priority| {
            let new_task = NewTask {
                title,
                description: description.unwrap_or_default(),
                priority,
                assignee,
                estimate_hours: estimate,
                spent_hours: spent,
                due_date: due,
                dependencies: Vec::new(),
                tags: tag,
            };
            run_add(new_task, &after, ctx)
        }),
        TaskCommands::Update {
            id,
            title,
            description,
            priority,
            estimate,
            spent,
            due,
            clear_due,
            tag,
            expect_version,
        } => priority
            .as_deref()
            .map(parse_priority)
            .transpose()
            .and_then(|priority| {
                let update = TaskUpdate {
                    title,
                    description,
                    priority,
                    estimate_hours: estimate,
                    spent_hours: spent,
                    due_date: if clear_due { Some(None) } else { due.map(Some) },
                    tags: tag,
                };
                run_update(&id, update, expect_version, ctx)
            }),
        TaskCommands::Move {
            id,
            column,
            expect_version,
        } => run_move(&id, &column, expect_version, ctx),
        TaskCommands::Assign { id, member } => run_simple(&id, ctx, "Assigned", |board, task_id| {
            board.assign_task(task_id, &member)
        }),
        TaskCommands::Unassign { id } => {
            run_simple(&id, ctx, "Unassigned", |board, task_id| board.unassign_task(task_id))
        }
        TaskCommands::Show { id } => run_show(&id, ctx),
        TaskCommands::List {
            priority,
            assignee,
            status,
            tag,
            text,
        } => build_filter(&priority, assignee, &status, tag, text).and_then(|f| run_list(&f, ctx)),
        TaskCommands::Remove { id } => {
            run_simple(&id, ctx, "Removed", |board, task_id| board.remove_task(task_id))
        }
        TaskCommands::Archive { id } => {
            run_simple(&id, ctx, "Archived", |board, task_id| board.archive_task(task_id))
        }
        TaskCommands::Dep(dep_cmd) => run_dep(dep_cmd, ctx),
    };
    finish(result, ctx.json)
}

fn build_filter(
    priorities: &[String],
    assignees: Vec<String>,
    statuses: &[String],
    tags: Vec<String>,
    text: Option<String>,
) -> Result<TaskFilter, BoardError> {
    let mut filter = TaskFilter::new();
    for p in priorities {
        filter = filter.priority(parse_priority(p)?);
    }
    for s in statuses {
        filter = filter.status(parse_status(s)?);
    }
    for a in assignees {
        filter = filter.assignee(a);
    }
    for t in tags {
        filter = filter.tag(t);
    }
    if let Some(text) = text {
        filter = filter.text(text);
    }
    Ok(filter)
}

fn print_task_result(verb: &str, task: &Task, ctx: &Context) {
    if ctx.json {
        output::json::print(&output::json::success(json!({
            "task": output::json::task_summary(task)
        })));
    } else {
        println!("{verb} task: {} ({})", task.title, task.id);
    }
}

fn run_add(mut new_task: NewTask, after: &[String], ctx: &Context) -> Result<i32, BoardError> {
    let task = with_board_mut(ctx, |board| {
        for dep_ref in after {
            new_task.dependencies.push(board.resolve(dep_ref)?.id);
        }
        board.create_task(new_task)
    })?;
    print_task_result("Added", &task, ctx);
    Ok(0)
}

fn run_update(
    id: &str,
    update: TaskUpdate,
    expect_version: Option<u64>,
    ctx: &Context,
) -> Result<i32, BoardError> {
    let task = with_board_mut(ctx, |board| {
        let task = board.resolve(id)?;
        board.update_task(&task.id, update, expect_version)
    })?;
    print_task_result("Updated", &task, ctx);
    Ok(0)
}

/// Resolve a reference, then apply one façade operation to the task.
fn run_simple(
    id: &str,
    ctx: &Context,
    verb: &str,
    op: impl FnOnce(&crate::board::Board, &str) -> Result<Task, BoardError>,
) -> Result<i32, BoardError> {
    let task = with_board_mut(ctx, |board| {
        let task = board.resolve(id)?;
        op(board, &task.id)
    })?;
    print_task_result(verb, &task, ctx);
    Ok(0)
}

fn run_move(
    id: &str,
    column: &str,
    expect_version: Option<u64>,
    ctx: &Context,
) -> Result<i32, BoardError> {
    let (task, newly_ready) = with_board_mut(ctx, |board| {
        let task = board.resolve(id)?;
        let moved = board.move_task(&task.id, column, expect_version)?;
        let newly_ready = if moved.status.is_done() && !task.status.is_done() {
            board.newly_ready(&moved.id)?
        } else {
            Vec::new()
        };
        Ok((moved, newly_ready))
    })?;

    if ctx.json {
        let mut data = json!({ "task": output::json::task_summary(&task) });
        if !newly_ready.is_empty() {
            data["newly_ready"] = output::json::task_list(&newly_ready);
        }
        output::json::print(&output::json::success(data));
    } else {
        println!("Task {} → {} ({})", task.id, task.column, task.status.as_str());
        if !newly_ready.is_empty() {
            println!("Newly ready:");
            for t in &newly_ready {
                println!("  {} - {}", t.id, t.title);
            }
        }
    }
    Ok(0)
}

fn run_show(id: &str, ctx: &Context) -> Result<i32, BoardError> {
    let (task, blocking, deps) = with_board(ctx, |board| {
        let task = board.resolve(id)?;
        let blocking = board.blocking_dependencies(&task.id)?;
        let deps = task
            .dependencies
            .iter()
            .map(|d| board.task(d))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((task, blocking, deps))
    })?;

    if ctx.json {
        output::json::print(&output::json::success(json!({
            "task": output::json::task_detail(&task, &blocking),
            "dependencies": output::json::task_list(&deps)
        })));
    } else {
        output::text::print_task(&task, &blocking);
        if !deps.is_empty() {
            println!("\nDependencies:");
            for d in &deps {
                println!("  [{}] {} ({})", d.status.as_str(), d.title, d.id);
            }
        }
    }
    Ok(0)
}

fn run_list(filter: &TaskFilter, ctx: &Context) -> Result<i32, BoardError> {
    let (tasks, progress) = with_board(ctx, |board| {
        let tasks = board.query(filter);
        let progress = crate::aggregate::progress(&tasks);
        Ok((tasks, progress))
    })?;

    if ctx.json {
        output::json::print(&output::json::success(json!({
            "tasks": output::json::task_list(&tasks),
            "progress": output::json::progress_json(&progress)
        })));
    } else {
        output::text::print_task_list(&tasks);
    }
    Ok(0)
}

fn run_dep(cmd: DepCommands, ctx: &Context) -> Result<i32, BoardError> {
    match cmd {
        DepCommands::Add { id, dep_id } => {
            let (task_id, dependency_id) = with_board_mut(ctx, |board| {
                let task = board.resolve(&id)?;
                let dep = board.resolve(&dep_id)?;
                board.add_dependency(&task.id, &dep.id)?;
                Ok((task.id, dep.id))
            })?;
            if ctx.json {
                output::json::print(&output::json::success(json!({
                    "added": { "task_id": task_id, "dependency_id": dependency_id }
                })));
            } else {
                println!("Added dependency: {task_id} depends on {dependency_id}");
            }
        }
        DepCommands::Remove { id, dep_id } => {
            let (task_id, dependency_id) = with_board_mut(ctx, |board| {
                let task = board.resolve(&id)?;
                let dep = board.resolve(&dep_id)?;
                board.remove_dependency(&task.id, &dep.id)?;
                Ok((task.id, dep.id))
            })?;
            if ctx.json {
                output::json::print(&output::json::success(json!({
                    "removed": { "task_id": task_id, "dependency_id": dependency_id }
                })));
            } else {
                println!("Removed dependency: {task_id} no longer depends on {dependency_id}");
            }
        }
    }
    Ok(0)
}
