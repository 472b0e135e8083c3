use std::collections::HashMap;

use serde_json::json;

use crate::cli::{finish, with_board, Context};
use crate::error::BoardError;
use crate::models::Task;
use crate::output;

pub fn run(ctx: &Context) -> i32 {
    finish(run_inner(ctx), ctx.json)
}

fn run_inner(ctx: &Context) -> Result<i32, BoardError> {
    let (ordered, path) = with_board(ctx, |board| {
        let ordered = board
            .topological_order(None)?
            .iter()
            .map(|id| board.task(id))
            .collect::<Result<Vec<Task>, _>>()?;
        Ok((ordered, board.critical_path()))
    })?;

    if ctx.json {
        output::json::print(&output::json::success(json!({
            "order": output::json::task_list(&ordered),
            "critical_path": path
        })));
    } else {
        if ordered.is_empty() {
            println!("No tasks found.");
            return Ok(0);
        }
        for (i, t) in ordered.iter().enumerate() {
            println!("{:>3}. [{}] {} ({})", i + 1, t.status.as_str(), t.title, t.id);
        }
        if !path.task_ids.is_empty() {
            let titles: HashMap<&str, &str> = ordered
                .iter()
                .map(|t| (t.id.as_str(), t.title.as_str()))
                .collect();
            let chain: Vec<&str> = path
                .task_ids
                .iter()
                .map(|id| titles.get(id.as_str()).copied().unwrap_or(id.as_str()))
                .collect();
            println!("\nCritical path ({:.1}h): {}", path.total_hours, chain.join(" → "));
        }
    }
    Ok(0)
}
