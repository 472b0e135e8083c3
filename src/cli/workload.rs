use serde_json::{json, Value};

use crate::cli::{finish, with_board, Context};
use crate::error::BoardError;
use crate::output;

pub fn run(member: Option<&str>, ctx: &Context) -> i32 {
    finish(run_inner(member, ctx), ctx.json)
}

fn run_inner(member: Option<&str>, ctx: &Context) -> Result<i32, BoardError> {
    let workloads = with_board(ctx, |board| match member {
        Some(id) => Ok(vec![board.workload(id)?]),
        None => Ok(board.workloads()),
    })?;

    if ctx.json {
        let members: Vec<Value> = workloads.iter().map(output::json::workload_json).collect();
        output::json::print(&output::json::success(json!({ "members": members })));
    } else if workloads.is_empty() {
        println!("No team members configured.");
    } else {
        output::text::print_workloads(&workloads);
    }
    Ok(0)
}
