use chrono::NaiveDate;
use serde_json::json;

use crate::cli::{finish, with_board, Context};
use crate::error::BoardError;
use crate::output;

pub fn run(from: NaiveDate, to: NaiveDate, ctx: &Context) -> i32 {
    finish(run_inner(from, to, ctx), ctx.json)
}

fn run_inner(from: NaiveDate, to: NaiveDate, ctx: &Context) -> Result<i32, BoardError> {
    let points = with_board(ctx, |board| board.burndown(from, to))?;

    if ctx.json {
        output::json::print(&output::json::success(json!({
            "from": from,
            "to": to,
            "points": output::json::burndown_json(&points)
        })));
    } else {
        println!("Burndown {from} .. {to}");
        output::text::print_burndown(&points);
    }
    Ok(0)
}
