use chrono::Utc;

use crate::cli::{finish, with_board, Context};
use crate::error::BoardError;
use crate::output;

pub fn run(ctx: &Context) -> i32 {
    finish(run_inner(ctx), ctx.json)
}

fn run_inner(ctx: &Context) -> Result<i32, BoardError> {
    let today = Utc::now().date_naive();
    let (snapshot, overdue) =
        with_board(ctx, |board| Ok((board.board_snapshot(), board.overdue(today))))?;

    if ctx.json {
        let mut data = output::json::snapshot_json(&snapshot);
        data["overdue"] = output::json::task_list(&overdue);
        output::json::print(&output::json::success(data));
    } else {
        output::text::print_board(&snapshot);
        if !overdue.is_empty() {
            println!("\nOverdue:");
            output::text::print_task_list(&overdue);
        }
        if snapshot.progress.total > 0 && snapshot.progress.done == snapshot.progress.total {
            println!("\nAll tasks done!");
        }
    }
    Ok(0)
}
