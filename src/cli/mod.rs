pub mod burndown;
pub mod commands;
pub mod init;
pub mod next;
pub mod order;
pub mod status;
pub mod task;
pub mod workload;

pub use commands::*;

use std::path::PathBuf;

use rusqlite::Connection;

use crate::board::Board;
use crate::db::{board_repo, connection};
use crate::error::BoardError;
use crate::models::{Priority, TaskStatus};
use crate::output;

/// Global flags every command sees.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub json: bool,
    pub db: Option<PathBuf>,
}

/// Turn a command result into an exit code, reporting the error on the way.
pub fn finish(result: Result<i32, BoardError>, json_output: bool) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            if json_output {
                output::json::print(&output::json::error(&e));
            } else {
                eprintln!("Error: {}", e.message);
                if !e.task_ids.is_empty() {
                    eprintln!("  Tasks: {}", e.task_ids.join(", "));
                }
            }
            1
        }
    }
}

fn load_board(conn: &Connection) -> Result<Board, BoardError> {
    if !board_repo::is_initialized(conn)? {
        return Err(BoardError::not_initialized());
    }
    Board::restore(board_repo::load_store(conn)?)
}

/// Run a read-only command against the stored board.
pub fn with_board<T>(
    ctx: &Context,
    f: impl FnOnce(&Board) -> Result<T, BoardError>,
) -> Result<T, BoardError> {
    let conn = connection::open_db(ctx.db.as_deref())?;
    let board = load_board(&conn)?;
    f(&board)
}

/// Run a mutating command: load, apply and save under one immediate transaction.
/// If `f` fails nothing is written.
pub fn with_board_mut<T>(
    ctx: &Context,
    f: impl FnOnce(&Board) -> Result<T, BoardError>,
) -> Result<T, BoardError> {
    let conn = connection::open_db(ctx.db.as_deref())?;
    board_repo::immediate_transaction(&conn, |conn| {
        let board = load_board(conn)?;
        let value = f(&board)?;
        board_repo::save_store(conn, &board.store())?;
        Ok(value)
    })
}

pub fn parse_priority(s: &str) -> Result<Priority, BoardError> {
    Priority::from_str(&s.to_lowercase()).ok_or_else(|| {
        BoardError::validation(format!(
            "Invalid priority '{s}'. Expected low, medium, high or critical"
        ))
    })
}

pub fn parse_status(s: &str) -> Result<TaskStatus, BoardError> {
    TaskStatus::from_str(&s.to_lowercase()).ok_or_else(|| {
        BoardError::validation(format!(
            "Invalid status '{s}'. Expected todo, in-progress, review or done"
        ))
    })
}
