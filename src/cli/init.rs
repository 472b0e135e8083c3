use std::fs;
use std::path::Path;

use serde_json::json;
use tracing::info;

use crate::board::Board;
use crate::cli::{finish, Context};
use crate::config::BoardConfig;
use crate::db::{board_repo, connection};
use crate::error::BoardError;
use crate::output;

pub fn run(config: Option<&Path>, ctx: &Context) -> i32 {
    finish(run_inner(config, ctx), ctx.json)
}

fn read_config(path: &Path) -> Result<BoardConfig, BoardError> {
    let raw = fs::read_to_string(path).map_err(|e| {
        BoardError::validation(format!("Cannot read config {}: {e}", path.display()))
    })?;
    BoardConfig::from_json(&raw)
}

fn run_inner(config: Option<&Path>, ctx: &Context) -> Result<i32, BoardError> {
    // A bad config must not leave a database behind.
    let config = match config {
        Some(path) => read_config(path)?,
        None => BoardConfig::default(),
    };
    let board = Board::init(&config)?;

    let (conn, path) = connection::init_db(ctx.db.as_deref())?;
    let created = board_repo::immediate_transaction(&conn, |conn| {
        if board_repo::is_initialized(conn)? {
            return Ok(false);
        }
        board_repo::save_store(conn, &board.store())?;
        Ok(true)
    })?;
    if created {
        info!(path = %path.display(), "board created");
    }

    if ctx.json {
        output::json::print(&output::json::success(json!({
            "path": path.to_string_lossy(),
            "created": created
        })));
    } else if created {
        println!("Initialized taskboard at {}", path.display());
    } else {
        println!("taskboard already initialized at {}", path.display());
    }
    Ok(0)
}
