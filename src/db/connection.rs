use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::debug;

use crate::error::BoardError;

use super::migrations;

pub const BOARD_DIR: &str = ".taskboard";
pub const DB_FILE: &str = "board.db";

/// Find the directory holding `.taskboard` by walking up from the current directory.
pub fn find_board_root() -> Result<PathBuf, BoardError> {
    let mut dir = env::current_dir().map_err(|e| BoardError::database(e.to_string()))?;
    loop {
        if dir.join(BOARD_DIR).is_dir() {
            return Ok(dir);
        }
        if !dir.pop() {
            return Err(BoardError::not_initialized());
        }
    }
}

/// Path of an existing board database: the override if given, else the discovered one.
pub fn db_path(db_override: Option<&Path>) -> Result<PathBuf, BoardError> {
    match db_override {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(find_board_root()?.join(BOARD_DIR).join(DB_FILE)),
    }
}

/// Open a connection to the database. Returns error if not initialized.
pub fn open_db(db_override: Option<&Path>) -> Result<Connection, BoardError> {
    let path = db_path(db_override)?;
    if !path.exists() {
        return Err(BoardError::not_initialized());
    }
    debug!(path = %path.display(), "opening board database");
    let conn = Connection::open(&path)?;
    configure_connection(&conn)?;
    Ok(conn)
}

/// Create the database file and schema. Without an override the board lives in
/// `.taskboard/` under the current directory.
pub fn init_db(db_override: Option<&Path>) -> Result<(Connection, PathBuf), BoardError> {
    let path = match db_override {
        Some(path) => path.to_path_buf(),
        None => env::current_dir()
            .map_err(|e| BoardError::database(e.to_string()))?
            .join(BOARD_DIR)
            .join(DB_FILE),
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BoardError::database(e.to_string()))?;
    }
    let conn = Connection::open(&path)?;
    configure_connection(&conn)?;
    migrations::run_migrations(&conn)?;
    Ok((conn, path))
}

fn configure_connection(conn: &Connection) -> Result<(), BoardError> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout=5000;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}

/// Open an in-memory database with the schema applied.
pub fn open_in_memory() -> Result<Connection, BoardError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}
