use std::collections::BTreeSet;

use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use crate::error::BoardError;
use crate::models::{Priority, Task, TaskStatus};

const TASK_COLUMNS: &str = "id, title, description, priority, status, column_id, assignee,
    estimate_hours, spent_hours, due_date, tags, archived, version,
    created_at, updated_at, started_at, completed_at";

/// Insert one task row. `seq` keeps the board's insertion order across reloads.
/// Dependencies are stored separately, see [`super::dependency_repo`].
pub fn insert_task(conn: &Connection, task: &Task, seq: usize) -> Result<(), BoardError> {
    let tags = serde_json::to_string(&task.tags)?;
    conn.execute(
        "INSERT INTO tasks (id, seq, title, description, priority, status, column_id, assignee,
                            estimate_hours, spent_hours, due_date, tags, archived, version,
                            created_at, updated_at, started_at, completed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
        params![
            task.id,
            seq as i64,
            task.title,
            task.description,
            task.priority.as_str(),
            task.status.as_str(),
            task.column,
            task.assignee,
            task.estimate_hours,
            task.spent_hours,
            task.due_date,
            tags,
            task.archived,
            task.version as i64,
            task.created_at,
            task.updated_at,
            task.started_at,
            task.completed_at,
        ],
    )?;
    Ok(())
}

/// All tasks in insertion order, with empty dependency sets.
pub fn list_tasks(conn: &Connection) -> Result<Vec<Task>, BoardError> {
    let mut stmt = conn.prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY seq ASC"))?;
    let tasks = stmt
        .query_map([], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

pub fn delete_all_tasks(conn: &Connection) -> Result<usize, BoardError> {
    Ok(conn.execute("DELETE FROM tasks", [])?)
}

fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

fn parse_text<T>(row: &Row, idx: usize, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse(&raw).ok_or_else(|| conversion_error(idx, format!("unexpected value '{raw}'")))
}

fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
    let tags_raw: String = row.get(10)?;
    let tags: BTreeSet<String> = serde_json::from_str(&tags_raw)
        .map_err(|e| conversion_error(10, format!("invalid tags: {e}")))?;
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        priority: parse_text(row, 3, Priority::from_str)?,
        status: parse_text(row, 4, TaskStatus::from_str)?,
        column: row.get(5)?,
        assignee: row.get(6)?,
        estimate_hours: row.get(7)?,
        spent_hours: row.get(8)?,
        due_date: row.get(9)?,
        dependencies: BTreeSet::new(),
        tags,
        archived: row.get(11)?,
        version: row.get::<_, i64>(12)? as u64,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
        started_at: row.get(15)?,
        completed_at: row.get(16)?,
    })
}
