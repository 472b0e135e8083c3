use rusqlite::{params, Connection};

use crate::error::BoardError;
use crate::models::TaskDependency;

pub fn add_dependency(
    conn: &Connection,
    task_id: &str,
    dependency_id: &str,
) -> Result<(), BoardError> {
    conn.execute(
        "INSERT OR IGNORE INTO task_dependencies (task_id, dependency_id) VALUES (?1, ?2)",
        params![task_id, dependency_id],
    )?;
    Ok(())
}

/// Every dependency edge on the board.
pub fn list_dependencies(conn: &Connection) -> Result<Vec<TaskDependency>, BoardError> {
    let mut stmt = conn.prepare(
        "SELECT task_id, dependency_id FROM task_dependencies ORDER BY task_id, dependency_id",
    )?;
    let deps = stmt
        .query_map([], |row| {
            Ok(TaskDependency {
                task_id: row.get(0)?,
                dependency_id: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(deps)
}
