//! Whole-board persistence. A CLI command loads the store, applies one façade
//! operation and writes the store back inside a single `BEGIN IMMEDIATE` transaction,
//! so concurrent processes serialize on the database lock.

use std::collections::HashMap;

use rusqlite::{params, Connection};
use tracing::debug;

use crate::error::BoardError;
use crate::models::{Column, Task, TaskStatus, TeamMember};
use crate::store::EntityStore;

use super::{dependency_repo, task_repo};

/// Run `f` inside `BEGIN IMMEDIATE`; commit on success, roll back on error.
pub fn immediate_transaction<T>(
    conn: &Connection,
    f: impl FnOnce(&Connection) -> Result<T, BoardError>,
) -> Result<T, BoardError> {
    conn.execute_batch("BEGIN IMMEDIATE")?;
    match f(conn) {
        Ok(value) => {
            conn.execute_batch("COMMIT")?;
            Ok(value)
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(e)
        }
    }
}

pub fn is_initialized(conn: &Connection) -> Result<bool, BoardError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM board_columns", [], |row| row.get(0))?;
    Ok(count > 0)
}

pub fn list_columns(conn: &Connection) -> Result<Vec<Column>, BoardError> {
    let mut stmt = conn.prepare(
        "SELECT id, title, wip_limit, statuses, sort_order
         FROM board_columns ORDER BY sort_order ASC",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<i64>>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut columns = Vec::with_capacity(rows.len());
    for (id, title, wip_limit, statuses, order) in rows {
        let statuses: Vec<TaskStatus> = serde_json::from_str(&statuses)
            .map_err(|e| BoardError::database(format!("Column {id} has invalid statuses: {e}")))?;
        columns.push(Column {
            id,
            title,
            wip_limit: wip_limit.map(|l| l as usize),
            statuses,
            order: order as usize,
        });
    }
    Ok(columns)
}

pub fn list_members(conn: &Connection) -> Result<Vec<TeamMember>, BoardError> {
    let mut stmt =
        conn.prepare("SELECT id, name, role, capacity_hours FROM members ORDER BY rowid ASC")?;
    let members = stmt
        .query_map([], |row| {
            Ok(TeamMember {
                id: row.get(0)?,
                name: row.get(1)?,
                role: row.get(2)?,
                capacity_hours: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(members)
}

/// Read the whole board. An uninitialized database yields an empty store.
pub fn load_store(conn: &Connection) -> Result<EntityStore, BoardError> {
    let mut store = EntityStore::new();
    for column in list_columns(conn)? {
        store.put(column);
    }
    for member in list_members(conn)? {
        store.put(member);
    }

    let mut tasks = task_repo::list_tasks(conn)?;
    let index: HashMap<String, usize> = tasks
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id.clone(), i))
        .collect();
    for dep in dependency_repo::list_dependencies(conn)? {
        if let Some(&i) = index.get(&dep.task_id) {
            tasks[i].dependencies.insert(dep.dependency_id);
        }
    }
    for task in tasks {
        store.put(task);
    }
    debug!(tasks = store.count::<Task>(), "board loaded");
    Ok(store)
}

/// Replace the stored board with `store`. Call inside a transaction.
pub fn save_store(conn: &Connection, store: &EntityStore) -> Result<(), BoardError> {
    conn.execute("DELETE FROM task_dependencies", [])?;
    task_repo::delete_all_tasks(conn)?;
    conn.execute("DELETE FROM members", [])?;
    conn.execute("DELETE FROM board_columns", [])?;

    for column in store.columns() {
        let statuses = serde_json::to_string(&column.statuses)?;
        conn.execute(
            "INSERT INTO board_columns (id, title, wip_limit, statuses, sort_order)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                column.id,
                column.title,
                column.wip_limit.map(|l| l as i64),
                statuses,
                column.order as i64
            ],
        )?;
    }
    for member in store.members() {
        conn.execute(
            "INSERT INTO members (id, name, role, capacity_hours) VALUES (?1, ?2, ?3, ?4)",
            params![member.id, member.name, member.role, member.capacity_hours],
        )?;
    }
    for (seq, task) in store.tasks().enumerate() {
        task_repo::insert_task(conn, task, seq)?;
    }
    for task in store.tasks() {
        for dep in &task.dependencies {
            dependency_repo::add_dependency(conn, &task.id, dep)?;
        }
    }
    debug!(tasks = store.count::<Task>(), "board saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::config::BoardConfig;
    use crate::db::connection::open_in_memory;
    use crate::models::NewTask;

    #[test]
    fn test_saved_board_loads_back_identical() {
        let conn = open_in_memory().unwrap();
        let board = Board::init(
            &BoardConfig::default()
                .with_column("blocked", Some(2), &[TaskStatus::Todo])
                .with_member("ana", 32.0),
        )
        .unwrap();
        let a = board
            .create_task(NewTask::new("a").estimate(3.5).tag("infra").assignee("ana"))
            .unwrap();
        let b = board.create_task(NewTask::new("b").after(&a.id)).unwrap();
        board.move_task(&a.id, "in-progress", None).unwrap();

        let saved = board.store();
        immediate_transaction(&conn, |c| save_store(c, &saved)).unwrap();
        assert!(is_initialized(&conn).unwrap());

        let loaded = load_store(&conn).unwrap();
        assert_eq!(loaded.task(&a.id).unwrap(), saved.task(&a.id).unwrap());
        assert!(loaded.task(&b.id).unwrap().dependencies.contains(&a.id));
        assert_eq!(loaded.columns(), saved.columns());
        assert_eq!(loaded.member("ana").unwrap().capacity_hours, 32.0);
        Board::restore(loaded).unwrap();
    }

    #[test]
    fn test_failed_transaction_rolls_back() {
        let conn = open_in_memory().unwrap();
        let board = Board::init(&BoardConfig::default()).unwrap();
        let store = board.store();
        immediate_transaction(&conn, |c| save_store(c, &store)).unwrap();

        let err = immediate_transaction(&conn, |c| {
            c.execute("DELETE FROM board_columns", [])?;
            Err::<(), _>(BoardError::validation("abort"))
        })
        .unwrap_err();
        assert_eq!(err.message, "abort");
        assert!(is_initialized(&conn).unwrap());
    }

    #[test]
    fn test_empty_database_is_not_initialized() {
        let conn = open_in_memory().unwrap();
        assert!(!is_initialized(&conn).unwrap());
        assert_eq!(load_store(&conn).unwrap().count::<Task>(), 0);
    }
}
