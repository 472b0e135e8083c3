use rusqlite::Connection;

use crate::error::BoardError;

pub fn run_migrations(conn: &Connection) -> Result<(), BoardError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS board_columns (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            wip_limit INTEGER CHECK (wip_limit IS NULL OR wip_limit > 0),
            statuses TEXT NOT NULL,
            sort_order INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS members (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT '',
            capacity_hours REAL NOT NULL CHECK (capacity_hours > 0)
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            seq INTEGER NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            priority TEXT NOT NULL DEFAULT 'medium'
                CHECK (priority IN ('low', 'medium', 'high', 'critical')),
            status TEXT NOT NULL DEFAULT 'todo'
                CHECK (status IN ('todo', 'in-progress', 'review', 'done')),
            column_id TEXT NOT NULL REFERENCES board_columns(id),
            assignee TEXT REFERENCES members(id),
            estimate_hours REAL NOT NULL DEFAULT 0 CHECK (estimate_hours >= 0),
            spent_hours REAL NOT NULL DEFAULT 0 CHECK (spent_hours >= 0),
            due_date TEXT,
            tags TEXT NOT NULL DEFAULT '[]',
            archived INTEGER NOT NULL DEFAULT 0,
            version INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            started_at TEXT,
            completed_at TEXT
        );

        CREATE TABLE IF NOT EXISTS task_dependencies (
            task_id TEXT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
            dependency_id TEXT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
            PRIMARY KEY (task_id, dependency_id),
            CHECK (task_id != dependency_id)
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_column ON tasks(column_id);
        CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status, priority);
        CREATE INDEX IF NOT EXISTS idx_deps_task ON task_dependencies(task_id);
        CREATE INDEX IF NOT EXISTS idx_deps_dep ON task_dependencies(dependency_id);
        ",
    )?;
    Ok(())
}
