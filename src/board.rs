//! The command façade: the only way to change a board.
//!
//! Every mutation runs under one write guard and checks all of its preconditions
//! before it touches the store, so a failed command leaves the board exactly as it
//! was. Reads take a read guard and hand out owned copies.

use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregate::{self, BurndownPoint, Progress, TaskFilter, Workload};
use crate::config::BoardConfig;
use crate::error::BoardError;
use crate::graph::{self, cycle, ready, CriticalPath, DependencyGraph};
use crate::models::{Column, NewTask, Task, TaskStatus, TaskUpdate, TeamMember};
use crate::store::EntityStore;
use crate::workflow::{self, wip};

/// One consistent read of everything a dashboard renders.
#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot {
    pub columns: Vec<Column>,
    pub tasks: Vec<Task>,
    pub members: Vec<Workload>,
    pub progress: Progress,
    pub column_counts: IndexMap<String, usize>,
}

#[derive(Debug)]
pub struct Board {
    state: RwLock<EntityStore>,
}

fn check_hours(field: &str, hours: f64) -> Result<(), BoardError> {
    if hours.is_finite() && hours >= 0.0 {
        Ok(())
    } else {
        Err(BoardError::validation(format!(
            "{field} must be a non-negative number, got {hours}"
        )))
    }
}

fn check_title(title: &str) -> Result<String, BoardError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(BoardError::validation("Task title must not be empty"));
    }
    Ok(title.to_string())
}

fn normalize_tags<I: IntoIterator<Item = String>>(tags: I) -> BTreeSet<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn check_version(task: &Task, expected: Option<u64>) -> Result<(), BoardError> {
    match expected {
        Some(v) if v != task.version => Err(BoardError::stale_write(&task.id, v, task.version)),
        _ => Ok(()),
    }
}

fn ensure_not_archived(task: &Task) -> Result<(), BoardError> {
    if task.archived {
        return Err(BoardError::validation(format!("Task {} is archived", task.id)));
    }
    Ok(())
}

/// Check that a store loaded from elsewhere satisfies the board invariants.
fn validate_store(store: &EntityStore) -> Result<(), BoardError> {
    let Some(first) = store.first_column() else {
        return Err(BoardError::validation("Board has no columns"));
    };
    if !first.accepts(TaskStatus::Todo) {
        return Err(BoardError::validation(format!(
            "First column {} must accept the todo status",
            first.id
        )));
    }
    for task in store.tasks() {
        let column = store.column(&task.column)?;
        if !column.accepts(task.status) {
            return Err(BoardError::validation(format!(
                "Task {} has status {} which column {} does not accept",
                task.id,
                task.status.as_str(),
                column.id
            )));
        }
        if let Some(ref member) = task.assignee {
            store.member(member)?;
        }
        for dep in &task.dependencies {
            store.task(dep)?;
        }
    }
    for column in store.columns() {
        if let Some(limit) = column.effective_limit() {
            let held = wip::occupancy(store, &column.id);
            if held > limit {
                return Err(BoardError::wip_limit_exceeded(&column.id, limit));
            }
        }
    }
    cycle::detect_cycle(&DependencyGraph::from_store(store))
}

impl Board {
    /// Create an empty board from its configuration.
    pub fn init(config: &BoardConfig) -> Result<Self, BoardError> {
        config.validate()?;
        let mut store = EntityStore::new();
        for column in config.to_columns() {
            store.put(column);
        }
        for member in config.to_members() {
            store.put(member);
        }
        info!(
            columns = config.columns.len(),
            members = config.members.len(),
            "board initialized"
        );
        Ok(Self {
            state: RwLock::new(store),
        })
    }

    /// Wrap a previously saved store after re-checking every invariant.
    pub fn restore(store: EntityStore) -> Result<Self, BoardError> {
        validate_store(&store)?;
        debug!(tasks = store.count::<Task>(), "board restored");
        Ok(Self {
            state: RwLock::new(store),
        })
    }

    /// A copy of the current store, e.g. for persistence.
    pub fn store(&self) -> EntityStore {
        self.state.read().clone()
    }

    fn mutate<T>(
        &self,
        command: &'static str,
        op: impl FnOnce(&mut EntityStore) -> Result<T, BoardError>,
    ) -> Result<T, BoardError> {
        let mut store = self.state.write();
        let result = op(&mut *store);
        if let Err(ref e) = result {
            warn!(command, code = e.code.as_str(), "{}", e.message);
        }
        result
    }

    pub fn create_task(&self, input: NewTask) -> Result<Task, BoardError> {
        self.mutate("create_task", |store| {
            let title = check_title(&input.title)?;
            check_hours("estimate_hours", input.estimate_hours)?;
            check_hours("spent_hours", input.spent_hours)?;
            if let Some(ref member) = input.assignee {
                store.member(member)?;
            }
            for dep in &input.dependencies {
                store.task(dep)?;
            }
            let column = store
                .first_column()
                .map(|c| c.id.clone())
                .ok_or_else(|| BoardError::validation("Board has no columns"))?;
            wip::ensure_can_enter(store, &column)?;

            let now = Utc::now();
            let task = Task {
                id: ulid::Ulid::new().to_string(),
                title,
                description: input.description,
                priority: input.priority,
                status: TaskStatus::Todo,
                column,
                assignee: input.assignee,
                estimate_hours: input.estimate_hours,
                spent_hours: input.spent_hours,
                due_date: input.due_date,
                dependencies: input.dependencies.into_iter().collect(),
                tags: normalize_tags(input.tags),
                archived: false,
                version: 1,
                created_at: now,
                updated_at: now,
                started_at: None,
                completed_at: None,
            };
            store.put(task.clone());
            info!(task_id = %task.id, column = %task.column, "task created");
            Ok(task)
        })
    }

    pub fn update_task(
        &self,
        id: &str,
        update: TaskUpdate,
        expected_version: Option<u64>,
    ) -> Result<Task, BoardError> {
        self.mutate("update_task", |store| {
            let task = store.task(id)?;
            ensure_not_archived(task)?;
            check_version(task, expected_version)?;
            if update.is_empty() {
                return Ok(task.clone());
            }

            let mut next = task.clone();
            if let Some(ref title) = update.title {
                next.title = check_title(title)?;
            }
            if let Some(hours) = update.estimate_hours {
                check_hours("estimate_hours", hours)?;
                next.estimate_hours = hours;
            }
            if let Some(hours) = update.spent_hours {
                check_hours("spent_hours", hours)?;
                next.spent_hours = hours;
            }
            if let Some(description) = update.description {
                next.description = description;
            }
            if let Some(priority) = update.priority {
                next.priority = priority;
            }
            if let Some(due) = update.due_date {
                next.due_date = due;
            }
            if let Some(tags) = update.tags {
                next.tags = normalize_tags(tags);
            }
            next.touch(Utc::now());
            store.put(next.clone());
            info!(task_id = %id, version = next.version, "task updated");
            Ok(next)
        })
    }

    /// Move a task to another column, changing its status as the column requires.
    pub fn move_task(
        &self,
        id: &str,
        column_id: &str,
        expected_version: Option<u64>,
    ) -> Result<Task, BoardError> {
        self.mutate("move_task", |store| {
            let task = store.task(id)?;
            if task.archived {
                return Err(BoardError::illegal_transition("archived", column_id));
            }
            check_version(task, expected_version)?;
            let column = store.column(column_id)?;
            if task.column == column.id {
                return Ok(task.clone());
            }

            let target = workflow::resolve_target_status(task.status, column)?;
            if target != task.status {
                workflow::validate_transition(task.status, target)?;
            }
            wip::ensure_can_enter(store, column_id)?;
            if target.is_done() {
                let blocking = ready::blocking_dependencies(store, id)?;
                if !blocking.is_empty() {
                    return Err(BoardError::blocked_by_dependency(id, blocking));
                }
            }

            let now = Utc::now();
            let mut next = task.clone();
            let from = next.status;
            next.status = target;
            next.column = column_id.to_string();
            if target == TaskStatus::InProgress && next.started_at.is_none() {
                next.started_at = Some(now);
            }
            if target.is_done() {
                next.completed_at = Some(now);
            } else if from.is_done() {
                next.completed_at = None;
            }
            next.touch(now);
            store.put(next.clone());
            info!(
                task_id = %id,
                column = %column_id,
                from = from.as_str(),
                to = target.as_str(),
                "task moved"
            );
            Ok(next)
        })
    }

    pub fn assign_task(&self, id: &str, member_id: &str) -> Result<Task, BoardError> {
        self.mutate("assign_task", |store| {
            let task = store.task(id)?;
            ensure_not_archived(task)?;
            store.member(member_id)?;
            if task.assignee.as_deref() == Some(member_id) {
                return Ok(task.clone());
            }
            let mut next = task.clone();
            next.assignee = Some(member_id.to_string());
            next.touch(Utc::now());
            store.put(next.clone());
            info!(task_id = %id, member = %member_id, "task assigned");
            Ok(next)
        })
    }

    pub fn unassign_task(&self, id: &str) -> Result<Task, BoardError> {
        self.mutate("unassign_task", |store| {
            let task = store.task(id)?;
            ensure_not_archived(task)?;
            if task.assignee.is_none() {
                return Ok(task.clone());
            }
            let mut next = task.clone();
            next.assignee = None;
            next.touch(Utc::now());
            store.put(next.clone());
            info!(task_id = %id, "task unassigned");
            Ok(next)
        })
    }

    /// Record that `id` cannot complete before `depends_on_id`.
    pub fn add_dependency(&self, id: &str, depends_on_id: &str) -> Result<(), BoardError> {
        self.mutate("add_dependency", |store| {
            let task = store.task(id)?;
            store.task(depends_on_id)?;
            ensure_not_archived(task)?;
            if task.dependencies.contains(depends_on_id) {
                return Ok(());
            }
            cycle::would_create_cycle(&DependencyGraph::from_store(store), id, depends_on_id)?;

            let mut next = task.clone();
            next.dependencies.insert(depends_on_id.to_string());
            next.touch(Utc::now());
            store.put(next);
            info!(task_id = %id, dependency_id = %depends_on_id, "dependency added");
            Ok(())
        })
    }

    pub fn remove_dependency(&self, id: &str, depends_on_id: &str) -> Result<(), BoardError> {
        self.mutate("remove_dependency", |store| {
            let task = store.task(id)?;
            ensure_not_archived(task)?;
            if !task.dependencies.contains(depends_on_id) {
                return Err(BoardError::validation(format!(
                    "Task {id} does not depend on {depends_on_id}"
                )));
            }
            let mut next = task.clone();
            next.dependencies.remove(depends_on_id);
            next.touch(Utc::now());
            store.put(next);
            info!(task_id = %id, dependency_id = %depends_on_id, "dependency removed");
            Ok(())
        })
    }

    /// Delete a task nobody in flight depends on. Finished dependents forget the edge;
    /// archived dependents are frozen, so they keep the task in place.
    pub fn remove_task(&self, id: &str) -> Result<Task, BoardError> {
        self.mutate("remove_task", |store| {
            let archived: Vec<String> = store
                .tasks()
                .filter(|t| t.archived && t.dependencies.contains(id))
                .map(|t| t.id.clone())
                .collect();
            if !archived.is_empty() {
                return Err(BoardError::archived_dependents(id, archived));
            }
            let removed = store.delete::<Task>(id)?;
            let now = Utc::now();
            let dependents: Vec<Task> = store
                .tasks()
                .filter(|t| t.dependencies.contains(id))
                .cloned()
                .collect();
            for mut dependent in dependents {
                dependent.dependencies.remove(id);
                dependent.touch(now);
                store.put(dependent);
            }
            info!(task_id = %id, "task removed");
            Ok(removed)
        })
    }

    /// Freeze a finished task and take it off the board views.
    pub fn archive_task(&self, id: &str) -> Result<Task, BoardError> {
        self.mutate("archive_task", |store| {
            let task = store.task(id)?;
            ensure_not_archived(task)?;
            if !task.status.is_done() {
                return Err(BoardError::validation(format!(
                    "Only done tasks can be archived; {id} is {}",
                    task.status.as_str()
                )));
            }
            let dependents = store.open_dependents(id);
            if !dependents.is_empty() {
                return Err(BoardError::referential_integrity(id, dependents));
            }
            let mut next = task.clone();
            next.archived = true;
            next.touch(Utc::now());
            store.put(next.clone());
            info!(task_id = %id, "task archived");
            Ok(next)
        })
    }

    pub fn task(&self, id: &str) -> Result<Task, BoardError> {
        self.state.read().task(id).cloned()
    }

    /// Resolve a task by exact id, then by unique id prefix.
    pub fn resolve(&self, reference: &str) -> Result<Task, BoardError> {
        let store = self.state.read();
        if let Ok(task) = store.task(reference) {
            return Ok(task.clone());
        }
        let matches: Vec<&Task> = store
            .tasks()
            .filter(|t| t.id.starts_with(reference))
            .collect();
        match matches.as_slice() {
            [] => Err(BoardError::unknown_task(reference)),
            [task] => Ok((*task).clone()),
            _ => {
                let candidates: Vec<String> = matches
                    .iter()
                    .map(|t| format!("{} ({})", t.title, t.id))
                    .collect();
                Err(BoardError::ambiguous_ref(reference, &candidates))
            }
        }
    }

    pub fn query(&self, predicate: &TaskFilter) -> Vec<Task> {
        let store = self.state.read();
        let tasks: Vec<Task> = aggregate::filter(store.active_tasks(), predicate)
            .into_iter()
            .cloned()
            .collect();
        debug!(matched = tasks.len(), "query");
        tasks
    }

    pub fn board_snapshot(&self) -> BoardSnapshot {
        let store = self.state.read();
        let columns: Vec<Column> = store.columns().into_iter().cloned().collect();
        let tasks: Vec<Task> = store.active_tasks().cloned().collect();
        let members = store
            .members()
            .map(|m| aggregate::workload(m, &tasks))
            .collect();
        BoardSnapshot {
            progress: aggregate::progress(&tasks),
            column_counts: aggregate::column_counts(&columns, &tasks),
            columns,
            members,
            tasks,
        }
    }

    pub fn is_ready(&self, id: &str) -> Result<bool, BoardError> {
        ready::is_ready(&self.state.read(), id)
    }

    pub fn blocking_dependencies(&self, id: &str) -> Result<Vec<String>, BoardError> {
        ready::blocking_dependencies(&self.state.read(), id)
    }

    pub fn ready_to_start(&self) -> Vec<Task> {
        let store = self.state.read();
        ready::ready_to_start(&store).into_iter().cloned().collect()
    }

    pub fn newly_ready(&self, completed_id: &str) -> Result<Vec<Task>, BoardError> {
        let store = self.state.read();
        Ok(ready::newly_ready(&store, completed_id)?
            .into_iter()
            .cloned()
            .collect())
    }

    /// Dependencies-first order of `task_ids`, or of every board task when `None`.
    pub fn topological_order(
        &self,
        task_ids: Option<&[String]>,
    ) -> Result<Vec<String>, BoardError> {
        let store = self.state.read();
        let deps = DependencyGraph::from_store(&store);
        let ids: Vec<String> = match task_ids {
            Some(ids) => ids.to_vec(),
            None => store.active_tasks().map(|t| t.id.clone()).collect(),
        };
        Ok(graph::topological_order(&deps, &ids)?.collect())
    }

    pub fn critical_path(&self) -> CriticalPath {
        graph::critical_path(&self.state.read())
    }

    pub fn workload(&self, member_id: &str) -> Result<Workload, BoardError> {
        let store = self.state.read();
        let member = store.member(member_id)?;
        Ok(aggregate::workload(member, store.active_tasks()))
    }

    pub fn workloads(&self) -> Vec<Workload> {
        let store = self.state.read();
        store
            .members()
            .map(|m| aggregate::workload(m, store.active_tasks()))
            .collect()
    }

    pub fn members(&self) -> Vec<TeamMember> {
        self.state.read().members().cloned().collect()
    }

    /// Burndown over every task on the board, archived ones included.
    pub fn burndown(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<BurndownPoint>, BoardError> {
        aggregate::burndown(self.state.read().tasks(), from, to)
    }

    pub fn overdue(&self, today: NaiveDate) -> Vec<Task> {
        let store = self.state.read();
        aggregate::overdue(store.active_tasks(), today)
            .into_iter()
            .cloned()
            .collect()
    }
}
