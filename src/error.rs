use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ValidationError,
    UnknownTask,
    UnknownMember,
    UnknownColumn,
    IllegalTransition,
    WipLimitExceeded,
    BlockedByDependency,
    CycleDetected,
    ReferentialIntegrity,
    StaleWrite,
    NotInitialized,
    AmbiguousRef,
    DatabaseError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::UnknownTask => "UNKNOWN_TASK",
            Self::UnknownMember => "UNKNOWN_MEMBER",
            Self::UnknownColumn => "UNKNOWN_COLUMN",
            Self::IllegalTransition => "ILLEGAL_TRANSITION",
            Self::WipLimitExceeded => "WIP_LIMIT_EXCEEDED",
            Self::BlockedByDependency => "BLOCKED_BY_DEPENDENCY",
            Self::CycleDetected => "CYCLE_DETECTED",
            Self::ReferentialIntegrity => "REFERENTIAL_INTEGRITY",
            Self::StaleWrite => "STALE_WRITE",
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::AmbiguousRef => "AMBIGUOUS_REF",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }

    /// A stale write can succeed after re-reading the task and reapplying the change.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StaleWrite)
    }
}

/// Every failure the board reports. `task_ids` carries the ids the caller needs to act on:
/// blocking dependencies, the cycle path, or the dependents preventing a delete.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct BoardError {
    pub code: ErrorCode,
    pub message: String,
    pub task_ids: Vec<String>,
}

impl BoardError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            task_ids: Vec::new(),
        }
    }

    fn with_task_ids(mut self, ids: Vec<String>) -> Self {
        self.task_ids = ids;
        self
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn unknown_task(id: &str) -> Self {
        Self::new(ErrorCode::UnknownTask, format!("Task not found: {id}"))
    }

    pub fn unknown_member(id: &str) -> Self {
        Self::new(ErrorCode::UnknownMember, format!("Team member not found: {id}"))
    }

    pub fn unknown_column(id: &str) -> Self {
        Self::new(ErrorCode::UnknownColumn, format!("Column not found: {id}"))
    }

    pub fn illegal_transition(from: &str, to: &str) -> Self {
        Self::new(
            ErrorCode::IllegalTransition,
            format!("Illegal status transition: {from} → {to}"),
        )
    }

    pub fn wip_limit_exceeded(column_id: &str, limit: usize) -> Self {
        Self::new(
            ErrorCode::WipLimitExceeded,
            format!("Column {column_id} is at its WIP limit of {limit}"),
        )
    }

    pub fn blocked_by_dependency(task_id: &str, blocking: Vec<String>) -> Self {
        Self::new(
            ErrorCode::BlockedByDependency,
            format!(
                "Task {task_id} is blocked by unfinished dependencies: {}",
                blocking.join(", ")
            ),
        )
        .with_task_ids(blocking)
    }

    pub fn cycle_detected(path: Vec<String>) -> Self {
        Self::new(
            ErrorCode::CycleDetected,
            format!("Dependency cycle detected: {}", path.join(" → ")),
        )
        .with_task_ids(path)
    }

    pub fn referential_integrity(task_id: &str, dependents: Vec<String>) -> Self {
        Self::new(
            ErrorCode::ReferentialIntegrity,
            format!(
                "Task {task_id} is still a dependency of open tasks: {}",
                dependents.join(", ")
            ),
        )
        .with_task_ids(dependents)
    }

    pub fn archived_dependents(task_id: &str, dependents: Vec<String>) -> Self {
        Self::new(
            ErrorCode::ReferentialIntegrity,
            format!(
                "Task {task_id} is a dependency of archived tasks: {}",
                dependents.join(", ")
            ),
        )
        .with_task_ids(dependents)
    }

    pub fn stale_write(task_id: &str, expected: u64, actual: u64) -> Self {
        Self::new(
            ErrorCode::StaleWrite,
            format!("Task {task_id} changed: expected version {expected}, found {actual}"),
        )
    }

    pub fn not_initialized() -> Self {
        Self::new(
            ErrorCode::NotInitialized,
            "taskboard is not initialized. Run `taskboard init` first.",
        )
    }

    pub fn ambiguous_ref(reference: &str, candidates: &[String]) -> Self {
        Self::new(
            ErrorCode::AmbiguousRef,
            format!(
                "Ambiguous reference '{}'. Candidates: {}",
                reference,
                candidates.join(", ")
            ),
        )
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }
}

impl From<rusqlite::Error> for BoardError {
    fn from(e: rusqlite::Error) -> Self {
        Self::database(e.to_string())
    }
}

impl From<serde_json::Error> for BoardError {
    fn from(e: serde_json::Error) -> Self {
        Self::validation(format!("Invalid JSON: {e}"))
    }
}
