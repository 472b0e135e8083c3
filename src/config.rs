//! Board configuration supplied at initialization.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::BoardError;
use crate::models::{Column, TaskStatus, TeamMember};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub wip_limit: Option<usize>,
    pub statuses: Vec<TaskStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    pub capacity_hours: f64,
}

/// Columns (in board order) and team members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub columns: Vec<ColumnConfig>,
    #[serde(default)]
    pub members: Vec<MemberConfig>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        let column = |id: &str, title: &str, status: TaskStatus| ColumnConfig {
            id: id.into(),
            title: title.into(),
            wip_limit: None,
            statuses: vec![status],
        };
        Self {
            columns: vec![
                column("todo", "To Do", TaskStatus::Todo),
                column("in-progress", "In Progress", TaskStatus::InProgress),
                column("review", "Review", TaskStatus::Review),
                column("done", "Done", TaskStatus::Done),
            ],
            members: Vec::new(),
        }
    }
}

impl BoardConfig {
    pub fn from_json(input: &str) -> Result<Self, BoardError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_column(
        mut self,
        id: &str,
        wip_limit: Option<usize>,
        statuses: &[TaskStatus],
    ) -> Self {
        self.columns.push(ColumnConfig {
            id: id.into(),
            title: id.into(),
            wip_limit,
            statuses: statuses.to_vec(),
        });
        self
    }

    pub fn with_member(mut self, id: &str, capacity_hours: f64) -> Self {
        self.members.push(MemberConfig {
            id: id.into(),
            name: id.into(),
            role: String::new(),
            capacity_hours,
        });
        self
    }

    /// An empty config to build up with [`Self::with_column`].
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), BoardError> {
        let Some(first) = self.columns.first() else {
            return Err(BoardError::validation("A board needs at least one column"));
        };
        if !first.statuses.contains(&TaskStatus::Todo) {
            return Err(BoardError::validation(format!(
                "First column {} must accept the todo status",
                first.id
            )));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if column.id.trim().is_empty() {
                return Err(BoardError::validation("Column id must not be empty"));
            }
            if !seen.insert(column.id.as_str()) {
                return Err(BoardError::validation(format!(
                    "Duplicate column id: {}",
                    column.id
                )));
            }
            if column.statuses.is_empty() {
                return Err(BoardError::validation(format!(
                    "Column {} must declare at least one status",
                    column.id
                )));
            }
            if column.wip_limit == Some(0) {
                return Err(BoardError::validation(format!(
                    "Column {} has a WIP limit of 0",
                    column.id
                )));
            }
        }

        for status in TaskStatus::ALL {
            if !self.columns.iter().any(|c| c.statuses.contains(&status)) {
                return Err(BoardError::validation(format!(
                    "No column accepts the {} status",
                    status.as_str()
                )));
            }
        }

        let mut seen = HashSet::new();
        for member in &self.members {
            if !seen.insert(member.id.as_str()) {
                return Err(BoardError::validation(format!(
                    "Duplicate member id: {}",
                    member.id
                )));
            }
            if !member.capacity_hours.is_finite() || member.capacity_hours <= 0.0 {
                return Err(BoardError::validation(format!(
                    "Member {} needs a positive capacity",
                    member.id
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn to_columns(&self) -> Vec<Column> {
        self.columns
            .iter()
            .enumerate()
            .map(|(order, c)| Column {
                id: c.id.clone(),
                title: c.title.clone(),
                wip_limit: c.wip_limit,
                statuses: c.statuses.clone(),
                order,
            })
            .collect()
    }

    pub(crate) fn to_members(&self) -> Vec<TeamMember> {
        self.members
            .iter()
            .map(|m| TeamMember {
                id: m.id.clone(),
                name: m.name.clone(),
                role: m.role.clone(),
                capacity_hours: m.capacity_hours,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_default_is_valid() {
        assert!(BoardConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_json() {
        let config = BoardConfig::from_json(
            r#"{
                "columns": [
                    {"id": "todo", "title": "Backlog", "wip_limit": 3, "statuses": ["todo"]},
                    {
                        "id": "doing",
                        "title": "Doing",
                        "wip_limit": 2,
                        "statuses": ["in-progress", "review"]
                    },
                    {"id": "done", "title": "Done", "statuses": ["done"]}
                ],
                "members": [{"id": "ana", "name": "Ana", "role": "dev", "capacity_hours": 80}]
            }"#,
        )
        .unwrap();
        assert_eq!(config.columns[1].wip_limit, Some(2));
        assert_eq!(config.members[0].capacity_hours, 80.0);
        assert_eq!(config.to_columns()[2].order, 2);
    }

    #[test]
    fn test_first_column_must_accept_todo() {
        let config = BoardConfig::empty()
            .with_column("doing", None, &[TaskStatus::InProgress, TaskStatus::Review])
            .with_column("todo", None, &[TaskStatus::Todo])
            .with_column("done", None, &[TaskStatus::Done]);
        assert_eq!(config.validate().unwrap_err().code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_every_status_needs_a_column() {
        let config = BoardConfig::empty()
            .with_column("todo", None, &[TaskStatus::Todo])
            .with_column("done", None, &[TaskStatus::Done]);
        let err = config.validate().unwrap_err();
        assert!(err.message.contains("in-progress"));
    }

    #[test]
    fn test_member_capacity_must_be_positive() {
        let config = BoardConfig::default().with_member("bob", 0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let config = BoardConfig::default().with_column("todo", None, &[TaskStatus::Todo]);
        assert!(config.validate().is_err());
    }
}
