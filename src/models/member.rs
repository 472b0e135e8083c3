use serde::{Deserialize, Serialize};

/// Someone tasks can be assigned to. Allocated hours are derived from the tasks,
/// see [`crate::aggregate::workload`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    pub capacity_hours: f64,
}
