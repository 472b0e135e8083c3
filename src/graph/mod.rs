pub mod critical_path;
pub mod cycle;
pub mod ready;
pub mod topo;

use std::collections::{BTreeSet, HashMap, HashSet};

use indexmap::IndexMap;

use crate::models::{Task, TaskDependency};
use crate::store::EntityStore;

pub use critical_path::{critical_path, CriticalPath};
pub use topo::{topological_order, TopologicalOrder};

/// Dependency relation as adjacency sets keyed by task id.
///
/// An edge `task → dependency` means the task cannot complete before the dependency.
/// The graph is derived from the tasks' dependency sets, so it always reflects the
/// current store.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    dependencies: IndexMap<String, BTreeSet<String>>,
    dependents: HashMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut graph = Self::default();
        for task in tasks {
            graph.dependencies.insert(task.id.clone(), task.dependencies.clone());
            for dep in &task.dependencies {
                graph
                    .dependents
                    .entry(dep.clone())
                    .or_default()
                    .insert(task.id.clone());
            }
        }
        graph
    }

    pub fn from_store(store: &EntityStore) -> Self {
        Self::from_tasks(store.tasks())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.dependencies.contains_key(id)
    }

    /// Task ids in store order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.dependencies.keys().map(String::as_str)
    }

    pub fn dependencies_of(&self, id: &str) -> impl Iterator<Item = &str> {
        self.dependencies
            .get(id)
            .into_iter()
            .flat_map(|deps| deps.iter().map(String::as_str))
    }

    pub fn dependents_of(&self, id: &str) -> impl Iterator<Item = &str> {
        self.dependents
            .get(id)
            .into_iter()
            .flat_map(|deps| deps.iter().map(String::as_str))
    }

    pub fn edges(&self) -> Vec<TaskDependency> {
        self.dependencies
            .iter()
            .flat_map(|(task_id, deps)| {
                deps.iter().map(move |dep| TaskDependency {
                    task_id: task_id.clone(),
                    dependency_id: dep.clone(),
                })
            })
            .collect()
    }

    /// A chain of dependency edges leading from `from` to `to`, both ends included.
    pub fn path(&self, from: &str, to: &str) -> Option<Vec<String>> {
        let mut parent: HashMap<&str, &str> = HashMap::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack = vec![from];
        visited.insert(from);

        while let Some(node) = stack.pop() {
            if node == to {
                let mut path = vec![to.to_string()];
                let mut current = to;
                while let Some(&prev) = parent.get(current) {
                    path.push(prev.to_string());
                    current = prev;
                }
                path.reverse();
                return Some(path);
            }
            for next in self.dependencies_of(node) {
                if visited.insert(next) {
                    parent.insert(next, node);
                    stack.push(next);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;
    use crate::test_support::task_after;

    #[test]
    fn test_adjacency_both_directions() {
        let tasks = vec![
            task_after("a", TaskStatus::Todo, &[]),
            task_after("b", TaskStatus::Todo, &["a"]),
            task_after("c", TaskStatus::Todo, &["a", "b"]),
        ];
        let graph = DependencyGraph::from_tasks(&tasks);
        assert_eq!(graph.edges().len(), 3);
        assert_eq!(graph.dependents_of("a").collect::<Vec<_>>(), vec!["b", "c"]);
        assert_eq!(graph.dependencies_of("c").collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(graph.dependencies_of("b").collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(graph.dependents_of("c").count(), 0);
    }

    #[test]
    fn test_path_follows_dependencies() {
        let tasks = vec![
            task_after("a", TaskStatus::Todo, &[]),
            task_after("b", TaskStatus::Todo, &["a"]),
            task_after("c", TaskStatus::Todo, &["b"]),
        ];
        let graph = DependencyGraph::from_tasks(&tasks);
        assert_eq!(
            graph.path("c", "a"),
            Some(vec!["c".to_string(), "b".to_string(), "a".to_string()])
        );
        assert_eq!(graph.path("a", "c"), None);
    }
}
