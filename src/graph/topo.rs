use std::collections::{BTreeSet, HashMap};

use crate::error::BoardError;

use super::DependencyGraph;

/// Lazy topological walk over a subset of tasks (Kahn's algorithm).
///
/// Dependencies come before their dependents; among tasks that are ready at the same
/// time the one listed first in the input wins. Edges leaving the subset are ignored.
/// The iterator owns a copy of the relevant edges, so it can be cloned and replayed
/// and does not hold a borrow of the graph.
#[derive(Debug, Clone)]
pub struct TopologicalOrder {
    ids: Vec<String>,
    dependents: Vec<Vec<usize>>,
    pending: Vec<usize>,
    ready: BTreeSet<usize>,
}

/// Build the walk for `task_ids`. Unknown ids are rejected up front; duplicates are
/// kept once, at their first position.
pub fn topological_order<S: AsRef<str>>(
    graph: &DependencyGraph,
    task_ids: &[S],
) -> Result<TopologicalOrder, BoardError> {
    let mut ids: Vec<String> = Vec::with_capacity(task_ids.len());
    let mut index: HashMap<&str, usize> = HashMap::new();
    for id in task_ids {
        let id = id.as_ref();
        if !graph.contains(id) {
            return Err(BoardError::unknown_task(id));
        }
        if !index.contains_key(id) {
            index.insert(id, ids.len());
            ids.push(id.to_string());
        }
    }

    let mut dependents = vec![Vec::new(); ids.len()];
    let mut pending = vec![0usize; ids.len()];
    for (pos, id) in ids.iter().enumerate() {
        for dep in graph.dependencies_of(id) {
            if let Some(&dep_pos) = index.get(dep) {
                dependents[dep_pos].push(pos);
                pending[pos] += 1;
            }
        }
    }
    let ready = (0..ids.len()).filter(|&i| pending[i] == 0).collect();

    Ok(TopologicalOrder {
        ids,
        dependents,
        pending,
        ready,
    })
}

impl Iterator for TopologicalOrder {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let pos = self.ready.pop_first()?;
        for &dependent in &self.dependents[pos] {
            self.pending[dependent] -= 1;
            if self.pending[dependent] == 0 {
                self.ready.insert(dependent);
            }
        }
        Some(self.ids[pos].clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.pending.iter().filter(|&&p| p > 0).count() + self.ready.len();
        (self.ready.len().min(1), Some(remaining))
    }
}
