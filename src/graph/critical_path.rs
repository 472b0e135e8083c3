use std::collections::HashMap;

use serde::Serialize;

use crate::store::EntityStore;

use super::{topological_order, DependencyGraph};

/// The dependency chain with the most remaining work, dependencies first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CriticalPath {
    pub task_ids: Vec<String>,
    pub total_hours: f64,
}

pub fn critical_path(store: &EntityStore) -> CriticalPath {
    let graph = DependencyGraph::from_store(store);
    let ids: Vec<&str> = store.active_tasks().map(|t| t.id.as_str()).collect();
    let Ok(order) = topological_order(&graph, &ids) else {
        return CriticalPath::default();
    };

    let mut best: HashMap<String, (f64, Option<String>)> = HashMap::new();
    let mut end: Option<(String, f64)> = None;
    for id in order {
        let Ok(task) = store.task(&id) else { continue };
        let (base, via) = graph
            .dependencies_of(&id)
            .filter_map(|dep| best.get(dep).map(|(hours, _)| (*hours, dep)))
            .fold((0.0, None), |acc: (f64, Option<&str>), (hours, dep)| {
                if acc.1.is_none() || hours > acc.0 {
                    (hours, Some(dep))
                } else {
                    acc
                }
            });
        let total = base + task.remaining_hours();
        if end.as_ref().map_or(true, |(_, h)| total > *h) {
            end = Some((id.clone(), total));
        }
        best.insert(id, (total, via.map(str::to_string)));
    }

    let Some((last, total_hours)) = end else {
        return CriticalPath::default();
    };
    let mut task_ids = vec![last.clone()];
    let mut current = last;
    while let Some((_, Some(prev))) = best.get(&current) {
        task_ids.push(prev.clone());
        current = prev.clone();
    }
    task_ids.reverse();
    CriticalPath {
        task_ids,
        total_hours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;
    use crate::test_support::{store_with, task_after};

    #[test]
    fn test_longest_chain_by_remaining_hours() {
        let mut a = task_after("a", TaskStatus::Todo, &[]);
        a.estimate_hours = 4.0;
        let mut b = task_after("b", TaskStatus::Todo, &["a"]);
        b.estimate_hours = 10.0;
        let mut c = task_after("c", TaskStatus::Todo, &["a"]);
        c.estimate_hours = 2.0;
        let mut d = task_after("d", TaskStatus::Todo, &["b", "c"]);
        d.estimate_hours = 1.0;
        let store = store_with(vec![a, b, c, d]);

        let path = critical_path(&store);
        assert_eq!(path.task_ids, vec!["a", "b", "d"]);
        assert_eq!(path.total_hours, 15.0);
    }

    #[test]
    fn test_done_tasks_weigh_nothing() {
        let mut a = task_after("a", TaskStatus::Done, &[]);
        a.estimate_hours = 40.0;
        let mut b = task_after("b", TaskStatus::Todo, &["a"]);
        b.estimate_hours = 3.0;
        b.spent_hours = 1.0;
        let store = store_with(vec![a, b]);

        let path = critical_path(&store);
        assert_eq!(path.total_hours, 2.0);
        assert_eq!(path.task_ids.last().map(String::as_str), Some("b"));
    }

    #[test]
    fn test_empty_board() {
        let store = store_with(vec![]);
        assert_eq!(critical_path(&store), CriticalPath::default());
    }
}
