use std::collections::HashMap;

use crate::error::BoardError;

use super::DependencyGraph;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Validate a whole graph with the DFS 3-color algorithm.
/// On failure the error lists the tasks on the cycle, first task repeated at the end.
pub fn detect_cycle(graph: &DependencyGraph) -> Result<(), BoardError> {
    let mut color: HashMap<&str, Color> = graph.nodes().map(|n| (n, Color::White)).collect();
    let mut stack: Vec<&str> = Vec::new();

    for node in graph.nodes() {
        if color.get(node) == Some(&Color::White) {
            if let Some(cycle) = visit(node, graph, &mut color, &mut stack) {
                return Err(BoardError::cycle_detected(cycle));
            }
        }
    }
    Ok(())
}

fn visit<'a>(
    node: &'a str,
    graph: &'a DependencyGraph,
    color: &mut HashMap<&'a str, Color>,
    stack: &mut Vec<&'a str>,
) -> Option<Vec<String>> {
    color.insert(node, Color::Gray);
    stack.push(node);
    for next in graph.dependencies_of(node) {
        match color.get(next).copied().unwrap_or(Color::White) {
            Color::Gray => {
                // back edge: the cycle is the stack suffix starting at `next`
                let start = stack.iter().position(|n| *n == next).unwrap_or(0);
                let mut cycle: Vec<String> = stack[start..].iter().map(|n| n.to_string()).collect();
                cycle.push(next.to_string());
                return Some(cycle);
            }
            Color::White => {
                if let Some(cycle) = visit(next, graph, color, stack) {
                    return Some(cycle);
                }
            }
            Color::Black => {}
        }
    }
    stack.pop();
    color.insert(node, Color::Black);
    None
}

/// Check whether adding `task_id → dependency_id` would close a cycle, i.e. whether
/// `task_id` is already reachable from `dependency_id`.
pub fn would_create_cycle(
    graph: &DependencyGraph,
    task_id: &str,
    dependency_id: &str,
) -> Result<(), BoardError> {
    if task_id == dependency_id {
        return Err(BoardError::cycle_detected(vec![
            task_id.to_string(),
            task_id.to_string(),
        ]));
    }
    match graph.path(dependency_id, task_id) {
        Some(path) => {
            let mut cycle = Vec::with_capacity(path.len() + 1);
            cycle.push(task_id.to_string());
            cycle.extend(path);
            Err(BoardError::cycle_detected(cycle))
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;
    use crate::test_support::task_after;

    fn graph(edges: &[(&str, &[&str])]) -> DependencyGraph {
        let tasks: Vec<_> = edges
            .iter()
            .map(|(id, deps)| task_after(id, TaskStatus::Todo, deps))
            .collect();
        DependencyGraph::from_tasks(&tasks)
    }

    #[test]
    fn test_no_cycle() {
        let g = graph(&[("a", &[]), ("b", &["a"]), ("c", &["b"])]);
        assert!(detect_cycle(&g).is_ok());
    }

    #[test]
    fn test_cycle() {
        let g = graph(&[("a", &["c"]), ("b", &["a"]), ("c", &["b"])]);
        let err = detect_cycle(&g).unwrap_err();
        assert_eq!(err.task_ids.first(), err.task_ids.last());
        assert_eq!(err.task_ids.len(), 4);
    }

    #[test]
    fn test_self_cycle() {
        let g = graph(&[("a", &[])]);
        let err = would_create_cycle(&g, "a", "a").unwrap_err();
        assert_eq!(err.task_ids, vec!["a".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_would_create_cycle_reports_path() {
        let g = graph(&[("a", &[]), ("b", &["a"]), ("c", &["b"])]);
        // a → c closes a → c → b → a
        let err = would_create_cycle(&g, "a", "c").unwrap_err();
        assert_eq!(err.task_ids, vec!["a", "c", "b", "a"]);
        assert!(would_create_cycle(&g, "c", "a").is_ok());
    }
}
