use proptest::prelude::*;

use taskboard::aggregate::TaskFilter;
use taskboard::graph::{cycle, DependencyGraph};
use taskboard::models::{NewTask, Priority, Task, TaskStatus};
use taskboard::workflow;
use taskboard::{Board, BoardConfig, ErrorCode};

fn limited_config() -> BoardConfig {
    BoardConfig::empty()
        .with_column("todo", Some(3), &[TaskStatus::Todo])
        .with_column("doing", Some(2), &[TaskStatus::InProgress])
        .with_column("review", None, &[TaskStatus::Review])
        .with_column("done", None, &[TaskStatus::Done])
        .with_member("ana", 80.0)
}

fn finish(board: &Board, id: &str) {
    for column in ["in-progress", "review", "done"] {
        board.move_task(id, column, None).unwrap();
    }
}

fn tasks_of(board: &Board) -> Vec<Task> {
    board.store().tasks().cloned().collect()
}

#[test]
fn test_wip_limit_blocks_third_task_in_doing() {
    let board = Board::init(&limited_config()).unwrap();
    let t1 = board.create_task(NewTask::new("t1")).unwrap();
    let t2 = board.create_task(NewTask::new("t2")).unwrap();
    board.create_task(NewTask::new("t3")).unwrap();

    let err = board.create_task(NewTask::new("overflow")).unwrap_err();
    assert_eq!(err.code, ErrorCode::WipLimitExceeded);

    board.move_task(&t1.id, "doing", None).unwrap();
    let t4 = board.create_task(NewTask::new("t4")).unwrap();
    board.move_task(&t2.id, "doing", None).unwrap();

    let err = board.move_task(&t4.id, "doing", None).unwrap_err();
    assert_eq!(err.code, ErrorCode::WipLimitExceeded);
    let snapshot = board.board_snapshot();
    assert_eq!(snapshot.column_counts["doing"], 2);
    assert_eq!(board.task(&t4.id).unwrap().column, "todo");
}

#[test]
fn test_completion_waits_for_dependency() {
    let board = Board::init(&BoardConfig::default()).unwrap();
    let y = board.create_task(NewTask::new("Y")).unwrap();
    let x = board.create_task(NewTask::new("X").after(&y.id)).unwrap();
    board.move_task(&y.id, "in-progress", None).unwrap();
    board.move_task(&x.id, "in-progress", None).unwrap();
    board.move_task(&x.id, "review", None).unwrap();

    let err = board.move_task(&x.id, "done", None).unwrap_err();
    assert_eq!(err.code, ErrorCode::BlockedByDependency);
    assert_eq!(err.task_ids, vec![y.id.clone()]);
    assert_eq!(board.task(&x.id).unwrap().status, TaskStatus::Review);

    board.move_task(&y.id, "review", None).unwrap();
    board.move_task(&y.id, "done", None).unwrap();
    let done = board.move_task(&x.id, "done", None).unwrap();
    assert_eq!(done.status, TaskStatus::Done);
}

#[test]
fn test_reverse_dependency_is_a_cycle() {
    let board = Board::init(&BoardConfig::default()).unwrap();
    let a = board.create_task(NewTask::new("A")).unwrap();
    let b = board.create_task(NewTask::new("B")).unwrap();
    board.add_dependency(&a.id, &b.id).unwrap();

    let err = board.add_dependency(&b.id, &a.id).unwrap_err();
    assert_eq!(err.code, ErrorCode::CycleDetected);
    assert_eq!(err.task_ids.first(), err.task_ids.last());

    let edges = DependencyGraph::from_store(&board.store()).edges();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].task_id, a.id);
    assert_eq!(edges[0].dependency_id, b.id);
}

#[test]
fn test_over_allocation_reported_unclamped() {
    let board = Board::init(&limited_config()).unwrap();
    for hours in [30.0, 20.0, 40.0] {
        board
            .create_task(NewTask::new("work").estimate(hours).assignee("ana"))
            .unwrap();
    }
    let w = board.workload("ana").unwrap();
    assert_eq!(w.percent, 112.5);
    assert!(w.over_allocated);
}

#[test]
fn test_reopen_done_task() {
    let board = Board::init(&BoardConfig::default()).unwrap();
    let a = board.create_task(NewTask::new("A")).unwrap();
    finish(&board, &a.id);
    let reopened = board.move_task(&a.id, "in-progress", None).unwrap();
    assert_eq!(reopened.status, TaskStatus::InProgress);
    let err = board.move_task(&a.id, "todo", None).unwrap_err();
    assert_eq!(err.code, ErrorCode::IllegalTransition);
}

#[test]
fn test_newly_ready_after_finishing_dependency() {
    let board = Board::init(&BoardConfig::default()).unwrap();
    let a = board.create_task(NewTask::new("A")).unwrap();
    let b = board.create_task(NewTask::new("B")).unwrap();
    let c = board
        .create_task(NewTask::new("C").after(&a.id).after(&b.id))
        .unwrap();
    finish(&board, &a.id);
    assert!(board.newly_ready(&a.id).unwrap().is_empty());
    finish(&board, &b.id);
    let ready: Vec<String> = board
        .newly_ready(&b.id)
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ready, vec![c.id]);
}

#[test]
fn test_concurrent_moves_respect_limit() {
    let config = BoardConfig::empty()
        .with_column("todo", None, &[TaskStatus::Todo])
        .with_column("doing", Some(2), &[TaskStatus::InProgress])
        .with_column("review", None, &[TaskStatus::Review])
        .with_column("done", None, &[TaskStatus::Done]);
    let board = Board::init(&config).unwrap();
    let ids: Vec<String> = (0..8)
        .map(|i| board.create_task(NewTask::new(format!("t{i}"))).unwrap().id)
        .collect();

    let moved = std::thread::scope(|s| {
        let handles: Vec<_> = ids
            .iter()
            .map(|id| {
                let board = &board;
                s.spawn(move || board.move_task(id, "doing", None).is_ok())
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or(false))
            .filter(|ok| *ok)
            .count()
    });
    assert_eq!(moved, 2);
    assert_eq!(board.board_snapshot().column_counts["doing"], 2);
}

#[test]
fn test_ready_to_start_ordering() {
    let board = Board::init(&BoardConfig::default()).unwrap();
    let low = board
        .create_task(NewTask::new("low").priority(Priority::Low))
        .unwrap();
    let high = board
        .create_task(NewTask::new("high").priority(Priority::High))
        .unwrap();
    board
        .create_task(
            NewTask::new("blocked")
                .priority(Priority::Critical)
                .after(&low.id),
        )
        .unwrap();
    let ids: Vec<String> = board.ready_to_start().into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![high.id, low.id]);
}

// ─── properties ────────────────────────────────────────────────────

const COLUMNS: [&str; 4] = ["todo", "doing", "review", "done"];

fn pick(ids: &[String], i: usize) -> Option<&String> {
    if ids.is_empty() {
        None
    } else {
        ids.get(i % ids.len())
    }
}

/// Apply one generated operation; returns whether the board accepted it.
fn apply(board: &Board, ids: &mut Vec<String>, op: (u8, usize, usize)) -> bool {
    let (kind, i, j) = op;
    let a = pick(ids, i).cloned();
    let b = pick(ids, j).cloned();
    match (kind % 6, a, b) {
        (0, _, _) => match board.create_task(NewTask::new("t").estimate((i % 13) as f64)) {
            Ok(t) => {
                ids.push(t.id);
                true
            }
            Err(_) => false,
        },
        (1, Some(a), _) => board.move_task(&a, COLUMNS[j % COLUMNS.len()], None).is_ok(),
        (2, Some(a), Some(b)) => board.add_dependency(&a, &b).is_ok(),
        (3, Some(a), Some(b)) => board.remove_dependency(&a, &b).is_ok(),
        (4, Some(a), _) => {
            let ok = board.remove_task(&a).is_ok();
            if ok {
                ids.retain(|id| id != &a);
            }
            ok
        }
        (5, Some(a), _) => board.assign_task(&a, "ana").is_ok(),
        _ => false,
    }
}

proptest! {
    #[test]
    fn prop_board_invariants_hold(
        ops in proptest::collection::vec((0..6u8, 0..16usize, 0..16usize), 1..80)
    ) {
        let board = Board::init(&limited_config()).unwrap();
        let mut ids = Vec::new();

        for op in ops {
            let before = tasks_of(&board);
            if !apply(&board, &mut ids, op) {
                // Rejected commands leave no trace.
                prop_assert_eq!(&before, &tasks_of(&board));
            }

            let store = board.store();
            prop_assert!(cycle::detect_cycle(&DependencyGraph::from_store(&store)).is_ok());
            for column in store.columns() {
                if let Some(limit) = column.effective_limit() {
                    prop_assert!(workflow::occupancy(&store, &column.id) <= limit);
                }
            }
            for task in store.tasks() {
                prop_assert!(store.column(&task.column).unwrap().accepts(task.status));
                for dep in &task.dependencies {
                    prop_assert!(store.contains::<Task>(dep));
                }
            }
            let p = board.board_snapshot().progress;
            if p.total > 0 {
                prop_assert_eq!(p.completed_pct + p.in_progress_pct + p.remaining_pct, 100);
            }
        }
    }

    #[test]
    fn prop_filter_is_idempotent(
        titles in proptest::collection::vec("[a-c]{1,4}", 0..12),
        needle in "[a-c]{1,2}"
    ) {
        let board = Board::init(&BoardConfig::default()).unwrap();
        for title in &titles {
            board.create_task(NewTask::new(title.clone())).unwrap();
        }
        let filter = TaskFilter::new().text(needle);
        let once = board.query(&filter);
        let twice: Vec<Task> = taskboard::aggregate::filter(&once, &filter)
            .into_iter()
            .cloned()
            .collect();
        prop_assert_eq!(once, twice);
    }
}
