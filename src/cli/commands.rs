use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "taskboard",
    version,
    about = "Task board with WIP-limited columns and dependency-aware workflow",
    after_help = "\
NOTE:
  The board is stored at <root>/.taskboard/board.db, where <root> is the nearest
  ancestor of the current directory containing `.taskboard`. Override with --db.
  Run `taskboard init` before any other command.

EXIT CODES:
  0  Success
  1  Error (validation, illegal transition, WIP limit, cycle, etc.)
  2  Waiting (`next`: no task is ready, but open tasks remain)

WORKFLOW:
  todo → in-progress → review → done. review may go back to in-progress,
  done may be reopened to in-progress. A task reaches done only when every
  dependency is done.

LOGGING:
  Diagnostics go to stderr. Set TASKBOARD_LOG (e.g. `taskboard=debug`) or use -v."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the board database
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a board in this directory
    #[command(after_help = "\
CONFIG FORMAT:
  {\"columns\":[{\"id\":\"todo\",\"title\":\"To Do\",\"wip_limit\":5,\"statuses\":[\"todo\"]}, ...],
   \"members\":[{\"id\":\"ana\",\"name\":\"Ana\",\"role\":\"dev\",\"capacity_hours\":40}]}

NOTE:
  Without --config the board gets todo / in-progress / review / done columns
  without limits. Running init on an existing board leaves it untouched.")]
    Init {
        /// Board configuration JSON file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Show the highest-priority task that is ready to start
    Next,

    /// List board tasks in dependency order, and the critical path
    Order,

    /// Show the board: columns, progress and team workload
    Status,

    /// Show capacity use per team member
    Workload {
        /// Member id (all members if omitted)
        member: Option<String>,
    },

    /// Daily remaining estimate against the ideal line
    Burndown {
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,
    },
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task to the first column
    Add {
        /// Task title
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// low, medium, high or critical
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Member id
        #[arg(long)]
        assignee: Option<String>,
        /// Estimated hours
        #[arg(long, default_value = "0")]
        estimate: f64,
        /// Hours already spent
        #[arg(long, default_value = "0")]
        spent: f64,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(long)]
        tag: Vec<String>,
        /// Add dependency: task completes after this task ID
        #[arg(long)]
        after: Vec<String>,
    },
    /// Change task fields
    Update {
        /// Task ID or prefix
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        estimate: Option<f64>,
        #[arg(long)]
        spent: Option<f64>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,
        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
        /// Replace all tags
        #[arg(long)]
        tag: Option<Vec<String>>,
        /// Fail with STALE_WRITE unless the task is at this version
        #[arg(long)]
        expect_version: Option<u64>,
    },
    /// Move a task to another column
    #[command(after_help = "\
NOTE:
  The task's status follows the column. Moving into a column at its WIP limit
  fails with WIP_LIMIT_EXCEEDED; moving to done with open dependencies fails
  with BLOCKED_BY_DEPENDENCY. Nothing changes when a move fails.")]
    Move {
        /// Task ID or prefix
        id: String,
        /// Target column id
        column: String,
        #[arg(long)]
        expect_version: Option<u64>,
    },
    /// Assign a task to a team member
    Assign {
        id: String,
        member: String,
    },
    /// Clear a task's assignee
    Unassign {
        id: String,
    },
    /// Show task details
    Show {
        /// Task ID or prefix
        id: String,
    },
    /// List board tasks, optionally filtered
    #[command(after_help = "\
NOTE:
  Repeat a flag to match any of its values. Different flags must all match.
  --text matches title or description, case-insensitively.")]
    List {
        #[arg(long)]
        priority: Vec<String>,
        #[arg(long)]
        assignee: Vec<String>,
        #[arg(long)]
        status: Vec<String>,
        #[arg(long)]
        tag: Vec<String>,
        #[arg(long)]
        text: Option<String>,
    },
    /// Delete a task no open task depends on
    Remove {
        id: String,
    },
    /// Archive a done task
    Archive {
        id: String,
    },
    /// Manage task dependencies
    #[command(subcommand)]
    Dep(DepCommands),
}

#[derive(Subcommand)]
pub enum DepCommands {
    /// Add a dependency
    Add {
        /// Task ID
        id: String,
        /// Dependency task ID
        dep_id: String,
    },
    /// Remove a dependency
    Remove {
        /// Task ID
        id: String,
        /// Dependency task ID
        dep_id: String,
    },
}
