//! Task records and the repository capability.
//!
//! The engine only ever reads task snapshots; storage lifetime belongs to
//! whoever implements [`TaskRepository`]. The bundled [`InMemoryRepository`]
//! exists for the CLI and tests.

use std::path::Path;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::TaskError;

/// Workflow state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Todo,
    Doing,
    Blocked,
    Done,
}

impl TaskStatus {
    /// All valid statuses, in display order.
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::Doing,
        TaskStatus::Blocked,
        TaskStatus::Done,
    ];

    /// Parse a lowercase status name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "todo" => Some(Self::Todo),
            "doing" => Some(Self::Doing),
            "blocked" => Some(Self::Blocked),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Todo => "todo",
            Self::Doing => "doing",
            Self::Blocked => "blocked",
            Self::Done => "done",
        };
        f.write_str(s)
    }
}

/// A single task record.
///
/// `due_date` is either empty (no due date) or zero-padded `YYYY-MM-DD`,
/// which is what makes lexicographic date comparison valid downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    #[serde(rename = "dueDate")]
    pub due_date: String,
}

/// Capability interface over task storage.
///
/// The engine consumes `list` only; `append` is for the surrounding
/// application (CLI, route handler). Implementations decide lifetime.
pub trait TaskRepository: Send + Sync {
    /// Snapshot of all tasks, in insertion order.
    fn list(&self) -> Vec<Task>;

    /// Store a task and return it as stored.
    fn append(&self, task: Task) -> Task;
}

/// Process-local task list behind a mutex.
pub struct InMemoryRepository {
    tasks: Mutex<Vec<Task>>,
}

impl InMemoryRepository {
    /// Empty repository.
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
        }
    }

    /// Repository pre-loaded with the demo task set.
    pub fn seeded() -> Self {
        Self::new(seed_tasks())
    }
}

impl TaskRepository for InMemoryRepository {
    fn list(&self) -> Vec<Task> {
        self.tasks.lock().unwrap().clone()
    }

    fn append(&self, task: Task) -> Task {
        let mut tasks = self.tasks.lock().unwrap();
        tasks.push(task.clone());
        tracing::debug!(id = %task.id, total = tasks.len(), "task appended");
        task
    }
}

/// Demo tasks used when no task file is supplied.
pub fn seed_tasks() -> Vec<Task> {
    let mk = |id: &str, title: &str, status: TaskStatus, due: &str| Task {
        id: id.into(),
        title: title.into(),
        status,
        due_date: due.into(),
    };
    vec![
        mk(
            "task-001",
            "Draft Q1 roadmap summary",
            TaskStatus::Doing,
            "2026-01-28",
        ),
        mk(
            "task-002",
            "Follow up on vendor security review",
            TaskStatus::Blocked,
            "2026-01-30",
        ),
        mk(
            "task-003",
            "Prepare demo deck for stakeholders",
            TaskStatus::Todo,
            "2026-02-02",
        ),
        mk(
            "task-004",
            "Ship dashboard v1 layout polish",
            TaskStatus::Doing,
            "2026-01-27",
        ),
        mk(
            "task-005",
            "Close out January metrics report",
            TaskStatus::Done,
            "2026-01-24",
        ),
    ]
}

/// Load a JSON array of tasks from disk.
pub fn load_tasks(path: &Path) -> Result<Vec<Task>, TaskError> {
    let content = std::fs::read_to_string(path).map_err(|source| TaskError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let tasks: Vec<Task> = serde_json::from_str(&content).map_err(|e| TaskError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    tracing::debug!(path = %path.display(), count = tasks.len(), "loaded task file");
    Ok(tasks)
}
