//! Task context normalizer.
//!
//! Turns a raw task snapshot into a dated, annotated [`AiContext`]: each task
//! gains an overdue flag relative to a reference date, and the aggregate
//! carries per-status counts. Date comparisons are plain lexicographic
//! comparisons on zero-padded `YYYY-MM-DD` strings — no calendar parsing, so
//! behavior is reproducible regardless of host timezone.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskStatus};

/// Fixed timezone label attached to every context.
pub const TIMEZONE: &str = "Asia/Dubai";

/// Today's date in UTC as `YYYY-MM-DD`.
pub fn today_iso() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Per-status task counts. All four statuses are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub todo: usize,
    pub doing: usize,
    pub blocked: usize,
    pub done: usize,
}

impl StatusCounts {
    /// Count the given status.
    pub fn record(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::Todo => self.todo += 1,
            TaskStatus::Doing => self.doing += 1,
            TaskStatus::Blocked => self.blocked += 1,
            TaskStatus::Done => self.done += 1,
        }
    }

    /// Sum over all four statuses.
    pub fn total(&self) -> usize {
        self.todo + self.doing + self.blocked + self.done
    }
}

/// Immutable view of a task plus its computed overdue flag.
///
/// Overdue iff the due date is non-empty, strictly before the reference
/// date, and the status is neither blocked nor done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTask {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    #[serde(rename = "dueDate")]
    pub due_date: String,
    #[serde(rename = "isOverdue")]
    pub is_overdue: bool,
}

impl From<&NormalizedTask> for Task {
    fn from(task: &NormalizedTask) -> Self {
        Task {
            id: task.id.clone(),
            title: task.title.clone(),
            status: task.status,
            due_date: task.due_date.clone(),
        }
    }
}

/// Dated aggregate over a normalized task collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiContext {
    pub today: String,
    pub timezone: String,
    #[serde(rename = "totalTasks")]
    pub total_tasks: usize,
    pub counts: StatusCounts,
    #[serde(rename = "overdueCount")]
    pub overdue_count: usize,
    pub tasks: Vec<NormalizedTask>,
}

/// Build an [`AiContext`] from a task snapshot relative to `today`.
///
/// Pure: fresh output per call, input untouched. An empty snapshot yields
/// all-zero counts and an empty list.
pub fn build_context(tasks: &[Task], today: &str) -> AiContext {
    let mut counts = StatusCounts::default();
    let mut overdue_count = 0;

    let normalized: Vec<NormalizedTask> = tasks
        .iter()
        .map(|task| {
            counts.record(task.status);
            let is_overdue = !task.due_date.is_empty()
                && task.due_date.as_str() < today
                && task.status != TaskStatus::Blocked
                && task.status != TaskStatus::Done;
            if is_overdue {
                overdue_count += 1;
            }
            NormalizedTask {
                id: task.id.clone(),
                title: task.title.clone(),
                status: task.status,
                due_date: task.due_date.clone(),
                is_overdue,
            }
        })
        .collect();

    AiContext {
        today: today.to_string(),
        timezone: TIMEZONE.to_string(),
        total_tasks: tasks.len(),
        counts,
        overdue_count,
        tasks: normalized,
    }
}
