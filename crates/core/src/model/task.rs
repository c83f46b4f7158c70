use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── IDS ───────────────────────────────────────────────────────────────────────
//

/// Unique identifier for a Task.
///
/// Assigned once at creation and never reused or recomputed, so deleting a
/// task leaves every other id untouched.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(u64);

impl TaskId {
    /// Creates a new `TaskId`
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaskId({})", self.0)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TaskError {
    #[error("task title cannot be empty")]
    EmptyTitle,

    #[error("unknown priority: {raw}")]
    UnknownPriority { raw: String },
}

//
// ─── PRIORITY / STATUS ─────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = TaskError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            _ => Err(TaskError::UnknownPriority {
                raw: raw.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => f.write_str("Pending"),
            TaskStatus::Completed => f.write_str("Completed"),
        }
    }
}

//
// ─── TASK ──────────────────────────────────────────────────────────────────────
//

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    title: String,
    description: Option<String>,
    priority: TaskPriority,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new pending task.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::EmptyTitle` if the title is blank.
    pub fn new(
        id: TaskId,
        title: impl Into<String>,
        description: Option<String>,
        priority: TaskPriority,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TaskError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TaskError::EmptyTitle);
        }

        let description = description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());

        Ok(Self {
            id,
            title: title.trim().to_owned(),
            description,
            priority,
            status: TaskStatus::Pending,
            created_at,
            completed_at: None,
        })
    }

    /// Rehydrate a task from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::EmptyTitle` if the stored title is blank.
    pub fn from_persisted(
        id: TaskId,
        title: impl Into<String>,
        description: Option<String>,
        priority: TaskPriority,
        status: TaskStatus,
        created_at: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Self, TaskError> {
        let mut task = Self::new(id, title, description, priority, created_at)?;
        task.status = status;
        task.completed_at = completed_at;
        Ok(task)
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> TaskId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn priority(&self) -> TaskPriority {
        self.priority
    }

    #[must_use]
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Mark the task as completed at the given time.
    ///
    /// Completing an already-completed task keeps the original timestamp.
    pub fn complete(&mut self, at: DateTime<Utc>) {
        if self.status == TaskStatus::Completed {
            return;
        }
        self.status = TaskStatus::Completed;
        self.completed_at = Some(at);
    }

    /// Replace title, description, and priority in one edit.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::EmptyTitle` if the new title is blank.
    pub fn edit(
        &mut self,
        title: impl Into<String>,
        description: Option<String>,
        priority: TaskPriority,
    ) -> Result<(), TaskError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TaskError::EmptyTitle);
        }
        self.title = title.trim().to_owned();
        self.description = description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());
        self.priority = priority;
        Ok(())
    }
}

//
// ─── STATS ─────────────────────────────────────────────────────────────────────
//

/// Aggregate counts over a task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl TaskStats {
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.is_completed()).count();
        Self {
            total,
            completed,
            pending: total - completed,
        }
    }

    /// Completion rate in percent, 0.0 for an empty list.
    #[must_use]
    pub fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
