use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{Task, TaskError, TaskId, TaskPriority, TaskStats, TaskStatus};
use storage::repository::{NewTaskRecord, StorageError, TaskRepository};

use crate::error::TaskServiceError;

/// Task list operations over the task repository.
///
/// Ids are assigned by the repository and never reused, so a task keeps its
/// id for its whole life regardless of deletions around it.
pub struct TaskService {
    clock: Clock,
    tasks: Arc<dyn TaskRepository>,
}

impl TaskService {
    #[must_use]
    pub fn new(clock: Clock, tasks: Arc<dyn TaskRepository>) -> Self {
        Self { clock, tasks }
    }

    /// Add a task, returning its assigned id.
    ///
    /// Blank descriptions are stored as absent.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::EmptyTitle` for a blank title and storage errors
    /// from the insert.
    pub async fn add_task(
        &self,
        title: &str,
        description: Option<String>,
        priority: TaskPriority,
    ) -> Result<TaskId, TaskServiceError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskError::EmptyTitle.into());
        }
        let description = description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());

        let record = NewTaskRecord {
            title: title.to_owned(),
            description,
            priority,
            created_at: self.clock.now(),
        };
        Ok(self.tasks.insert_new_task(record).await?)
    }

    /// All tasks, optionally narrowed to one status.
    ///
    /// # Errors
    ///
    /// Returns storage errors from the list.
    pub async fn list_tasks(
        &self,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Task>, TaskServiceError> {
        let mut tasks = self.tasks.list_tasks().await?;
        if let Some(status) = status {
            tasks.retain(|task| task.status() == status);
        }
        Ok(tasks)
    }

    /// Rewrite a task's title, description, and priority in place.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` for an unknown id, `TaskError` for
    /// invalid fields, and storage errors from the write.
    pub async fn edit_task(
        &self,
        id: TaskId,
        title: &str,
        description: Option<String>,
        priority: TaskPriority,
    ) -> Result<Task, TaskServiceError> {
        let mut task = self.fetch(id).await?;
        task.edit(title, description, priority)?;
        self.tasks.upsert_task(&task).await?;
        Ok(task)
    }

    /// Mark a task completed. Completing twice keeps the first timestamp.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` for an unknown id and storage
    /// errors from the write.
    pub async fn complete_task(&self, id: TaskId) -> Result<Task, TaskServiceError> {
        let mut task = self.fetch(id).await?;
        task.complete(self.clock.now());
        self.tasks.upsert_task(&task).await?;
        Ok(task)
    }

    /// Delete a task. Its id is retired, not recycled.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` for an unknown id.
    pub async fn delete_task(&self, id: TaskId) -> Result<(), TaskServiceError> {
        Ok(self.tasks.delete_task(id).await?)
    }

    /// Counts over the whole task list.
    ///
    /// # Errors
    ///
    /// Returns storage errors from the list.
    pub async fn stats(&self) -> Result<TaskStats, TaskServiceError> {
        let tasks = self.tasks.list_tasks().await?;
        Ok(TaskStats::from_tasks(&tasks))
    }

    async fn fetch(&self, id: TaskId) -> Result<Task, TaskServiceError> {
        self.tasks
            .get_task(id)
            .await?
            .ok_or(TaskServiceError::Storage(StorageError::NotFound))
    }
}
