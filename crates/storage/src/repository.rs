use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{
    Credentials, History, Leaderboard, QuestionBank, Task, TaskId, TaskPriority,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Field set for a task that does not exist yet.
///
/// The repository assigns the `TaskId`; callers never pick ids themselves,
/// so ids stay stable across deletes.
#[derive(Debug, Clone)]
pub struct NewTaskRecord {
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub created_at: DateTime<Utc>,
}

impl NewTaskRecord {
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title().to_owned(),
            description: task.description().map(str::to_owned),
            priority: task.priority(),
            created_at: task.created_at(),
        }
    }
}

//
// ─── REPOSITORY CONTRACTS ──────────────────────────────────────────────────────
//

/// Read-only source for the question bank, loaded once at startup.
#[async_trait]
pub trait QuestionBankSource: Send + Sync {
    /// Load every category and its questions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read at all. A
    /// missing or malformed document is NOT an error: it loads as an empty
    /// bank.
    async fn load_bank(&self) -> Result<QuestionBank, StorageError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch one user's credentials; `Ok(None)` when unknown.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_user(&self, username: &str) -> Result<Option<Credentials>, StorageError>;

    /// Persist or update a credential record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn upsert_user(&self, credentials: &Credentials) -> Result<(), StorageError>;
}

#[async_trait]
pub trait LeaderboardRepository: Send + Sync {
    /// Load the whole leaderboard.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn load_leaderboard(&self) -> Result<Leaderboard, StorageError>;

    /// Overwrite one user's entry with the latest score.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the update cannot be stored.
    async fn record_score(&self, username: &str, score: u32) -> Result<(), StorageError>;
}

#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Load the whole history log.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn load_history(&self) -> Result<History, StorageError>;

    /// Append one completed-session score to a user's category log.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the update cannot be stored.
    async fn append_score(
        &self,
        username: &str,
        category: &str,
        score: u32,
    ) -> Result<(), StorageError>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a task, assigning the next free id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record is invalid or cannot be stored.
    async fn insert_new_task(&self, record: NewTaskRecord) -> Result<TaskId, StorageError>;

    /// Fetch a task by id; `Ok(None)` when missing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_task(&self, id: TaskId) -> Result<Option<Task>, StorageError>;

    /// List all tasks in id order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_tasks(&self) -> Result<Vec<Task>, StorageError>;

    /// Persist or update a task.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the task cannot be stored.
    async fn upsert_task(&self, task: &Task) -> Result<(), StorageError>;

    /// Delete a task by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no such task exists.
    async fn delete_task(&self, id: TaskId) -> Result<(), StorageError>;
}

//
// ─── IN-MEMORY IMPLEMENTATION ──────────────────────────────────────────────────
//

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    bank: Arc<Mutex<QuestionBank>>,
    users: Arc<Mutex<BTreeMap<String, Credentials>>>,
    leaderboard: Arc<Mutex<Leaderboard>>,
    history: Arc<Mutex<History>>,
    tasks: Arc<Mutex<BTreeMap<TaskId, Task>>>,
    next_task_id: Arc<Mutex<u64>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_task_id: Arc::new(Mutex::new(1)),
            ..Self::default()
        }
    }

    /// Pre-load a question bank, e.g. for session tests.
    #[must_use]
    pub fn with_bank(bank: QuestionBank) -> Self {
        let repo = Self::new();
        if let Ok(mut guard) = repo.bank.lock() {
            *guard = bank;
        }
        repo
    }
}

fn lock_err<T>(err: std::sync::PoisonError<T>) -> StorageError {
    StorageError::Io(err.to_string())
}

#[async_trait]
impl QuestionBankSource for InMemoryRepository {
    async fn load_bank(&self) -> Result<QuestionBank, StorageError> {
        let guard = self.bank.lock().map_err(lock_err)?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user(&self, username: &str) -> Result<Option<Credentials>, StorageError> {
        let guard = self.users.lock().map_err(lock_err)?;
        Ok(guard.get(username).cloned())
    }

    async fn upsert_user(&self, credentials: &Credentials) -> Result<(), StorageError> {
        let mut guard = self.users.lock().map_err(lock_err)?;
        guard.insert(credentials.username().to_owned(), credentials.clone());
        Ok(())
    }
}

#[async_trait]
impl LeaderboardRepository for InMemoryRepository {
    async fn load_leaderboard(&self) -> Result<Leaderboard, StorageError> {
        let guard = self.leaderboard.lock().map_err(lock_err)?;
        Ok(guard.clone())
    }

    async fn record_score(&self, username: &str, score: u32) -> Result<(), StorageError> {
        let mut guard = self.leaderboard.lock().map_err(lock_err)?;
        guard.record(username, score);
        Ok(())
    }
}

#[async_trait]
impl HistoryRepository for InMemoryRepository {
    async fn load_history(&self) -> Result<History, StorageError> {
        let guard = self.history.lock().map_err(lock_err)?;
        Ok(guard.clone())
    }

    async fn append_score(
        &self,
        username: &str,
        category: &str,
        score: u32,
    ) -> Result<(), StorageError> {
        let mut guard = self.history.lock().map_err(lock_err)?;
        guard.append(username, category, score);
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for InMemoryRepository {
    async fn insert_new_task(&self, record: NewTaskRecord) -> Result<TaskId, StorageError> {
        let mut next = self.next_task_id.lock().map_err(lock_err)?;
        let id = TaskId::new(*next);
        let task = Task::new(
            id,
            record.title,
            record.description,
            record.priority,
            record.created_at,
        )
        .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let mut guard = self.tasks.lock().map_err(lock_err)?;
        guard.insert(id, task);
        *next += 1;
        Ok(id)
    }

    async fn get_task(&self, id: TaskId) -> Result<Option<Task>, StorageError> {
        let guard = self.tasks.lock().map_err(lock_err)?;
        Ok(guard.get(&id).cloned())
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, StorageError> {
        let guard = self.tasks.lock().map_err(lock_err)?;
        Ok(guard.values().cloned().collect())
    }

    async fn upsert_task(&self, task: &Task) -> Result<(), StorageError> {
        let mut guard = self.tasks.lock().map_err(lock_err)?;
        guard.insert(task.id(), task.clone());
        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), StorageError> {
        let mut guard = self.tasks.lock().map_err(lock_err)?;
        guard.remove(&id).map(|_| ()).ok_or(StorageError::NotFound)
    }
}

//
// ─── STORAGE AGGREGATE ─────────────────────────────────────────────────────────
//

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub bank: Arc<dyn QuestionBankSource>,
    pub users: Arc<dyn UserRepository>,
    pub leaderboard: Arc<dyn LeaderboardRepository>,
    pub history: Arc<dyn HistoryRepository>,
    pub tasks: Arc<dyn TaskRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(InMemoryRepository::new())
    }

    #[must_use]
    pub fn in_memory_with_bank(bank: QuestionBank) -> Self {
        Self::from_in_memory(InMemoryRepository::with_bank(bank))
    }

    fn from_in_memory(repo: InMemoryRepository) -> Self {
        Self {
            bank: Arc::new(repo.clone()),
            users: Arc::new(repo.clone()),
            leaderboard: Arc::new(repo.clone()),
            history: Arc::new(repo.clone()),
            tasks: Arc::new(repo),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[tokio::test]
    async fn users_round_trip() {
        let repo = InMemoryRepository::new();
        let creds = Credentials::new("ada", "pw").unwrap();
        repo.upsert_user(&creds).await.unwrap();

        let fetched = repo.get_user("ada").await.unwrap().unwrap();
        assert_eq!(fetched, creds);
        assert!(repo.get_user("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn record_score_overwrites_entry() {
        let repo = InMemoryRepository::new();
        repo.record_score("ada", 5).await.unwrap();
        repo.record_score("ada", 3).await.unwrap();

        let board = repo.load_leaderboard().await.unwrap();
        assert_eq!(board.score("ada"), Some(3));
    }

    #[tokio::test]
    async fn append_score_accumulates_history() {
        let repo = InMemoryRepository::new();
        repo.append_score("ada", "Math", 1).await.unwrap();
        repo.append_score("ada", "Math", 2).await.unwrap();

        let history = repo.load_history().await.unwrap();
        assert_eq!(history.scores("ada", "Math"), &[1, 2]);
    }

    #[tokio::test]
    async fn task_ids_stay_stable_after_delete() {
        let repo = InMemoryRepository::new();
        let record = |title: &str| NewTaskRecord {
            title: title.to_owned(),
            description: None,
            priority: TaskPriority::Medium,
            created_at: fixed_now(),
        };

        let first = repo.insert_new_task(record("a")).await.unwrap();
        let second = repo.insert_new_task(record("b")).await.unwrap();
        repo.delete_task(first).await.unwrap();
        let third = repo.insert_new_task(record("c")).await.unwrap();

        assert_eq!(second, TaskId::new(2));
        assert_eq!(third, TaskId::new(3));
        assert!(repo.get_task(first).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_missing_task_is_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo.delete_task(TaskId::new(42)).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }
}
