use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::model::{Credentials, History, Leaderboard, QuestionBank, Task, TaskId};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::repository::{
    HistoryRepository, LeaderboardRepository, NewTaskRecord, QuestionBankSource, Storage,
    StorageError, TaskRepository, UserRepository,
};

mod documents;

pub use documents::{QuestionBankDoc, QuestionDoc, TaskDoc, TasksDoc, UserDoc};
use documents::{HistoryDoc, LeaderboardDoc, UsersDoc, bank_from_doc, sample_bank_doc};

pub const QUESTIONS_FILE: &str = "questions.json";
pub const USERS_FILE: &str = "users.json";
pub const LEADERBOARD_FILE: &str = "leaderboard.json";
pub const HISTORY_FILE: &str = "history.json";
pub const TASKS_FILE: &str = "tasks.json";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JsonInitError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// Document store over a directory of pretty-printed JSON files.
///
/// Every document is read and rewritten wholesale; a missing or malformed
/// file loads as the empty default instead of failing the caller.
#[derive(Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Open a store rooted at `dir`, creating the directory and seeding the
    /// stock question bank on first run.
    ///
    /// # Errors
    ///
    /// Returns `JsonInitError` if the directory cannot be created or the
    /// seed document cannot be written.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, JsonInitError> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;

        let store = Self { dir };
        let questions = store.path(QUESTIONS_FILE);
        if !tokio::fs::try_exists(&questions).await? {
            let body = serde_json::to_string_pretty(&sample_bank_doc())?;
            tokio::fs::write(&questions, body).await?;
        }
        Ok(store)
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Read a document, degrading to `T::default()` when the file is
    /// missing or does not parse.
    async fn read_doc<T>(&self, name: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        match tokio::fs::read_to_string(self.path(name)).await {
            Ok(body) => serde_json::from_str(&body).unwrap_or_default(),
            Err(_) => T::default(),
        }
    }

    async fn write_doc<T>(&self, name: &str, value: &T) -> Result<(), StorageError>
    where
        T: Serialize,
    {
        let body = serde_json::to_string_pretty(value)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        tokio::fs::write(self.path(name), body)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))
    }
}

//
// ─── REPOSITORY IMPLS ──────────────────────────────────────────────────────────
//

#[async_trait]
impl QuestionBankSource for JsonStore {
    async fn load_bank(&self) -> Result<QuestionBank, StorageError> {
        let doc: QuestionBankDoc = self.read_doc(QUESTIONS_FILE).await;
        Ok(bank_from_doc(doc))
    }
}

#[async_trait]
impl UserRepository for JsonStore {
    async fn get_user(&self, username: &str) -> Result<Option<Credentials>, StorageError> {
        let doc: UsersDoc = self.read_doc(USERS_FILE).await;
        let Some(record) = doc.get(username) else {
            return Ok(None);
        };
        Credentials::new(username, record.password.clone())
            .map(Some)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    async fn upsert_user(&self, credentials: &Credentials) -> Result<(), StorageError> {
        let mut doc: UsersDoc = self.read_doc(USERS_FILE).await;
        doc.insert(
            credentials.username().to_owned(),
            UserDoc {
                password: credentials.password().to_owned(),
            },
        );
        self.write_doc(USERS_FILE, &doc).await
    }
}

#[async_trait]
impl LeaderboardRepository for JsonStore {
    async fn load_leaderboard(&self) -> Result<Leaderboard, StorageError> {
        let doc: LeaderboardDoc = self.read_doc(LEADERBOARD_FILE).await;
        Ok(Leaderboard::new(doc))
    }

    async fn record_score(&self, username: &str, score: u32) -> Result<(), StorageError> {
        let mut doc: LeaderboardDoc = self.read_doc(LEADERBOARD_FILE).await;
        doc.insert(username.to_owned(), score);
        self.write_doc(LEADERBOARD_FILE, &doc).await
    }
}

#[async_trait]
impl HistoryRepository for JsonStore {
    async fn load_history(&self) -> Result<History, StorageError> {
        let doc: HistoryDoc = self.read_doc(HISTORY_FILE).await;
        Ok(History::new(doc))
    }

    async fn append_score(
        &self,
        username: &str,
        category: &str,
        score: u32,
    ) -> Result<(), StorageError> {
        let mut doc: HistoryDoc = self.read_doc(HISTORY_FILE).await;
        doc.entry(username.to_owned())
            .or_default()
            .entry(category.to_owned())
            .or_default()
            .push(score);
        self.write_doc(HISTORY_FILE, &doc).await
    }
}

#[async_trait]
impl TaskRepository for JsonStore {
    async fn insert_new_task(&self, record: NewTaskRecord) -> Result<TaskId, StorageError> {
        let mut doc: TasksDoc = self.read_doc(TASKS_FILE).await;
        if doc.next_id == 0 {
            // Fresh document, or one predating the persisted counter:
            // resume after the highest id ever written.
            doc.next_id = doc.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        }

        let id = TaskId::new(doc.next_id);
        let task = Task::new(
            id,
            record.title,
            record.description,
            record.priority,
            record.created_at,
        )
        .map_err(|e| StorageError::Serialization(e.to_string()))?;

        doc.tasks.push(TaskDoc::from_task(&task));
        doc.next_id += 1;
        self.write_doc(TASKS_FILE, &doc).await?;
        Ok(id)
    }

    async fn get_task(&self, id: TaskId) -> Result<Option<Task>, StorageError> {
        let doc: TasksDoc = self.read_doc(TASKS_FILE).await;
        doc.tasks
            .into_iter()
            .find(|t| t.id == id.value())
            .map(TaskDoc::into_task)
            .transpose()
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, StorageError> {
        let doc: TasksDoc = self.read_doc(TASKS_FILE).await;
        doc.tasks.into_iter().map(TaskDoc::into_task).collect()
    }

    async fn upsert_task(&self, task: &Task) -> Result<(), StorageError> {
        let mut doc: TasksDoc = self.read_doc(TASKS_FILE).await;
        match doc.tasks.iter_mut().find(|t| t.id == task.id().value()) {
            Some(slot) => *slot = TaskDoc::from_task(task),
            None => doc.tasks.push(TaskDoc::from_task(task)),
        }
        self.write_doc(TASKS_FILE, &doc).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), StorageError> {
        let mut doc: TasksDoc = self.read_doc(TASKS_FILE).await;
        let before = doc.tasks.len();
        doc.tasks.retain(|t| t.id != id.value());
        if doc.tasks.len() == before {
            return Err(StorageError::NotFound);
        }
        self.write_doc(TASKS_FILE, &doc).await
    }
}

impl Storage {
    /// Build a `Storage` backed by JSON documents under `dir`.
    ///
    /// # Errors
    ///
    /// Returns `JsonInitError` if the directory cannot be prepared.
    pub async fn json_dir(dir: impl AsRef<Path>) -> Result<Self, JsonInitError> {
        let store = JsonStore::open(dir).await?;
        Ok(Self {
            bank: Arc::new(store.clone()),
            users: Arc::new(store.clone()),
            leaderboard: Arc::new(store.clone()),
            history: Arc::new(store.clone()),
            tasks: Arc::new(store),
        })
    }
}
