use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use quiz_core::model::{Question, QuestionBank, Task, TaskId, TaskPriority, TaskStatus};
use serde::{Deserialize, Serialize};

use crate::repository::StorageError;

//
// ─── QUESTION BANK DOCUMENT ────────────────────────────────────────────────────
//

/// Wire shape of one question inside `questions.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDoc {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

/// `questions.json`: category name → ordered question list.
pub type QuestionBankDoc = BTreeMap<String, Vec<QuestionDoc>>;

impl QuestionDoc {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            question: question.text().to_owned(),
            options: question.options().to_vec(),
            answer: question.answer().to_owned(),
        }
    }
}

/// Convert a parsed document into the domain bank.
///
/// Entries that fail validation (blank text, answer missing from the
/// options) are dropped rather than failing the whole load, matching the
/// degrade-to-default policy for corrupt documents.
#[must_use]
pub fn bank_from_doc(doc: QuestionBankDoc) -> QuestionBank {
    let categories = doc
        .into_iter()
        .map(|(category, entries)| {
            let questions = entries
                .into_iter()
                .filter_map(|entry| Question::new(entry.question, entry.options, entry.answer).ok())
                .collect();
            (category, questions)
        })
        .collect();
    QuestionBank::new(categories)
}

//
// ─── USERS DOCUMENT ────────────────────────────────────────────────────────────
//

/// Wire shape of one credential record inside `users.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDoc {
    pub password: String,
}

/// `users.json`: username → credential record.
pub type UsersDoc = BTreeMap<String, UserDoc>;

//
// ─── LEADERBOARD / HISTORY DOCUMENTS ───────────────────────────────────────────
//

/// `leaderboard.json`: username → latest score.
pub type LeaderboardDoc = BTreeMap<String, u32>;

/// `history.json`: username → category → appended scores.
pub type HistoryDoc = BTreeMap<String, BTreeMap<String, Vec<u32>>>;

//
// ─── TASKS DOCUMENT ────────────────────────────────────────────────────────────
//

/// Wire shape of one task inside `tasks.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDoc {
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// `tasks.json`: id counter plus the task list.
///
/// `next_id` persists the id assignment across runs so deleted ids are
/// never recycled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TasksDoc {
    pub next_id: u64,
    pub tasks: Vec<TaskDoc>,
}

impl TaskDoc {
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id().value(),
            title: task.title().to_owned(),
            description: task.description().map(str::to_owned),
            priority: task.priority(),
            status: task.status(),
            created_at: task.created_at(),
            completed_at: task.completed_at(),
        }
    }

    /// Convert the record back into a domain `Task`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored fields fail
    /// domain validation.
    pub fn into_task(self) -> Result<Task, StorageError> {
        Task::from_persisted(
            TaskId::new(self.id),
            self.title,
            self.description,
            self.priority,
            self.status,
            self.created_at,
            self.completed_at,
        )
        .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

//
// ─── SAMPLE DATA ───────────────────────────────────────────────────────────────
//

/// The stock question bank written on first run when `questions.json` is
/// missing.
#[must_use]
pub fn sample_bank_doc() -> QuestionBankDoc {
    let entry = |question: &str, options: &[&str], answer: &str| QuestionDoc {
        question: question.to_owned(),
        options: options.iter().map(|o| (*o).to_owned()).collect(),
        answer: answer.to_owned(),
    };

    let mut doc = QuestionBankDoc::new();
    doc.insert(
        "Science".to_owned(),
        vec![
            entry(
                "What is the chemical symbol for water?",
                &["H2O", "O2", "CO2", "NaCl"],
                "H2O",
            ),
            entry(
                "What planet is known as the Red Planet?",
                &["Earth", "Mars", "Jupiter", "Venus"],
                "Mars",
            ),
        ],
    );
    doc.insert(
        "Math".to_owned(),
        vec![
            entry("What is 5 + 7?", &["10", "11", "12", "13"], "12"),
            entry("What is the square root of 16?", &["2", "4", "8", "16"], "4"),
        ],
    );
    doc
}
