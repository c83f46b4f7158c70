mod bank;
mod question;
mod scoreboard;
mod task;
mod user;

pub use bank::QuestionBank;
pub use question::{Question, QuestionError};
pub use scoreboard::{History, Leaderboard, LeaderboardEntry};
pub use task::{Task, TaskError, TaskId, TaskPriority, TaskStats, TaskStatus};
pub use user::{Credentials, CredentialsError};
