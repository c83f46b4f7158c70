//! Application services: quiz sessions, login, score views, password
//! generation, and the task list.
//!
//! Everything here is a plain value or a service over `Arc<dyn Repo>`
//! handles from the storage crate; no service owns a thread or a timer.

#![forbid(unsafe_code)]

pub mod auth_service;
pub mod error;
pub mod password_service;
pub mod scoreboard_service;
pub mod sessions;
pub mod task_service;

pub use auth_service::{AuthService, LoginOutcome};
pub use error::{AuthError, PasswordError, SessionError, TaskServiceError};
pub use scoreboard_service::{CategoryHistory, LEADERBOARD_LIMIT, ScoreboardService};
pub use sessions::{
    AnswerOutcome, Countdown, FinalScore, QUESTION_TIME_LIMIT, QuizSession, SessionLoopService,
    SessionProgress, SessionQuestion, TickOutcome,
};
pub use task_service::TaskService;
