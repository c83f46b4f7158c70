//! Quiz sessions: the per-run state machine, its countdown, and the
//! service that drives them against storage.

mod countdown;
mod progress;
mod service;
mod workflow;

pub use countdown::{Countdown, QUESTION_TIME_LIMIT, TickOutcome};
pub use progress::SessionProgress;
pub use service::{AnswerOutcome, FinalScore, QuizSession, SessionQuestion};
pub use workflow::SessionLoopService;
