use std::sync::Arc;

use quiz_core::Clock;
use storage::repository::{HistoryRepository, LeaderboardRepository, QuestionBankSource, Storage};

use crate::error::SessionError;
use crate::sessions::countdown::TickOutcome;
use crate::sessions::service::{AnswerOutcome, FinalScore, QuizSession};

/// Drives sessions from start to the score commit.
///
/// The session itself is a plain value the caller holds; this service loads
/// the bank, stamps times from its clock, and writes the final score out
/// exactly once per session regardless of whether the last question was
/// answered or timed out.
pub struct SessionLoopService {
    clock: Clock,
    bank: Arc<dyn QuestionBankSource>,
    leaderboard: Arc<dyn LeaderboardRepository>,
    history: Arc<dyn HistoryRepository>,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        bank: Arc<dyn QuestionBankSource>,
        leaderboard: Arc<dyn LeaderboardRepository>,
        history: Arc<dyn HistoryRepository>,
    ) -> Self {
        Self {
            clock,
            bank,
            leaderboard,
            history,
        }
    }

    #[must_use]
    pub fn from_storage(clock: Clock, storage: &Storage) -> Self {
        Self::new(
            clock,
            Arc::clone(&storage.bank),
            Arc::clone(&storage.leaderboard),
            Arc::clone(&storage.history),
        )
    }

    /// Load the bank and start a session over `category`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidSelection` or
    /// `SessionError::EmptyCategory` for bad category picks, and storage
    /// errors from the bank load.
    pub async fn start_session(
        &self,
        username: &str,
        category: &str,
    ) -> Result<QuizSession, SessionError> {
        let bank = self.bank.load_bank().await?;
        QuizSession::start(username, category, &bank, self.clock.now())
    }

    /// Resolve the current question with the user's selection, committing
    /// the final score when this was the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` for answers after the end, and
    /// storage errors from the commit.
    pub async fn answer_current(
        &self,
        session: &mut QuizSession,
        selected: &str,
    ) -> Result<AnswerOutcome, SessionError> {
        let outcome = session.submit_answer(selected, self.clock.now())?;
        if outcome.is_complete {
            self.commit(session).await?;
        }
        Ok(outcome)
    }

    /// Spend one tick, committing when an expiry resolved the last
    /// question.
    ///
    /// # Errors
    ///
    /// Returns storage errors from the commit.
    pub async fn tick(&self, session: &mut QuizSession) -> Result<TickOutcome, SessionError> {
        let outcome = session.tick(self.clock.now());
        if outcome == TickOutcome::Expired && session.is_complete() {
            self.commit(session).await?;
        }
        Ok(outcome)
    }

    /// Write the final score to the leaderboard and the history log.
    ///
    /// Idempotent per session: the leaderboard entry is overwritten with
    /// the latest run and one history row is appended, once.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotComplete` before the last question is
    /// resolved, and storage errors from the writes.
    pub async fn commit(&self, session: &mut QuizSession) -> Result<FinalScore, SessionError> {
        let final_score = session.final_score().ok_or(SessionError::NotComplete)?;
        if session.is_committed() {
            return Ok(final_score);
        }

        self.leaderboard
            .record_score(session.username(), final_score.score)
            .await?;
        self.history
            .append_score(session.username(), session.category(), final_score.score)
            .await?;
        session.mark_committed();
        Ok(final_score)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use quiz_core::model::{Question, QuestionBank};
    use quiz_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    use super::*;

    fn single_question_bank() -> QuestionBank {
        let question = Question::new(
            "What is the chemical symbol for water?",
            vec!["H2O".into(), "O2".into()],
            "H2O",
        )
        .unwrap();
        let mut categories = BTreeMap::new();
        categories.insert("Science".to_owned(), vec![question]);
        QuestionBank::new(categories)
    }

    fn service_over(repo: &InMemoryRepository) -> SessionLoopService {
        SessionLoopService::new(
            fixed_clock(),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
        )
    }

    #[tokio::test]
    async fn answering_the_last_question_commits_once() {
        let repo = InMemoryRepository::with_bank(single_question_bank());
        let service = service_over(&repo);

        let mut session = service.start_session("ada", "Science").await.unwrap();
        session.present();
        let outcome = service.answer_current(&mut session, "H2O").await.unwrap();
        assert!(outcome.correct);
        assert!(outcome.is_complete);
        assert!(session.is_committed());

        // A retried commit is a no-op.
        let score = service.commit(&mut session).await.unwrap();
        assert_eq!(score, FinalScore { score: 1, total: 1 });

        let board = repo.load_leaderboard().await.unwrap();
        assert_eq!(board.score("ada"), Some(1));
        let history = repo.load_history().await.unwrap();
        assert_eq!(history.scores("ada", "Science"), &[1]);
    }

    #[tokio::test]
    async fn timing_out_the_last_question_commits_a_zero() {
        let repo = InMemoryRepository::with_bank(single_question_bank());
        let service = service_over(&repo);

        let mut session = service.start_session("ada", "Science").await.unwrap();
        session.present();
        loop {
            let outcome = service.tick(&mut session).await.unwrap();
            if outcome == TickOutcome::Expired {
                break;
            }
        }

        assert!(session.is_complete());
        assert!(session.is_committed());
        let board = repo.load_leaderboard().await.unwrap();
        assert_eq!(board.score("ada"), Some(0));
        let history = repo.load_history().await.unwrap();
        assert_eq!(history.scores("ada", "Science"), &[0]);
    }

    #[tokio::test]
    async fn commit_before_completion_is_refused() {
        let repo = InMemoryRepository::with_bank(single_question_bank());
        let service = service_over(&repo);

        let mut session = service.start_session("ada", "Science").await.unwrap();
        let err = service.commit(&mut session).await.unwrap_err();
        assert!(matches!(err, SessionError::NotComplete));
    }

    #[tokio::test]
    async fn start_rejects_unknown_category() {
        let repo = InMemoryRepository::with_bank(single_question_bank());
        let service = service_over(&repo);

        let err = service.start_session("ada", "History").await.unwrap_err();
        assert!(matches!(err, SessionError::InvalidSelection));
    }
}
