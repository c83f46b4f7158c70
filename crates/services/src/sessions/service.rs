use chrono::{DateTime, Utc};
use rand::Rng;
use rand::rng;
use rand::seq::SliceRandom;

use quiz_core::model::{Question, QuestionBank};

use crate::error::SessionError;
use crate::sessions::countdown::{Countdown, QUESTION_TIME_LIMIT, TickOutcome};
use crate::sessions::progress::SessionProgress;

//
// ─── SESSION QUESTION ──────────────────────────────────────────────────────────
//

/// One question as the session presents it.
///
/// A copy of the bank question with its options reshuffled for this run;
/// the bank's own order never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionQuestion {
    text: String,
    options: Vec<String>,
    answer: String,
}

impl SessionQuestion {
    fn from_question<R: Rng>(question: &Question, rng: &mut R) -> Self {
        let mut options = question.options().to_vec();
        options.shuffle(rng);
        Self {
            text: question.text().to_owned(),
            options,
            answer: question.answer().to_owned(),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Options in this session's presentation order.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn is_correct(&self, selected: &str) -> bool {
        self.answer == selected
    }
}

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// What a single answer (or timeout) did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    /// The right answer, for feedback after a miss.
    pub correct_answer: String,
    pub is_complete: bool,
}

/// Final result of a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalScore {
    pub score: u32,
    pub total: usize,
}

impl std::fmt::Display for FinalScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.score, self.total)
    }
}

//
// ─── QUIZ SESSION ──────────────────────────────────────────────────────────────
//

/// State machine for one user's run through one category.
///
/// Built by `start`, which snapshots and shuffles the category's questions
/// so the bank itself stays untouched. Each presented question arms a fresh
/// countdown; a tick that expires it counts the question as wrong and moves
/// on, exactly as a wrong answer would. Once every question has been
/// resolved the session is complete and refuses further answers.
#[derive(Debug, Clone)]
pub struct QuizSession {
    username: String,
    category: String,
    questions: Vec<SessionQuestion>,
    current: usize,
    score: u32,
    countdown: Countdown,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    committed: bool,
}

impl QuizSession {
    /// Start a session over one category of the bank.
    ///
    /// Question order and each question's option order are shuffled per
    /// session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidSelection` when the category name is
    /// blank or not in the bank, and `SessionError::EmptyCategory` when the
    /// category exists but holds no questions.
    pub fn start(
        username: impl Into<String>,
        category: &str,
        bank: &QuestionBank,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(SessionError::InvalidSelection);
        }
        let source = bank
            .questions(category)
            .ok_or(SessionError::InvalidSelection)?;
        if source.is_empty() {
            return Err(SessionError::EmptyCategory {
                name: category.to_owned(),
            });
        }

        let mut rng = rng();
        let mut questions: Vec<SessionQuestion> = source
            .iter()
            .map(|q| SessionQuestion::from_question(q, &mut rng))
            .collect();
        questions.shuffle(&mut rng);

        Ok(Self {
            username: username.into(),
            category: category.to_owned(),
            questions,
            current: 0,
            score: 0,
            countdown: Countdown::idle(),
            started_at,
            completed_at: None,
            committed: false,
        })
    }

    /// Present the current question and arm a fresh countdown for it.
    ///
    /// Returns `None` once the session is complete.
    pub fn present(&mut self) -> Option<&SessionQuestion> {
        if self.is_complete() {
            return None;
        }
        self.countdown.start(QUESTION_TIME_LIMIT);
        self.questions.get(self.current)
    }

    /// The current question without touching the countdown.
    #[must_use]
    pub fn current_question(&self) -> Option<&SessionQuestion> {
        if self.is_complete() {
            None
        } else {
            self.questions.get(self.current)
        }
    }

    /// Resolve the current question with the user's selection.
    ///
    /// Scores on exact match, cancels the countdown, and advances. The last
    /// answer marks the session complete.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` when every question has already
    /// been resolved.
    pub fn submit_answer(
        &mut self,
        selected: &str,
        at: DateTime<Utc>,
    ) -> Result<AnswerOutcome, SessionError> {
        let question = self
            .current_question()
            .ok_or(SessionError::Completed)?;
        let correct = question.is_correct(selected);
        let correct_answer = question.answer().to_owned();

        if correct {
            self.score += 1;
        }
        self.advance(at);

        Ok(AnswerOutcome {
            correct,
            correct_answer,
            is_complete: self.is_complete(),
        })
    }

    /// Spend one tick of the current question's budget.
    ///
    /// On expiry the question is resolved as unanswered: no point, advance
    /// to the next question. The caller re-presents to arm the next
    /// countdown.
    pub fn tick(&mut self, at: DateTime<Utc>) -> TickOutcome {
        let outcome = self.countdown.tick();
        if outcome == TickOutcome::Expired && !self.is_complete() {
            self.advance(at);
        }
        outcome
    }

    fn advance(&mut self, at: DateTime<Utc>) {
        self.countdown.cancel();
        self.current += 1;
        if self.current >= self.questions.len() {
            self.completed_at = Some(at);
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Questions resolved so far, answered or timed out.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.current.min(self.questions.len())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    #[must_use]
    pub fn countdown_remaining(&self) -> Option<u32> {
        self.countdown.remaining()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total_questions(),
            answered: self.answered_count(),
            score: self.score,
            is_complete: self.is_complete(),
        }
    }

    /// Final score, available once the session is complete.
    #[must_use]
    pub fn final_score(&self) -> Option<FinalScore> {
        self.is_complete().then(|| FinalScore {
            score: self.score,
            total: self.questions.len(),
        })
    }

    /// Whether the final score has been written out.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    pub(crate) fn mark_committed(&mut self) {
        self.committed = true;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use quiz_core::time::fixed_now;

    use super::*;

    fn math_bank() -> QuestionBank {
        let questions = vec![
            Question::new(
                "What is 5 + 7?",
                vec!["10".into(), "11".into(), "12".into(), "13".into()],
                "12",
            )
            .unwrap(),
            Question::new(
                "What is the square root of 16?",
                vec!["2".into(), "4".into(), "8".into(), "16".into()],
                "4",
            )
            .unwrap(),
        ];
        let mut categories = BTreeMap::new();
        categories.insert("Math".to_owned(), questions);
        categories.insert("Empty".to_owned(), Vec::new());
        QuestionBank::new(categories)
    }

    fn answer_current(session: &mut QuizSession) -> AnswerOutcome {
        let answer = session.current_question().unwrap().answer().to_owned();
        session.submit_answer(&answer, fixed_now()).unwrap()
    }

    #[test]
    fn start_rejects_blank_and_unknown_categories() {
        let bank = math_bank();
        assert!(matches!(
            QuizSession::start("ada", "  ", &bank, fixed_now()),
            Err(SessionError::InvalidSelection)
        ));
        assert!(matches!(
            QuizSession::start("ada", "History", &bank, fixed_now()),
            Err(SessionError::InvalidSelection)
        ));
    }

    #[test]
    fn start_rejects_empty_category() {
        let bank = math_bank();
        let err = QuizSession::start("ada", "Empty", &bank, fixed_now()).unwrap_err();
        assert!(matches!(err, SessionError::EmptyCategory { name } if name == "Empty"));
    }

    #[test]
    fn shuffling_permutes_but_preserves_content() {
        let bank = math_bank();
        let session = QuizSession::start("ada", "Math", &bank, fixed_now()).unwrap();
        assert_eq!(session.total_questions(), 2);

        for question in &session.questions {
            let original = bank
                .questions("Math")
                .unwrap()
                .iter()
                .find(|q| q.text() == question.text())
                .unwrap();
            let mut presented = question.options().to_vec();
            let mut authored = original.options().to_vec();
            presented.sort();
            authored.sort();
            assert_eq!(presented, authored);
            assert!(question.options().contains(&question.answer().to_owned()));
        }
    }

    #[test]
    fn correct_answers_score_and_complete() {
        let bank = math_bank();
        let mut session = QuizSession::start("ada", "Math", &bank, fixed_now()).unwrap();

        assert!(session.present().is_some());
        let first = answer_current(&mut session);
        assert!(first.correct);
        assert!(!first.is_complete);

        session.present();
        let second = answer_current(&mut session);
        assert!(second.is_complete);
        assert_eq!(session.final_score(), Some(FinalScore { score: 2, total: 2 }));
        assert_eq!(session.completed_at(), Some(fixed_now()));
    }

    #[test]
    fn wrong_answer_reports_the_correct_one() {
        let bank = math_bank();
        let mut session = QuizSession::start("ada", "Math", &bank, fixed_now()).unwrap();

        session.present();
        let expected = session.current_question().unwrap().answer().to_owned();
        let outcome = session.submit_answer("not it", fixed_now()).unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.correct_answer, expected);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn completed_session_refuses_answers() {
        let bank = math_bank();
        let mut session = QuizSession::start("ada", "Math", &bank, fixed_now()).unwrap();
        session.present();
        answer_current(&mut session);
        session.present();
        answer_current(&mut session);

        let err = session.submit_answer("12", fixed_now()).unwrap_err();
        assert!(matches!(err, SessionError::Completed));
        assert!(session.present().is_none());
    }

    #[test]
    fn timeout_advances_like_a_wrong_answer() {
        let bank = math_bank();
        let mut session = QuizSession::start("ada", "Math", &bank, fixed_now()).unwrap();

        session.present();
        for _ in 0..QUESTION_TIME_LIMIT - 1 {
            assert!(matches!(
                session.tick(fixed_now()),
                TickOutcome::Running { .. }
            ));
        }
        assert_eq!(session.tick(fixed_now()), TickOutcome::Expired);
        assert_eq!(session.answered_count(), 1);
        assert_eq!(session.score(), 0);

        // Timing out the last question completes the session.
        session.present();
        for _ in 0..QUESTION_TIME_LIMIT {
            session.tick(fixed_now());
        }
        assert!(session.is_complete());
        assert_eq!(session.final_score(), Some(FinalScore { score: 0, total: 2 }));
    }

    #[test]
    fn present_rearms_the_countdown() {
        let bank = math_bank();
        let mut session = QuizSession::start("ada", "Math", &bank, fixed_now()).unwrap();

        session.present();
        session.tick(fixed_now());
        session.tick(fixed_now());
        assert_eq!(session.countdown_remaining(), Some(QUESTION_TIME_LIMIT - 2));

        session.present();
        assert_eq!(session.countdown_remaining(), Some(QUESTION_TIME_LIMIT));
    }

    #[test]
    fn ticks_are_ignored_between_questions() {
        let bank = math_bank();
        let mut session = QuizSession::start("ada", "Math", &bank, fixed_now()).unwrap();

        // No question presented yet, so no countdown armed.
        assert_eq!(session.tick(fixed_now()), TickOutcome::Idle);
        assert_eq!(session.answered_count(), 0);

        session.present();
        answer_current(&mut session);
        assert_eq!(session.tick(fixed_now()), TickOutcome::Idle);
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn progress_tracks_the_run() {
        let bank = math_bank();
        let mut session = QuizSession::start("ada", "Math", &bank, fixed_now()).unwrap();
        session.present();
        answer_current(&mut session);

        let progress = session.progress();
        assert_eq!(progress.total, 2);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.score, 1);
        assert!(!progress.is_complete);
        assert_eq!(progress.remaining(), 1);
    }
}
