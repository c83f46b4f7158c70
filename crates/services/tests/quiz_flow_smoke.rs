//! End-to-end run through the quiz flow against in-memory storage:
//! login, category pick, answers and timeouts, and the score commit.

use std::collections::BTreeMap;
use std::sync::Arc;

use quiz_core::model::{Question, QuestionBank};
use quiz_core::time::fixed_clock;
use services::{
    AuthService, LoginOutcome, QuizSession, ScoreboardService, SessionError, SessionLoopService,
    TickOutcome,
};
use storage::repository::{InMemoryRepository, LeaderboardRepository, Storage};

fn sample_bank() -> QuestionBank {
    let math = vec![
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
    let science = vec![
        Question::new(
            "What is the chemical symbol for water?",
            vec!["H2O".into(), "O2".into(), "CO2".into(), "NaCl".into()],
            "H2O",
        )
        .unwrap(),
    ];

    let mut categories = BTreeMap::new();
    categories.insert("Math".to_owned(), math);
    categories.insert("Science".to_owned(), science);
    QuestionBank::new(categories)
}

fn harness() -> (Storage, SessionLoopService) {
    let storage = Storage::in_memory_with_bank(sample_bank());
    let sessions = SessionLoopService::from_storage(fixed_clock(), &storage);
    (storage, sessions)
}

/// Answer the current question, right or wrong as requested, regardless of
/// the shuffled presentation order.
async fn answer(
    sessions: &SessionLoopService,
    session: &mut QuizSession,
    correctly: bool,
) -> bool {
    let question = session.present().expect("session still has questions");
    let selection = if correctly {
        question.answer().to_owned()
    } else {
        question
            .options()
            .iter()
            .find(|option| !question.is_correct(option))
            .expect("at least one wrong option")
            .clone()
    };
    let outcome = sessions.answer_current(session, &selection).await.unwrap();
    assert_eq!(outcome.correct, correctly);
    outcome.is_complete
}

#[tokio::test]
async fn full_run_commits_score_and_history() {
    let (storage, sessions) = harness();
    let auth = AuthService::new(Arc::clone(&storage.users));
    let scoreboard =
        ScoreboardService::new(Arc::clone(&storage.leaderboard), Arc::clone(&storage.history));

    assert_eq!(
        auth.login("ada", "s3cret").await.unwrap(),
        LoginOutcome::AccountCreated
    );

    let mut session = sessions.start_session("ada", "Math").await.unwrap();
    assert_eq!(session.total_questions(), 2);

    let complete = answer(&sessions, &mut session, true).await;
    assert!(!complete);
    let complete = answer(&sessions, &mut session, false).await;
    assert!(complete);

    let final_score = session.final_score().unwrap();
    assert_eq!((final_score.score, final_score.total), (1, 2));

    let top = scoreboard.top(5).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].username, "ada");
    assert_eq!(top[0].score, 1);

    let logs = scoreboard.history_for("ada").await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].category, "Math");
    assert_eq!(logs[0].scores, vec![1]);
}

#[tokio::test]
async fn second_run_overwrites_leaderboard_but_extends_history() {
    let (storage, sessions) = harness();
    let scoreboard =
        ScoreboardService::new(Arc::clone(&storage.leaderboard), Arc::clone(&storage.history));

    let mut first = sessions.start_session("ada", "Math").await.unwrap();
    answer(&sessions, &mut first, true).await;
    answer(&sessions, &mut first, true).await;

    let mut second = sessions.start_session("ada", "Math").await.unwrap();
    answer(&sessions, &mut second, false).await;
    answer(&sessions, &mut second, false).await;

    let board = storage.leaderboard.load_leaderboard().await.unwrap();
    assert_eq!(board.score("ada"), Some(0));

    let logs = scoreboard.history_for("ada").await.unwrap();
    assert_eq!(logs[0].scores, vec![2, 0]);
}

#[tokio::test]
async fn timeouts_count_as_wrong_answers() {
    let (storage, sessions) = harness();

    let mut session = sessions.start_session("ada", "Science").await.unwrap();
    session.present();
    loop {
        if sessions.tick(&mut session).await.unwrap() == TickOutcome::Expired {
            break;
        }
    }

    assert!(session.is_complete());
    let board = storage.leaderboard.load_leaderboard().await.unwrap();
    assert_eq!(board.score("ada"), Some(0));
}

#[tokio::test]
async fn bad_category_picks_fail_before_any_state_change() {
    let (storage, sessions) = harness();

    let err = sessions.start_session("ada", "History").await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidSelection));
    let err = sessions.start_session("ada", "   ").await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidSelection));

    let board = storage.leaderboard.load_leaderboard().await.unwrap();
    assert!(board.is_empty());
}

#[tokio::test]
async fn shuffled_presentation_covers_the_whole_category() {
    let repo = InMemoryRepository::with_bank(sample_bank());
    let sessions = SessionLoopService::new(
        fixed_clock(),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
    );

    let mut session = sessions.start_session("ada", "Math").await.unwrap();
    let mut texts = Vec::new();
    while let Some(question) = session.present() {
        texts.push(question.text().to_owned());
        let selection = question.answer().to_owned();
        sessions.answer_current(&mut session, &selection).await.unwrap();
    }

    texts.sort();
    assert_eq!(
        texts,
        vec![
            "What is 5 + 7?".to_owned(),
            "What is the square root of 16?".to_owned(),
        ]
    );
    assert_eq!(session.final_score().unwrap().score, 2);
}
