use quiz_core::model::{Credentials, TaskId, TaskPriority};
use quiz_core::time::fixed_now;
use storage::json::{JsonStore, LEADERBOARD_FILE, QUESTIONS_FILE};
use storage::repository::{
    HistoryRepository, LeaderboardRepository, NewTaskRecord, QuestionBankSource, StorageError,
    TaskRepository, UserRepository,
};

fn task_record(title: &str) -> NewTaskRecord {
    NewTaskRecord {
        title: title.to_owned(),
        description: None,
        priority: TaskPriority::Medium,
        created_at: fixed_now(),
    }
}

#[tokio::test]
async fn open_seeds_sample_question_bank() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::open(dir.path()).await.unwrap();

    let bank = store.load_bank().await.unwrap();
    assert_eq!(bank.category_names(), vec!["Math", "Science"]);
    assert_eq!(bank.questions("Math").unwrap().len(), 2);

    // Seed file is pretty-printed JSON on disk.
    let raw = std::fs::read_to_string(dir.path().join(QUESTIONS_FILE)).unwrap();
    assert!(raw.contains("\n    "));
}

#[tokio::test]
async fn open_keeps_existing_question_bank() {
    let dir = tempfile::tempdir().unwrap();
    let custom = r#"{"Capitals": [{"question": "Capital of France?", "options": ["Paris", "Rome"], "answer": "Paris"}]}"#;
    std::fs::write(dir.path().join(QUESTIONS_FILE), custom).unwrap();

    let store = JsonStore::open(dir.path()).await.unwrap();
    let bank = store.load_bank().await.unwrap();
    assert_eq!(bank.category_names(), vec!["Capitals"]);
}

#[tokio::test]
async fn malformed_document_degrades_to_empty_default() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::open(dir.path()).await.unwrap();
    std::fs::write(dir.path().join(LEADERBOARD_FILE), "{ not json").unwrap();

    let board = store.load_leaderboard().await.unwrap();
    assert!(board.is_empty());

    // The store stays writable after the bad read.
    store.record_score("ada", 4).await.unwrap();
    let board = store.load_leaderboard().await.unwrap();
    assert_eq!(board.score("ada"), Some(4));
}

#[tokio::test]
async fn users_round_trip_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = JsonStore::open(dir.path()).await.unwrap();
        let creds = Credentials::new("ada", "s3cret").unwrap();
        store.upsert_user(&creds).await.unwrap();
    }

    let store = JsonStore::open(dir.path()).await.unwrap();
    let fetched = store.get_user("ada").await.unwrap().unwrap();
    assert!(fetched.password_matches("s3cret"));
    assert!(store.get_user("bob").await.unwrap().is_none());
}

#[tokio::test]
async fn leaderboard_overwrites_and_history_appends() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::open(dir.path()).await.unwrap();

    store.record_score("ada", 2).await.unwrap();
    store.record_score("ada", 1).await.unwrap();
    store.append_score("ada", "Math", 2).await.unwrap();
    store.append_score("ada", "Math", 1).await.unwrap();

    let board = store.load_leaderboard().await.unwrap();
    assert_eq!(board.score("ada"), Some(1));

    let history = store.load_history().await.unwrap();
    assert_eq!(history.scores("ada", "Math"), &[2, 1]);
}

#[tokio::test]
async fn task_ids_survive_delete_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let first;
    let second;
    {
        let store = JsonStore::open(dir.path()).await.unwrap();
        first = store.insert_new_task(task_record("a")).await.unwrap();
        second = store.insert_new_task(task_record("b")).await.unwrap();
        store.delete_task(first).await.unwrap();
    }

    let store = JsonStore::open(dir.path()).await.unwrap();
    let third = store.insert_new_task(task_record("c")).await.unwrap();

    assert_eq!(first, TaskId::new(1));
    assert_eq!(second, TaskId::new(2));
    assert_eq!(third, TaskId::new(3));

    let tasks = store.list_tasks().await.unwrap();
    let ids: Vec<u64> = tasks.iter().map(|t| t.id().value()).collect();
    assert_eq!(ids, vec![2, 3]);
}

#[tokio::test]
async fn delete_missing_task_reports_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::open(dir.path()).await.unwrap();
    let err = store.delete_task(TaskId::new(9)).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn complete_task_persists_status() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::open(dir.path()).await.unwrap();

    let id = store.insert_new_task(task_record("finish draft")).await.unwrap();
    let mut task = store.get_task(id).await.unwrap().unwrap();
    task.complete(fixed_now());
    store.upsert_task(&task).await.unwrap();

    let reloaded = store.get_task(id).await.unwrap().unwrap();
    assert!(reloaded.is_completed());
    assert_eq!(reloaded.completed_at(), Some(fixed_now()));
}
