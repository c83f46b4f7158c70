use std::sync::Arc;

use quiz_core::Clock;
use services::{
    AuthError, AuthService, LEADERBOARD_LIMIT, LoginOutcome, ScoreboardService,
    SessionLoopService, TaskService,
};
use storage::repository::Storage;

use crate::console::Console;
use crate::{quiz, tasks, tools};

/// Everything the interactive screens need, wired over one storage backend.
pub struct AppServices {
    pub storage: Storage,
    pub auth: AuthService,
    pub sessions: SessionLoopService,
    pub scoreboard: ScoreboardService,
    pub tasks: TaskService,
}

impl AppServices {
    #[must_use]
    pub fn new(clock: Clock, storage: Storage) -> Self {
        let auth = AuthService::new(Arc::clone(&storage.users));
        let sessions = SessionLoopService::from_storage(clock, &storage);
        let scoreboard = ScoreboardService::new(
            Arc::clone(&storage.leaderboard),
            Arc::clone(&storage.history),
        );
        let tasks = TaskService::new(clock, Arc::clone(&storage.tasks));
        Self {
            storage,
            auth,
            sessions,
            scoreboard,
            tasks,
        }
    }
}

/// Login, then the main menu until the user quits or stdin closes.
pub async fn run(
    console: &mut Console,
    services: &AppServices,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(username) = login(console, &services.auth).await? else {
        return Ok(());
    };

    loop {
        println!("\nMain menu:");
        println!("  1. Start a quiz");
        println!("  2. Leaderboard");
        println!("  3. My history");
        println!("  4. Password tools");
        println!("  5. Calculator");
        println!("  6. Tasks");
        println!("  7. Quit");
        match console.prompt_choice("> ", 7).await? {
            Some(1) => {
                quiz::run_quiz(
                    console,
                    services.storage.bank.as_ref(),
                    &services.sessions,
                    &username,
                )
                .await?;
            }
            Some(2) => print_leaderboard(&services.scoreboard).await?,
            Some(3) => print_history(&services.scoreboard, &username).await?,
            Some(4) => tools::run_password_tools(console).await?,
            Some(5) => tools::run_calculator(console).await?,
            Some(6) => tasks::run_tasks(console, &services.tasks).await?,
            _ => {
                println!("Bye, {username}!");
                return Ok(());
            }
        }
    }
}

async fn login(
    console: &mut Console,
    auth: &AuthService,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    loop {
        let Some(username) = console.prompt("Username: ").await? else {
            return Ok(None);
        };
        let Some(password) = console.prompt("Password: ").await? else {
            return Ok(None);
        };

        match auth.login(&username, &password).await {
            Ok(LoginOutcome::SignedIn) => {
                println!("Welcome back, {username}!");
                return Ok(Some(username));
            }
            Ok(LoginOutcome::AccountCreated) => {
                println!("New account created. Welcome, {username}!");
                return Ok(Some(username));
            }
            Err(AuthError::IncorrectPassword) => println!("Incorrect password, try again."),
            Err(AuthError::Credentials(err)) => println!("{err}"),
            Err(err) => return Err(err.into()),
        }
    }
}

pub async fn print_leaderboard(
    scoreboard: &ScoreboardService,
) -> Result<(), Box<dyn std::error::Error>> {
    let rows = scoreboard.top(LEADERBOARD_LIMIT).await?;
    if rows.is_empty() {
        println!("The leaderboard is empty. Play a quiz!");
        return Ok(());
    }
    println!("\nLeaderboard:");
    for (rank, row) in rows.iter().enumerate() {
        println!("  {}. {} -- {}", rank + 1, row.username, row.score);
    }
    Ok(())
}

async fn print_history(
    scoreboard: &ScoreboardService,
    username: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let logs = scoreboard.history_for(username).await?;
    if logs.is_empty() {
        println!("No quiz history yet.");
        return Ok(());
    }
    println!("\nYour history:");
    for log in logs {
        let scores: Vec<String> = log.scores.iter().map(u32::to_string).collect();
        println!("  {}: {}", log.category, scores.join(", "));
    }
    Ok(())
}
