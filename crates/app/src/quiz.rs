use std::io::Write;
use std::time::Duration;

use services::{SessionError, SessionLoopService, TickOutcome};
use storage::repository::QuestionBankSource;

use crate::console::Console;

/// Category pick and question loop for one quiz run.
///
/// One countdown tick is one wall-clock second; the answer prompt and the
/// ticker race in a `select!`, so a slow answer simply loses the question.
pub async fn run_quiz(
    console: &mut Console,
    bank: &dyn QuestionBankSource,
    sessions: &SessionLoopService,
    username: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(category) = pick_category(console, bank).await? else {
        return Ok(());
    };

    let mut session = match sessions.start_session(username, &category).await {
        Ok(session) => session,
        Err(SessionError::EmptyCategory { name }) => {
            println!("The {name} category has no questions yet.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    println!(
        "\nStarting {} quiz: {} questions, {} seconds each.",
        session.category(),
        session.total_questions(),
        services::QUESTION_TIME_LIMIT
    );

    while let Some(question) = session.present().cloned() {
        println!("\n{}", question.text());
        for (index, option) in question.options().iter().enumerate() {
            println!("  {}. {option}", index + 1);
        }
        print!("Answer: ");
        std::io::stdout().flush()?;

        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        // The first tick fires immediately; consume it so ticks line up
        // with elapsed seconds.
        ticker.tick().await;

        let selection = loop {
            tokio::select! {
                line = console.next_line() => {
                    let Some(input) = line? else {
                        // Stdin closed mid-question: abandon the run.
                        return Ok(());
                    };
                    match input.parse::<usize>() {
                        Ok(n) if (1..=question.options().len()).contains(&n) => {
                            break Some(question.options()[n - 1].clone());
                        }
                        _ => {
                            println!(
                                "Enter an option number between 1 and {}.",
                                question.options().len()
                            );
                            print!("Answer: ");
                            std::io::stdout().flush()?;
                        }
                    }
                }
                _ = ticker.tick() => {
                    match sessions.tick(&mut session).await? {
                        TickOutcome::Expired => {
                            println!("\nTime's up! The answer was {}.", question.answer());
                            break None;
                        }
                        TickOutcome::Running { remaining } if remaining == 5 => {
                            println!("\n5 seconds left...");
                            print!("Answer: ");
                            std::io::stdout().flush()?;
                        }
                        _ => {}
                    }
                }
            }
        };

        if let Some(selected) = selection {
            let outcome = sessions.answer_current(&mut session, &selected).await?;
            if outcome.correct {
                println!("Correct!");
            } else {
                println!("Wrong. The answer was {}.", outcome.correct_answer);
            }
        }
    }

    if let Some(score) = session.final_score() {
        println!("\nQuiz complete! You scored {score}.");
    }
    Ok(())
}

async fn pick_category(
    console: &mut Console,
    bank: &dyn QuestionBankSource,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let bank = bank.load_bank().await?;
    let names = bank.category_names();
    if names.is_empty() {
        println!("No categories available. Add some questions first.");
        return Ok(None);
    }

    println!("\nCategories:");
    for (index, name) in names.iter().enumerate() {
        println!("  {}. {name}", index + 1);
    }
    let Some(choice) = console.prompt_choice("Pick a category: ", names.len()).await? else {
        return Ok(None);
    };
    Ok(Some(names[choice - 1].to_owned()))
}
