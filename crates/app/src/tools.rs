//! Password tools and the calculator screen.

use std::collections::BTreeSet;

use quiz_core::password::{CharClass, StrengthLabel, strength_score};
use services::{PasswordError, password_service};

use crate::console::Console;

/// Shortest password the generator screen will accept.
const MIN_GENERATED_LENGTH: usize = 4;

pub async fn run_password_tools(console: &mut Console) -> std::io::Result<()> {
    loop {
        println!("\nPassword tools:");
        println!("  1. Check strength");
        println!("  2. Generate a password");
        println!("  3. Back");
        match console.prompt_choice("> ", 3).await? {
            Some(1) => check_strength(console).await?,
            Some(2) => generate_password(console).await?,
            _ => return Ok(()),
        }
    }
}

async fn check_strength(console: &mut Console) -> std::io::Result<()> {
    let Some(password) = console.prompt("Password to check: ").await? else {
        return Ok(());
    };
    let score = strength_score(&password);
    println!(
        "Strength: {}/100 ({})",
        score,
        StrengthLabel::from_score(score)
    );
    Ok(())
}

async fn generate_password(console: &mut Console) -> std::io::Result<()> {
    let length = loop {
        let Some(line) = console
            .prompt(&format!("Length (at least {MIN_GENERATED_LENGTH}): "))
            .await?
        else {
            return Ok(());
        };
        match line.parse::<usize>() {
            Ok(n) if n >= MIN_GENERATED_LENGTH => break n,
            _ => println!("Enter a whole number of at least {MIN_GENERATED_LENGTH}."),
        }
    };

    let mut classes = BTreeSet::new();
    for (class, label) in [
        (CharClass::Lower, "lowercase letters"),
        (CharClass::Upper, "uppercase letters"),
        (CharClass::Digit, "digits"),
        (CharClass::Symbol, "symbols"),
    ] {
        let Some(wanted) = console
            .prompt_yes_no(&format!("Include {label}? (y/n) "))
            .await?
        else {
            return Ok(());
        };
        if wanted {
            classes.insert(class);
        }
    }

    match password_service::generate(length, &classes) {
        Ok(password) => {
            let score = strength_score(&password);
            println!("Generated: {password}");
            println!(
                "Strength: {}/100 ({})",
                score,
                StrengthLabel::from_score(score)
            );
        }
        Err(PasswordError::NoClassSelected) => {
            println!("Pick at least one character class.");
        }
        Err(err) => println!("{err}"),
    }
    Ok(())
}

pub async fn run_calculator(console: &mut Console) -> std::io::Result<()> {
    println!("\nCalculator. Enter expressions like `2 + 3`, or `back` to leave.");
    loop {
        let Some(line) = console.prompt("> ").await? else {
            return Ok(());
        };
        if line.eq_ignore_ascii_case("back") || line.eq_ignore_ascii_case("q") {
            return Ok(());
        }
        match evaluate_line(&line) {
            Ok(result) => println!("= {result}"),
            Err(message) => println!("{message}"),
        }
    }
}

fn evaluate_line(line: &str) -> Result<f64, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let [lhs, op, rhs] = parts.as_slice() else {
        return Err("Expected `<number> <op> <number>`, e.g. `2 + 3`.".to_owned());
    };

    let lhs: f64 = lhs.parse().map_err(|_| format!("Not a number: {lhs}"))?;
    let rhs: f64 = rhs.parse().map_err(|_| format!("Not a number: {rhs}"))?;
    let op = quiz_core::calculator::BinaryOp::parse(op).map_err(|e| e.to_string())?;
    quiz_core::calculator::evaluate(lhs, op, rhs).map_err(|e| e.to_string())
}
