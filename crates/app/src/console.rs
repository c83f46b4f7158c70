use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line-oriented stdin wrapper for the interactive screens.
///
/// Every read returns `None` when stdin closes, which callers treat as
/// "leave this screen". `next_line` is cancel safe, so the quiz screen can
/// race it against the countdown ticker.
pub struct Console {
    lines: Lines<BufReader<Stdin>>,
}

impl Console {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Next line, trimmed. `None` at end of input.
    pub async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_owned()))
    }

    /// Print `text` without a newline, flush, and read one line.
    pub async fn prompt(&mut self, text: &str) -> std::io::Result<Option<String>> {
        print!("{text}");
        std::io::stdout().flush()?;
        self.next_line().await
    }

    /// Reprompt until the input is a menu number between 1 and `max`.
    pub async fn prompt_choice(
        &mut self,
        text: &str,
        max: usize,
    ) -> std::io::Result<Option<usize>> {
        loop {
            let Some(line) = self.prompt(text).await? else {
                return Ok(None);
            };
            match line.parse::<usize>() {
                Ok(n) if (1..=max).contains(&n) => return Ok(Some(n)),
                _ => println!("Enter a number between 1 and {max}."),
            }
        }
    }

    /// Reprompt until the input is `y` or `n`.
    pub async fn prompt_yes_no(&mut self, text: &str) -> std::io::Result<Option<bool>> {
        loop {
            let Some(line) = self.prompt(text).await? else {
                return Ok(None);
            };
            match line.to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(Some(true)),
                "n" | "no" => return Ok(Some(false)),
                _ => println!("Enter y or n."),
            }
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
