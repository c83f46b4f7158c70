use std::fmt;
use std::path::PathBuf;

use quiz_core::Clock;
use storage::repository::Storage;

mod console;
mod menu;
mod quiz;
mod tasks;
mod tools;

use console::Console;
use menu::AppServices;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- run         [--data-dir <dir>]");
    eprintln!("  cargo run -p app -- leaderboard [--data-dir <dir>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --data-dir quiz-data");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DATA_DIR");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Run,
    Leaderboard,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "run" => Some(Self::Run),
            "leaderboard" => Some(Self::Leaderboard),
            _ => None,
        }
    }
}

struct Args {
    data_dir: PathBuf,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut data_dir = std::env::var("QUIZ_DATA_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| PathBuf::from("quiz-data"), PathBuf::from);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data-dir" => {
                    let value = args.next().ok_or(ArgsError::MissingValue {
                        flag: "--data-dir",
                    })?;
                    data_dir = PathBuf::from(value);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { data_dir })
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: the interactive app when no subcommand is given.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Run,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Run,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open the JSON document directory in the binary glue so core/services
    // stay free of filesystem concerns.
    let storage = Storage::json_dir(&parsed.data_dir).await?;
    let services = AppServices::new(Clock::default_clock(), storage);

    match cmd {
        Command::Run => {
            let mut console = Console::new();
            menu::run(&mut console, &services).await
        }
        Command::Leaderboard => menu::print_leaderboard(&services.scoreboard).await,
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
