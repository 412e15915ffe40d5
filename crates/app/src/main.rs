use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use quiz_core::model::EntryDraft;
use services::{AppendError, Clock, QuizLoopService, QuizPhase, QuizSession, SessionError, SubmitOutcome};
use storage::repository::{BankRepository, Storage};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidBankPath { raw: String },
    InvalidSeed { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidBankPath { raw } => write!(f, "invalid --bank value: {raw}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- quiz [--bank <path>] [--seed <u64>]");
    eprintln!("  cargo run -p app -- seed [--bank <path>]   # fill an empty bank with starters");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --bank bank.json");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_BANK_PATH");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Quiz,
    Seed,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "quiz" => Some(Self::Quiz),
            "seed" => Some(Self::Seed),
            _ => None,
        }
    }
}

struct Args {
    bank_path: PathBuf,
    seed: Option<u64>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut bank_path = std::env::var("QUIZ_BANK_PATH")
            .ok()
            .map_or_else(|| PathBuf::from("bank.json"), PathBuf::from);
        let mut seed = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bank" => {
                    let value = require_value(args, "--bank")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidBankPath { raw: value });
                    }
                    bank_path = PathBuf::from(value);
                }
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let parsed: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    seed = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { bank_path, seed })
    }
}

// Make sure the bank file exists so users can find and edit it.
fn prepare_bank_file(path: &Path) -> Result<(), io::Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    if !path.exists() {
        std::fs::write(path, "{}\n")?;
    }
    Ok(())
}

const STARTER_ENTRIES: &[(&str, &str, &str)] = &[
    ("greetings", "hello", "hola"),
    ("greetings", "goodbye", "adiós"),
    ("food", "apple", "manzana"),
    ("food", "bread", "pan"),
    ("numbers", "one", "uno"),
    ("numbers", "two", "dos"),
];

async fn seed_bank(storage: &Storage) -> Result<(), Box<dyn std::error::Error>> {
    let mut added = 0;
    for (category, prompt, answer) in STARTER_ENTRIES {
        let entry = EntryDraft::new(*category, *prompt, *answer).validate()?;
        match storage.bank.append_entry(&entry).await {
            Ok(()) => added += 1,
            Err(storage::StorageError::Duplicate) => {
                eprintln!("skipping existing entry: {category} / {prompt}");
            }
            Err(err) => return Err(err.into()),
        }
    }
    println!("seeded {added} entries.");
    Ok(())
}

fn show_question(session: &QuizSession) {
    match session.current_entry() {
        Some(entry) => {
            let progress = session.progress();
            println!();
            println!(
                "[{} answered, {} remaining]",
                progress.answered, progress.remaining
            );
            println!("Category: {}", entry.category);
            println!("Question: {}", entry.prompt);
            print!("> ");
            let _ = io::stdout().flush();
        }
        None => println!("The bank is empty. Use /add to create some entries first."),
    }
}

fn render_results(session: &QuizSession) {
    println!();
    println!("User Answers");
    for (index, record) in session.record().iter().enumerate() {
        let verdict = if record.is_correct {
            "✔".to_string()
        } else {
            format!("✘ (correct: {})", record.entry.answer)
        };
        println!(
            "{}. {} - {}: {} {}",
            index + 1,
            record.entry.category,
            record.entry.prompt,
            record.user_answer,
            verdict
        );
    }
    if let Ok(summary) = session.summary() {
        println!("{} of {} correct.", summary.correct(), summary.total());
    }
}

async fn handle_add(
    loop_svc: &QuizLoopService,
    session: &mut QuizSession,
    rest: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut parts = rest.splitn(3, "::");
    let category = parts.next().unwrap_or_default();
    let prompt = parts.next().unwrap_or_default();
    let answer = parts.next().unwrap_or_default();

    match loop_svc
        .append_entry(session, EntryDraft::new(category, prompt, answer))
        .await
    {
        Ok(_) => println!("Data added successfully!"),
        Err(AppendError::Duplicate) => {
            println!("Duplicate entry detected! Please add unique values.");
        }
        Err(AppendError::Validation(err)) => println!("All fields are required! ({err})"),
        Err(err) => {
            println!("Failed to add data.");
            eprintln!("error: {err}");
        }
    }
    Ok(())
}

async fn run_quiz(
    loop_svc: &QuizLoopService,
    mut session: QuizSession,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Quiz App");
    println!("Type /start to begin. Other commands: /add <category> :: <prompt> :: <answer>,");
    println!("/result, /restart, /quit. Anything else is treated as your answer.");

    let clock = Clock::default_clock();
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();

        if let Some(rest) = input.strip_prefix("/add") {
            handle_add(loop_svc, &mut session, rest).await?;
            continue;
        }

        match input {
            "/quit" => break,
            "/start" | "/restart" => match loop_svc.start_session(&mut session).await {
                Ok(()) => show_question(&session),
                Err(SessionError::InvalidPhase { .. }) => {
                    println!("A quiz is already running. Answer on, or /result to stop early.");
                }
                Err(err) => return Err(err.into()),
            },
            "/result" => {
                if session.phase() == QuizPhase::Active {
                    session.request_results(clock.now())?;
                    render_results(&session);
                    println!("Type /restart to go again.");
                } else if !session.record().is_empty() {
                    render_results(&session);
                } else {
                    println!("Nothing to show yet. /start a quiz first.");
                }
            }
            _ => {
                if session.phase() != QuizPhase::Active {
                    println!("No quiz is running. Type /start to begin.");
                    continue;
                }
                match session.submit_answer(input, clock.now())? {
                    SubmitOutcome::Ignored => show_question(&session),
                    SubmitOutcome::Answered { is_complete, .. } => {
                        if is_complete {
                            println!();
                            println!("Quiz Over");
                            render_results(&session);
                            println!("Type /restart to go again.");
                        } else {
                            show_question(&session);
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Quiz,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Quiz,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            io::Error::new(io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let args = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    prepare_bank_file(&args.bank_path)?;
    let storage = Storage::json_file(&args.bank_path);

    match cmd {
        Command::Seed => seed_bank(&storage).await,
        Command::Quiz => {
            let loop_svc = QuizLoopService::new(Clock::default_clock(), storage.bank);
            let session = match args.seed {
                Some(seed) => QuizSession::with_seed(seed),
                None => QuizSession::new(),
            };
            run_quiz(&loop_svc, session).await
        }
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
