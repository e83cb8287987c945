use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use trivia_quiz::{Quiz, QuizSettings, SelectionKey, config::DEFAULT_TIME_LIMIT_SECS};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding Questions.json, Categories.json,
    /// DifficultyLevels.json and AnotherAnswers.json
    #[arg(short, long, env = "QUIZ_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Seconds allowed per question
    #[arg(short, long, env = "QUIZ_TIME_LIMIT", default_value_t = DEFAULT_TIME_LIMIT_SECS,
          value_parser = clap::value_parser!(u32).range(1..))]
    time_limit: u32,

    /// Preselect a category by id or name
    #[arg(long)]
    category: Option<String>,

    /// Preselect the number of questions
    #[arg(long)]
    count: Option<String>,

    /// Preselect a difficulty level by id or name
    #[arg(long)]
    difficulty: Option<String>,

    /// Write logs to this file (the terminal is taken by the quiz)
    #[arg(long, env = "QUIZ_LOG_FILE")]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "trivia_quiz=info".into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        if let Err(e) = init_logging(path) {
            eprintln!("Failed to open log file {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }

    let settings = QuizSettings::default().with_time_limit(args.time_limit);
    let mut quiz = match Quiz::from_data_dir(&args.data_dir, settings) {
        Ok(quiz) => quiz,
        Err(e) => {
            error!(%e, "data unavailable");
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    info!(data_dir = %args.data_dir.display(), time_limit = args.time_limit, "starting quiz");

    let preselected = [
        (SelectionKey::Category, args.category),
        (SelectionKey::NumberOfQuestions, args.count),
        (SelectionKey::DifficultyLevel, args.difficulty),
    ];
    let mut ready = false;
    for (key, value) in preselected {
        if let Some(value) = value {
            match quiz.preselect(key, value) {
                Ok(can_start) => ready = can_start,
                Err(e) => warn!(%e, %key, "preselection ignored"),
            }
        }
    }
    if ready {
        // A failed start leaves the configuration screen up with the error shown.
        if let Err(e) = quiz.start() {
            warn!(%e, "could not start preselected quiz");
        }
    }

    if let Err(e) = quiz.run().await {
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}
