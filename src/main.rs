//! cardiocheck: heart disease screening from one JSON submission.
//!
//! ```bash
//! cardiocheck [--model <path>] [--input <file>|-]   # predict one submission
//! cardiocheck --describe                             # print the field table as JSON
//! cardiocheck --check [--model <path>]               # load the model and report
//! ```
//!
//! stdout carries only the result; logs go to stderr or a file.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cardiocheck::adapters::logistic::LogisticClassifier;
use cardiocheck::application::AssessmentService;
use cardiocheck::config::{AppConfig, LogMode};
use cardiocheck::domain::FIELD_SPECS;
use cardiocheck::ports::Classifier;
use cardiocheck::{CardiocheckError, RawValues};

const EXIT_FAILURE: u8 = 1;
const EXIT_INVALID_INPUT: u8 = 2;
const EXIT_USAGE: u8 = 64;

#[derive(Debug)]
enum Command {
    Predict { input: Option<PathBuf> },
    Describe,
    Check,
}

#[derive(Debug)]
struct Args {
    command: Command,
    model: Option<PathBuf>,
}

fn usage() -> String {
    "Usage: cardiocheck [--model <path>] [--input <file>|-] | --describe | --check [--model <path>]"
        .to_string()
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut args = args.into_iter();
    let mut model: Option<PathBuf> = None;
    let mut input: Option<PathBuf> = None;
    let mut describe = false;
    let mut check = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--model" => {
                let v = args.next().ok_or_else(usage)?;
                model = Some(PathBuf::from(v));
            }
            "--input" => {
                let v = args.next().ok_or_else(usage)?;
                input = (v != "-").then(|| PathBuf::from(v));
            }
            "--describe" => describe = true,
            "--check" => check = true,
            _ => return Err(usage()),
        }
    }

    let command = match (describe, check) {
        (true, true) => return Err(usage()),
        (true, false) => Command::Describe,
        (false, true) => Command::Check,
        (false, false) => Command::Predict { input },
    };
    Ok(Args { command, model })
}

fn init_logging(config: &AppConfig) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let (writer, guard) = match config.log_mode {
        LogMode::File => {
            if let Some(parent) = config.log_file.parent() {
                // Best-effort: a missing directory surfaces on open below.
                let _ = std::fs::create_dir_all(parent);
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&config.log_file)
                .with_context(|| format!("opening log file {:?}", config.log_file))?;
            tracing_appender::non_blocking(file)
        }
        LogMode::Stderr => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .init();

    Ok(guard)
}

fn read_submission(input: Option<&PathBuf>) -> Result<RawValues, CardiocheckError> {
    let text = match input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(serde_json::from_str(&text)?)
}

fn load_classifier(config: &AppConfig) -> Result<LogisticClassifier, CardiocheckError> {
    let digest = config.expected_digest()?;
    Ok(LogisticClassifier::load(&config.model_path, digest)?)
}

fn run(args: Args, mut config: AppConfig) -> Result<ExitCode> {
    if let Some(model) = args.model {
        config.model_path = model;
    }

    let input = match args.command {
        Command::Describe => {
            println!("{}", serde_json::to_string_pretty(&FIELD_SPECS)?);
            return Ok(ExitCode::SUCCESS);
        }
        Command::Check => {
            // Refuse to serve without a usable model.
            let classifier = load_classifier(&config)
                .with_context(|| format!("model {:?} failed the startup check", config.model_path))?;
            println!(
                "ok: model {} loaded (threshold {})",
                classifier.model_version(),
                classifier.artifact().threshold
            );
            return Ok(ExitCode::SUCCESS);
        }
        Command::Predict { input } => input,
    };

    let classifier = load_classifier(&config)
        .with_context(|| format!("refusing to serve predictions without model {:?}", config.model_path))?;
    let service = AssessmentService::new(Arc::new(classifier));

    let outcome = read_submission(input.as_ref()).and_then(|raw| service.assess(&raw));
    match outcome {
        Ok(assessment) => {
            println!("{}", assessment.message());
            Ok(ExitCode::SUCCESS)
        }
        Err(CardiocheckError::Validation(e)) => {
            eprintln!("Invalid input: {e}. Please correct the value and resubmit.");
            Ok(ExitCode::from(EXIT_INVALID_INPUT))
        }
        Err(e @ CardiocheckError::Inference(_)) => {
            eprintln!("{e}");
            Ok(ExitCode::from(EXIT_FAILURE))
        }
        Err(e) => Err(e.into()),
    }
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let config = AppConfig::from_env();
    let _guard = match init_logging(&config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    tracing::info!("Starting cardiocheck...");

    match run(args, config) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
