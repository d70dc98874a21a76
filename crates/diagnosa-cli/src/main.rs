//! Diagnosa CLI - Naive Bayes symptom questionnaire backed by a SQLite case base.

use clap::Parser;
use diagnosa_cli::cli::DiagnoseArgs;
use diagnosa_cli::commands;
use diagnosa_cli::config::expand_home;
use diagnosa_cli::{Cli, Command, Config, Formatter};
use diagnosa_domain::Classifier;
use diagnosa_store::SqliteStore;
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> diagnosa_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging on stderr
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load or create config
    let config = match &cli.config {
        Some(path) => Config::load_from(&expand_home(path)?)?,
        None => Config::load()?,
    };

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    // Open the case base
    let db_path = match &cli.database {
        Some(path) => expand_home(path)?,
        None => config.database_path()?,
    };
    ensure_parent_dir(&db_path)?;
    let mut store = SqliteStore::new(&db_path)?;
    debug!(path = %db_path.display(), "Opened case base");

    let classifier = Classifier::new(store.schema().clone(), config.classifier_config()?)?;

    // Handle commands
    match cli.command {
        None => {
            commands::execute_diagnose(DiagnoseArgs::default(), &mut store, &classifier, &config, &formatter)?;
        }
        Some(Command::Diagnose(args)) => {
            commands::execute_diagnose(args, &mut store, &classifier, &config, &formatter)?;
        }
        Some(Command::Questions) => {
            commands::execute_questions(&store, &formatter)?;
        }
        Some(Command::Diseases) => {
            commands::execute_diseases(&store, &formatter)?;
        }
        Some(Command::Disease(args)) => {
            commands::execute_disease(args, &store, &formatter)?;
        }
        Some(Command::Cases(args)) => {
            commands::execute_cases(args, &store, &formatter)?;
        }
        Some(Command::Stats) => {
            commands::execute_stats(&store, &formatter)?;
        }
        Some(Command::Import(args)) => {
            commands::execute_import(args, &mut store, &formatter)?;
        }
        Some(Command::Export(args)) => {
            commands::execute_export(args, &store, &formatter)?;
        }
    }

    Ok(())
}

fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
