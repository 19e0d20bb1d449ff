//! sift: turn files on disk into structured notes.
//!
//! Notes are written as a JSON array to stdout, or to `--output`. Logs and the
//! per-file summary go to stderr. Degraded files do not change the exit code.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sift_core::UploadedFile;
use sift_ingest::{BatchReport, FileOutcome, IngestConfig, Pipeline};
use sift_notes::{InMemoryNoteStore, JsonFileNoteStore};

#[derive(Parser)]
#[command(name = "sift")]
#[command(author, version, about = "Turn uploaded files into structured notes")]
struct Cli {
    /// Files to ingest
    #[arg(required_unless_present = "health", num_args = 1..)]
    paths: Vec<PathBuf>,

    /// Category assigned to every note (overrides SIFT_NOTE_CATEGORY)
    #[arg(short, long)]
    category: Option<String>,

    /// Files processed at once (overrides SIFT_CONCURRENCY)
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Write notes to this JSON file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip analysis of audio transcriptions
    #[arg(long)]
    no_analysis: bool,

    /// Extract and segment only; print the summary without writing notes
    #[arg(long)]
    dry_run: bool,

    /// Report which extractors have their external tools available, then exit
    #[arg(long)]
    health: bool,
}

/// Initialize tracing on stderr (stdout carries the notes).
///
/// Environment variables:
///   LOG_FORMAT - "json" or "text" (default: "text")
///   LOG_FILE   - path to a daily-rolled log file (optional)
///   RUST_LOG   - standard env filter (default: "sift=info")
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sift=info".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    if let Some(ref path) = log_file {
        let path = std::path::Path::new(path);
        let file_dir = path.parent().unwrap_or(std::path::Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("sift.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(non_blocking))
                .init();
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        } else {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
        None
    }
}

fn load_files(paths: &[PathBuf]) -> Vec<UploadedFile> {
    paths
        .iter()
        .filter_map(|path| match UploadedFile::from_path(path) {
            Ok(file) => Some(file),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable file");
                eprintln!("skipped\t{}\t{}", path.display(), e);
                None
            }
        })
        .collect()
}

fn print_outcome(outcome: &FileOutcome) {
    eprintln!(
        "{}\t{}\t{}\t{}\t{} note(s)",
        outcome.processed.name,
        outcome.processed.category,
        outcome.processed.diagnostic.kind(),
        outcome.strategy,
        outcome.notes.len()
    );
}

fn print_report(report: &BatchReport) {
    for file in &report.files {
        match &file.store_error {
            None => eprintln!(
                "{}\t{}\t{}\t{}\t{} note(s)",
                file.file_name,
                file.category,
                file.diagnostic.kind(),
                file.strategy,
                file.note_count
            ),
            Some(err) => eprintln!("{}\tstore failed: {}", file.file_name, err),
        }
    }
    eprintln!(
        "batch {}: {} file(s), {} note(s), {} degraded",
        report.batch_id,
        report.files.len(),
        report.notes_stored,
        report.degraded_count()
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = init_tracing();
    let cli = Cli::parse();

    let mut config = IngestConfig::from_env().context("Invalid configuration")?;
    if let Some(category) = cli.category {
        config = config.with_note_category(category);
    }
    if let Some(concurrency) = cli.concurrency {
        config = config.with_concurrency(concurrency);
    }
    if cli.no_analysis {
        config = config.with_analysis(false);
    }
    config.validate().context("Invalid command-line overrides")?;

    if cli.health {
        let pipeline = Pipeline::from_config(&config);
        for (category, healthy) in pipeline.registry().health_check_all().await {
            println!("{}\t{}", category, if healthy { "ok" } else { "unavailable" });
        }
        return Ok(());
    }

    let files = load_files(&cli.paths);
    if files.is_empty() {
        bail!("none of the {} path(s) could be read", cli.paths.len());
    }
    info!(file_count = files.len(), dry_run = cli.dry_run, "Starting ingestion");

    let pipeline = Pipeline::from_config(&config);

    if cli.dry_run {
        for outcome in pipeline.process_batch(files).await {
            print_outcome(&outcome);
        }
        return Ok(());
    }

    match cli.output {
        Some(path) => {
            let store = JsonFileNoteStore::new(&path);
            let report = pipeline.ingest_batch(files, &store).await;
            store
                .flush()
                .await
                .with_context(|| format!("Failed to write {}", store.path().display()))?;
            info!(path = %store.path().display(), note_count = report.notes_stored, "Notes written");
            print_report(&report);
        }
        None => {
            let store = InMemoryNoteStore::new();
            let report = pipeline.ingest_batch(files, &store).await;
            print_report(&report);
            if store.is_empty().await {
                warn!("No notes were stored");
            }
            println!("{}", serde_json::to_string_pretty(&store.all().await)?);
        }
    }
    Ok(())
}
