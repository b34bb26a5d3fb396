//! # CLI Module
//!
//! Command-line interface for the image deduplicator.
//!
//! ## Usage
//! ```bash
//! # Report duplicates without touching anything (default)
//! image-dedup dedup ~/Photos
//!
//! # Move duplicates into ~/Photos/.trash, keeping the shortest path
//! image-dedup dedup ~/Photos --action move-to-trash --keep shortest-path
//!
//! # Looser matching, German messages
//! image-dedup dedup ~/Photos --threshold 6 --language de
//!
//! # JSON output
//! image-dedup dedup ~/Photos --output json
//!
//! # Keep warnings (unreadable files, failed moves) in a log file
//! image-dedup dedup ~/Photos --log ~/dedup.log
//! ```
//!
//! Flags override values from `--config` (or the per-user config file).
//! Ctrl+C stops the run; the trash directory is still cleaned up and the
//! process exits with status 130.

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use image_deduplicator::core::actions::ActionKind;
use image_deduplicator::core::hasher::HashAlgorithmKind;
use image_deduplicator::core::keep::KeepPolicy;
use image_deduplicator::core::{CancellationToken, Pipeline};
use image_deduplicator::error::{ConfigError, DedupError};
use image_deduplicator::events::{
    ActionEvent, Event, EventChannel, HashEvent, PipelineEvent, RunSummary, ScanEvent,
};
use image_deduplicator::i18n::Language;
use image_deduplicator::{init_tracing, DedupConfig};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;

/// Exit status after Ctrl+C
const EXIT_CANCELLED: u8 = 130;

/// Image Deduplicator - Find and clear out visually duplicate images
#[derive(Parser, Debug)]
#[command(name = "image-dedup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find duplicate images under a directory and resolve them
    Dedup(DedupArgs),
}

#[derive(clap::Args, Debug)]
struct DedupArgs {
    /// Directory to scan
    source: PathBuf,

    /// TOML config file (defaults to the per-user config if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum Hamming distance for a match (0-64)
    #[arg(short, long)]
    threshold: Option<u32>,

    /// Hashing workers (0 = one per CPU)
    #[arg(short, long)]
    workers: Option<i64>,

    /// Which file of a group to keep
    #[arg(short, long)]
    keep: Option<Keep>,

    /// What to do with the other files
    #[arg(long)]
    action: Option<Action>,

    /// Trash directory for move-to-trash (default: <SOURCE>/.trash)
    #[arg(long)]
    trash: Option<PathBuf>,

    /// Allowed extension; repeat for several (default: jpg jpeg png gif)
    #[arg(short, long = "ext")]
    extensions: Vec<String>,

    /// Hash algorithm to use
    #[arg(short, long)]
    algorithm: Option<Algorithm>,

    /// Message language (en, de)
    #[arg(short, long)]
    language: Option<String>,

    /// Append warnings and errors to this file
    #[arg(long = "log")]
    log_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    /// Average Hash - Fast, good for exact duplicates
    Average,
    /// Difference Hash - Good balance (default)
    Difference,
    /// Perceptual Hash - Most robust to edits
    Perceptual,
}

impl From<Algorithm> for HashAlgorithmKind {
    fn from(algo: Algorithm) -> Self {
        match algo {
            Algorithm::Average => HashAlgorithmKind::Average,
            Algorithm::Difference => HashAlgorithmKind::Difference,
            Algorithm::Perceptual => HashAlgorithmKind::Perceptual,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Keep {
    /// Earliest modification time
    Oldest,
    /// Fewest characters in the path
    ShortestPath,
}

impl From<Keep> for KeepPolicy {
    fn from(keep: Keep) -> Self {
        match keep {
            Keep::Oldest => KeepPolicy::Oldest,
            Keep::ShortestPath => KeepPolicy::ShortestPath,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Action {
    /// Only report what would happen (default)
    DryRun,
    /// Move duplicates into the trash directory
    MoveToTrash,
}

impl From<Action> for ActionKind {
    fn from(action: Action) -> Self {
        match action {
            Action::DryRun => ActionKind::DryRun,
            Action::MoveToTrash => ActionKind::MoveToTrash,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (handled paths only)
    Minimal,
}

/// What happened to one duplicate group, rebuilt from action events
#[derive(Debug, Default, Serialize)]
struct GroupReport {
    keep: PathBuf,
    removed: Vec<PathBuf>,
    failed: Vec<FailedAction>,
}

#[derive(Debug, Serialize)]
struct FailedAction {
    path: PathBuf,
    message: String,
}

/// Run the CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let Commands::Dedup(args) = cli.command;

    let term = Term::stderr();
    match run_dedup(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(DedupError::Cancelled) => {
            term.write_line(&format!("{}", style("Cancelled").yellow().bold()))
                .ok();
            ExitCode::from(EXIT_CANCELLED)
        }
        Err(e) => {
            term.write_line(&format!("{} {}", style("error:").red().bold(), e))
                .ok();
            ExitCode::FAILURE
        }
    }
}

/// Config file first, then flags on top
fn build_config(args: &DedupArgs) -> Result<DedupConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => DedupConfig::load(path)?,
        None => DedupConfig::load_default()?,
    };

    config.source = args.source.clone();
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(keep) = args.keep {
        config.keep = keep.into();
    }
    if let Some(action) = args.action {
        config.action = action.into();
    }
    if let Some(trash) = &args.trash {
        config.trash_dir = Some(trash.clone());
    }
    if !args.extensions.is_empty() {
        config.extensions = args.extensions.clone();
    }
    if let Some(algorithm) = args.algorithm {
        config.algorithm = algorithm.into();
    }
    if let Some(log_file) = &args.log_file {
        config.log_file = Some(log_file.clone());
    }
    if let Some(code) = &args.language {
        config.language = Language::from_code(code).ok_or_else(|| ConfigError::UnknownValue {
            field: "language",
            value: code.clone(),
        })?;
    }

    Ok(config)
}

fn run_dedup(args: DedupArgs) -> Result<(), DedupError> {
    let config = build_config(&args)?;
    init_tracing(args.verbose, config.log_file.as_deref())?;
    let output = args.output;
    let term = Term::stderr();

    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Image Deduplicator").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line(&format!(
            "  {} {}  {} {}  {} {}",
            style("action:").dim(),
            config.action,
            style("keep:").dim(),
            config.keep,
            style("threshold:").dim(),
            config.threshold
        ))
        .ok();
        term.write_line("").ok();
    }

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        tracing::warn!("Could not install Ctrl+C handler: {}", e);
    }

    let mut pipeline = Pipeline::from_config_with_cancellation(&config, cancel)?;

    let (sender, receiver) = EventChannel::new();

    // Progress bar for pretty output
    let progress = if matches!(output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(0);
        if let Ok(bar_style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(bar_style.progress_chars("█▓░"));
        }
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let verbose = args.verbose;

    // Handle events in a separate thread; it hands back the per-group report
    let event_thread = thread::spawn(move || {
        let mut reports: Vec<GroupReport> = Vec::new();

        for event in receiver.iter() {
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_message(format!("{}", phase));
                    }
                }
                Event::Scan(ScanEvent::Completed { candidates, .. }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_length(candidates as u64);
                    }
                }
                Event::Hash(HashEvent::Progress(p)) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_position(p.completed as u64);
                        if verbose {
                            pb.set_message(
                                p.current_path
                                    .file_name()
                                    .unwrap_or_default()
                                    .to_string_lossy()
                                    .into_owned(),
                            );
                        }
                    }
                }
                Event::Action(ActionEvent::Decided { keep, .. }) => {
                    reports.push(GroupReport {
                        keep,
                        ..GroupReport::default()
                    });
                }
                Event::Action(ActionEvent::Executed { removed, .. }) => {
                    if let Some(report) = reports.last_mut() {
                        report.removed.push(removed);
                    }
                }
                Event::Action(ActionEvent::Failed { path, message }) => {
                    if let Some(report) = reports.last_mut() {
                        report.failed.push(FailedAction { path, message });
                    }
                }
                Event::Pipeline(
                    PipelineEvent::Completed { .. }
                    | PipelineEvent::Cancelled
                    | PipelineEvent::Error { .. },
                ) => {
                    if let Some(ref pb) = progress_clone {
                        pb.finish_and_clear();
                    }
                }
                _ => {}
            }
        }

        reports
    });

    let result = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    let reports = event_thread.join().unwrap_or_default();

    let summary = result?;
    match output {
        OutputFormat::Pretty => print_pretty_results(&term, &config, &summary, &reports),
        OutputFormat::Json => print_json_results(&config, &summary, &reports),
        OutputFormat::Minimal => print_minimal_results(&reports),
    }

    Ok(())
}

fn print_pretty_results(
    term: &Term,
    config: &DedupConfig,
    summary: &RunSummary,
    reports: &[GroupReport],
) {
    let dry_run = config.action == ActionKind::DryRun;

    term.write_line(&format!("{} Run Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} same-size candidates, {} fingerprinted in {:.1}s",
        style(summary.candidates).cyan(),
        style(summary.hashed).cyan(),
        summary.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  {} duplicate groups found",
        style(summary.duplicate_groups).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {} files {}",
        style(summary.files_removed).cyan(),
        if dry_run { "would be removed" } else { "moved to trash" }
    ))
    .ok();
    if summary.failed_actions > 0 {
        term.write_line(&format!(
            "  {} files could not be handled",
            style(summary.failed_actions).red()
        ))
        .ok();
    }
    term.write_line("").ok();

    if reports.is_empty() {
        term.write_line("  No duplicates found!").ok();
        return;
    }

    term.write_line(&format!("{}", style("Duplicate Groups:").bold().underlined()))
        .ok();
    term.write_line("").ok();

    for (i, report) in reports.iter().enumerate() {
        term.write_line(&format!(
            "  {} ({} files)",
            style(format!("Group {}:", i + 1)).bold(),
            1 + report.removed.len() + report.failed.len()
        ))
        .ok();
        term.write_line(&format!("    {} {}", style("★").green(), report.keep.display()))
            .ok();
        for path in &report.removed {
            term.write_line(&format!("    {} {}", style("○").dim(), path.display()))
                .ok();
        }
        for failed in &report.failed {
            term.write_line(&format!(
                "    {} {} ({})",
                style("✗").red(),
                failed.path.display(),
                failed.message
            ))
            .ok();
        }
        term.write_line("").ok();
    }

    if dry_run {
        term.write_line(&format!(
            "{}",
            style("Dry run: no files were changed. Use --action move-to-trash to act.").dim()
        ))
        .ok();
    } else {
        term.write_line(&format!(
            "{} {}",
            style("Duplicates were moved to").dim(),
            config.trash_dir().display()
        ))
        .ok();
    }
}

fn print_json_results(config: &DedupConfig, summary: &RunSummary, reports: &[GroupReport]) {
    let output = serde_json::json!({
        "source": config.source,
        "action": config.action,
        "keep": config.keep,
        "threshold": config.threshold,
        "summary": summary,
        "groups": reports,
    });

    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{}", text),
        Err(e) => tracing::error!("Failed to serialize results: {}", e),
    }
}

fn print_minimal_results(reports: &[GroupReport]) {
    for report in reports {
        for path in &report.removed {
            println!("{}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> DedupArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        let Commands::Dedup(args) = cli.command;
        args
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&[
            "image-dedup",
            "dedup",
            "/photos",
            "--config",
            "/nonexistent.toml",
        ]);
        assert!(build_config(&args).is_err());

        let args = parse(&[
            "image-dedup",
            "dedup",
            "/photos",
            "--threshold",
            "5",
            "--keep",
            "shortest-path",
            "--action",
            "move-to-trash",
            "--ext",
            "png",
            "--ext",
            "webp",
            "--algorithm",
            "perceptual",
            "--language",
            "de",
            "--log",
            "/tmp/dedup.log",
        ]);
        let config = build_config(&args).unwrap();

        assert_eq!(config.source, PathBuf::from("/photos"));
        assert_eq!(config.threshold, 5);
        assert_eq!(config.keep, KeepPolicy::ShortestPath);
        assert_eq!(config.action, ActionKind::MoveToTrash);
        assert_eq!(config.extensions, vec!["png", "webp"]);
        assert_eq!(config.algorithm, HashAlgorithmKind::Perceptual);
        assert_eq!(config.language, Language::De);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/dedup.log")));
    }

    #[test]
    fn unknown_language_is_rejected() {
        let args = parse(&["image-dedup", "dedup", "/photos", "--language", "xx"]);
        assert!(matches!(
            build_config(&args),
            Err(ConfigError::UnknownValue { field: "language", .. })
        ));
    }

    #[test]
    fn source_is_required() {
        assert!(Cli::try_parse_from(["image-dedup", "dedup"]).is_err());
    }
}
