//! # CLI Module
//!
//! Command-line interface for the photo statistics pipeline.
//!
//! ## Usage
//! ```bash
//! # Scan a library and print the summaries
//! photo-stats scan ~/Pictures/originals
//!
//! # Reuse the snapshot from the previous scan
//! photo-stats scan --cached
//!
//! # Machine-readable output
//! photo-stats scan ~/Pictures/originals --output json
//!
//! # Libraries that spell extensions differently
//! photo-stats scan ~/exports --extensions jpg --extensions jpeg
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use photo_exif_stats::core::pipeline::{Pipeline, PipelineResult};
use photo_exif_stats::core::report::{export_csv, CountEntry, LibraryReport, TrendEntry};
use photo_exif_stats::core::snapshot;
use photo_exif_stats::error::{PhotoStatsError, Result};
use photo_exif_stats::events::{Event, EventChannel, ExtractEvent, PipelineEvent, ScanEvent};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Photo EXIF Stats - What do you actually shoot with?
#[derive(Parser, Debug)]
#[command(name = "photo-stats")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a photo library (or reuse the last snapshot) and summarize it
    Scan {
        /// Library directories to scan (unused with --cached)
        paths: Vec<PathBuf>,

        /// Use the snapshot from the previous scan instead of rescanning
        #[arg(long)]
        cached: bool,

        /// Snapshot location
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// How many cameras and lenses to rank
        #[arg(long, default_value = "15")]
        top: usize,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// File extensions to accept (case-sensitive; default: jpeg, heic)
        #[arg(long)]
        extensions: Vec<String>,

        /// Include hidden files
        #[arg(long)]
        include_hidden: bool,

        /// exiftool binary to invoke
        #[arg(long, default_value = "exiftool")]
        exiftool: PathBuf,

        /// Per-file extraction timeout in seconds
        #[arg(long, default_value = "10")]
        timeout_secs: u64,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Flat CSV for spreadsheets
    Csv,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            paths,
            cached,
            snapshot,
            top,
            output,
            extensions,
            include_hidden,
            exiftool,
            timeout_secs,
            verbose,
        } => run_scan(ScanArgs {
            paths,
            cached,
            snapshot,
            top,
            output,
            extensions,
            include_hidden,
            exiftool,
            timeout_secs,
            verbose,
        }),
    }
}

struct ScanArgs {
    paths: Vec<PathBuf>,
    cached: bool,
    snapshot: Option<PathBuf>,
    top: usize,
    output: OutputFormat,
    extensions: Vec<String>,
    include_hidden: bool,
    exiftool: PathBuf,
    timeout_secs: u64,
    verbose: bool,
}

fn run_scan(args: ScanArgs) -> Result<()> {
    if !args.cached && args.paths.is_empty() {
        return Err(PhotoStatsError::Config(
            "give at least one library directory, or pass --cached".to_string(),
        ));
    }

    let term = Term::stderr();

    if matches!(args.output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Photo EXIF Stats").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let snapshot_path = args
        .snapshot
        .unwrap_or_else(snapshot::default_snapshot_path);

    let mut builder = Pipeline::builder()
        .paths(args.paths)
        .use_snapshot(args.cached)
        .snapshot_path(snapshot_path)
        .include_hidden(args.include_hidden)
        .exiftool_command(args.exiftool.to_string_lossy().into_owned())
        .extract_timeout(Duration::from_secs(args.timeout_secs));

    if !args.extensions.is_empty() {
        builder = builder.extensions(args.extensions);
    }

    let pipeline = builder.build();

    // Progress bar for pretty output, fed from the event channel
    let (sender, receiver) = EventChannel::new();

    let progress = if matches!(args.output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let verbose_clone = args.verbose;

    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_message(format!("{}", phase));
                    }
                }
                Event::Scan(ScanEvent::Completed { total_photos }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_length(total_photos as u64);
                    }
                }
                Event::Extract(ExtractEvent::Progress(p)) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_position(p.completed as u64);
                        if verbose_clone {
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
                Event::Extract(ExtractEvent::Error { path, message }) if verbose_clone => {
                    if let Some(ref pb) = progress_clone {
                        pb.println(format!("skipped {}: {}", path.display(), message));
                    }
                }
                Event::Pipeline(PipelineEvent::Completed { .. })
                | Event::Pipeline(PipelineEvent::Error { .. }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.finish_and_clear();
                    }
                }
                _ => {}
            }
        }
    });

    let result = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    let result = result?;
    let report = LibraryReport::from_records(&result.records, args.top);

    match args.output {
        OutputFormat::Pretty => print_pretty_results(&term, &result, &report, args.verbose),
        OutputFormat::Json => print_json_results(&result, &report),
        OutputFormat::Csv => {
            export_csv(&report, std::io::stdout().lock())
                .map_err(|e| PhotoStatsError::Config(format!("failed to write CSV: {}", e)))?;
        }
    }

    Ok(())
}

fn print_pretty_results(
    term: &Term,
    result: &PipelineResult,
    report: &LibraryReport,
    verbose: bool,
) {
    term.write_line("").ok();
    let source = if result.from_snapshot {
        "Snapshot Loaded"
    } else {
        "Scan Complete"
    };
    term.write_line(&format!("{} {}", style("✓").green().bold(), source))
        .ok();
    term.write_line("").ok();

    // Summary
    if result.from_snapshot {
        term.write_line(&format!(
            "  {} records from the previous scan",
            style(result.records.len()).cyan()
        ))
        .ok();
    } else {
        term.write_line(&format!(
            "  {} photos ({}) scanned in {:.1}s",
            style(result.total_photos).cyan(),
            format_bytes(result.total_bytes),
            result.duration_ms as f64 / 1000.0
        ))
        .ok();
    }

    if result.failed_files > 0 {
        term.write_line(&format!(
            "  {} files skipped (extraction failed)",
            style(result.failed_files).yellow()
        ))
        .ok();
    }

    if !result.warnings.is_empty() {
        term.write_line(&format!(
            "  {} tag values could not be parsed",
            style(result.warnings.len()).yellow()
        ))
        .ok();

        if verbose {
            for warning in &result.warnings {
                term.write_line(&format!(
                    "    {} {}: {} ({})",
                    style("!").yellow(),
                    warning.path.display(),
                    warning.field,
                    warning.reason
                ))
                .ok();
            }
        }
    }

    if !result.unknown_models.is_empty() {
        term.write_line(&format!(
            "  {} camera models without a crop-factor rule: {}",
            style(result.unknown_models.len()).yellow(),
            result.unknown_models.join(", ")
        ))
        .ok();
    }

    print_count_section(term, "Top Cameras", &report.top_cameras);
    print_count_section(term, "Top Lenses", &report.top_lenses);

    term.write_line("").ok();
    term.write_line(&format!(
        "{}",
        style("Focal Lengths (35mm equivalent)").bold().underlined()
    ))
    .ok();
    for bucket in &report.focal_length_histogram {
        term.write_line(&format!(
            "  {:>4}-{}mm  {}",
            bucket.lower_mm,
            bucket.upper_mm,
            bar(bucket.count)
        ))
        .ok();
    }

    term.write_line("").ok();
    term.write_line(&format!("{}", style("ISO").bold().underlined()))
        .ok();
    for entry in &report.iso_distribution {
        term.write_line(&format!("  {:>6}  {}", entry.iso, bar(entry.count)))
            .ok();
    }

    print_trend_section(term, "Shots per Month by Camera", &report.monthly_by_camera);
    print_trend_section(term, "Shots per Month by Lens", &report.monthly_by_lens);
}

fn print_count_section(term: &Term, title: &str, entries: &[CountEntry]) {
    term.write_line("").ok();
    term.write_line(&format!("{}", style(title).bold().underlined()))
        .ok();

    if entries.is_empty() {
        term.write_line(&format!("  {}", style("no data").dim())).ok();
        return;
    }

    for entry in entries {
        term.write_line(&format!(
            "  {:>6}  {}",
            style(entry.count).cyan(),
            entry.label
        ))
        .ok();
    }
}

fn print_trend_section(term: &Term, title: &str, entries: &[TrendEntry]) {
    term.write_line("").ok();
    term.write_line(&format!("{}", style(title).bold().underlined()))
        .ok();

    if entries.is_empty() {
        term.write_line(&format!("  {}", style("no data").dim())).ok();
        return;
    }

    let mut current_month = "";
    for entry in entries {
        if entry.month != current_month {
            term.write_line(&format!("  {}", style(&entry.month).bold())).ok();
            current_month = &entry.month;
        }
        term.write_line(&format!("    {:>6}  {}", entry.count, entry.label))
            .ok();
    }
}

/// A crude count bar so distributions are scannable without a plot
fn bar(count: usize) -> String {
    const MAX_WIDTH: usize = 40;
    let width = count.min(MAX_WIDTH);
    let mut s = "▪".repeat(width);
    if count > MAX_WIDTH {
        s.push('…');
    }
    format!("{} {}", s, count)
}

fn print_json_results(result: &PipelineResult, report: &LibraryReport) {
    let output = serde_json::json!({
        "summary": {
            "total_photos": result.total_photos,
            "total_records": result.records.len(),
            "failed_files": result.failed_files,
            "tag_warnings": result.warnings.len(),
            "unknown_models": result.unknown_models,
            "scan_errors": result.scan_errors,
            "from_snapshot": result.from_snapshot,
            "duration_ms": result.duration_ms,
        },
        "report": report,
    });

    println!(
        "{}",
        serde_json::to_string_pretty(&output).expect("report serializes")
    );
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
