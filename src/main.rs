// trcfilter - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Logging initialisation (debug mode support)
// 3. Config loading and flag/config merging
// 4. Subcommand dispatch (report / clean) and exit status

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use trcfilter::app::{clean, config, run};
use trcfilter::core::classify::ThrowLog;
use trcfilter::core::model::TableKind;
use trcfilter::core::schema::SchemaRevision;
use trcfilter::util;

/// trcfilter - TRC game-server log classifier.
///
/// Sorts pipe-delimited game-server event logs into per-table CSV reports
/// (trades, personal-shop sales, auction house, guild warehouse, mail,
/// throw/pickup, connection and dungeon entries).
#[derive(Parser, Debug)]
#[command(name = "trcfilter", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify log files into per-table CSV reports.
    Report {
        /// TRC log files (or directories of them) to process, in order.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Schema revision of the input logs: v3 or ep8.
        ///
        /// There is no way to detect the revision from the data itself;
        /// picking the wrong one produces misaligned columns, not errors.
        #[arg(short = 'r', long)]
        revision: Option<SchemaRevision>,

        /// Also classify throw/pickup events (5101/5102).
        /// These dominate raw logs, so runs take noticeably longer.
        #[arg(long = "throw-log")]
        throw_log: bool,

        /// Directory for the generated reports
        /// (default: <first input stem>_reports next to it).
        #[arg(short = 'o', long = "out-dir")]
        out_dir: Option<PathBuf>,

        /// Path to an optional config.toml.
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,

        /// Write a machine-readable JSON run summary to this path.
        #[arg(long = "summary-json")]
        summary_json: Option<PathBuf>,
    },

    /// Strip `\N` sentinels and blank fields from log files,
    /// writing *_cleaned copies alongside the originals.
    Clean {
        /// Log files to clean.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Report {
            files,
            revision,
            throw_log,
            out_dir,
            config,
            summary_json,
        } => report_command(
            cli.debug,
            files,
            revision,
            throw_log,
            out_dir,
            config,
            summary_json,
        ),
        Command::Clean { files } => clean_command(cli.debug, &files),
    }
}

#[allow(clippy::too_many_arguments)]
fn report_command(
    debug: bool,
    files: Vec<PathBuf>,
    revision: Option<SchemaRevision>,
    throw_log: bool,
    out_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
    summary_json: Option<PathBuf>,
) -> ExitCode {
    // Config is loaded before logging init because it can set the level.
    let (app_config, config_warnings) = config::load_config(config_path.as_deref());
    util::logging::init(debug, app_config.log_level.as_deref());

    for warning in &config_warnings {
        tracing::warn!("{warning}");
    }

    tracing::info!(
        version = util::constants::APP_VERSION,
        "trcfilter starting"
    );

    // CLI flags override config values.
    let options = run::RunOptions {
        inputs: files,
        revision: revision.unwrap_or(app_config.revision),
        throw_log: if throw_log || app_config.throw_log {
            ThrowLog::Enabled
        } else {
            ThrowLog::Disabled
        },
        output_dir: out_dir.or(app_config.output_dir),
        summary_json,
    };

    let summary = match run::run_report(&options) {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!(error = %e, "Report run failed");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    print_report_summary(&summary, options.throw_log);

    if summary.succeeded() {
        ExitCode::SUCCESS
    } else {
        eprintln!("Error: no input file could be processed");
        ExitCode::FAILURE
    }
}

fn print_report_summary(summary: &run::RunSummary, throw_log: ThrowLog) {
    println!("trcfilter v{}", util::constants::APP_VERSION);
    println!("Schema revision: {}", summary.revision);
    println!("Reports written to: {}", summary.output_dir.display());
    println!();
    println!("Summary of processed data:");
    for table in TableKind::all() {
        if *table == TableKind::Throw && throw_log == ThrowLog::Disabled {
            continue;
        }
        println!(
            "  {}: {} entries",
            table.name(),
            summary.counters.rows_for(*table)
        );
    }
    println!();
    println!(
        "Lines read: {} (skipped: {} empty, {} unmatched, {} truncated, {} malformed)",
        summary.counters.lines_read,
        summary.counters.empty_after_normalize,
        summary.counters.unmatched_code,
        summary.counters.truncated_records,
        summary.counters.malformed_fields,
    );
    println!(
        "Files processed: {} / failed: {}",
        summary.processed.len(),
        summary.failed.len()
    );
    for failed in &summary.failed {
        println!("  failed: {} ({})", failed.path.display(), failed.reason);
    }
}

fn clean_command(debug: bool, files: &[PathBuf]) -> ExitCode {
    util::logging::init(debug, None);

    let summary = clean::run_clean(files);

    println!("trcfilter v{}", util::constants::APP_VERSION);
    println!("Cleaning summary:");
    for stats in &summary.processed {
        println!(
            "  {}: {} of {} lines retained",
            stats.output.display(),
            stats.lines_retained,
            stats.lines_read
        );
    }
    for (path, reason) in &summary.failed {
        println!("  failed: {} ({})", path.display(), reason);
    }
    println!(
        "Files cleaned: {} / failed: {}",
        summary.processed.len(),
        summary.failed.len()
    );

    if summary.succeeded() {
        ExitCode::SUCCESS
    } else {
        eprintln!("Error: no input file could be cleaned");
        ExitCode::FAILURE
    }
}
