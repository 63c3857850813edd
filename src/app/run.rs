// trcfilter - app/run.rs
//
// Report run orchestration: expands inputs, feeds every line through the
// classifier, routes rows to per-table CSV reports, and assembles the
// end-of-run summary.
//
// Processing is single-threaded and sequential by design: rows within a
// table must mirror input line order so the timestamp columns stay
// meaningfully sorted.

use crate::core::classify::{Classifier, ClassifyConfig, ThrowLog};
use crate::core::export::{self, TableCsv};
use crate::core::model::{RunCounters, TableKind};
use crate::core::schema::SchemaRevision;
use crate::util::constants;
use crate::util::error::{Result, TrcError};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// =============================================================================
// Options and summary
// =============================================================================

/// Options for one report run, resolved from CLI flags and config.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Input files or directories, processed in the order given.
    pub inputs: Vec<PathBuf>,
    pub revision: SchemaRevision,
    pub throw_log: ThrowLog,
    /// Report directory (None = `<first input stem>_reports` next to it).
    pub output_dir: Option<PathBuf>,
    /// Optional path for a machine-readable JSON summary.
    pub summary_json: Option<PathBuf>,
}

/// One input file that could not be processed.
#[derive(Debug, Clone, Serialize)]
pub struct FailedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// End-of-run report: counters plus the per-file outcome lists.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub revision: SchemaRevision,
    pub counters: RunCounters,
    pub output_dir: PathBuf,
    pub processed: Vec<PathBuf>,
    pub failed: Vec<FailedFile>,
}

impl RunSummary {
    /// A run succeeds when at least one input file was fully processed.
    pub fn succeeded(&self) -> bool {
        !self.processed.is_empty()
    }
}

// =============================================================================
// Input expansion
// =============================================================================

/// Expand input arguments into an ordered list of log files.
///
/// Plain files are taken as-is. Directories are walked (bounded depth,
/// sorted for determinism) and filtered to known log extensions. Missing
/// paths land in the failure list instead of aborting the run.
pub fn collect_inputs(inputs: &[PathBuf]) -> (Vec<PathBuf>, Vec<FailedFile>) {
    let mut files = Vec::new();
    let mut failed = Vec::new();

    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
        } else if input.is_dir() {
            for entry in WalkDir::new(input)
                .max_depth(constants::MAX_INPUT_DEPTH)
                .sort_by_file_name()
            {
                match entry {
                    Ok(entry) if entry.file_type().is_file() && is_log_file(entry.path()) => {
                        files.push(entry.into_path());
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(dir = %input.display(), error = %e, "Skipping unreadable directory entry");
                    }
                }
            }
        } else {
            failed.push(FailedFile {
                path: input.clone(),
                reason: "file not found".to_string(),
            });
        }
    }

    (files, failed)
}

fn is_log_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            constants::LOG_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Derive the report directory from the first input when none was given.
fn resolve_output_dir(options: &RunOptions, first_input: &Path) -> PathBuf {
    if let Some(ref dir) = options.output_dir {
        return dir.clone();
    }
    let stem = first_input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("trc");
    first_input
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!("{stem}{}", constants::REPORT_DIR_SUFFIX))
}

// =============================================================================
// Report run
// =============================================================================

/// Run classification over all inputs and write one CSV per table.
///
/// Record-level problems (truncated records, malformed numbers) are logged
/// and counted but never fail the run. A file that cannot be opened or
/// read is recorded as failed and the run continues with the rest. Only
/// report-writing failures are fatal, since the output would be unusable.
pub fn run_report(options: &RunOptions) -> Result<RunSummary> {
    let (files, mut failed) = collect_inputs(&options.inputs);

    tracing::info!(
        revision = %options.revision,
        files = files.len(),
        throw_log = options.throw_log == ThrowLog::Enabled,
        "Starting report run"
    );

    let mut classifier = Classifier::new(ClassifyConfig {
        revision: options.revision,
        throw_log: options.throw_log,
    });
    let mut processed: Vec<PathBuf> = Vec::new();

    if files.is_empty() {
        return Ok(RunSummary {
            revision: options.revision,
            counters: classifier.into_counters(),
            output_dir: options.output_dir.clone().unwrap_or_default(),
            processed,
            failed,
        });
    }

    let output_dir = resolve_output_dir(options, &files[0]);
    std::fs::create_dir_all(&output_dir).map_err(|e| TrcError::Io {
        path: output_dir.clone(),
        operation: "create report directory",
        source: e,
    })?;

    let mut writers = open_table_writers(&output_dir, options.throw_log)?;

    for file in &files {
        match process_file(file, &mut classifier, &mut writers) {
            Ok(FileOutcome::Processed) => processed.push(file.clone()),
            Ok(FileOutcome::Failed(reason)) => {
                tracing::warn!(file = %file.display(), reason, "Input file failed");
                failed.push(FailedFile {
                    path: file.clone(),
                    reason,
                });
            }
            // Export errors abort the run.
            Err(e) => return Err(e),
        }
    }

    for (_, writer) in writers {
        writer.finish().map_err(TrcError::Export)?;
    }

    let summary = RunSummary {
        revision: options.revision,
        counters: classifier.into_counters(),
        output_dir,
        processed,
        failed,
    };

    if let Some(ref path) = options.summary_json {
        let file = File::create(path).map_err(|e| TrcError::Io {
            path: path.clone(),
            operation: "create summary file",
            source: e,
        })?;
        export::write_summary_json(&summary, file, path).map_err(TrcError::Export)?;
    }

    tracing::info!(
        rows = summary.counters.total_rows(),
        processed = summary.processed.len(),
        failed = summary.failed.len(),
        "Report run complete"
    );

    Ok(summary)
}

/// One CSV report per table, under `output_dir`. The throw table is only
/// materialised when throw logging is enabled, matching the classifier's
/// gating: an always-empty report would suggest the events never happen.
fn open_table_writers(
    output_dir: &Path,
    throw_log: ThrowLog,
) -> Result<HashMap<TableKind, TableCsv<File>>> {
    let mut writers = HashMap::new();
    for table in TableKind::all() {
        if *table == TableKind::Throw && throw_log == ThrowLog::Disabled {
            continue;
        }
        let path = output_dir.join(format!("{}.csv", table.name()));
        let file = File::create(&path).map_err(|e| TrcError::Io {
            path: path.clone(),
            operation: "create report file",
            source: e,
        })?;
        writers.insert(*table, TableCsv::new(*table, file, &path)?);
    }
    Ok(writers)
}

enum FileOutcome {
    Processed,
    Failed(String),
}

/// Classify every line of one input file.
///
/// Returns `Ok(Failed)` for per-file I/O problems (the run continues) and
/// `Err` only for report-writing failures (the run aborts).
fn process_file(
    path: &Path,
    classifier: &mut Classifier,
    writers: &mut HashMap<TableKind, TableCsv<File>>,
) -> Result<FileOutcome> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => return Ok(FileOutcome::Failed(format!("cannot open: {e}"))),
    };

    tracing::debug!(file = %path.display(), "Processing input file");

    let reader = BufReader::new(file);
    let mut line_number: u64 = 0;

    for line in reader.lines() {
        line_number += 1;
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                return Ok(FileOutcome::Failed(format!(
                    "read error at line {line_number}: {e}"
                )));
            }
        };

        match classifier.classify_line(&line) {
            Ok(Some(row)) => {
                // Rows only ever target tables opened for this run; the
                // throw table is gated identically in both places.
                if let Some(writer) = writers.get_mut(&row.table) {
                    writer.write_row(&row).map_err(TrcError::Export)?;
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    file = %path.display(),
                    line = line_number,
                    error = %e,
                    "Skipping record"
                );
            }
        }
    }

    tracing::debug!(file = %path.display(), lines = line_number, "Input file complete");
    Ok(FileOutcome::Processed)
}
