// trcfilter - app/clean.rs
//
// Standalone cleaning pass: rewrites log files with `\N` sentinels and
// blank fields stripped, keeping only lines that still carry data.
//
// Cleaning a file and then classifying it is equivalent to classifying
// the raw file directly, because the classifier runs the same
// normalization inline. The pass exists for operators who want smaller
// files to archive or to feed into other tooling.

use crate::core::record;
use crate::util::constants;
use crate::util::error::{Result, TrcError};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Outcome of cleaning one file.
#[derive(Debug, Clone)]
pub struct CleanStats {
    pub output: PathBuf,
    pub lines_read: u64,
    pub lines_retained: u64,
}

/// Outcome of a whole cleaning run.
#[derive(Debug, Default)]
pub struct CleanSummary {
    pub processed: Vec<CleanStats>,
    pub failed: Vec<(PathBuf, String)>,
}

impl CleanSummary {
    /// A run succeeds when at least one file was cleaned.
    pub fn succeeded(&self) -> bool {
        !self.processed.is_empty()
    }
}

/// Derive the cleaned output path: `<stem>_cleaned<ext>` next to the input.
fn cleaned_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("cleaned");
    let name = match input.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}{}.{ext}", constants::CLEANED_SUFFIX),
        None => format!("{stem}{}", constants::CLEANED_SUFFIX),
    };
    input.with_file_name(name)
}

/// Clean one log file, writing only lines that survive normalization.
pub fn clean_file(input: &Path) -> Result<CleanStats> {
    let source = File::open(input).map_err(|e| TrcError::Io {
        path: input.to_path_buf(),
        operation: "open input file",
        source: e,
    })?;

    let output = cleaned_path(input);
    let sink = File::create(&output).map_err(|e| TrcError::Io {
        path: output.clone(),
        operation: "create cleaned file",
        source: e,
    })?;

    tracing::debug!(
        input = %input.display(),
        output = %output.display(),
        "Cleaning file"
    );

    let reader = BufReader::new(source);
    let mut writer = BufWriter::new(sink);
    let mut lines_read: u64 = 0;
    let mut lines_retained: u64 = 0;

    for line in reader.lines() {
        let line = line.map_err(|e| TrcError::Io {
            path: input.to_path_buf(),
            operation: "read input line",
            source: e,
        })?;
        lines_read += 1;

        if let Some(cleaned) = record::normalize(&line) {
            writeln!(writer, "{cleaned}").map_err(|e| TrcError::Io {
                path: output.clone(),
                operation: "write cleaned line",
                source: e,
            })?;
            lines_retained += 1;
        }

        if lines_read % constants::CLEAN_PROGRESS_INTERVAL == 0 {
            tracing::debug!(input = %input.display(), lines = lines_read, "Cleaning progress");
        }
    }

    writer.flush().map_err(|e| TrcError::Io {
        path: output.clone(),
        operation: "flush cleaned file",
        source: e,
    })?;

    tracing::info!(
        input = %input.display(),
        lines_read,
        lines_retained,
        "File cleaned"
    );

    Ok(CleanStats {
        output,
        lines_read,
        lines_retained,
    })
}

/// Clean every input file, collecting per-file outcomes.
/// A file that fails never stops the remaining files.
pub fn run_clean(inputs: &[PathBuf]) -> CleanSummary {
    let mut summary = CleanSummary::default();

    for input in inputs {
        match clean_file(input) {
            Ok(stats) => summary.processed.push(stats),
            Err(e) => {
                tracing::warn!(file = %input.display(), error = %e, "Cleaning failed");
                summary.failed.push((input.clone(), e.to_string()));
            }
        }
    }

    summary
}
