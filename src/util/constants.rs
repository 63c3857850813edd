// trcfilter - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "trcfilter";

/// Current application version (from Cargo.toml).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when neither RUST_LOG, --debug, nor config set one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// TRC log line format
// =============================================================================

/// Field separator in TRC log lines.
pub const FIELD_DELIMITER: char = '|';

/// Two-character "no value" marker the game server writes for empty fields.
/// This is a literal backslash followed by 'N', not a newline.
pub const NO_VALUE_SENTINEL: &str = r"\N";

/// Field index of the Unix timestamp (seconds) on every record.
pub const TIMESTAMP_FIELD: usize = 0;

/// Field index of the numeric event code on every record.
pub const EVENT_CODE_FIELD: usize = 1;

/// Output format for record timestamps, matching the original reports.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Placeholder written into columns an event code does not populate.
pub const PLACEHOLDER: &str = "-";

// =============================================================================
// File handling
// =============================================================================

/// Suffix inserted before the extension of cleaned output files.
pub const CLEANED_SUFFIX: &str = "_cleaned";

/// Suffix appended to the first input's stem to derive the report directory.
pub const REPORT_DIR_SUFFIX: &str = "_reports";

/// Extensions considered log files when a directory is given as input
/// (matched case-insensitively).
pub const LOG_EXTENSIONS: &[&str] = &["log", "trc", "gamelog"];

/// Maximum directory recursion depth when expanding directory inputs.
pub const MAX_INPUT_DEPTH: usize = 10;

/// Emit a progress log event every this many lines while cleaning.
pub const CLEAN_PROGRESS_INTERVAL: u64 = 100_000;
