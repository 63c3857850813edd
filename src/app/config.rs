// trcfilter - app/config.rs
//
// Optional config.toml loading with startup validation.
// Invalid values produce actionable warnings and fall back to defaults;
// a broken config file never stops a run.

use crate::core::schema::SchemaRevision;
use crate::util::constants;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[report]` section.
    pub report: ReportSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[report]` config section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    /// Schema revision: "v3" or "ep8".
    pub revision: Option<String>,
    /// Classify throw/pickup events (5101/5102). Noticeably slower.
    pub throw_log: Option<bool>,
    /// Directory for the generated CSV reports.
    pub output_dir: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Schema revision to classify against.
    pub revision: SchemaRevision,
    /// Whether throw/pickup events are classified.
    pub throw_log: bool,
    /// Report output directory (None = derive from the first input).
    pub output_dir: Option<PathBuf>,
    /// Logging level string (consumed before tracing is initialised).
    pub log_level: Option<String>,
}

/// Load and validate a config file.
///
/// Returns `AppConfig` with validated values and a list of non-fatal
/// warnings. A missing file yields defaults with no warnings; an
/// unreadable or unparseable file yields defaults plus a warning, so the
/// run still proceeds but the user is informed.
pub fn load_config(path: Option<&Path>) -> (AppConfig, Vec<String>) {
    let Some(path) = path else {
        return (AppConfig::default(), Vec::new());
    };

    let mut warnings: Vec<String> = Vec::new();

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warnings.push(format!(
                "Could not read config file '{}': {e}. Using defaults.",
                path.display()
            ));
            return (AppConfig::default(), warnings);
        }
    };

    let (config, mut parse_warnings) = parse_config(&content, path);
    warnings.append(&mut parse_warnings);
    (config, warnings)
}

/// Parse and validate config file content. Split out from [`load_config`]
/// so tests can exercise validation without touching the filesystem.
pub fn parse_config(content: &str, path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    let raw: RawConfig = match toml::from_str(content) {
        Ok(r) => r,
        Err(e) => {
            warnings.push(format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                path.display()
            ));
            return (AppConfig::default(), warnings);
        }
    };

    let mut config = AppConfig::default();

    // -- Report: revision --
    if let Some(ref revision) = raw.report.revision {
        match revision.parse::<SchemaRevision>() {
            Ok(r) => config.revision = r,
            Err(e) => warnings.push(format!(
                "[report] revision: {e}. Using default ({}).",
                SchemaRevision::default()
            )),
        }
    }

    // -- Report: throw_log --
    if let Some(throw_log) = raw.report.throw_log {
        config.throw_log = throw_log;
    }

    // -- Report: output_dir --
    if let Some(ref dir) = raw.report.output_dir {
        if !dir.is_empty() {
            config.output_dir = Some(PathBuf::from(dir));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default ({}).",
                constants::DEFAULT_LOG_LEVEL
            ));
        }
    }

    (config, warnings)
}
