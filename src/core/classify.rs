// trcfilter - core/classify.rs
//
// Record classifier: drives each raw line through
// normalize → tokenize → registry dispatch → field extraction,
// producing an output row for the report writer or a counted skip.
//
// The classifier never aborts a run for a single malformed line: record
// errors are returned to the caller for logging, counted, and the next
// line proceeds.

use crate::core::model::{OutputRow, RunCounters, TableKind};
use crate::core::record;
use crate::core::schema::{ColumnRule, Piece, SchemaRegistry, SchemaRevision};
use crate::core::transform;
use crate::util::constants::EVENT_CODE_FIELD;
use crate::util::error::RecordError;

// =============================================================================
// Configuration
// =============================================================================

/// Whether throw/pickup events (codes 5101/5102) are classified.
///
/// These codes dominate raw server logs, so processing them multiplies the
/// work per run substantially. Off unless explicitly requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThrowLog {
    Enabled,
    #[default]
    Disabled,
}

/// Classifier configuration, fixed for the lifetime of a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifyConfig {
    pub revision: SchemaRevision,
    pub throw_log: ThrowLog,
}

// =============================================================================
// Classifier
// =============================================================================

/// Per-run classification engine.
///
/// Owns the schema registry and the run counters; both are exclusive to
/// the single processing thread, so no locking discipline applies.
#[derive(Debug)]
pub struct Classifier {
    registry: SchemaRegistry,
    throw_log: ThrowLog,
    counters: RunCounters,
}

impl Classifier {
    pub fn new(config: ClassifyConfig) -> Self {
        Self {
            registry: SchemaRegistry::new(config.revision),
            throw_log: config.throw_log,
            counters: RunCounters::default(),
        }
    }

    /// Classify one raw log line.
    ///
    /// Returns `Ok(Some(row))` for a dispatched record, `Ok(None)` for any
    /// silent skip (empty after normalization, unregistered event code, or
    /// suppressed throw log), and `Err` for a record that matched a schema
    /// but could not be extracted. All outcomes, including errors, are
    /// already counted when this returns; the caller only logs and moves on.
    pub fn classify_line(&mut self, raw: &str) -> Result<Option<OutputRow>, RecordError> {
        self.counters.lines_read += 1;

        let Some(cleaned) = record::normalize(raw) else {
            self.counters.empty_after_normalize += 1;
            return Ok(None);
        };

        let fields = record::tokenize(&cleaned);

        let Some(code) = fields.get(EVENT_CODE_FIELD) else {
            // A one-field line has no event code to dispatch on.
            self.counters.unmatched_code += 1;
            return Ok(None);
        };

        let Some(entry) = self.registry.lookup(code) else {
            self.counters.unmatched_code += 1;
            return Ok(None);
        };

        if entry.table == TableKind::Throw && self.throw_log == ThrowLog::Disabled {
            self.counters.throw_suppressed += 1;
            return Ok(None);
        }

        let mut values = Vec::with_capacity(entry.columns.len());
        for rule in entry.columns {
            match apply_rule(rule, &fields, entry.code) {
                Ok(value) => values.push(value),
                Err(e) => {
                    // No partial row is ever written.
                    match e {
                        RecordError::Truncated { .. } => self.counters.truncated_records += 1,
                        RecordError::MalformedTimestamp { .. }
                        | RecordError::MalformedNumber { .. } => {
                            self.counters.malformed_fields += 1
                        }
                    }
                    return Err(e);
                }
            }
        }

        self.counters.record_row(entry.table);
        Ok(Some(OutputRow {
            table: entry.table,
            values,
        }))
    }

    pub fn counters(&self) -> &RunCounters {
        &self.counters
    }

    pub fn into_counters(self) -> RunCounters {
        self.counters
    }

    pub fn revision(&self) -> SchemaRevision {
        self.registry.revision()
    }
}

/// Produce one output column value from the tokenized record.
///
/// Every field access is bounds-checked; an out-of-range index fails the
/// record with `Truncated` rather than panicking.
fn apply_rule(rule: &ColumnRule, fields: &[&str], code: &str) -> Result<String, RecordError> {
    let get = |index: usize| {
        fields
            .get(index)
            .copied()
            .ok_or_else(|| RecordError::Truncated {
                code: code.to_string(),
                index,
                field_count: fields.len(),
            })
    };

    match rule {
        ColumnRule::Field(index) => Ok(transform::passthrough(get(*index)?)),
        ColumnRule::Timestamp(index) => transform::timestamp_to_datetime(get(*index)?),
        ColumnRule::Product(lhs, rhs) => transform::multiply(get(*lhs)?, get(*rhs)?),
        ColumnRule::Flag { index, zero, other } => {
            Ok(transform::flag_to_label(get(*index)?, zero, other).to_string())
        }
        ColumnRule::Literal(value) => Ok(transform::literal(value)),
        ColumnRule::Compose(pieces) => {
            let mut message = String::new();
            for piece in *pieces {
                match piece {
                    Piece::Text(text) => message.push_str(text),
                    Piece::Field(index) => message.push_str(get(*index)?),
                }
            }
            Ok(message)
        }
    }
}
