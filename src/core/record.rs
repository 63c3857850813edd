// trcfilter - core/record.rs
//
// Line normalization and tokenization: the pre-pass every raw log line
// goes through before classification.
//
// Normalization must run strictly before tokenization: removing a `\N`
// sentinel shifts every subsequent field index, and the schema offsets
// are defined against the post-removal layout of the selected revision.

use crate::util::constants::{FIELD_DELIMITER, NO_VALUE_SENTINEL};

/// Strip sentinel and blank fields from a raw pipe-delimited line.
///
/// Removes every field equal to the literal `\N` marker or empty /
/// whitespace-only after trimming, then rejoins the survivors with `|`
/// preserving their relative order.
///
/// Returns `None` when nothing survives (the caller must skip the line
/// entirely and not advance any counters). Pure and idempotent:
/// normalizing an already-clean line returns it unchanged.
pub fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let kept: Vec<&str> = trimmed
        .split(FIELD_DELIMITER)
        .filter(|field| *field != NO_VALUE_SENTINEL && !field.trim().is_empty())
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept.join("|"))
    }
}

/// Split a cleaned line into its ordered field sequence.
///
/// No field-count or type validation happens here; the classifier
/// bounds-checks every schema access and owns the error path.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split(FIELD_DELIMITER).collect()
}
