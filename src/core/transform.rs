// trcfilter - core/transform.rs
//
// Field transform library: pure, stateless functions applied during
// extraction. Each is total over valid string input and errors on
// malformed input; none touches any state outside its arguments.

use crate::util::constants::TIMESTAMP_FORMAT;
use crate::util::error::RecordError;
use chrono::{Local, TimeZone};

/// Parse `field` as a base-10 Unix timestamp (seconds) and format it as
/// `YYYY-MM-DD HH:MM:SS` in the system's local timezone, matching the
/// timestamps the game server operators see in the original reports.
pub fn timestamp_to_datetime(field: &str) -> Result<String, RecordError> {
    let secs: i64 = field.parse().map_err(|_| RecordError::MalformedTimestamp {
        raw: field.to_string(),
    })?;

    let datetime = Local
        .timestamp_opt(secs, 0)
        .earliest()
        .ok_or_else(|| RecordError::MalformedTimestamp {
            raw: field.to_string(),
        })?;

    Ok(datetime.format(TIMESTAMP_FORMAT).to_string())
}

/// Parse both fields as base-10 integers and return their product as a
/// decimal string (auction-house price-each × count).
pub fn multiply(a: &str, b: &str) -> Result<String, RecordError> {
    let lhs: i64 = a.parse().map_err(|_| RecordError::MalformedNumber {
        raw: a.to_string(),
    })?;
    let rhs: i64 = b.parse().map_err(|_| RecordError::MalformedNumber {
        raw: b.to_string(),
    })?;

    let product = lhs
        .checked_mul(rhs)
        .ok_or_else(|| RecordError::MalformedNumber {
            raw: format!("{a}*{b}"),
        })?;

    Ok(product.to_string())
}

/// Map a binary flag field to a label: `zero` when the field is exactly
/// "0", `other` for anything else.
pub fn flag_to_label<'a>(field: &str, zero: &'a str, other: &'a str) -> &'a str {
    if field == "0" {
        zero
    } else {
        other
    }
}

/// Fixed value regardless of input; used for the "-" placeholder in
/// columns inapplicable to an event code sharing a table with another.
pub fn literal(value: &str) -> String {
    value.to_string()
}

/// Identity transform.
pub fn passthrough(field: &str) -> String {
    field.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_formats_local_time() {
        let formatted = timestamp_to_datetime("1693180800").unwrap();
        let expected = Local
            .timestamp_opt(1_693_180_800, 0)
            .unwrap()
            .format(TIMESTAMP_FORMAT)
            .to_string();
        assert_eq!(formatted, expected);
        // Shape check independent of the host timezone.
        assert_eq!(formatted.len(), 19);
        assert_eq!(&formatted[4..5], "-");
        assert_eq!(&formatted[13..14], ":");
    }

    #[test]
    fn test_timestamp_rejects_non_numeric() {
        assert!(matches!(
            timestamp_to_datetime("yesterday"),
            Err(RecordError::MalformedTimestamp { .. })
        ));
        assert!(matches!(
            timestamp_to_datetime(""),
            Err(RecordError::MalformedTimestamp { .. })
        ));
        assert!(matches!(
            timestamp_to_datetime("1693180800.5"),
            Err(RecordError::MalformedTimestamp { .. })
        ));
    }

    #[test]
    fn test_multiply_exact_products() {
        assert_eq!(multiply("11", "12").unwrap(), "132");
        assert_eq!(multiply("0", "10000").unwrap(), "0");
        assert_eq!(multiply("10000", "10000").unwrap(), "100000000");
    }

    #[test]
    fn test_multiply_rejects_non_numeric() {
        assert!(matches!(
            multiply("ten", "2"),
            Err(RecordError::MalformedNumber { .. })
        ));
        assert!(matches!(
            multiply("2", ""),
            Err(RecordError::MalformedNumber { .. })
        ));
    }

    #[test]
    fn test_flag_to_label() {
        assert_eq!(flag_to_label("0", "In", "Out"), "In");
        assert_eq!(flag_to_label("1", "In", "Out"), "Out");
        assert_eq!(flag_to_label("7", "In", "Out"), "Out");
        assert_eq!(flag_to_label("", "In", "Out"), "Out");
    }

    #[test]
    fn test_literal_and_passthrough() {
        assert_eq!(literal("-"), "-");
        assert_eq!(passthrough("12345"), "12345");
    }
}
