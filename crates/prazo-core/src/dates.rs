//! Date coercion for human-entered spreadsheet cells.
//!
//! The source sheets mix several date notations (Brazilian day-first,
//! ISO year-first, US month-first, with and without a time portion), so
//! parsing walks a fixed priority ladder and the first format that accepts
//! the input wins. Priority order is part of the contract: `05/01/2024` is
//! January 5th, never May 1st.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Timestamp format used by PUT request bodies.
pub const WIRE_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp format the backing sheet expects in date cells.
pub const SHEET_TIMESTAMP: &str = "%d/%m/%Y %H:%M:%S";

/// Formats carrying a time portion, tried before the date-only formats.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Date-only formats, day-first before year-first before month-first.
const DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%Y-%m-%d", "%m/%d/%Y"];

/// Timestamp conversion failure for a PUT body field.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("invalid timestamp {0:?}, expected YYYY-MM-DD HH:MM:SS")]
    InvalidTimestamp(String),
}

/// Best-effort parse of a cell into a calendar date.
///
/// Walks the format ladder in priority order; when nothing matches and the
/// input contains a space, the segment before the first space is retried
/// (cells sometimes carry trailing text after an otherwise parseable date).
/// Returns `None` for empty or unmatchable input. Never panics.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    if input.is_empty() {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(input, format) {
            return Some(stamp.date());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Some(date);
        }
    }

    // Retry on the head segment only; whatever follows the first space is
    // discarded, not reinspected.
    input.split_once(' ').and_then(|(head, _)| parse_date(head))
}

/// Convert a wire timestamp to the form the sheet's date cells use.
///
/// Empty input maps to the empty string, which clears the target cell.
pub fn to_sheet_timestamp(value: &str) -> Result<String, DateError> {
    if value.is_empty() {
        return Ok(String::new());
    }
    let stamp = NaiveDateTime::parse_from_str(value, WIRE_TIMESTAMP)
        .map_err(|_| DateError::InvalidTimestamp(value.to_string()))?;
    Ok(stamp.format(SHEET_TIMESTAMP).to_string())
}
