//! Parsing user-supplied timestamps into epoch seconds.

use chrono::{Local, LocalResult, NaiveDateTime, TimeZone};

use crate::error::CliError;

/// Layout of timestamps accepted on the command line.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Parses a `YYYYMMDDhhmmss` string in the local time zone.
///
/// # Errors
///
/// Returns [`CliError::Time`] if the string is malformed or names a local
/// time that does not exist.
pub fn parse_local_timestamp(input: &str) -> Result<i64, CliError> {
    parse_timestamp_in(input, &Local)
}

/// Parses a `YYYYMMDDhhmmss` string in the given time zone.
///
/// A wall-clock time that occurs twice (DST fall-back) resolves to the
/// earlier instant.
///
/// # Errors
///
/// Returns [`CliError::Time`] if the string is malformed or names a time
/// skipped by the zone.
pub fn parse_timestamp_in<Tz: TimeZone>(input: &str, zone: &Tz) -> Result<i64, CliError> {
    let invalid = |reason: &str| CliError::Time {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    if input.len() != 14 || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("expected 14 digits as YYYYMMDDhhmmss"));
    }

    let naive = NaiveDateTime::parse_from_str(input, TIMESTAMP_FORMAT)
        .map_err(|e| invalid(&e.to_string()))?;

    match zone.from_local_datetime(&naive) {
        LocalResult::Single(t) => Ok(t.timestamp()),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.timestamp()),
        LocalResult::None => Err(invalid("time does not exist in the local time zone")),
    }
}
