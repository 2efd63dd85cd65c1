// SPDX-FileCopyrightText: 2026 Walstorm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-side queries over the record relation.

pub mod records;

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse a stored `recorded_at` value.
///
/// Accepts the millisecond RFC 3339 form written by the current schema and the
/// `YYYY-MM-DD HH:MM:SS` form of SQLite's `CURRENT_TIMESTAMP`, which stores
/// created by older harness runs contain.
pub fn parse_recorded_at(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|naive| naive.and_utc())
        })
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn parses_millisecond_rfc3339() {
        let ts = parse_recorded_at("2026-10-19T08:15:30.250Z").unwrap();
        assert_eq!(ts.year(), 2026);
        assert_eq!(ts.second(), 30);
        assert_eq!(ts.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn parses_current_timestamp_form() {
        let ts = parse_recorded_at("2018-06-01 12:34:56").unwrap();
        assert_eq!(ts.hour(), 12);
        assert_eq!(ts.minute(), 34);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_recorded_at("yesterday").is_err());
    }
}
