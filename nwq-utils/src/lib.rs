//! Shared utility functions for NWQ crates.

/// Date and season helpers
pub mod dates {
    use crate::error::DateError;
    use chrono::{Datelike, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Serialize};
    use std::fmt;

    /// Datetime layouts seen in the sensor logger exports, tried in order.
    pub const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%d-%m-%Y %H:%M",
    ];

    /// Date-only layout; parsed values are pinned to midnight.
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Parse a sensor timestamp, accepting any of [`DATETIME_FORMATS`]
    /// or a bare `YYYY-MM-DD` date.
    pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, DateError> {
        let trimmed = s.trim();
        for format in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(dt);
            }
        }
        NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| DateError(trimmed.to_string()))
    }

    /// Format a datetime as "YYYY-MM-DD HH:MM:SS"
    pub fn format_datetime(dt: &NaiveDateTime) -> String {
        dt.format(DATETIME_FORMATS[0]).to_string()
    }

    /// Calendar-quarter season used by the sensor summary.
    ///
    /// Months 1-3 are Winter, 4-6 Spring, 7-9 Summer and 10-12 Fall.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    pub enum Season {
        Winter,
        Spring,
        Summer,
        Fall,
    }

    impl Season {
        /// All seasons in reporting order.
        pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

        /// Season for a calendar month (1-12).
        pub fn for_month(month: u32) -> Season {
            match month {
                0..=3 => Season::Winter,
                4..=6 => Season::Spring,
                7..=9 => Season::Summer,
                _ => Season::Fall,
            }
        }

        pub fn for_datetime(dt: &NaiveDateTime) -> Season {
            Season::for_month(dt.month())
        }
    }

    impl fmt::Display for Season {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let name = match self {
                Season::Winter => "Winter",
                Season::Spring => "Spring",
                Season::Summer => "Summer",
                Season::Fall => "Fall",
            };
            f.write_str(name)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::{NaiveDate, Timelike};

        #[test]
        fn test_parse_datetime_variants() {
            let expected = NaiveDate::from_ymd_opt(2023, 6, 15)
                .unwrap()
                .and_hms_opt(14, 30, 0)
                .unwrap();
            assert_eq!(parse_datetime("2023-06-15 14:30:00").unwrap(), expected);
            assert_eq!(parse_datetime("2023-06-15 14:30").unwrap(), expected);
            assert_eq!(parse_datetime("2023-06-15T14:30:00").unwrap(), expected);
            assert_eq!(parse_datetime("15-06-2023 14:30").unwrap(), expected);

            let midnight = parse_datetime(" 2023-06-15 ").unwrap();
            assert_eq!(midnight.hour(), 0);
        }

        #[test]
        fn test_parse_datetime_rejects_garbage() {
            let err = parse_datetime("yesterday").unwrap_err();
            assert_eq!(err.0, "yesterday");
        }

        #[test]
        fn test_season_for_month() {
            assert_eq!(Season::for_month(1), Season::Winter);
            assert_eq!(Season::for_month(3), Season::Winter);
            assert_eq!(Season::for_month(4), Season::Spring);
            assert_eq!(Season::for_month(6), Season::Spring);
            assert_eq!(Season::for_month(7), Season::Summer);
            assert_eq!(Season::for_month(9), Season::Summer);
            assert_eq!(Season::for_month(10), Season::Fall);
            assert_eq!(Season::for_month(12), Season::Fall);
        }

        #[test]
        fn test_format_datetime() {
            let dt = NaiveDate::from_ymd_opt(2022, 8, 1)
                .unwrap()
                .and_hms_opt(9, 5, 7)
                .unwrap();
            assert_eq!(format_datetime(&dt), "2022-08-01 09:05:07");
        }
    }
}

/// Small numeric helpers shared by the aggregators.
pub mod numbers {
    /// Round to a fixed number of decimal places for display.
    pub fn round_to(value: f64, places: u32) -> f64 {
        let factor = 10f64.powi(places as i32);
        (value * factor).round() / factor
    }

    /// Arithmetic mean, `None` for an empty slice.
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Median (average of the two middle values for even lengths),
    /// `None` for an empty slice.
    pub fn median(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            Some((sorted[mid - 1] + sorted[mid]) / 2.0)
        } else {
            Some(sorted[mid])
        }
    }

    /// `part / whole * 100`, `None` when `whole` is zero.
    pub fn percentage(part: usize, whole: usize) -> Option<f64> {
        if whole == 0 {
            None
        } else {
            Some(part as f64 / whole as f64 * 100.0)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_round_to() {
            assert_eq!(round_to(66.666_666, 1), 66.7);
            assert_eq!(round_to(33.35, 0), 33.0);
            assert_eq!(round_to(12.3449, 2), 12.34);
            assert_eq!(round_to(1.26, 1), 1.3);
        }

        #[test]
        fn test_mean_and_median() {
            assert_eq!(mean(&[100.0, 50.0, 0.0]), Some(50.0));
            assert_eq!(median(&[100.0, 0.0, 50.0]), Some(50.0));
            assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
            assert_eq!(mean(&[]), None);
            assert_eq!(median(&[]), None);
        }

        #[test]
        fn test_percentage() {
            assert_eq!(percentage(1, 4), Some(25.0));
            assert_eq!(percentage(0, 0), None);
        }
    }
}

/// Error types
pub mod error {
    use std::fmt;

    /// A timestamp that matched none of the accepted layouts.
    #[derive(Debug, Clone, PartialEq)]
    pub struct DateError(pub String);

    impl fmt::Display for DateError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Unrecognized datetime: {}", self.0)
        }
    }

    impl std::error::Error for DateError {}
}
