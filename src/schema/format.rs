//! Semantic string format detection

use super::types::Format;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

/// Pattern table, in match priority order.
const PATTERNS: [(Format, &str); 8] = [
    (
        Format::Uuid,
        r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$",
    ),
    (Format::Email, r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$"),
    (Format::Uri, r"^(https?|ftp)://[^\s/$.?#].[^\s]*$"),
    (Format::Date, r"^\d{4}-\d{2}-\d{2}$"),
    (
        Format::Time,
        r"^\d{2}:\d{2}(:\d{2})?(\.\d+)?(Z|[+-]\d{2}:\d{2})?$",
    ),
    (
        Format::DateTime,
        r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}(:\d{2})?(\.\d+)?(Z|[+-]\d{2}:\d{2})?$",
    ),
    (
        Format::Ipv4,
        r"^(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$",
    ),
    (
        Format::Ipv6,
        r"^(([0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}|([0-9a-fA-F]{1,4}:){1,7}:|([0-9a-fA-F]{1,4}:){1,6}:[0-9a-fA-F]{1,4}|([0-9a-fA-F]{1,4}:){1,5}(:[0-9a-fA-F]{1,4}){1,2}|([0-9a-fA-F]{1,4}:){1,4}(:[0-9a-fA-F]{1,4}){1,3}|([0-9a-fA-F]{1,4}:){1,3}(:[0-9a-fA-F]{1,4}){1,4}|([0-9a-fA-F]{1,4}:){1,2}(:[0-9a-fA-F]{1,4}){1,5}|[0-9a-fA-F]{1,4}:((:[0-9a-fA-F]{1,4}){1,6})|:((:[0-9a-fA-F]{1,4}){1,7}|:)|fe80:(:[0-9a-fA-F]{0,4}){0,4}%[0-9a-zA-Z]+|::(ffff(:0{1,4})?:)?((25[0-5]|(2[0-4]|1?[0-9])?[0-9])\.){3}(25[0-5]|(2[0-4]|1?[0-9])?[0-9])|([0-9a-fA-F]{1,4}:){1,4}:((25[0-5]|(2[0-4]|1?[0-9])?[0-9])\.){3}(25[0-5]|(2[0-4]|1?[0-9])?[0-9]))$",
    ),
];

static SHARED: LazyLock<FormatDetector> = LazyLock::new(|| {
    let patterns = PATTERNS
        .iter()
        .map(|(format, pattern)| (*format, Regex::new(pattern).unwrap()))
        .collect();
    FormatDetector { patterns }
});

/// Detects semantic string formats
///
/// Regex patterns are checked first, in a fixed order (uuid, email, uri,
/// date, time, date-time, ipv4, ipv6), then RFC 3339 and plain-date parses,
/// then a numeric-string check. The first match wins.
///
/// The compiled pattern set is immutable, so a detector can be shared
/// freely across threads.
#[derive(Debug, Clone)]
pub struct FormatDetector {
    patterns: Vec<(Format, Regex)>,
}

impl Default for FormatDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatDetector {
    /// Create a detector with the built-in pattern set
    pub fn new() -> Self {
        SHARED.clone()
    }

    /// Process-wide detector instance
    pub fn shared() -> &'static FormatDetector {
        &SHARED
    }

    /// Detect the format of a string, `None` when nothing matches
    pub fn detect(&self, value: &str) -> Option<Format> {
        if let Some((format, _)) = self
            .patterns
            .iter()
            .find(|(_, pattern)| pattern.is_match(value))
        {
            return Some(*format);
        }

        if DateTime::parse_from_rfc3339(value).is_ok() {
            return Some(Format::DateTime);
        }

        if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() {
            return Some(Format::Date);
        }

        if is_numeric_string(value) {
            return Some(Format::Numeric);
        }

        None
    }
}

/// Parse-based date detection used when no pattern table is consulted
///
/// RFC 3339 and `YYYY-MM-DDTHH:MM:SS` are date-times; `YYYY-MM-DD` and
/// `YYYY/MM/DD` are dates.
pub fn detect_date_structure(value: &str) -> Option<Format> {
    if DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").is_ok()
    {
        return Some(Format::DateTime);
    }

    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || NaiveDate::parse_from_str(value, "%Y/%m/%d").is_ok()
    {
        return Some(Format::Date);
    }

    None
}

fn is_numeric_string(value: &str) -> bool {
    value.parse::<f64>().is_ok_and(f64::is_finite)
}
