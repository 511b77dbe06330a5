//! Read-time coercion rules shared by the object and array accessors.
//!
//! Producers sometimes encode numbers and timestamps as strings. These rules
//! let the typed accessors tolerate that without touching the stored node:
//!
//! | Accessor  | Accepts                                              |
//! |-----------|------------------------------------------------------|
//! | string    | any simple value except null, in its textual form    |
//! | long      | long, or text parsing as a base-10 `i64`             |
//! | double    | double, long, or text parsing as a finite `f64`      |
//! | boolean   | boolean only                                         |
//! | instant   | instant, or text parsing as ISO-8601 (else an error) |

use crate::{Error, JsonNode, Result};
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use std::borrow::Cow;

/// Textual form of a simple value; `None` for null and containers.
pub(crate) fn simple_text(node: &JsonNode) -> Option<Cow<'_, str>> {
    match node {
        JsonNode::Text(s) => Some(Cow::Borrowed(s)),
        JsonNode::Long(l) => Some(Cow::Owned(l.to_string())),
        JsonNode::Double(d) => Some(Cow::Owned(format_double(*d))),
        JsonNode::Boolean(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
        JsonNode::Instant(dt) => Some(Cow::Owned(format_instant(dt))),
        JsonNode::Null | JsonNode::Object(_) | JsonNode::Array(_) => None,
    }
}

pub(crate) fn lenient_long(node: &JsonNode) -> Option<i64> {
    match node {
        JsonNode::Long(l) => Some(*l),
        JsonNode::Text(s) => s.parse::<i64>().ok(),
        _ => None,
    }
}

pub(crate) fn lenient_double(node: &JsonNode) -> Option<f64> {
    match node {
        JsonNode::Double(d) => Some(*d),
        JsonNode::Long(l) => Some(*l as f64),
        JsonNode::Text(s) => s.parse::<f64>().ok().filter(|d| d.is_finite()),
        _ => None,
    }
}

/// Wrong variant is a silent miss; text that is not ISO-8601 is an error.
pub(crate) fn lenient_instant(node: &JsonNode) -> Result<Option<DateTime<Utc>>> {
    match node {
        JsonNode::Instant(dt) => Ok(Some(*dt)),
        JsonNode::Text(s) => parse_instant(s).map(Some),
        _ => Ok(None),
    }
}

/// Parses an ISO-8601 (RFC 3339) timestamp and normalizes it to UTC.
///
/// Years outside 0000-9999 are accepted with an explicit sign, matching what
/// [`format_instant`] writes for them.
///
/// # Examples
///
/// ```rust
/// use chrono::Datelike;
/// use jsonbuddy::coerce::parse_instant;
///
/// let instant = parse_instant("2015-06-01T10:15:30.120+02:00").unwrap();
/// assert_eq!(instant.to_rfc3339(), "2015-06-01T08:15:30.120+00:00");
/// assert_eq!(parse_instant("+12000-01-01T00:00:00Z").unwrap().year(), 12000);
/// assert!(parse_instant("June 1st").is_err());
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidInstant`] if `text` is not a valid timestamp.
pub fn parse_instant(text: &str) -> Result<DateTime<Utc>> {
    text.parse::<DateTime<FixedOffset>>()
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::invalid_instant(text, e))
}

/// Canonical rendering of an instant: UTC, `Z` suffix, and 0, 3, 6 or 9
/// fractional digits depending on the precision actually present.
///
/// # Examples
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use jsonbuddy::coerce::format_instant;
///
/// let instant = Utc.timestamp_millis_opt(1_433_153_730_120).unwrap();
/// assert_eq!(format_instant(&instant), "2015-06-01T10:15:30.120Z");
/// ```
#[must_use]
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Shortest round-trip rendering that always keeps a `.` or exponent, so the
/// text parses back as a double rather than a long.
#[must_use]
pub(crate) fn format_double(value: f64) -> String {
    format!("{:?}", value)
}
