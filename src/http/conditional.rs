//! Conditional request evaluation
//!
//! Decides between a full response, `304 Not Modified` and `412 Precondition
//! Failed` from the request's validator headers, and whether a `Range` header
//! may be honoured. Responses carry no `ETag`, so only modification times can
//! ever match; times are compared at one-second resolution because that is all
//! an HTTP date can express.

use httpdate::{fmt_http_date, parse_http_date};
use std::time::{SystemTime, UNIX_EPOCH};

/// Validator headers of a request
#[derive(Debug, Clone, Copy, Default)]
pub struct Conditions<'a> {
    pub if_match: Option<&'a str>,
    pub if_unmodified_since: Option<&'a str>,
    pub if_none_match: Option<&'a str>,
    pub if_modified_since: Option<&'a str>,
    pub if_range: Option<&'a str>,
}

/// Outcome of evaluating [`Conditions`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// Send the content; `honor_range` is false when `If-Range` did not match
    Proceed { honor_range: bool },
    /// Send `304 Not Modified`
    NotModified,
    /// Send `412 Precondition Failed`
    Failed,
}

/// Format a modification time as `Last-Modified` value
///
/// Returns `None` for an unknown time (`UNIX_EPOCH` or earlier).
pub fn last_modified_header(modified: SystemTime) -> Option<String> {
    unix_secs(modified).map(|_| fmt_http_date(modified))
}

/// Evaluate the validator headers of a GET or HEAD request against `modified`
pub fn evaluate(conditions: &Conditions<'_>, modified: SystemTime) -> Precondition {
    let modified = unix_secs(modified);

    let precondition_ok = match conditions.if_match {
        Some(value) => contains_wildcard(value),
        None => conditions
            .if_unmodified_since
            .and_then(|value| not_newer_than(modified, value))
            .unwrap_or(true),
    };
    if !precondition_ok {
        return Precondition::Failed;
    }

    match conditions.if_none_match {
        Some(value) => {
            if contains_wildcard(value) {
                return Precondition::NotModified;
            }
        }
        None => {
            if conditions
                .if_modified_since
                .and_then(|value| not_newer_than(modified, value))
                .unwrap_or(false)
            {
                return Precondition::NotModified;
            }
        }
    }

    let honor_range = match conditions.if_range {
        None => true,
        Some(value) if is_entity_tag(value) => false,
        Some(value) => match (modified, parse_http_date(value)) {
            (Some(modified), Ok(date)) => unix_secs(date) == Some(modified),
            _ => false,
        },
    };
    Precondition::Proceed { honor_range }
}

/// Whole seconds since the epoch, `None` when the time is unknown
fn unix_secs(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())
        .filter(|&secs| secs > 0)
}

/// `Some(true)` if content modified at `modified` is not newer than the date in
/// `value`; `None` when either side is unknown or unparsable
fn not_newer_than(modified: Option<u64>, value: &str) -> Option<bool> {
    let modified = modified?;
    let date = parse_http_date(value.trim()).ok()?;
    let date = date.duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs());
    Some(modified <= date)
}

fn contains_wildcard(value: &str) -> bool {
    value.split(',').any(|tag| tag.trim() == "*")
}

fn is_entity_tag(value: &str) -> bool {
    let value = value.trim_start();
    value.starts_with('"') || value.starts_with("W/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    // Sun, 06 Nov 1994 08:49:37 GMT
    const T: u64 = 784_111_777;
    const T_DATE: &str = "Sun, 06 Nov 1994 08:49:37 GMT";
    const EARLIER_DATE: &str = "Sun, 06 Nov 1994 08:49:36 GMT";

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn proceed(honor_range: bool) -> Precondition {
        Precondition::Proceed { honor_range }
    }

    #[test]
    fn test_no_conditions() {
        assert_eq!(evaluate(&Conditions::default(), at(T)), proceed(true));
    }

    #[test]
    fn test_last_modified_header() {
        assert_eq!(last_modified_header(at(T)).as_deref(), Some(T_DATE));
        assert_eq!(last_modified_header(UNIX_EPOCH), None);
    }

    #[test]
    fn test_if_modified_since() {
        let cond = |value| Conditions {
            if_modified_since: Some(value),
            ..Conditions::default()
        };
        assert_eq!(evaluate(&cond(T_DATE), at(T)), Precondition::NotModified);
        // Sub-second precision of the file is ignored
        assert_eq!(
            evaluate(&cond(T_DATE), at(T) + Duration::from_millis(500)),
            Precondition::NotModified
        );
        assert_eq!(evaluate(&cond(EARLIER_DATE), at(T)), proceed(true));
        assert_eq!(evaluate(&cond("garbage"), at(T)), proceed(true));
        assert_eq!(evaluate(&cond(T_DATE), UNIX_EPOCH), proceed(true));
    }

    #[test]
    fn test_if_none_match_overrides_if_modified_since() {
        let conditions = Conditions {
            if_none_match: Some("\"abc\""),
            if_modified_since: Some(T_DATE),
            ..Conditions::default()
        };
        assert_eq!(evaluate(&conditions, at(T)), proceed(true));

        let wildcard = Conditions {
            if_none_match: Some("*"),
            ..Conditions::default()
        };
        assert_eq!(evaluate(&wildcard, at(T)), Precondition::NotModified);
    }

    #[test]
    fn test_if_match() {
        let cond = |value| Conditions {
            if_match: Some(value),
            if_unmodified_since: Some(EARLIER_DATE),
            ..Conditions::default()
        };
        assert_eq!(evaluate(&cond("*"), at(T)), proceed(true));
        assert_eq!(evaluate(&cond("\"x\", *"), at(T)), proceed(true));
        assert_eq!(evaluate(&cond("\"x\""), at(T)), Precondition::Failed);
    }

    #[test]
    fn test_if_unmodified_since() {
        let cond = |value| Conditions {
            if_unmodified_since: Some(value),
            ..Conditions::default()
        };
        assert_eq!(evaluate(&cond(T_DATE), at(T)), proceed(true));
        assert_eq!(evaluate(&cond(EARLIER_DATE), at(T)), Precondition::Failed);
        assert_eq!(evaluate(&cond("garbage"), at(T)), proceed(true));
        assert_eq!(evaluate(&cond(EARLIER_DATE), UNIX_EPOCH), proceed(true));
    }

    #[test]
    fn test_if_range() {
        let cond = |value| Conditions {
            if_range: Some(value),
            ..Conditions::default()
        };
        assert_eq!(evaluate(&cond(T_DATE), at(T)), proceed(true));
        assert_eq!(evaluate(&cond(EARLIER_DATE), at(T)), proceed(false));
        assert_eq!(evaluate(&cond("\"abc\""), at(T)), proceed(false));
        assert_eq!(evaluate(&cond("W/\"abc\""), at(T)), proceed(false));
        assert_eq!(evaluate(&cond(T_DATE), UNIX_EPOCH), proceed(false));
    }
}
