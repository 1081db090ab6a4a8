//! Format detection for string values
//!
//! A fixed chain of validators is tried in order and the first one that
//! accepts the string decides its format. The order runs from narrow to
//! broad patterns: a plain date is claimed before date-time, and the
//! generic absolute-URI check runs last.

use std::net::{Ipv4Addr, Ipv6Addr};

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use url::Url;
use uuid::Uuid;

use super::types::StringFormat;

/// Where a string being classified came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// A string token of a parsed JSON document
    JsonToken,
    /// A string held by an in-memory value
    Native,
}

/// A single format check in the classification chain
pub trait FormatValidator: Send + Sync {
    /// Format reported when this validator accepts a value
    fn format(&self) -> StringFormat;

    /// Whether `value` is in this validator's format
    fn is_valid(&self, value: &str, source: SourceKind) -> bool;
}

static DATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").expect("valid date regex"));

static DATETIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([0-9]{4})-([0-9]{2})-([0-9]{2})[Tt ]([0-9]{2}):([0-9]{2})(?::([0-9]{2})(?:\.[0-9]+)?)?(?:[Zz]|[+-][0-9]{2}:?[0-9]{2})?$",
    )
    .expect("valid date-time regex")
});

static TIME_SPAN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?(?:[0-9]+\.)?([0-9]{1,2}):([0-9]{2})(?::([0-9]{2})(?:\.[0-9]{1,7})?)?$")
        .expect("valid time-span regex")
});

static ISO_DURATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^-?P(?:[0-9]+Y)?(?:[0-9]+M)?(?:[0-9]+W)?(?:[0-9]+D)?(?:T(?:[0-9]+H)?(?:[0-9]+M)?(?:[0-9]+(?:[.,][0-9]+)?S)?)?$",
    )
    .expect("valid duration regex")
});

static TIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{2}):([0-9]{2}):([0-9]{2})(?:\.[0-9]+)?(?:[Zz]|[+-][0-9]{2}:[0-9]{2})?$")
        .expect("valid time regex")
});

// HTML5 "valid e-mail address" production
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("valid email regex")
});

fn capture_u32(captures: &Captures<'_>, index: usize) -> Option<u32> {
    captures.get(index).and_then(|m| m.as_str().parse().ok())
}

fn is_calendar_date(captures: &Captures<'_>) -> bool {
    let year = captures.get(1).and_then(|m| m.as_str().parse::<i32>().ok());
    match (year, capture_u32(captures, 2), capture_u32(captures, 3)) {
        (Some(y), Some(m), Some(d)) => NaiveDate::from_ymd_opt(y, m, d).is_some(),
        _ => false,
    }
}

fn is_clock_time(hour: Option<u32>, minute: Option<u32>, second: Option<u32>) -> bool {
    match (hour, minute) {
        (Some(h), Some(m)) => NaiveTime::from_hms_opt(h, m, second.unwrap_or(0)).is_some(),
        _ => false,
    }
}

struct DateValidator;

impl FormatValidator for DateValidator {
    fn format(&self) -> StringFormat {
        StringFormat::Date
    }

    fn is_valid(&self, value: &str, _source: SourceKind) -> bool {
        DATE_REGEX
            .captures(value)
            .is_some_and(|c| is_calendar_date(&c))
    }
}

struct DateTimeValidator;

impl FormatValidator for DateTimeValidator {
    fn format(&self) -> StringFormat {
        StringFormat::DateTime
    }

    fn is_valid(&self, value: &str, _source: SourceKind) -> bool {
        DATETIME_REGEX.captures(value).is_some_and(|c| {
            is_calendar_date(&c)
                && is_clock_time(
                    capture_u32(&c, 4),
                    capture_u32(&c, 5),
                    capture_u32(&c, 6),
                )
        })
    }
}

/// `[-][d.]hh:mm[:ss[.fffffff]]` or an ISO 8601 duration
struct TimeSpanValidator;

impl FormatValidator for TimeSpanValidator {
    fn format(&self) -> StringFormat {
        StringFormat::TimeSpan
    }

    fn is_valid(&self, value: &str, _source: SourceKind) -> bool {
        if let Some(c) = TIME_SPAN_REGEX.captures(value) {
            return is_clock_time(capture_u32(&c, 1), capture_u32(&c, 2), capture_u32(&c, 3));
        }
        // A lone "P" or a trailing "T" matches the pattern but carries no components
        ISO_DURATION_REGEX.is_match(value)
            && value.trim_start_matches('-').len() > 1
            && !value.ends_with('T')
    }
}

struct TimeValidator;

impl FormatValidator for TimeValidator {
    fn format(&self) -> StringFormat {
        StringFormat::Time
    }

    fn is_valid(&self, value: &str, _source: SourceKind) -> bool {
        TIME_REGEX.captures(value).is_some_and(|c| {
            is_clock_time(capture_u32(&c, 1), capture_u32(&c, 2), capture_u32(&c, 3))
        })
    }
}

/// 32 hex digits, hyphenated, or hyphenated inside braces or parentheses
struct GuidValidator;

impl FormatValidator for GuidValidator {
    fn format(&self) -> StringFormat {
        StringFormat::Guid
    }

    fn is_valid(&self, value: &str, _source: SourceKind) -> bool {
        if let Some(inner) = value.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
            return inner.len() == 36 && Uuid::try_parse(inner).is_ok();
        }
        if value.starts_with('{') {
            return value.len() == 38 && Uuid::try_parse(value).is_ok();
        }
        (value.len() == 32 || value.len() == 36) && Uuid::try_parse(value).is_ok()
    }
}

/// Every textual UUID form, including `urn:uuid:`
struct UuidValidator;

impl FormatValidator for UuidValidator {
    fn format(&self) -> StringFormat {
        StringFormat::Uuid
    }

    fn is_valid(&self, value: &str, _source: SourceKind) -> bool {
        Uuid::try_parse(value).is_ok()
    }
}

struct EmailValidator;

impl FormatValidator for EmailValidator {
    fn format(&self) -> StringFormat {
        StringFormat::Email
    }

    fn is_valid(&self, value: &str, _source: SourceKind) -> bool {
        EMAIL_REGEX.is_match(value)
    }
}

struct IpV4Validator;

impl FormatValidator for IpV4Validator {
    fn format(&self) -> StringFormat {
        StringFormat::Ipv4
    }

    fn is_valid(&self, value: &str, _source: SourceKind) -> bool {
        value.parse::<Ipv4Addr>().is_ok()
    }
}

struct IpV6Validator;

impl FormatValidator for IpV6Validator {
    fn format(&self) -> StringFormat {
        StringFormat::Ipv6
    }

    fn is_valid(&self, value: &str, _source: SourceKind) -> bool {
        value.parse::<Ipv6Addr>().is_ok()
    }
}

/// Schemes accepted without a `//` authority
const OPAQUE_URI_SCHEMES: [&str; 5] = ["mailto", "urn", "data", "tel", "news"];

/// Absolute URIs with an authority, or one of the opaque schemes above
struct UriValidator;

impl FormatValidator for UriValidator {
    fn format(&self) -> StringFormat {
        StringFormat::Uri
    }

    fn is_valid(&self, value: &str, _source: SourceKind) -> bool {
        // Url::parse trims its input and accepts any `word:rest` as a scheme
        if value.chars().any(char::is_whitespace) {
            return false;
        }
        let Some((scheme, rest)) = value.split_once(':') else {
            return false;
        };
        let has_authority = rest.starts_with("//");
        let opaque_scheme = OPAQUE_URI_SCHEMES
            .iter()
            .any(|known| scheme.eq_ignore_ascii_case(known));
        (has_authority || opaque_scheme) && Url::parse(value).is_ok()
    }
}

/// Classification chain, in match priority order
static FORMAT_VALIDATORS: [&dyn FormatValidator; 10] = [
    &DateValidator,
    &DateTimeValidator,
    &TimeSpanValidator,
    &TimeValidator,
    &GuidValidator,
    &UuidValidator,
    &EmailValidator,
    &IpV4Validator,
    &IpV6Validator,
    &UriValidator,
];

/// The validators of the classification chain, in the order they are tried
pub fn format_validators() -> &'static [&'static dyn FormatValidator] {
    &FORMAT_VALIDATORS
}

/// Classify a string value
///
/// Returns the format of the first validator in the chain that accepts
/// `value`, or `None` when the value is empty or nothing matches.
pub fn classify(value: &str, source: SourceKind) -> Option<StringFormat> {
    if value.is_empty() {
        return None;
    }

    let format = FORMAT_VALIDATORS
        .iter()
        .find(|validator| validator.is_valid(value, source))
        .map(|validator| validator.format());

    tracing::trace!(value, ?format, "classified string");
    format
}
