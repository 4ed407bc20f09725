//! Pure value predicates shared by type tests and validators.
//!
//! Values are `serde_json::Value`; a JSON `null` stands for both a null
//! and a missing value.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime};
use lettre::Address;
use serde_json::Value;
use url::{Host, Url};

/// Protocols accepted by plain URL validators.
pub const WEB_PROTOCOLS: &[&str] = &["http", "https"];

/// Protocols accepted by stream URL validators.
pub const STREAM_PROTOCOLS: &[&str] = &["http", "https", "rtmp", "rtmps"];

/// Returns true for native numbers and well-formed numeric strings.
///
/// Strings are trimmed; the remainder must parse as a finite decimal
/// (optional sign, optional fraction and exponent). Currency symbols,
/// internal whitespace, `NaN` and infinities are rejected.
pub fn is_number(value: &Value) -> bool {
    as_number(value).is_some()
}

/// Numeric reading of a value, under the same rules as [`is_number`].
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric(s),
        _ => None,
    }
}

fn parse_numeric(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    // f64::from_str also takes "inf" and "nan" spellings
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Returns true for a plain key/value mapping (not an array, not null).
pub fn is_plain_object(value: &Value) -> bool {
    value.is_object()
}

/// Returns true when no two elements are deeply equal.
pub fn is_unique(items: &[Value]) -> bool {
    items
        .iter()
        .enumerate()
        .all(|(i, item)| items[i + 1..].iter().all(|other| !values_equal(item, other)))
}

/// Deep equality where numbers compare by value, so `1` equals `1.0`.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y || x.as_f64() == y.as_f64(),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(key, a)| y.get(key).map_or(false, |b| values_equal(a, b)))
        }
        _ => a == b,
    }
}

/// Returns true for an absolute URL with one of `protocols` and a real host.
///
/// The host must be an IP address or a domain with a top-level label of at
/// least two letters. Whitespace anywhere in the input is rejected.
pub fn is_url(value: &str, protocols: &[&str]) -> bool {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    let url = match Url::parse(value) {
        Ok(url) => url,
        Err(_) => return false,
    };
    if !protocols.contains(&url.scheme()) {
        return false;
    }
    match url.host() {
        Some(Host::Domain(domain)) => has_valid_tld(domain),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => true,
        None => false,
    }
}

fn has_valid_tld(domain: &str) -> bool {
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    match domain.rsplit_once('.') {
        Some((rest, tld)) => {
            !rest.is_empty()
                && tld.len() >= 2
                && (tld.chars().all(|c| c.is_alphabetic()) || tld.starts_with("xn--"))
        }
        None => false,
    }
}

/// Returns true for a well-formed `local@domain` email address.
///
/// Parsing follows RFC 5321/6531, so UTF-8 local parts are allowed. The
/// domain must also carry a top-level label, as for URLs.
pub fn is_email(value: &str) -> bool {
    match Address::from_str(value) {
        Ok(address) => has_valid_tld(address.domain()),
        Err(_) => false,
    }
}

/// Date forms with their input length. The suffix completes a reduced
/// precision date before parsing.
const DATE_FORMS: &[(&str, &str, usize)] = &[
    ("%Y-%m-%d", "", 10),
    ("%Y%m%d", "", 8),
    ("%Y-%j", "", 8),
    ("%G-W%V-%u", "", 10),
    ("%GW%V%u", "", 8),
    ("%G-W%V-%u", "-1", 8),
    ("%GW%V%u", "1", 7),
    ("%Y-%m-%d", "-01", 7),
    ("%Y-%m-%d", "-01-01", 4),
];

/// Clock forms with their input length, fraction excluded
const CLOCK_FORMS: &[(&str, &str, usize)] = &[
    ("%H:%M:%S", "", 8),
    ("%H%M%S", "", 6),
    ("%H:%M", "", 5),
    ("%H%M", "", 4),
    ("%H:%M", ":00", 2),
];

/// Returns true when `value` is a valid ISO-8601 date or date-time.
///
/// Dates: calendar (`YYYY-MM-DD`, `YYYYMMDD`, `YYYY-MM`, `YYYY`), ordinal
/// (`YYYY-DDD`) and week (`YYYY-Www-D`, `YYYY-Www`). An optional time
/// follows after `T` or a space, with an optional fraction, `24:00` as end
/// of day, and an optional `Z` or `±hh[:mm]` offset.
pub fn is_iso8601(value: &str) -> bool {
    if DateTime::parse_from_rfc3339(value).is_ok() {
        return true;
    }
    let (date, time) = match value.find(|c| c == 'T' || c == ' ') {
        Some(i) => (&value[..i], Some(&value[i + 1..])),
        None => (value, None),
    };
    if value.chars().filter(|c| c.is_whitespace()).count() > 1 {
        return false;
    }
    is_iso_date(date) && time.map_or(true, is_iso_time)
}

fn is_iso_date(s: &str) -> bool {
    DATE_FORMS.iter().any(|(format, suffix, len)| {
        s.len() == *len && NaiveDate::parse_from_str(&format!("{}{}", s, suffix), format).is_ok()
    })
}

fn is_iso_time(s: &str) -> bool {
    let (clock, offset) = split_offset(s);
    if !offset.map_or(true, is_iso_offset) {
        return false;
    }
    let (clock, fraction) = match clock.find(|c| c == '.' || c == ',') {
        Some(i) => (&clock[..i], Some(&clock[i + 1..])),
        None => (clock, None),
    };
    if let Some(fraction) = fraction {
        let seconds = clock.len() == 8 || clock.len() == 6;
        if !seconds || fraction.is_empty() || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
    }
    match clock.strip_prefix("24") {
        // end of day: every field after the hour must be zero
        Some(rest) => {
            rest.chars().all(|c| c == '0' || c == ':')
                && fraction.map_or(true, |f| f.chars().all(|c| c == '0'))
                && is_clock(&format!("00{}", rest))
        }
        None => is_clock(clock),
    }
}

fn is_clock(s: &str) -> bool {
    CLOCK_FORMS.iter().any(|(format, suffix, len)| {
        s.len() == *len && NaiveTime::parse_from_str(&format!("{}{}", s, suffix), format).is_ok()
    })
}

fn is_iso_offset(s: &str) -> bool {
    matches!(s.len(), 2 | 4 | 5) && is_clock(s)
}

/// Splits a trailing `Z` or numeric offset from the clock part
fn split_offset(s: &str) -> (&str, Option<&str>) {
    if let Some(clock) = s.strip_suffix('Z') {
        return (clock, None);
    }
    match s.rfind(|c| c == '+' || c == '-') {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    }
}

/// Orders two values for bound validators.
///
/// Numbers and numeric strings compare numerically; other strings compare
/// lexically (ISO-8601 text sorts chronologically). Anything else is
/// incomparable.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x.partial_cmp(&y);
    }
    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Length of a sized value: characters of a string, elements of an array,
/// or keys of an object.
pub fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        Value::Object(map) => Some(map.len()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_number_accepts_numbers_and_numeric_strings() {
        assert!(is_number(&json!(5)));
        assert!(is_number(&json!(-2.5)));
        assert!(is_number(&json!("42")));
        assert!(is_number(&json!("-0.5")));
        assert!(is_number(&json!(" 12 ")));
        assert!(is_number(&json!("1e3")));
    }

    #[test]
    fn test_is_number_rejects_non_numeric() {
        assert!(!is_number(&json!("")));
        assert!(!is_number(&json!("   ")));
        assert!(!is_number(&json!("$5")));
        assert!(!is_number(&json!("1 2")));
        assert!(!is_number(&json!("NaN")));
        assert!(!is_number(&json!("Infinity")));
        assert!(!is_number(&json!("inf")));
        assert!(!is_number(&json!(true)));
        assert!(!is_number(&json!(null)));
        assert!(!is_number(&json!([1])));
    }

    #[test]
    fn test_is_unique() {
        assert!(is_unique(&[json!(1), json!(2), json!("1")]));
        assert!(!is_unique(&[json!({"a": 1}), json!({"a": 1})]));
        assert!(is_unique(&[]));
    }

    #[test]
    fn test_unique_compares_numbers_by_value() {
        let items: Vec<Value> = serde_json::from_str("[1, 1.0]").unwrap();
        assert!(!is_unique(&items));
        let nested: Vec<Value> = serde_json::from_str(r#"[{"a": [2]}, {"a": [2.0]}]"#).unwrap();
        assert!(!is_unique(&nested));
        assert!(values_equal(&json!({"a": 1, "b": [1]}), &json!({"b": [1], "a": 1})));
        assert!(!values_equal(&json!(1), &json!("1")));
    }

    #[test]
    fn test_is_url_protocols() {
        assert!(is_url("https://example.com/a?b=c", WEB_PROTOCOLS));
        assert!(is_url("http://127.0.0.1:8080", WEB_PROTOCOLS));
        assert!(!is_url("ftp://example.com", WEB_PROTOCOLS));
        assert!(!is_url("rtmp://live.example.com/app", WEB_PROTOCOLS));
        assert!(is_url("rtmp://live.example.com/app", STREAM_PROTOCOLS));
        assert!(is_url("rtmps://live.example.com/app", STREAM_PROTOCOLS));
    }

    #[test]
    fn test_is_url_rejects_malformed() {
        assert!(!is_url("", WEB_PROTOCOLS));
        assert!(!is_url("not a url", WEB_PROTOCOLS));
        assert!(!is_url("example.com", WEB_PROTOCOLS));
        assert!(!is_url("http://localhost", WEB_PROTOCOLS));
        assert!(!is_url("http://example.c", WEB_PROTOCOLS));
        assert!(!is_url("http://exa mple.com", WEB_PROTOCOLS));
    }

    #[test]
    fn test_is_email() {
        assert!(is_email("alice@example.com"));
        assert!(is_email("first.last+tag@mail.example.org"));
        assert!(!is_email("alice"));
        assert!(!is_email("alice@"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("alice@example"));
        assert!(!is_email(".alice@example.com"));
        assert!(!is_email("al..ice@example.com"));
    }

    #[test]
    fn test_is_email_allows_utf8_local_part() {
        assert!(is_email("ü@example.com"));
    }

    #[test]
    fn test_is_iso8601_dates() {
        assert!(is_iso8601("2024-01-01"));
        assert!(is_iso8601("2024-01"));
        assert!(is_iso8601("2024"));
        assert!(is_iso8601("20240101"));
        assert!(is_iso8601("2024-366"));
        assert!(!is_iso8601("2023-366"));
        assert!(!is_iso8601("2024-13-01"));
        assert!(!is_iso8601("2024-02-30"));
        assert!(!is_iso8601("not-a-date"));
        assert!(!is_iso8601(""));
    }

    #[test]
    fn test_is_iso8601_date_times() {
        assert!(is_iso8601("2024-01-01T00:00:00Z"));
        assert!(is_iso8601("2024-01-01T12:30"));
        assert!(is_iso8601("2024-01-01T12:30:15.250+02:00"));
        assert!(is_iso8601("2024-01-01 12:30:15-0500"));
        assert!(is_iso8601("2024-01-01T08"));
        assert!(!is_iso8601("2024-01-01T25:00:00Z"));
        assert!(!is_iso8601("2024-01-01T12:61"));
        assert!(!is_iso8601("2024-01-01T"));
        assert!(!is_iso8601("2024-01-01T12:00:00+5"));
        assert!(!is_iso8601("2024-01-01T12:30:15.+02:00"));
    }

    #[test]
    fn test_is_iso8601_week_dates() {
        assert!(is_iso8601("2024-W01-1"));
        assert!(is_iso8601("2024-W01"));
        assert!(is_iso8601("2024W011"));
        assert!(is_iso8601("2020-W53-7"));
        assert!(is_iso8601("2024-W01-1T10:00Z"));
        assert!(!is_iso8601("2024-W54-1"));
        assert!(!is_iso8601("2024-W01-8"));
    }

    #[test]
    fn test_is_iso8601_end_of_day() {
        assert!(is_iso8601("2024-01-01T24:00:00Z"));
        assert!(is_iso8601("2024-01-01T24:00"));
        assert!(!is_iso8601("2024-01-01T24:30"));
        assert!(!is_iso8601("2024-01-01T24:00:01Z"));
    }

    #[test]
    fn test_compare() {
        assert_eq!(compare(&json!(5), &json!(10)), Some(Ordering::Less));
        assert_eq!(compare(&json!("10"), &json!(10)), Some(Ordering::Equal));
        assert_eq!(
            compare(&json!("2024-01-02"), &json!("2024-01-01")),
            Some(Ordering::Greater)
        );
        assert_eq!(compare(&json!(true), &json!(1)), None);
    }

    #[test]
    fn test_length_of() {
        assert_eq!(length_of(&json!("héllo")), Some(5));
        assert_eq!(length_of(&json!([1, 2])), Some(2));
        assert_eq!(length_of(&json!({"a": 1})), Some(1));
        assert_eq!(length_of(&json!(3)), None);
    }
}
