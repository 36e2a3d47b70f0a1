//! Best-effort conversion of scraped date text to ISO-8601 with millisecond
//! precision and a trailing `Z`.
//!
//! Patterns are tried in a fixed order and the first one that matches
//! anywhere in the input wins, even when a later pattern would have found a
//! more precise timestamp elsewhere in the same text. Downstream ids and
//! retention rely on that output staying stable, so the order must not be
//! "improved".

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

const ISO_MILLIS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

lazy_static! {
    static ref DATE_PATTERNS: Vec<Regex> = vec![
        // full timestamp with seconds
        Regex::new(r"(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2})").unwrap(),
        // fractional seconds
        Regex::new(r"(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d+)").unwrap(),
        // embedded JSON field, as in launcher configs
        Regex::new(r#""publishDate":"([^"]+)""#).unwrap(),
        // day + Spanish month abbreviation; only the day is captured
        Regex::new(r"(\d{1,2})\s*(ene|feb|mar|abr|may|jun|jul|ago|sep|oct|nov|dic)").unwrap(),
        // generic timestamp with optional zone offset
        Regex::new(r"(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}[+\-Z]?(?:\d{2})?)").unwrap(),
    ];
}

/// Current UTC time in the normalized format.
pub fn now_iso() -> String {
    format_iso(&Utc::now())
}

pub fn format_iso(dt: &DateTime<Utc>) -> String {
    dt.format(ISO_MILLIS_FORMAT).to_string()
}

/// Normalizes a raw date string. Absent, empty or unrecognized input yields
/// the current time.
pub fn normalize(raw: Option<&str>) -> String {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return now_iso(),
    };

    for pattern in DATE_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(raw) {
            let matched = captures.get(1).map_or("", |m| m.as_str());
            return complete_suffix(matched);
        }
    }

    tracing::debug!(raw, "No date pattern matched, using current time");
    now_iso()
}

fn complete_suffix(matched: &str) -> String {
    if matched.ends_with('Z') {
        matched.to_string()
    } else if matched.contains('.') {
        format!("{}Z", matched)
    } else {
        format!("{}.000Z", matched)
    }
}

/// Parses a stored timestamp. Accepts RFC 3339 and naive ISO timestamps
/// (read as UTC), which older snapshots contain.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
