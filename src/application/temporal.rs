//! Flexible date, time and interval parsing
//!
//! Dates accept keywords (`today`, `tomorrow`, `noon`, ...), relative phrases
//! (`+2 days`, `3 hours ago`, `in 1 week`) and common absolute spellings
//! (`2024-05-23`, `May 23, 2024`, `23rd May 2024 15:30`, `3:30 PM`).

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

static ORDINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").expect("ordinal pattern"));

/// `2days`, `-3h` style terms written without a space.
static COMPACT_TERM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([+-]?\d+)([a-z]+)$").expect("compact term pattern"));

/// `3pm`, `11 AM`: an hour with no minutes.
static HOUR_MERIDIEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\d{1,2})\s*(am|pm)$").expect("hour meridiem pattern"));

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%d-%B-%Y",
    "%B %d %Y",
    "%d %B %Y",
];

const TIME_FORMATS: &[&str] = &[
    "%H:%M:%S",
    "%H:%M",
    "%I:%M:%S %p",
    "%I:%M %p",
    "%I:%M%p",
];

/// Seconds in one unit, for singular and plural spellings.
fn unit_seconds(unit: &str) -> Option<i64> {
    let secs = match unit {
        "year" | "years" => YEAR,
        "month" | "months" => MONTH,
        "fortnight" | "fortnights" => 14 * DAY,
        "week" | "weeks" => 7 * DAY,
        "day" | "days" => DAY,
        "hour" | "hours" => HOUR,
        "minute" | "minutes" | "min" | "mins" => MINUTE,
        "second" | "seconds" | "sec" | "secs" => 1,
        _ => return None,
    };
    Some(secs)
}

fn parse_count(word: &str) -> Option<i64> {
    match word {
        "a" | "an" => Some(1),
        _ => word.parse().ok(),
    }
}

/// Parse a relative duration phrase into signed seconds.
///
/// Terms are `<n> <unit>` separated by spaces, commas or `and`; a trailing
/// `ago` negates the whole phrase.
pub fn parse_interval_seconds(input: &str) -> Option<i64> {
    let normalized = input.trim().to_lowercase().replace(',', " ");
    let mut words: Vec<&str> = normalized
        .split_whitespace()
        .filter(|w| *w != "and")
        .collect();

    let mut sign = 1;
    if words.last() == Some(&"ago") {
        words.pop();
        sign = -1;
    }
    if words.is_empty() {
        return None;
    }

    let mut total: i64 = 0;
    let mut rest = words.as_slice();
    while let Some((first, tail)) = rest.split_first() {
        let (count, unit, remaining) = match COMPACT_TERM.captures(first) {
            Some(caps) => (
                parse_count(caps.get(1)?.as_str())?,
                unit_seconds(caps.get(2)?.as_str())?,
                tail,
            ),
            None => {
                let (unit, after) = tail.split_first()?;
                (parse_count(first)?, unit_seconds(unit)?, after)
            }
        };
        total = total.checked_add(count.checked_mul(unit)?)?;
        rest = remaining;
    }
    total.checked_mul(sign)
}

/// Render seconds as `"<n> unit[s]"` parts joined by `", "`.
///
/// Years count 365 days and months 30 days. Zero renders as `"0 seconds"`.
pub fn render_interval(total: i64) -> String {
    let sign = if total < 0 { "-" } else { "" };
    let mut remaining = total.unsigned_abs();
    let mut parts = Vec::new();
    for (secs, unit) in [
        (YEAR, "year"),
        (MONTH, "month"),
        (DAY, "day"),
        (HOUR, "hour"),
        (MINUTE, "minute"),
        (1, "second"),
    ] {
        let secs = secs as u64;
        let n = remaining / secs;
        remaining %= secs;
        if n != 0 {
            let plural = if n > 1 { "s" } else { "" };
            parts.push(format!("{}{} {}{}", sign, n, unit, plural));
        }
    }
    if parts.is_empty() {
        "0 seconds".to_string()
    } else {
        parts.into_iter().join(", ")
    }
}

/// Parse a date and/or time phrase relative to `now`.
pub fn parse_datetime(input: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let cleaned = ORDINAL.replace_all(input.trim(), "$1").replace(',', " ");
    let cleaned = cleaned.split_whitespace().join(" ");
    if cleaned.is_empty() {
        return None;
    }

    parse_keyword(&cleaned, now)
        .or_else(|| parse_absolute(&cleaned, now.date()))
        .or_else(|| parse_relative(&cleaned, now))
}

/// `now`, `today`, `tomorrow 15:00`, `yesterday noon`, `midnight`.
fn parse_keyword(input: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let lower = input.to_lowercase();
    if lower == "now" {
        return Some(now);
    }
    let (head, tail) = match lower.split_once(' ') {
        Some((h, t)) => (h, Some(t)),
        None => (lower.as_str(), None),
    };
    let today = now.date();
    let date = match head {
        "today" | "midnight" | "noon" => today,
        "tomorrow" => today.succ_opt()?,
        "yesterday" => today.pred_opt()?,
        _ => return None,
    };
    let time = match (head, tail) {
        ("noon", None) => NaiveTime::from_hms_opt(12, 0, 0)?,
        (_, None) => midnight(),
        ("today" | "tomorrow" | "yesterday", Some(t)) => parse_time(t)?,
        _ => return None,
    };
    Some(date.and_time(time))
}

fn midnight() -> NaiveTime {
    NaiveTime::from_hms_opt(0, 0, 0).unwrap_or_default()
}

fn parse_time(input: &str) -> Option<NaiveTime> {
    match input.to_lowercase().as_str() {
        "midnight" => Some(midnight()),
        "noon" => NaiveTime::from_hms_opt(12, 0, 0),
        _ => TIME_FORMATS
            .iter()
            .find_map(|f| NaiveTime::parse_from_str(input, f).ok())
            .or_else(|| parse_hour_meridiem(input)),
    }
}

fn parse_hour_meridiem(input: &str) -> Option<NaiveTime> {
    let caps = HOUR_MERIDIEM.captures(input)?;
    let hour: u32 = caps[1].parse().ok()?;
    if !(1..=12).contains(&hour) {
        return None;
    }
    let offset = if caps[2].eq_ignore_ascii_case("pm") { 12 } else { 0 };
    NaiveTime::from_hms_opt(hour % 12 + offset, 0, 0)
}

fn parse_absolute(input: &str, today: NaiveDate) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    if let Some(date) = parse_date(input) {
        return Some(date.and_time(midnight()));
    }
    // date followed by a time, split at the rightmost space that works
    let split = input
        .rmatch_indices(' ')
        .find_map(|(i, _)| Some(parse_date(&input[..i])?.and_time(parse_time(&input[i + 1..])?)));
    split.or_else(|| parse_time(input).map(|t| today.and_time(t)))
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(input, f).ok())
}

/// `+2 days`, `in 3 hours`, `1 week ago`.
fn parse_relative(input: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let lower = input.to_lowercase();
    let phrase = lower.strip_prefix("in ").unwrap_or(&lower);
    let secs = parse_interval_seconds(phrase)?;
    now.checked_add_signed(Duration::try_seconds(secs)?)
}
