//! Free-form date normalization.
//!
//! Turns dates typed or pasted by people into `YYYY-MM-DD` or
//! `YYYY-MM-DD HH:MM`. Recognition is a fixed, ordered list of grammar rules
//! ([`DATE_RULES`]); the first rule that matches wins. Input that no rule
//! recognizes is handed back unchanged and a warning is logged, so
//! normalization never fails.
//!
//! # Accepted forms
//!
//! | Rule       | Example                           | Result             |
//! |------------|-----------------------------------|--------------------|
//! | `iso`      | `2025-4-15`                       | `2025-04-15`       |
//! | `textual`  | `Freitag, 11. April 2025 14:30`   | `2025-04-11 14:30` |
//! | `textual`  | `Poniedziałek, 15 kwietnia 2025`  | `2025-04-15`       |
//! | `dash`     | `15-04-25`, `25-04-15`            | `2025-04-15`       |
//! | `dot`      | `15.04.2025`, `15.04.25`          | `2025-04-15`       |
//!
//! A trailing `H:MM` / `HH:MM` is detached before the rules run and appended
//! to the result.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt;

use super::month::{lookup_month, MonthMatch};
use super::time::{is_valid_time, CanonicalTime};

/// In the two-digit dash form a first segment of exactly this value is read
/// as the year (`25-04-15` is `YY-MM-DD`). Every other first segment is a day.
/// This is a single-value switch, not a year-position detector.
pub const YEAR_FIRST_MARKER: u32 = 25;

/// Two-digit years are expanded into this century.
const CENTURY: u16 = 2000;

static TRAILING_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{1,2}:[0-9]{2})$").expect("Invalid trailing time pattern"));

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})$").expect("Invalid ISO date pattern"));

static TEXTUAL_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:[^0-9,]*,\s*)?([0-9]{1,2})(?:\.|\s)\s*([A-Za-zäöüÄÖÜßąćęłńóśźżĄĆĘŁŃÓŚŹŻ]+)\s+([0-9]{4})",
    )
    .expect("Invalid textual date pattern")
});

static DASH_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{1,2})-([0-9]{1,2})-([0-9]{2,4})").expect("Invalid dash date pattern"));

static DOT_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{1,2})\.([0-9]{1,2})\.([0-9]{2,4})").expect("Invalid dot date pattern"));

// =============================================================================
// Canonical date
// =============================================================================

/// A recognized calendar date with an optional time of day.
///
/// Only constructed through [`CanonicalDate::new`], which keeps the month in
/// 1-12 and the day in 1-31. Day-of-month is not checked against the month
/// length (`31.02.2025` renders as `2025-02-31`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalDate {
    year: u16,
    month: u8,
    day: u8,
    time: Option<CanonicalTime>,
}

impl CanonicalDate {
    pub fn new(year: u16, month: u8, day: u8, time: Option<CanonicalTime>) -> Option<Self> {
        if !(1000..=9999).contains(&year) || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }
        Some(Self {
            year,
            month,
            day,
            time,
        })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn time(&self) -> Option<CanonicalTime> {
        self.time
    }
}

impl fmt::Display for CanonicalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)?;
        if let Some(time) = self.time {
            write!(f, " {}", time)?;
        }
        Ok(())
    }
}

// =============================================================================
// Grammar rules
// =============================================================================

/// Date fields extracted by a rule, before the time is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl DateParts {
    fn checked(year: u16, month: u32, day: u32) -> Option<Self> {
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }
        Some(Self {
            year,
            month: month as u8,
            day: day as u8,
        })
    }
}

/// One accepted date notation: a name and a matcher over the date part
/// (time already removed).
pub struct DateRule {
    pub name: &'static str,
    matcher: fn(&str) -> Option<DateParts>,
}

impl DateRule {
    pub fn apply(&self, date_part: &str) -> Option<DateParts> {
        (self.matcher)(date_part)
    }
}

impl fmt::Debug for DateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateRule").field("name", &self.name).finish()
    }
}

/// Rules in the order they are tried.
pub static DATE_RULES: &[DateRule] = &[
    DateRule {
        name: "iso",
        matcher: match_iso,
    },
    DateRule {
        name: "textual",
        matcher: match_textual,
    },
    DateRule {
        name: "dash",
        matcher: match_dash,
    },
    DateRule {
        name: "dot",
        matcher: match_dot,
    },
];

fn number(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group)?.as_str().parse().ok()
}

/// Expand a 2-digit year into the current century; 4-digit years pass.
fn expand_year(segment: &str) -> Option<u16> {
    let value: u16 = segment.parse().ok()?;
    match segment.len() {
        2 => Some(CENTURY + value),
        4 => Some(value),
        _ => None,
    }
}

/// `YYYY-M-D`, the form bulk date entry writes and the form exports produce.
fn match_iso(s: &str) -> Option<DateParts> {
    let caps = ISO_DATE.captures(s)?;
    let year = caps[1].parse().ok()?;
    DateParts::checked(year, number(&caps, 2)?, number(&caps, 3)?)
}

/// `[Weekday, ] D[.| ]MonthName YYYY` in Polish, German or English.
fn match_textual(s: &str) -> Option<DateParts> {
    let caps = TEXTUAL_DATE.captures(s)?;
    let day = number(&caps, 1)?;
    let name = &caps[2];
    let month = match lookup_month(name) {
        MonthMatch::Exact(m) => m,
        MonthMatch::Partial(m) => {
            log::debug!("Month '{}' resolved by partial match to {:02}", name, m);
            m
        }
        MonthMatch::Unknown => {
            log::warn!("Unrecognized month name '{}', defaulting to 01", name);
            1
        }
    };
    let year = caps[3].parse().ok()?;
    DateParts::checked(year, month as u32, day)
}

/// `D-M-YY` (with the [`YEAR_FIRST_MARKER`] switch) or `D-M-YYYY`.
fn match_dash(s: &str) -> Option<DateParts> {
    let caps = DASH_DATE.captures(s)?;
    let first = number(&caps, 1)?;
    let month = number(&caps, 2)?;
    let last = &caps[3];

    match last.len() {
        2 if first == YEAR_FIRST_MARKER => {
            let year = expand_year(&caps[1])?;
            DateParts::checked(year, month, last.parse().ok()?)
        }
        2 | 4 => DateParts::checked(expand_year(last)?, month, first),
        _ => None,
    }
}

/// `D.M.YY` or `D.M.YYYY`.
fn match_dot(s: &str) -> Option<DateParts> {
    let caps = DOT_DATE.captures(s)?;
    let year = expand_year(&caps[3])?;
    DateParts::checked(year, number(&caps, 2)?, number(&caps, 1)?)
}

// =============================================================================
// Normalization
// =============================================================================

/// Outcome of recognizing one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateOutcome {
    /// Blank input.
    Empty,
    /// A rule matched.
    Recognized {
        date: CanonicalDate,
        rule: &'static str,
    },
    /// No rule matched; carries the trimmed input.
    Unrecognized(String),
}

impl DateOutcome {
    /// The string written to exports.
    pub fn render(&self) -> String {
        match self {
            DateOutcome::Empty => String::new(),
            DateOutcome::Recognized { date, .. } => date.to_string(),
            DateOutcome::Unrecognized(original) => original.clone(),
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, DateOutcome::Recognized { .. })
    }
}

/// Split a trailing time off `input`.
///
/// Returns the remaining date part and the canonical time. A token that
/// fails [`is_valid_time`] is salvaged through its `H:MM` prefix or replaced
/// by `00:00`.
pub fn split_time(input: &str) -> (&str, Option<CanonicalTime>) {
    let Some(found) = TRAILING_TIME.find(input) else {
        return (input, None);
    };

    let token = found.as_str();
    let time = if is_valid_time(token) {
        CanonicalTime::parse(token)
    } else {
        let salvaged = CanonicalTime::salvage(token);
        log::warn!("Invalid time '{}' in '{}', using {}", token, input, salvaged);
        Some(salvaged)
    };

    (input[..found.start()].trim(), time)
}

/// Recognize a date cell.
pub fn parse_date(input: &str) -> DateOutcome {
    let original = input.trim();
    if original.is_empty() {
        return DateOutcome::Empty;
    }

    let (date_part, time) = split_time(original);

    for rule in DATE_RULES {
        if let Some(parts) = rule.apply(date_part) {
            if let Some(date) = CanonicalDate::new(parts.year, parts.month, parts.day, time) {
                log::debug!("Date '{}' matched rule '{}'", original, rule.name);
                return DateOutcome::Recognized {
                    date,
                    rule: rule.name,
                };
            }
        }
    }

    log::warn!("Unrecognized date format: '{}'", original);
    DateOutcome::Unrecognized(original.to_string())
}

/// Normalize a date cell to `YYYY-MM-DD[ HH:MM]`.
///
/// Blank input gives `""`; unrecognized input is returned trimmed but
/// otherwise unchanged.
pub fn normalize_date(input: &str) -> String {
    parse_date(input).render()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str) -> &'static DateRule {
        DATE_RULES.iter().find(|r| r.name == name).unwrap()
    }

    #[test]
    fn test_dot_form() {
        assert_eq!(normalize_date("15.04.2025"), "2025-04-15");
        assert_eq!(normalize_date("5.4.2025"), "2025-04-05");
        assert_eq!(normalize_date("15.04.25"), "2025-04-15");
    }

    #[test]
    fn test_dash_form_day_first() {
        assert_eq!(normalize_date("15-04-25"), "2025-04-15");
        assert_eq!(normalize_date("1-4-26"), "2026-04-01");
    }

    #[test]
    fn test_dash_form_year_marker() {
        assert_eq!(normalize_date("25-04-15"), "2025-04-15");
        // 24 is not the marker, so it is a day
        assert_eq!(normalize_date("24-04-15"), "2015-04-24");
    }

    #[test]
    fn test_dash_form_four_digit_year() {
        assert_eq!(normalize_date("15-04-2025"), "2025-04-15");
        // The marker only applies to a two-digit third segment
        assert_eq!(normalize_date("25-04-2025"), "2025-04-25");
        assert_eq!(normalize_date("25-04-2025 8:00"), "2025-04-25 08:00");
        // Three-digit third segment is rejected
        assert_eq!(normalize_date("15-04-255"), "15-04-255");
    }

    #[test]
    fn test_only_ascii_digits_are_read() {
        assert_eq!(normalize_date("15.04.2025 ١٢:٣٠"), "2025-04-15");
        assert_eq!(split_time("15.04.2025 ١٢:٣٠").1, None);
        assert_eq!(normalize_date("١٥.٠٤.٢٠٢٥"), "١٥.٠٤.٢٠٢٥");
    }

    #[test]
    fn test_textual_german_with_time() {
        assert_eq!(
            normalize_date("Freitag, 11. April 2025 14:30"),
            "2025-04-11 14:30"
        );
        assert_eq!(normalize_date("1. März 2025"), "2025-03-01");
    }

    #[test]
    fn test_textual_polish() {
        assert_eq!(normalize_date("Poniedziałek, 15 kwietnia 2025"), "2025-04-15");
        assert_eq!(normalize_date("3 października 2025 9:00"), "2025-10-03 09:00");
        assert_eq!(normalize_date("Środa, 1 WRZEŚNIA 2025"), "2025-09-01");
    }

    #[test]
    fn test_textual_english() {
        assert_eq!(normalize_date("Monday, 5 May 2025"), "2025-05-05");
    }

    #[test]
    fn test_textual_unknown_month_defaults_to_january() {
        assert_eq!(normalize_date("12 Foo 2025"), "2025-01-12");
    }

    #[test]
    fn test_year_is_four_digits_for_textual_form() {
        let outcome = parse_date("11. April 2025");
        match outcome {
            DateOutcome::Recognized { date, rule } => {
                assert_eq!(date.year(), 2025);
                assert_eq!(rule, "textual");
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_iso_passes_through() {
        assert_eq!(normalize_date("2025-04-15"), "2025-04-15");
        assert_eq!(normalize_date("2024-4-5 8:15"), "2024-04-05 08:15");
        // Would be misread by the dash rule without the iso rule in front
        assert_eq!(normalize_date("2024-04-15"), "2024-04-15");
    }

    #[test]
    fn test_time_is_padded() {
        assert_eq!(normalize_date("15.04.2025 9:05"), "2025-04-15 09:05");
    }

    #[test]
    fn test_invalid_time_falls_back() {
        assert_eq!(normalize_date("15.04.2025 25:00"), "2025-04-15 00:00");
        assert_eq!(normalize_date("15.04.2025 12:75"), "2025-04-15 00:00");
    }

    #[test]
    fn test_unrecognized_returns_input() {
        assert_eq!(normalize_date("not a date"), "not a date");
        assert_eq!(normalize_date("  not a date "), "not a date");
        assert_eq!(normalize_date("14:30"), "14:30");
        assert!(!parse_date("not a date").is_recognized());
    }

    #[test]
    fn test_out_of_range_month_is_not_recognized() {
        assert_eq!(normalize_date("15.13.2025"), "15.13.2025");
        assert_eq!(normalize_date("15-13-25"), "15-13-25");
        assert_eq!(normalize_date("0.04.2025"), "0.04.2025");
    }

    #[test]
    fn test_three_digit_year_is_not_recognized() {
        assert_eq!(normalize_date("15.04.202"), "15.04.202");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_date(""), "");
        assert_eq!(normalize_date("   "), "");
        assert_eq!(parse_date(" "), DateOutcome::Empty);
    }

    #[test]
    fn test_split_time() {
        let (date, time) = split_time("15.04.2025 14:30");
        assert_eq!(date, "15.04.2025");
        assert_eq!(time.unwrap().to_string(), "14:30");

        let (date, time) = split_time("15.04.2025");
        assert_eq!(date, "15.04.2025");
        assert!(time.is_none());
    }

    #[test]
    fn test_rules_individually() {
        assert!(rule("iso").apply("2025-04-15").is_some());
        assert!(rule("iso").apply("15.04.2025").is_none());
        assert!(rule("textual").apply("15 kwietnia 2025").is_some());
        assert!(rule("textual").apply("15.04.2025").is_none());
        assert!(rule("dash").apply("15-04-25").is_some());
        assert!(rule("dash").apply("15.04.25").is_none());
        assert!(rule("dot").apply("15.04.25").is_some());
        assert!(rule("dot").apply("15-04-25").is_none());
    }

    #[test]
    fn test_rule_order() {
        let names: Vec<&str> = DATE_RULES.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["iso", "textual", "dash", "dot"]);
    }

    #[test]
    fn test_canonical_date_bounds() {
        assert!(CanonicalDate::new(2025, 0, 1, None).is_none());
        assert!(CanonicalDate::new(2025, 13, 1, None).is_none());
        assert!(CanonicalDate::new(2025, 1, 32, None).is_none());
        assert!(CanonicalDate::new(25, 1, 1, None).is_none());
        let date = CanonicalDate::new(2025, 4, 5, CanonicalTime::new(7, 0)).unwrap();
        assert_eq!(date.to_string(), "2025-04-05 07:00");
    }
}
