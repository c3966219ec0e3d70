//! `HH:MM` time tokens.
//!
//! Accepts `H:MM` and `HH:MM` with the hour in 0-23 and the minute in 0-59.
//! Single-digit minutes (`9:5`) are rejected.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static VALID_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01]?[0-9]|2[0-3]):([0-5][0-9])$").expect("Invalid time pattern")
});

/// Lenient `H:MM` prefix used to salvage a malformed trailing time.
static TIME_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{1,2}):([0-9]{2})").expect("Invalid time prefix pattern"));

/// Substituted when a trailing time cannot be salvaged.
pub const FALLBACK_TIME: CanonicalTime = CanonicalTime { hour: 0, minute: 0 };

/// A validated time of day, rendered zero-padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CanonicalTime {
    hour: u8,
    minute: u8,
}

impl CanonicalTime {
    /// Build from numeric parts, rejecting out-of-range values.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour <= 23 && minute <= 59 {
            Some(Self {
                hour: hour as u8,
                minute: minute as u8,
            })
        } else {
            None
        }
    }

    /// Parse a string that matches the strict time grammar.
    pub fn parse(s: &str) -> Option<Self> {
        let caps = VALID_TIME.captures(s)?;
        let hour = caps[1].parse().ok()?;
        let minute = caps[2].parse().ok()?;
        Self::new(hour, minute)
    }

    /// Recover a time from a token that failed [`is_valid_time`].
    ///
    /// Re-reads the `H:MM` prefix of the token; if the numbers are in range
    /// they are used, otherwise [`FALLBACK_TIME`] is returned.
    pub fn salvage(token: &str) -> Self {
        TIME_PREFIX
            .captures(token)
            .and_then(|caps| {
                let hour = caps[1].parse().ok()?;
                let minute = caps[2].parse().ok()?;
                Self::new(hour, minute)
            })
            .unwrap_or(FALLBACK_TIME)
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl fmt::Display for CanonicalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// True iff `s` is `H:MM` or `HH:MM` with hour 0-23 and minute 0-59.
pub fn is_valid_time(s: &str) -> bool {
    VALID_TIME.is_match(s)
}

/// Zero-pad the hour of a valid time; anything else is returned unchanged.
///
/// The pass-through means the result is only canonical when
/// [`is_valid_time`] holds for the input.
pub fn format_time(s: &str) -> String {
    match CanonicalTime::parse(s) {
        Some(time) => time.to_string(),
        None => s.to_string(),
    }
}
