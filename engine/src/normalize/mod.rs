//! Cell normalization for export.
//!
//! This module provides:
//! - `time`: `HH:MM` validation and padding
//! - `month`: the multi-locale month-name table
//! - `date`: ordered date grammar rules
//! - `price`: locale decimal conversion
//!
//! Every function here is total: unrecognized input is returned (trimmed)
//! and reported through `log`, never as an error.
//!
//! ```text
//! "Freitag, 11. April 2025 14:30" → split_time → textual rule → "2025-04-11 14:30"
//! "4.298,99"                      → normalize_price          → "4298.99"
//! ```

pub mod date;
pub mod month;
pub mod price;
pub mod time;

pub use date::{
    normalize_date, parse_date, split_time, CanonicalDate, DateOutcome, DateParts, DateRule,
    DATE_RULES, YEAR_FIRST_MARKER,
};
pub use month::{fold_diacritics, lookup_month, MonthMatch, MONTH_TABLE_VERSION};
pub use price::normalize_price;
pub use time::{format_time, is_valid_time, CanonicalTime, FALLBACK_TIME};
