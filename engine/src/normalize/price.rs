//! Price normalization.
//!
//! Converts locale-formatted decimals (`4.298,99`, `12,50`, `1 299,00`) to a
//! plain `.`-decimal string. The result is not checked for being a number;
//! residual garbage passes through for the caller to flag.

/// Normalize a price cell.
///
/// - blank input gives `""`
/// - all whitespace (including no-break spaces) is removed
/// - with both `.` and `,` present, `.` is a thousands separator and is
///   dropped, then `,` becomes the decimal point
/// - with only `,` present, it becomes the decimal point
/// - anything else is left as is
///
/// Normalizing an already normalized value is a no-op.
pub fn normalize_price(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }

    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();

    let has_dot = compact.contains('.');
    let has_comma = compact.contains(',');

    match (has_dot, has_comma) {
        (true, true) => compact.replace('.', "").replace(',', "."),
        (false, true) => compact.replace(',', "."),
        _ => compact,
    }
}
