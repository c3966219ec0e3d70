//! CSV line codec for promo rows.
//!
//! Encoding normalizes the price and date columns and quotes every field.
//! Decoding is format-agnostic: it splits one line into raw fields and
//! applies no normalization.
//!
//! ```text
//! ["SKU-1", "4.298,99", "15.04.2025", "", "5", "0"]
//!   → "SKU-1","4298.99","2025-04-15","","5","0"
//! ```
//!
//! Lines are split before decoding, so quoted newlines are not supported.

use crate::models::{Column, CsvRow, CSV_HEADER};
use crate::normalize::{normalize_date, normalize_price};

/// Wrap a field in quotes, doubling embedded quotes.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Normalized export value for one cell.
pub fn export_value(column: Column, raw: &str) -> String {
    match column {
        Column::SpecialPrice => normalize_price(raw),
        Column::SpecialPriceFrom | Column::SpecialPriceTo => normalize_date(raw),
        _ => raw.to_string(),
    }
}

/// Encode one row as a quoted CSV line (no line terminator).
pub fn encode_row(fields: &CsvRow) -> String {
    Column::ALL
        .iter()
        .zip(fields.iter())
        .map(|(&column, raw)| quote(&export_value(column, raw)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Split one CSV line into raw field values.
///
/// A `"` toggles quoted mode, except `""` inside quotes, which yields one
/// literal quote. A `,` outside quotes ends the field. The last field is
/// emitted at end of line, so an empty line gives one empty field.
pub fn decode_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut inside_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if inside_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => inside_quotes = !inside_quotes,
            ',' if !inside_quotes => fields.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    fields.push(current);

    fields
}

/// Render a full CSV document: header line, then one line per row, each
/// terminated by `\n`.
pub fn export_csv<'a, I>(rows: I) -> String
where
    I: IntoIterator<Item = &'a CsvRow>,
{
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for row in rows {
        out.push_str(&encode_row(row));
        out.push('\n');
    }
    out
}
