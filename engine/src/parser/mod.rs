//! CSV import with encoding auto-detection.
//!
//! Reads files produced by [`crate::codec::export_csv`] or by spreadsheet
//! tools: the first non-blank line is a header (discarded, not validated),
//! each following line is decoded with [`decode_line`]. Lines with fewer
//! than six fields are skipped; extra fields are ignored. Values are kept
//! raw, no normalization happens on import.

use std::path::Path;

use crate::codec::decode_line;
use crate::error::{ImportError, ImportResult as Result};
use crate::models::{CsvRow, COLUMN_COUNT};

/// Rows read from an import file.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    /// Rows in file order, six raw fields each
    pub rows: Vec<CsvRow>,
    /// Data lines dropped for having fewer than six fields
    pub skipped: usize,
    /// Detected or assumed encoding
    pub encoding: String,
}

/// Detect the encoding of raw bytes using chardet.
///
/// Bytes that are valid UTF-8 are always reported as UTF-8; chardet is only
/// consulted for legacy code pages.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "iso-8859-2" | "latin-2" | "latin2" => "iso-8859-2".to_string(),
        "windows-1250" | "cp1250" => "windows-1250".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> Result<String> {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => String::from_utf8_lossy(bytes).to_string(),
        },
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0.to_string(),
        "iso-8859-2" | "latin-2" | "latin2" => encoding_rs::ISO_8859_2.decode(bytes).0.to_string(),
        "windows-1250" | "cp1250" => encoding_rs::WINDOWS_1250.decode(bytes).0.to_string(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.to_string(),
        other => {
            let label = encoding_rs::Encoding::for_label(other.as_bytes())
                .ok_or_else(|| ImportError::Encoding(other.to_string()))?;
            label.decode(bytes).0.to_string()
        }
    };

    Ok(decoded.trim_start_matches('\u{feff}').to_string())
}

/// Parse an already decoded CSV document.
pub fn parse_import(content: &str) -> Result<ParseResult> {
    let mut lines = content.lines().filter(|line| !line.trim().is_empty());

    if lines.next().is_none() {
        return Err(ImportError::EmptyFile);
    }

    let mut result = ParseResult {
        encoding: "utf-8".to_string(),
        ..Default::default()
    };
    let mut data_lines = 0;

    for line in lines {
        data_lines += 1;
        let fields = decode_line(line);
        if fields.len() < COLUMN_COUNT {
            log::debug!("Skipping line with {} fields: {}", fields.len(), line);
            result.skipped += 1;
            continue;
        }

        let mut row = CsvRow::default();
        for (cell, value) in row.iter_mut().zip(fields) {
            *cell = value;
        }
        result.rows.push(row);
    }

    if data_lines == 0 {
        return Err(ImportError::NoData);
    }

    Ok(result)
}

/// Parse CSV bytes with encoding auto-detection.
pub fn parse_import_bytes(bytes: &[u8]) -> Result<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let mut result = parse_import(&content)?;
    result.encoding = encoding;
    Ok(result)
}

/// Read and parse a CSV file with encoding auto-detection.
pub fn parse_import_file<P: AsRef<Path>>(path: P) -> Result<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_import_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CSV_HEADER;

    #[test]
    fn test_header_is_discarded() {
        let csv = format!("{}\n\"A\",\"1\",\"\",\"\",\"2\",\"0\"\n", CSV_HEADER);
        let result = parse_import(&csv).unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0][0], "A");
        assert_eq!(result.rows[0][4], "2");
    }

    #[test]
    fn test_header_is_not_validated() {
        let csv = "whatever;header\na,b,c,d,e,f\n";
        let result = parse_import(csv).unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0][5], "f");
    }

    #[test]
    fn test_short_lines_skipped() {
        let csv = "h\na,b,c\na,b,c,d,e,f\n";
        let result = parse_import(csv).unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_extra_fields_ignored() {
        let csv = "h\na,b,c,d,e,f,g,h\n";
        let result = parse_import(csv).unwrap();
        assert_eq!(result.rows[0][5], "f");
    }

    #[test]
    fn test_blank_lines_and_crlf() {
        let csv = "h\r\n\r\na,b,c,d,e,f\r\n   \r\n1,2,3,4,5,6\r\n";
        let result = parse_import(csv).unwrap();
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[1][5], "6");
    }

    #[test]
    fn test_values_kept_raw() {
        let csv = "h\n\"SKU\",\"4.298,99\",\"15.04.2025\",\"\",\"0\",\"\"\n";
        let result = parse_import(csv).unwrap();
        assert_eq!(result.rows[0][1], "4.298,99");
        assert_eq!(result.rows[0][2], "15.04.2025");
        assert_eq!(result.rows[0][4], "0");
    }

    #[test]
    fn test_empty_file_error() {
        assert!(matches!(parse_import(""), Err(ImportError::EmptyFile)));
        assert!(matches!(parse_import("\n  \n"), Err(ImportError::EmptyFile)));
    }

    #[test]
    fn test_header_only_error() {
        let result = parse_import(CSV_HEADER);
        assert!(matches!(result, Err(ImportError::NoData)));
    }

    #[test]
    fn test_only_short_lines_is_not_an_error() {
        let result = parse_import("h\na,b\n").unwrap();
        assert!(result.rows.is_empty());
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_bytes_utf8() {
        let csv = "h\nŻółw,1,,,2,0\n";
        let result = parse_import_bytes(csv.as_bytes()).unwrap();
        assert_eq!(result.rows[0][0], "Żółw");
    }

    #[test]
    fn test_windows_1250_decoding() {
        // "Łódź" in Windows-1250
        let bytes: &[u8] = &[0xA3, 0xF3, 0x64, 0x9F];
        let decoded = decode_content(bytes, "windows-1250").unwrap();
        assert_eq!(decoded, "Łódź");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert!(decoded.contains("Soci"));
    }

    #[test]
    fn test_bom_stripped() {
        let decoded = decode_content("\u{feff}h\n".as_bytes(), "utf-8").unwrap();
        assert_eq!(decoded, "h\n");
    }

    #[test]
    fn test_unknown_encoding_label() {
        let result = decode_content(b"abc", "no-such-encoding");
        assert!(matches!(result, Err(ImportError::Encoding(_))));
    }
}
