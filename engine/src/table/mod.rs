//! The editable promo table.
//!
//! [`PromoTable`] is the explicit row collection that editing, paste, bulk
//! date/time entry, import and export all operate on. Each row carries the
//! six raw cells plus error flags for the two date cells.
//!
//! # Architecture
//!
//! ```text
//! paste / set_cell / import ──▶ PromoTable ──▶ validate_all + fix_promo_qty
//!                                   │
//!                                   ├──▶ export_csv   (codec, normalized)
//!                                   └──▶ snapshot     (storage, raw + flags)
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::{Bound, ImportResult, TableError, TableResult};
use crate::models::{
    Column, CsvRow, COLUMN_COUNT, DEFAULT_CENTRAL_STOCK, DEFAULT_PROMO_QTY,
};
use crate::normalize::{format_time, is_valid_time};
use crate::parser::parse_import;

/// Trailing time-like token checked by validation; minutes may have any
/// number of digits so that `9:5` and `10:300` are caught.
static LOOSE_TRAILING_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{1,2}:[0-9]+)\s*$").expect("Invalid loose time pattern"));

/// Trailing time-like token replaced by bulk time entry.
static REPLACEABLE_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{1,2}:[0-9]+$").expect("Invalid replaceable time pattern"));

/// Trailing ` H:MM` kept by bulk date entry.
static KEPT_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s([0-9]{1,2}:[0-9]{2})$").expect("Invalid kept time pattern"));

/// Dates accepted by bulk date entry.
static BULK_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{1,2}\.[0-9]{1,2}\.[0-9]{4}|[0-9]{4}-[0-9]{1,2}-[0-9]{1,2})$")
        .expect("Invalid bulk date pattern")
});

// =============================================================================
// Rows
// =============================================================================

/// Validation state of one row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorFlags {
    /// Set when either date cell is flagged
    pub row: bool,
    /// `special_price_from` has a malformed trailing time
    pub from: bool,
    /// `special_price_to` has a malformed trailing time
    pub to: bool,
}

/// One table row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromoRow {
    pub cells: CsvRow,
    pub errors: ErrorFlags,
}

impl PromoRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: CsvRow) -> Self {
        Self {
            cells,
            errors: ErrorFlags::default(),
        }
    }

    pub fn cell(&self, column: Column) -> &str {
        &self.cells[column.index()]
    }

    pub fn cell_mut(&mut self, column: Column) -> &mut String {
        &mut self.cells[column.index()]
    }

    /// Recompute the error flags from the date cells.
    pub fn validate(&mut self) {
        let from = has_time_error(self.cell(Column::SpecialPriceFrom));
        let to = has_time_error(self.cell(Column::SpecialPriceTo));
        self.errors = ErrorFlags {
            row: from || to,
            from,
            to,
        };
    }

    /// Replace an empty, zero or `null` promo quantity with the default and
    /// switch on central stock. Returns whether the row changed.
    pub fn fix_promo_qty(&mut self) -> bool {
        let qty = self.cell(Column::ImportPromoQty).trim();
        if qty.is_empty() || qty == "0" || qty.eq_ignore_ascii_case("null") {
            *self.cell_mut(Column::ImportPromoQty) = DEFAULT_PROMO_QTY.to_string();
            *self.cell_mut(Column::UseCentralStock) = DEFAULT_CENTRAL_STOCK.to_string();
            true
        } else {
            false
        }
    }
}

/// True when a date cell ends in a time-like token that is not a valid
/// `HH:MM`. Empty cells and cells without a time are clean.
pub fn has_time_error(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return false;
    }
    LOOSE_TRAILING_TIME
        .captures(value)
        .is_some_and(|caps| !is_valid_time(&caps[1]))
}

// =============================================================================
// Table
// =============================================================================

/// How imported rows combine with existing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Drop existing rows first.
    Replace,
    /// Add imported rows after existing ones.
    #[default]
    Append,
}

/// The promo table: an ordered list of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoTable {
    rows: Vec<PromoRow>,
}

impl Default for PromoTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PromoTable {
    /// A table with a single empty row, ready for input.
    pub fn new() -> Self {
        Self {
            rows: vec![PromoRow::new()],
        }
    }

    /// Build from existing rows; an empty list gives one empty row.
    pub fn from_rows(rows: Vec<PromoRow>) -> Self {
        if rows.is_empty() {
            Self::new()
        } else {
            Self { rows }
        }
    }

    pub fn rows(&self) -> &[PromoRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> TableResult<&PromoRow> {
        self.rows.get(index).ok_or(TableError::RowOutOfRange {
            index,
            len: self.rows.len(),
        })
    }

    /// Append an empty row and return its index.
    pub fn add_row(&mut self) -> usize {
        self.rows.push(PromoRow::new());
        self.rows.len() - 1
    }

    /// Remove one row. The table may become empty.
    pub fn delete_row(&mut self, index: usize) -> TableResult<PromoRow> {
        if index >= self.rows.len() {
            return Err(TableError::RowOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        Ok(self.rows.remove(index))
    }

    /// Remove every row, leaving one empty row.
    pub fn clear(&mut self) {
        self.rows = vec![PromoRow::new()];
    }

    /// Edit one cell the way typing into it would.
    ///
    /// A quantity edit re-applies the quantity default for that row; a date
    /// edit revalidates the row.
    pub fn set_cell(&mut self, row: usize, column: usize, value: &str) -> TableResult<()> {
        let column = Column::from_index(column).ok_or(TableError::ColumnOutOfRange(column))?;
        let len = self.rows.len();
        let target = self
            .rows
            .get_mut(row)
            .ok_or(TableError::RowOutOfRange { index: row, len })?;

        *target.cell_mut(column) = value.to_string();
        if column == Column::ImportPromoQty {
            target.fix_promo_qty();
        }
        if column.is_date() {
            target.validate();
        }
        Ok(())
    }

    /// Paste tab-separated text with its top-left cell at (`start_row`,
    /// `start_col`).
    ///
    /// Lines split on `\n` / `\r\n`, blank lines dropped, cells on `\t`.
    /// Rows are appended as needed; cells past the last column are ignored.
    /// Returns the number of rows written.
    pub fn paste(&mut self, start_row: usize, start_col: usize, text: &str) -> TableResult<usize> {
        if start_col >= COLUMN_COUNT {
            return Err(TableError::ColumnOutOfRange(start_col));
        }
        if start_row >= self.rows.len() {
            return Err(TableError::RowOutOfRange {
                index: start_row,
                len: self.rows.len(),
            });
        }

        let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();

        for (offset, line) in lines.iter().enumerate() {
            let index = start_row + offset;
            while index >= self.rows.len() {
                self.add_row();
            }
            let row = &mut self.rows[index];
            for (cell_offset, value) in line.split('\t').enumerate() {
                if let Some(cell) = row.cells.get_mut(start_col + cell_offset) {
                    *cell = value.to_string();
                }
            }
        }

        self.validate_all();
        self.fix_promo_qty();
        log::info!("Pasted {} rows at ({}, {})", lines.len(), start_row, start_col);
        Ok(lines.len())
    }

    /// Recompute error flags for every row. Returns the number of flagged
    /// rows.
    pub fn validate_all(&mut self) -> usize {
        self.rows.iter_mut().for_each(PromoRow::validate);
        self.error_count()
    }

    pub fn error_count(&self) -> usize {
        self.rows.iter().filter(|r| r.errors.row).count()
    }

    /// Apply the quantity default to every row. Returns the number of rows
    /// changed.
    pub fn fix_promo_qty(&mut self) -> usize {
        self.rows
            .iter_mut()
            .map(PromoRow::fix_promo_qty)
            .filter(|changed| *changed)
            .count()
    }

    /// Set the time on every non-empty date cell.
    ///
    /// Blank arguments leave that column alone. Both arguments are checked
    /// before anything changes. An existing trailing time is replaced,
    /// otherwise ` HH:MM` is appended.
    pub fn apply_mass_time(&mut self, from: &str, to: &str) -> TableResult<()> {
        let from = checked_time(from, Bound::From)?;
        let to = checked_time(to, Bound::To)?;

        for row in &mut self.rows {
            if let Some(time) = &from {
                set_time(row.cell_mut(Column::SpecialPriceFrom), time);
            }
            if let Some(time) = &to {
                set_time(row.cell_mut(Column::SpecialPriceTo), time);
            }
        }

        log::info!(
            "Applied bulk time (from: {}, to: {}) to {} rows",
            from.as_deref().unwrap_or("-"),
            to.as_deref().unwrap_or("-"),
            self.rows.len()
        );
        self.validate_all();
        Ok(())
    }

    /// Set the date on every non-empty date cell, keeping its time.
    ///
    /// Dates must be `D.M.YYYY` or `YYYY-M-D`; blank arguments leave that
    /// column alone. A trailing ` H:MM` in the cell survives, zero-padded.
    pub fn apply_mass_date(&mut self, from: &str, to: &str) -> TableResult<()> {
        let from = checked_date(from, Bound::From)?;
        let to = checked_date(to, Bound::To)?;

        for row in &mut self.rows {
            if let Some(date) = from {
                set_date(row.cell_mut(Column::SpecialPriceFrom), date);
            }
            if let Some(date) = to {
                set_date(row.cell_mut(Column::SpecialPriceTo), date);
            }
        }

        log::info!(
            "Applied bulk date (from: {}, to: {}) to {} rows",
            from.unwrap_or("-"),
            to.unwrap_or("-"),
            self.rows.len()
        );
        self.validate_all();
        Ok(())
    }

    /// Validate, apply quantity defaults, then render the CSV document.
    pub fn export_csv(&mut self) -> String {
        let flagged = self.validate_all();
        if flagged > 0 {
            log::warn!("Exporting {} rows with malformed times", flagged);
        }
        self.fix_promo_qty();
        codec::export_csv(self.rows.iter().map(|r| &r.cells))
    }

    /// Add rows read from an import file.
    ///
    /// Returns the number of rows added.
    pub fn import_rows(&mut self, rows: Vec<CsvRow>, mode: ImportMode) -> usize {
        let count = rows.len();
        let imported = rows.into_iter().map(PromoRow::from_cells);

        match mode {
            ImportMode::Replace => {
                self.rows = imported.collect();
                if self.rows.is_empty() {
                    self.rows.push(PromoRow::new());
                }
            }
            ImportMode::Append => self.rows.extend(imported),
        }

        self.validate_all();
        self.fix_promo_qty();
        log::info!("Imported {} rows ({:?})", count, mode);
        count
    }

    /// Parse a CSV document and import its rows. The table is untouched
    /// when the document has no data lines.
    pub fn import_csv(&mut self, content: &str, mode: ImportMode) -> ImportResult<usize> {
        let parsed = parse_import(content)?;
        if parsed.skipped > 0 {
            log::warn!("Skipped {} lines with fewer than {} fields", parsed.skipped, COLUMN_COUNT);
        }
        Ok(self.import_rows(parsed.rows, mode))
    }
}

fn checked_time(value: &str, bound: Bound) -> TableResult<Option<String>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if !is_valid_time(value) {
        return Err(TableError::InvalidTime {
            bound,
            value: value.to_string(),
        });
    }
    Ok(Some(format_time(value)))
}

fn checked_date(value: &str, bound: Bound) -> TableResult<Option<&str>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if !BULK_DATE.is_match(value) {
        return Err(TableError::InvalidDate {
            bound,
            value: value.to_string(),
        });
    }
    Ok(Some(value))
}

fn set_time(cell: &mut String, time: &str) {
    let content = cell.trim();
    if content.is_empty() {
        return;
    }
    *cell = if REPLACEABLE_TIME.is_match(content) {
        REPLACEABLE_TIME.replace(content, time).into_owned()
    } else {
        format!("{} {}", content, time)
    };
}

fn set_date(cell: &mut String, date: &str) {
    let content = cell.trim();
    if content.is_empty() {
        return;
    }
    let time = KEPT_TIME
        .captures(content)
        .map(|caps| format!(" {}", format_time(&caps[1])))
        .unwrap_or_default();
    *cell = format!("{}{}", date, time);
}

impl From<Vec<CsvRow>> for PromoTable {
    fn from(rows: Vec<CsvRow>) -> Self {
        Self::from_rows(rows.into_iter().map(PromoRow::from_cells).collect())
    }
}
