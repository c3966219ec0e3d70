//! Domain models for the promo pricing sheet.
//!
//! - [`Column`] - The six fixed columns, in file order
//! - [`CsvRow`] - One row of raw cell strings
//! - [`CSV_HEADER`] - The header line written to and expected in CSV files

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of data columns in every row.
pub const COLUMN_COUNT: usize = 6;

/// One row of raw cells in column order.
pub type CsvRow = [String; COLUMN_COUNT];

/// Header line of exported and imported CSV files.
pub const CSV_HEADER: &str = "sku,special_price,special_price_from,special_price_to,import_promo_qty,import_promo_qty_use_central_stock";

/// Value written to an empty or zero promo quantity.
pub const DEFAULT_PROMO_QTY: &str = "99";

/// Central-stock flag set together with [`DEFAULT_PROMO_QTY`].
pub const DEFAULT_CENTRAL_STOCK: &str = "1";

// =============================================================================
// Columns
// =============================================================================

/// The fixed columns of the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Sku,
    SpecialPrice,
    SpecialPriceFrom,
    SpecialPriceTo,
    ImportPromoQty,
    UseCentralStock,
}

impl Column {
    /// All columns in file order.
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::Sku,
        Column::SpecialPrice,
        Column::SpecialPriceFrom,
        Column::SpecialPriceTo,
        Column::ImportPromoQty,
        Column::UseCentralStock,
    ];

    /// Position in a row.
    pub fn index(self) -> usize {
        match self {
            Column::Sku => 0,
            Column::SpecialPrice => 1,
            Column::SpecialPriceFrom => 2,
            Column::SpecialPriceTo => 3,
            Column::ImportPromoQty => 4,
            Column::UseCentralStock => 5,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Header name in CSV files.
    pub fn header(self) -> &'static str {
        match self {
            Column::Sku => "sku",
            Column::SpecialPrice => "special_price",
            Column::SpecialPriceFrom => "special_price_from",
            Column::SpecialPriceTo => "special_price_to",
            Column::ImportPromoQty => "import_promo_qty",
            Column::UseCentralStock => "import_promo_qty_use_central_stock",
        }
    }

    /// Date columns get date normalization and time validation.
    pub fn is_date(self) -> bool {
        matches!(self, Column::SpecialPriceFrom | Column::SpecialPriceTo)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_matches_columns() {
        let joined: Vec<&str> = Column::ALL.iter().map(|c| c.header()).collect();
        assert_eq!(joined.join(","), CSV_HEADER);
    }

    #[test]
    fn test_index_round_trip() {
        for column in Column::ALL {
            assert_eq!(Column::from_index(column.index()), Some(column));
        }
        assert_eq!(Column::from_index(6), None);
    }

    #[test]
    fn test_date_columns() {
        let dates: Vec<Column> = Column::ALL.into_iter().filter(|c| c.is_date()).collect();
        assert_eq!(dates, vec![Column::SpecialPriceFrom, Column::SpecialPriceTo]);
    }
}
