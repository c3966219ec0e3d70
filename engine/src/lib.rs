//! # Promo - promo pricing sheet engine
//!
//! Promo keeps a six-column pricing sheet (SKU, special price, validity
//! window, promo quantity, central-stock flag) and exports it as an
//! import-ready CSV. Prices and dates typed in whatever notation people use
//! (Polish, German or English month names, `D.M.YY`, decimal commas) are
//! normalized to `1234.56` and `YYYY-MM-DD[ HH:MM]` on the way out.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ paste/edit  │────▶│ PromoTable  │────▶│  Normalize  │────▶│  CSV export │
//! │ import CSV  │     │ (validate)  │     │ (date/price)│     │  (quoted)   │
//! └─────────────┘     └──────┬──────┘     └─────────────┘     └─────────────┘
//!                            │
//!                            ▼
//!                     ┌─────────────┐
//!                     │  Snapshot   │
//!                     │ (key/value) │
//!                     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use promo::{ImportMode, PromoTable};
//!
//! let mut table = PromoTable::new();
//! table.paste(0, 0, "SKU-1\t4.298,99\t15.04.2025\tFreitag, 30. Mai 2025 23:59\t\t").unwrap();
//! let csv = table.export_csv();
//! assert!(csv.contains(r#""SKU-1","4298.99","2025-04-15","2025-05-30 23:59","99","1""#));
//!
//! let mut copy = PromoTable::new();
//! copy.import_csv(&csv, ImportMode::Replace).unwrap();
//! assert_eq!(copy.len(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Columns and raw rows
//! - [`normalize`] - Time, date, month-name and price normalization
//! - [`codec`] - CSV line encoding and decoding
//! - [`parser`] - CSV import with encoding detection
//! - [`table`] - The editable table and its bulk operations
//! - [`storage`] - Key/value persistence of table snapshots
//! - [`validation`] - Snapshot schema validation
//! - [`config`] - Environment configuration
//! - [`logs`] - Console logger

// Core modules
pub mod error;
pub mod models;

// Normalization and CSV
pub mod codec;
pub mod normalize;
pub mod parser;

// Table
pub mod table;

// Persistence
pub mod storage;
pub mod validation;

// Runtime
pub mod config;
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    Bound, CliError, CliResult, ImportError, ImportResult, StoreError, StoreResult, TableError,
    TableResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Column, CsvRow, COLUMN_COUNT, CSV_HEADER};

// =============================================================================
// Re-exports - Normalization
// =============================================================================

pub use normalize::{
    format_time, is_valid_time, lookup_month, normalize_date, normalize_price, parse_date,
    CanonicalDate, CanonicalTime, DateOutcome, MonthMatch,
};

// =============================================================================
// Re-exports - CSV
// =============================================================================

pub use codec::{decode_line, encode_row, export_csv};
pub use parser::{
    decode_content, detect_encoding, parse_import, parse_import_bytes, parse_import_file,
    ParseResult,
};

// =============================================================================
// Re-exports - Table
// =============================================================================

pub use table::{has_time_error, ErrorFlags, ImportMode, PromoRow, PromoTable};

// =============================================================================
// Re-exports - Storage
// =============================================================================

pub use storage::{
    from_snapshot, load_table, save_table, to_snapshot, FileStore, KeyValueStore, MemoryStore,
};
pub use validation::{is_valid_snapshot, validate_snapshot};

// =============================================================================
// Re-exports - Config
// =============================================================================

pub use config::{Config, DEFAULT_EXPORT_FILE, STORAGE_KEY};
