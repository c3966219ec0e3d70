//! Table persistence.
//!
//! The working table is saved under [`STORAGE_KEY`] in a [`KeyValueStore`]
//! as a JSON snapshot: one array per row, six cells then the row, from and to
//! error flags. Snapshots without flags (six cells per row) load with clean
//! flags.

use chrono::{DateTime, Local};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{DEFAULT_STORE_DIR, STORAGE_KEY};
use crate::error::{StoreError, StoreResult};
use crate::models::COLUMN_COUNT;
use crate::table::{ErrorFlags, PromoRow, PromoTable};
use crate::validation::validate_snapshot;

// =============================================================================
// Stores
// =============================================================================

/// String values addressed by key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;

    /// Returns whether the key existed.
    fn remove(&mut self, key: &str) -> StoreResult<bool>;
}

/// One `<key>.json` file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_DIR)
    }
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: PathBuf::from(dir.as_ref()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Last write time of `key`, if it exists.
    pub fn modified(&self, key: &str) -> Option<DateTime<Local>> {
        let modified = fs::metadata(self.path(key)).ok()?.modified().ok()?;
        Some(DateTime::<Local>::from(modified))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        // Ensure directory exists
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<bool> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }
}

/// In-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<bool> {
        Ok(self.entries.remove(key).is_some())
    }
}

// =============================================================================
// Snapshots
// =============================================================================

/// Snapshot of every row: six cells followed by the three error flags.
pub fn to_snapshot(table: &PromoTable) -> Value {
    Value::Array(
        table
            .rows()
            .iter()
            .map(|row| {
                let mut values: Vec<Value> =
                    row.cells.iter().map(|c| Value::String(c.clone())).collect();
                values.push(Value::Bool(row.errors.row));
                values.push(Value::Bool(row.errors.from));
                values.push(Value::Bool(row.errors.to));
                Value::Array(values)
            })
            .collect(),
    )
}

/// Rebuild a table from a snapshot.
///
/// The snapshot is checked against the embedded schema first. Missing cells
/// (`null`) become `""`, numbers keep their JSON text. Saved error flags are
/// restored as they were. An empty snapshot gives a table with one empty
/// row.
pub fn from_snapshot(value: &Value) -> StoreResult<PromoTable> {
    validate_snapshot(value).map_err(|errors| StoreError::InvalidSnapshot { errors })?;

    let rows = value
        .as_array()
        .map(|rows| rows.iter().filter_map(Value::as_array).map(|r| row_from_values(r)).collect())
        .unwrap_or_default();

    Ok(PromoTable::from_rows(rows))
}

fn row_from_values(values: &[Value]) -> PromoRow {
    let mut row = PromoRow::new();
    for (cell, value) in row.cells.iter_mut().zip(values) {
        *cell = match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        };
    }

    let flag = |i: usize| values.get(COLUMN_COUNT + i).and_then(Value::as_bool).unwrap_or(false);
    row.errors = ErrorFlags {
        row: flag(0),
        from: flag(1),
        to: flag(2),
    };
    row
}

/// Save the table under [`STORAGE_KEY`].
pub fn save_table<S: KeyValueStore + ?Sized>(store: &mut S, table: &PromoTable) -> StoreResult<()> {
    let content = serde_json::to_string(&to_snapshot(table))?;
    store.set(STORAGE_KEY, &content)?;
    log::debug!("Saved {} rows", table.len());
    Ok(())
}

/// Load the table saved under [`STORAGE_KEY`]; nothing saved gives a new
/// table.
pub fn load_table<S: KeyValueStore + ?Sized>(store: &S) -> StoreResult<PromoTable> {
    match store.get(STORAGE_KEY)? {
        Some(content) => {
            let value: Value = serde_json::from_str(&content)?;
            from_snapshot(&value)
        }
        None => Ok(PromoTable::new()),
    }
}
