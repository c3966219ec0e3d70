//! Runtime configuration.
//!
//! Read from the environment, with a `.env` file loaded first when present.
//!
//! | Variable          | Default | Meaning                          |
//! |-------------------|---------|----------------------------------|
//! | `PROMO_STORE_DIR` | `.promo`| Directory holding saved tables   |
//! | `PROMO_LOG_LEVEL` | `info`  | `off`, `error`, `warn`, `info`, `debug`, `trace` |

use log::LevelFilter;
use std::env;
use std::path::PathBuf;

/// Key the working table is saved under.
pub const STORAGE_KEY: &str = "promoTable";

/// Directory for saved tables (relative to current dir)
pub const DEFAULT_STORE_DIR: &str = ".promo";

/// File name used by `export` when no output is given.
pub const DEFAULT_EXPORT_FILE: &str = "promo_data.csv";

const STORE_DIR_VAR: &str = "PROMO_STORE_DIR";
const LOG_LEVEL_VAR: &str = "PROMO_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store_dir: PathBuf,
    pub log_level: LevelFilter,
    /// `PROMO_LOG_LEVEL` value that failed to parse, reported once logging
    /// is up
    pub rejected_log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            log_level: LevelFilter::Info,
            rejected_log_level: None,
        }
    }
}

impl Config {
    /// Load from the process environment (and `.env`).
    pub fn from_env() -> Self {
        // Try loading .env file
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup. Unset or blank variables
    /// keep their defaults; an unparseable log level falls back to `info`
    /// and is kept in [`Config::rejected_log_level`].
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(STORE_DIR_VAR).filter(|v| !v.trim().is_empty()) {
            config.store_dir = PathBuf::from(dir.trim());
        }

        if let Some(level) = lookup(LOG_LEVEL_VAR).filter(|v| !v.trim().is_empty()) {
            match level.trim().parse::<LevelFilter>() {
                Ok(parsed) => config.log_level = parsed,
                Err(_) => config.rejected_log_level = Some(level),
            }
        }

        config
    }

    /// Override the store directory
    pub fn with_store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = dir.into();
        self
    }

    /// Override the log level
    pub fn with_log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = level;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config, Config::default());
        assert_eq!(config.store_dir, PathBuf::from(".promo"));
        assert_eq!(config.log_level, LevelFilter::Info);
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PROMO_STORE_DIR", "/tmp/promo"),
            ("PROMO_LOG_LEVEL", "DEBUG"),
        ]));
        assert_eq!(config.store_dir, PathBuf::from("/tmp/promo"));
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.rejected_log_level, None);
    }

    #[test]
    fn test_invalid_level_keeps_default() {
        let config = Config::from_lookup(lookup(&[("PROMO_LOG_LEVEL", "loud"), ("PROMO_STORE_DIR", " ")]));
        assert_eq!(config.log_level, LevelFilter::Info);
        assert_eq!(config.rejected_log_level.as_deref(), Some("loud"));
        assert_eq!(config.store_dir, PathBuf::from(DEFAULT_STORE_DIR));
    }

    #[test]
    fn test_builder_overrides() {
        let config = Config::default()
            .with_store_dir("data")
            .with_log_level(LevelFilter::Warn);
        assert_eq!(config.store_dir, PathBuf::from("data"));
        assert_eq!(config.log_level, LevelFilter::Warn);
    }
}
