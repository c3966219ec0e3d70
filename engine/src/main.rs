//! Promo CLI - Edit a promo pricing sheet and export it as CSV
//!
//! # Table Commands
//!
//! ```bash
//! promo show                          # Print the saved table
//! promo paste sheet.tsv --row 0       # Paste tab-separated rows
//! promo set 0 1 "12,50"               # Edit one cell
//! promo mass-time --from 8:00 --to 23:59
//! promo mass-date --from 01.05.2025 --to 2025-05-31
//! promo export                        # Write promo_data.csv
//! promo import data.csv --append      # Load rows from a CSV file
//! ```
//!
//! # One-off Normalization
//!
//! ```bash
//! promo date "Freitag, 11. April 2025 14:30"   # 2025-04-11 14:30
//! promo price "4.298,99"                       # 4298.99
//! promo time 9:05                              # 09:05
//! ```

use clap::{Parser, Subcommand};
use log::LevelFilter;
use promo::{
    format_time, is_valid_time, load_table, logs, normalize_date, normalize_price,
    parse_import_file, save_table, validate_snapshot, CliError, CliResult, Column, Config,
    FileStore, ImportMode, PromoTable, DEFAULT_EXPORT_FILE, STORAGE_KEY,
};
use promo::logs::LogEntry;
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "promo")]
#[command(about = "Edit promo prices and export them as import-ready CSV", long_about = None)]
struct Cli {
    /// Directory holding the saved table (overrides PROMO_STORE_DIR)
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug, trace (overrides PROMO_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<LevelFilter>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize dates to YYYY-MM-DD[ HH:MM]
    Date {
        /// Values to normalize
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Normalize prices to a dot decimal separator
    Price {
        /// Values to normalize
        #[arg(required = true, allow_hyphen_values = true)]
        values: Vec<String>,
    },

    /// Check and zero-pad an HH:MM time
    Time {
        value: String,
    },

    /// Print the saved table
    Show,

    /// Append an empty row
    Add,

    /// Set one cell
    Set {
        /// Row index (0-based)
        row: usize,
        /// Column index (0-based, 0-5)
        column: usize,
        /// New cell content
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Paste tab-separated text into the table
    Paste {
        /// Input file (default: stdin)
        input: Option<PathBuf>,

        /// Row of the top-left pasted cell
        #[arg(short, long, default_value = "0")]
        row: usize,

        /// Column of the top-left pasted cell
        #[arg(short, long, default_value = "0")]
        column: usize,
    },

    /// Set the time on every non-empty date cell
    MassTime {
        /// Time for special_price_from (HH:MM)
        #[arg(long, default_value = "")]
        from: String,

        /// Time for special_price_to (HH:MM)
        #[arg(long, default_value = "")]
        to: String,
    },

    /// Set the date on every non-empty date cell, keeping times
    MassDate {
        /// Date for special_price_from (DD.MM.YYYY or YYYY-MM-DD)
        #[arg(long, default_value = "")]
        from: String,

        /// Date for special_price_to (DD.MM.YYYY or YYYY-MM-DD)
        #[arg(long, default_value = "")]
        to: String,
    },

    /// Default empty or zero promo quantities to 99 with central stock
    FixQty,

    /// Delete one row
    Delete {
        /// Row index (0-based)
        row: usize,
    },

    /// Remove all rows
    Clear,

    /// Export the table as CSV
    Export {
        /// Output file (default: promo_data.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print to stdout instead of writing a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },

    /// Import rows from a CSV file
    Import {
        /// Input CSV file
        input: PathBuf,

        /// Keep existing rows instead of replacing them
        #[arg(short, long)]
        append: bool,
    },

    /// Validate a saved table snapshot
    Validate {
        /// Snapshot JSON file (default: the saved table)
        input: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = apply_overrides(Config::from_env(), &cli);
    logs::init(config.log_level);
    if let Some(level) = &config.rejected_log_level {
        log::warn!("Ignoring invalid PROMO_LOG_LEVEL '{}'", level);
    }

    let mut store = FileStore::new(&config.store_dir);

    let result = match cli.command {
        Commands::Date { values } => cmd_date(&values),
        Commands::Price { values } => cmd_price(&values),
        Commands::Time { value } => cmd_time(&value),
        Commands::Show => cmd_show(&store),
        Commands::Add => with_table(&mut store, |table| {
            let index = table.add_row();
            logs::log_success(format!("Added row {}", index));
            Ok(())
        }),
        Commands::Set { row, column, value } => with_table(&mut store, |table| {
            table.set_cell(row, column, &value)?;
            logs::log_success(format!("Set row {} column {}", row, column));
            Ok(())
        }),
        Commands::Paste { input, row, column } => cmd_paste(&mut store, input.as_deref(), row, column),
        Commands::MassTime { from, to } => with_table(&mut store, |table| {
            table.apply_mass_time(&from, &to)?;
            logs::log_success("Times applied");
            Ok(())
        }),
        Commands::MassDate { from, to } => with_table(&mut store, |table| {
            table.apply_mass_date(&from, &to)?;
            logs::log_success("Dates applied");
            Ok(())
        }),
        Commands::FixQty => with_table(&mut store, |table| {
            let fixed = table.fix_promo_qty();
            logs::log_success(format!("Fixed {} rows", fixed));
            Ok(())
        }),
        Commands::Delete { row } => with_table(&mut store, |table| {
            table.delete_row(row)?;
            logs::log_success(format!("Deleted row {}", row));
            Ok(())
        }),
        Commands::Clear => with_table(&mut store, |table| {
            table.clear();
            logs::log_success("Table cleared");
            Ok(())
        }),
        Commands::Export { output, stdout } => cmd_export(&mut store, output.as_deref(), stdout),
        Commands::Import { input, append } => cmd_import(&mut store, &input, append),
        Commands::Validate { input } => cmd_validate(&store, input.as_deref()),
    };

    if let Err(e) = result {
        logs::emit(LogEntry::error(format!("Error: {}", e)));
        std::process::exit(1);
    }
}

/// Command-line flags win over environment configuration.
fn apply_overrides(mut config: Config, cli: &Cli) -> Config {
    if let Some(dir) = &cli.store_dir {
        config = config.with_store_dir(dir);
    }
    if let Some(level) = cli.log_level {
        config = config.with_log_level(level);
    }
    config
}

/// Load the saved table, apply `edit`, save it back.
fn with_table<F>(store: &mut FileStore, edit: F) -> CliResult<()>
where
    F: FnOnce(&mut PromoTable) -> CliResult<()>,
{
    let mut table = load_table(store)?;
    edit(&mut table)?;
    save_table(store, &table)?;
    Ok(())
}

fn cmd_date(values: &[String]) -> CliResult<()> {
    for value in values {
        println!("{}", normalize_date(value));
    }
    Ok(())
}

fn cmd_price(values: &[String]) -> CliResult<()> {
    for value in values {
        println!("{}", normalize_price(value));
    }
    Ok(())
}

fn cmd_time(value: &str) -> CliResult<()> {
    if !is_valid_time(value) {
        return Err(CliError::Usage(format!(
            "Invalid time '{}': expected HH:MM (00:00 - 23:59)",
            value
        )));
    }
    println!("{}", format_time(value));
    Ok(())
}

fn cmd_show(store: &FileStore) -> CliResult<()> {
    let table = load_table(store)?;

    let headers: Vec<&str> = Column::ALL.iter().map(|c| c.header()).collect();
    println!("#\t{}", headers.join("\t"));
    for (i, row) in table.rows().iter().enumerate() {
        let marker = if row.errors.row { "  ⚠️" } else { "" };
        println!("{}\t{}{}", i, row.cells.join("\t"), marker);
    }

    eprintln!("\n📊 {} rows, {} with time errors", table.len(), table.error_count());
    if let Some(saved) = store.modified(STORAGE_KEY) {
        eprintln!("   Last saved: {}", saved.format("%Y-%m-%d %H:%M:%S"));
    }
    Ok(())
}

fn cmd_paste(
    store: &mut FileStore,
    input: Option<&Path>,
    row: usize,
    column: usize,
) -> CliResult<()> {
    let text = match input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    with_table(store, |table| {
        let written = table.paste(row, column, &text)?;
        logs::log_success(format!("Pasted {} rows", written));
        if table.error_count() > 0 {
            logs::emit(LogEntry::warning(format!(
                "{} rows have malformed times",
                table.error_count()
            )));
        }
        Ok(())
    })
}

fn cmd_export(store: &mut FileStore, output: Option<&Path>, stdout: bool) -> CliResult<()> {
    let mut table = load_table(store)?;
    let csv = table.export_csv();
    // Export fixes quantities and flags, keep those
    save_table(store, &table)?;

    if stdout {
        print!("{}", csv);
        return Ok(());
    }

    let path = output.unwrap_or_else(|| Path::new(DEFAULT_EXPORT_FILE));
    write_output(&csv, path)?;
    logs::log_success(format!("Exported {} rows", table.len()));
    Ok(())
}

fn cmd_import(store: &mut FileStore, input: &Path, append: bool) -> CliResult<()> {
    eprintln!("📄 Importing CSV: {}", input.display());

    let parsed = parse_import_file(input)?;
    logs::emit(LogEntry::info(format!("Encoding: {}", parsed.encoding)));
    if parsed.skipped > 0 {
        logs::emit(LogEntry::warning(format!("Skipped: {} short lines", parsed.skipped)));
    }

    let mode = if append {
        ImportMode::Append
    } else {
        ImportMode::Replace
    };

    with_table(store, |table| {
        let count = table.import_rows(parsed.rows, mode);
        logs::log_success(format!("Imported {} rows ({} total)", count, table.len()));
        Ok(())
    })
}

fn cmd_validate(store: &FileStore, input: Option<&Path>) -> CliResult<()> {
    let path = input
        .map(Path::to_path_buf)
        .unwrap_or_else(|| store.path(STORAGE_KEY));
    eprintln!("✔️  Validating: {}", path.display());

    let content = fs::read_to_string(&path)?;
    let snapshot: Value = serde_json::from_str(&content)
        .map_err(|e| CliError::Usage(format!("Invalid JSON: {}", e)))?;

    match validate_snapshot(&snapshot) {
        Ok(()) => {
            let rows = snapshot.as_array().map_or(0, Vec::len);
            logs::log_success(format!("Valid snapshot, {} rows", rows));
            Ok(())
        }
        Err(errors) => {
            for err in errors.iter().take(10) {
                logs::emit(LogEntry::error(err.as_str()).with_indent(1));
            }
            Err(CliError::Usage(format!("{} schema violations", errors.len())))
        }
    }
}

fn write_output(content: &str, path: &Path) -> CliResult<()> {
    fs::write(path, content)?;
    eprintln!("💾 Output written to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_flag_overrides_config() {
        let cli = Cli::try_parse_from(["promo", "--log-level", "debug", "show"]).unwrap();
        assert_eq!(cli.log_level, Some(LevelFilter::Debug));

        let base = Config::default().with_log_level(LevelFilter::Warn);
        let config = apply_overrides(base, &cli);
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.store_dir, PathBuf::from(".promo"));
    }

    #[test]
    fn test_store_dir_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["promo", "show", "--store-dir", "data"]).unwrap();
        let config = apply_overrides(Config::default(), &cli);
        assert_eq!(config.store_dir, PathBuf::from("data"));
        assert_eq!(config.log_level, LevelFilter::Info);
    }

    #[test]
    fn test_invalid_log_level_flag_rejected() {
        assert!(Cli::try_parse_from(["promo", "--log-level", "loud", "show"]).is_err());
    }

    #[test]
    fn test_mass_time_defaults_to_blank() {
        let cli = Cli::try_parse_from(["promo", "mass-time", "--to", "23:59"]).unwrap();
        match cli.command {
            Commands::MassTime { from, to } => {
                assert_eq!(from, "");
                assert_eq!(to, "23:59");
            }
            _ => panic!("expected mass-time"),
        }
    }

    #[test]
    fn test_export_output_conflicts_with_stdout() {
        assert!(Cli::try_parse_from(["promo", "export", "-o", "x.csv", "--stdout"]).is_err());
    }
}
