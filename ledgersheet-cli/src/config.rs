use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::pipelines::OutputFormat;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "ledgersheet.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub transactions: TransactionsSection,
    pub tables: TablesSection,
    pub log: LogSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionsSection {
    /// Folder (or single PDF) read when no INPUT argument is given.
    pub input: PathBuf,
    /// Folder written when no OUTPUT argument is given.
    pub output: PathBuf,
    pub format: OutputFormat,
    pub sheet_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TablesSection {
    pub sheet_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Filter directive used when RUST_LOG is unset, e.g. "info" or "ledgersheet_ingest=debug".
    pub level: String,
}

impl Default for TransactionsSection {
    fn default() -> Self {
        Self {
            input: PathBuf::from("./pdfs"),
            output: PathBuf::from("./output"),
            format: OutputFormat::Xlsx,
            sheet_name: ledgersheet_sheets::TRANSACTIONS_SHEET.to_string(),
        }
    }
}

impl Default for TablesSection {
    fn default() -> Self {
        Self {
            sheet_prefix: ledgersheet_sheets::TABLE_SHEET_PREFIX.to_string(),
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

pub fn read_config(path: &Path) -> Result<Config> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

/// An explicit path must exist; otherwise fall back to `./ledgersheet.toml`,
/// then to built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(p) = explicit {
        if !p.exists() {
            bail!("config not found: {}", p.display());
        }
        return read_config(p);
    }

    let p = Path::new(DEFAULT_CONFIG_FILE);
    if p.exists() {
        return read_config(p);
    }
    Ok(Config::default())
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    save_config(&Config::default(), path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
