//! The two per-file conversions: transaction rows parsed from page text, and
//! table grids detected on each page.

use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use clap::ValueEnum;
use ledgersheet_ingest::{
    extract_tables, extract_text, transactions_from_text, TableSource, TextSource, TransactionRecord,
};
use ledgersheet_sheets::{write_tables_xlsx, write_transactions_csv, write_transactions_xlsx};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::batch::{output_file_name, FileOutcome, Pipeline};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
        }
    }
}

/// Earliest and latest transaction dates, ignoring dates that do not parse.
pub fn date_span(records: &[TransactionRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = records.iter().filter_map(TransactionRecord::value_date);
    let first = dates.next()?;
    Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
}

/// Text extraction, cleaning and row parsing for one PDF.
pub fn parse_pdf(source: &dyn TextSource, pdf: &Path) -> Result<Vec<TransactionRecord>> {
    let raw = extract_text(source, pdf)?;
    transactions_from_text(&raw)
}

/// Regex pipeline: one `<stem>.xlsx` (or `.csv`) of transaction rows per PDF.
pub struct TransactionPipeline<S: TextSource> {
    source: S,
    format: OutputFormat,
    sheet_name: String,
}

impl<S: TextSource> TransactionPipeline<S> {
    pub fn new(source: S, format: OutputFormat, sheet_name: impl Into<String>) -> Self {
        Self {
            source,
            format,
            sheet_name: sheet_name.into(),
        }
    }
}

impl<S: TextSource> Pipeline for TransactionPipeline<S> {
    fn name(&self) -> &'static str {
        "transactions"
    }

    fn output_name(&self, pdf: &Path) -> String {
        output_file_name(pdf, "", self.format.extension())
    }

    fn process(&self, pdf: &Path, output_dir: &Path) -> Result<FileOutcome> {
        let records = parse_pdf(&self.source, pdf)?;
        if records.is_empty() {
            return Ok(FileOutcome::NoContent);
        }

        match date_span(&records) {
            Some((first, last)) => info!("parsed {} transactions, {first} to {last}", records.len()),
            None => info!("parsed {} transactions", records.len()),
        }

        let path = output_dir.join(self.output_name(pdf));
        match self.format {
            OutputFormat::Xlsx => write_transactions_xlsx(&records, &path, &self.sheet_name)?,
            OutputFormat::Csv => write_transactions_csv(&records, &path)?,
        }
        Ok(FileOutcome::Written(path))
    }
}

/// Table pipeline: one `<stem>_tables.xlsx` per PDF, one sheet per table.
pub struct TablePipeline<S: TableSource> {
    source: S,
    sheet_prefix: String,
}

impl<S: TableSource> TablePipeline<S> {
    pub fn new(source: S, sheet_prefix: impl Into<String>) -> Self {
        Self {
            source,
            sheet_prefix: sheet_prefix.into(),
        }
    }
}

impl<S: TableSource> Pipeline for TablePipeline<S> {
    fn name(&self) -> &'static str {
        "tables"
    }

    fn output_name(&self, pdf: &Path) -> String {
        output_file_name(pdf, "_tables", "xlsx")
    }

    fn process(&self, pdf: &Path, output_dir: &Path) -> Result<FileOutcome> {
        let grids = extract_tables(&self.source, pdf)?;
        if grids.is_empty() {
            return Ok(FileOutcome::NoContent);
        }
        info!("found {} tables", grids.len());

        let path = output_dir.join(self.output_name(pdf));
        write_tables_xlsx(&grids, &path, &self.sheet_prefix)?;
        Ok(FileOutcome::Written(path))
    }
}
