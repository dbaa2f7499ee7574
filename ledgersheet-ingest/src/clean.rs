//! Noise removal ahead of structural parsing.
//!
//! Statement PDFs embed currency glyphs and encoding artifacts that would
//! otherwise split or glue tokens, and page text arrives with arbitrary line
//! breaks. Both are flattened here.

use anyhow::Result;
use regex::Regex;

use crate::types::{Cell, TableGrid};

fn non_ascii_regex() -> Result<Regex> {
    Ok(Regex::new(r"[^\x00-\x7F]+")?)
}

fn whitespace_regex() -> Result<Regex> {
    Ok(Regex::new(r"\s+")?)
}

/// Flatten raw page text into one ASCII line.
///
/// Every run of non-ASCII characters and every run of whitespace (line breaks
/// included) becomes a single space; the result is trimmed.
pub fn clean_text(raw: &str) -> Result<String> {
    let non_ascii_re = non_ascii_regex()?;
    let whitespace_re = whitespace_regex()?;

    let ascii = non_ascii_re.replace_all(raw, " ");
    let collapsed = whitespace_re.replace_all(&ascii, " ");
    Ok(collapsed.trim().to_string())
}

/// True when every cell is absent or whitespace-only.
pub fn is_blank_row(row: &[Cell]) -> bool {
    row.iter()
        .all(|cell| cell.as_deref().is_none_or(|text| text.trim().is_empty()))
}

/// Drop fully blank rows. `None` means nothing usable was left.
pub fn clean_table(grid: TableGrid) -> Option<TableGrid> {
    let rows: Vec<Vec<Cell>> = grid
        .rows
        .into_iter()
        .filter(|row| !is_blank_row(row))
        .collect();

    if rows.is_empty() {
        None
    } else {
        Some(TableGrid::new(rows))
    }
}
