use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One parsed statement line.
///
/// Every field is always populated: amounts missing from the source line
/// become `0.00` (or the literal `"0.00"` for the balance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// `DD-MMM-YYYY`, kept exactly as matched.
    #[serde(rename = "Date")]
    pub date: String,
    /// Single uppercase letter classifying the movement.
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Debit")]
    pub debit: f64,
    #[serde(rename = "Credit")]
    pub credit: f64,
    /// Amount with its `Dr`/`Cr` suffix, e.g. `1200.00Cr`. Stays text.
    #[serde(rename = "Balance")]
    pub balance: String,
}

impl TransactionRecord {
    /// Column order used by every writer.
    pub const COLUMNS: [&'static str; 6] = ["Date", "Type", "Description", "Debit", "Credit", "Balance"];

    /// Calendar date behind `date`, if it names a real day.
    pub fn value_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%d-%b-%Y").ok()
    }
}

/// A table cell: text, or absent.
pub type Cell = Option<String>;

/// A grid of cells detected on a PDF page, rows in top-to-bottom order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableGrid {
    pub rows: Vec<Vec<Cell>>,
}

impl TableGrid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest row; detected tables are usually rectangular but nothing enforces it.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}
