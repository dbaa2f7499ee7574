//! ledgersheet-ingest: statement PDF extraction, cleaning, and transaction-row parsing.

pub mod clean;
pub mod extract;
pub mod parsers;
pub mod types;

pub use clean::{clean_table, clean_text, is_blank_row};
pub use extract::{extract_tables, extract_text, LopdfText, PlumberTables, TableSource, TextSource};
pub use parsers::{parse_transactions, transactions_from_text};
pub use types::{Cell, TableGrid, TransactionRecord};
