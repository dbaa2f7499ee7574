//! Statement-text parsers.

pub mod statement_text;

pub use statement_text::{parse_transactions, transactions_from_text};
