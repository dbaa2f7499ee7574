//! ledgersheet-sheets: spreadsheet writers for parsed transactions and detected tables

pub mod csv_out;
pub mod xlsx;

pub use csv_out::write_transactions_csv;
pub use xlsx::{tables_workbook, transactions_workbook, write_tables_xlsx, write_transactions_xlsx};

/// Default worksheet name for transaction output.
pub const TRANSACTIONS_SHEET: &str = "Transactions";

/// Default worksheet prefix for table output (`Table_1`, `Table_2`, ...).
pub const TABLE_SHEET_PREFIX: &str = "Table_";
