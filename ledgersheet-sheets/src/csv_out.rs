//! CSV output for parsed transactions (same columns as the xlsx writer).

use std::path::Path;

use anyhow::{bail, Context, Result};
use ledgersheet_ingest::TransactionRecord;

/// Write transactions as CSV with a header row; amounts keep two decimals.
pub fn write_transactions_csv(records: &[TransactionRecord], path: &Path) -> Result<()> {
    if records.is_empty() {
        bail!("no transactions to write to {}", path.display());
    }

    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    wtr.write_record(TransactionRecord::COLUMNS)?;

    for r in records {
        let debit = format!("{:.2}", r.debit);
        let credit = format!("{:.2}", r.credit);
        wtr.write_record([
            r.date.as_str(),
            r.kind.as_str(),
            r.description.as_str(),
            debit.as_str(),
            credit.as_str(),
            r.balance.as_str(),
        ])?;
    }

    wtr.flush().with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
