//! Excel output for both pipelines.
//!
//! Workbooks carry a fixed creation timestamp, so the same records always
//! serialize to the same bytes.

use std::path::Path;

use anyhow::{bail, Context, Result};
use ledgersheet_ingest::{TableGrid, TransactionRecord};
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook};
use tracing::debug;

const DESCRIPTION_COL_WIDTH: u16 = 40;

/// Worksheet coordinates for a zero-based (row, col); oversized indices are
/// errors rather than wrapped values.
fn cell_pos(row: usize, col: usize) -> Result<(u32, u16)> {
    let r = u32::try_from(row).with_context(|| format!("row {row} out of range"))?;
    let c = u16::try_from(col).with_context(|| format!("column {col} out of range"))?;
    Ok((r, c))
}

fn new_workbook() -> Result<Workbook> {
    let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
    let properties = DocProperties::new().set_creation_datetime(&created);

    let mut workbook = Workbook::new();
    workbook.set_properties(&properties);
    Ok(workbook)
}

/// Single-sheet workbook: header row, then one row per record.
pub fn transactions_workbook(records: &[TransactionRecord], sheet_name: &str) -> Result<Workbook> {
    let header = Format::new().set_bold();
    let amount = Format::new().set_num_format("0.00");

    let mut workbook = new_workbook()?;
    let sheet = workbook.add_worksheet();
    sheet
        .set_name(sheet_name)
        .with_context(|| format!("invalid sheet name {sheet_name:?}"))?;

    for (col, name) in TransactionRecord::COLUMNS.iter().enumerate() {
        let (_, c) = cell_pos(0, col)?;
        sheet.write_string_with_format(0, c, *name, &header)?;
    }
    sheet.set_column_width(2, DESCRIPTION_COL_WIDTH)?;
    sheet.set_freeze_panes(1, 0)?;

    for (i, r) in records.iter().enumerate() {
        let (row, _) = cell_pos(i + 1, 0)?;
        sheet.write_string(row, 0, r.date.as_str())?;
        sheet.write_string(row, 1, r.kind.as_str())?;
        sheet.write_string(row, 2, r.description.as_str())?;
        sheet.write_number_with_format(row, 3, r.debit, &amount)?;
        sheet.write_number_with_format(row, 4, r.credit, &amount)?;
        sheet.write_string(row, 5, r.balance.as_str())?;
    }

    Ok(workbook)
}

/// One sheet per grid, named `<prefix>1`, `<prefix>2`, ... Cells are written
/// as text; absent cells stay empty. No header row is inferred.
pub fn tables_workbook(grids: &[TableGrid], sheet_prefix: &str) -> Result<Workbook> {
    let mut workbook = new_workbook()?;

    for (idx, grid) in grids.iter().enumerate() {
        let name = format!("{sheet_prefix}{}", idx + 1);
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(name.as_str())
            .with_context(|| format!("invalid sheet name {name:?}"))?;

        for (r, row) in grid.rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if let Some(text) = cell {
                    let (row, col) = cell_pos(r, c)?;
                    sheet.write_string(row, col, text.as_str())?;
                }
            }
        }
        debug!(sheet = %name, rows = grid.len(), cols = grid.width(), "table sheet written");
    }

    Ok(workbook)
}

/// Write transactions to `path`. Empty input is refused; callers report
/// "no transactions" instead of producing an empty file.
pub fn write_transactions_xlsx(records: &[TransactionRecord], path: &Path, sheet_name: &str) -> Result<()> {
    if records.is_empty() {
        bail!("no transactions to write to {}", path.display());
    }

    let mut workbook = transactions_workbook(records, sheet_name)?;
    workbook
        .save(path)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Write detected tables to `path`, one sheet each. Empty input is refused.
pub fn write_tables_xlsx(grids: &[TableGrid], path: &Path, sheet_prefix: &str) -> Result<()> {
    if grids.is_empty() {
        bail!("no tables to write to {}", path.display());
    }

    let mut workbook = tables_workbook(grids, sheet_prefix)?;
    workbook
        .save(path)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TABLE_SHEET_PREFIX, TRANSACTIONS_SHEET};
    use calamine::{open_workbook, Data, Reader, Xlsx};

    fn read_sheets(path: &Path) -> Vec<(String, Vec<Vec<Data>>)> {
        let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
        let names = workbook.sheet_names();
        names
            .into_iter()
            .map(|name| {
                let range = workbook.worksheet_range(&name).unwrap();
                let rows = range.rows().map(|row| row.to_vec()).collect();
                (name, rows)
            })
            .collect()
    }

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    fn records() -> Vec<TransactionRecord> {
        vec![
            TransactionRecord {
                date: "05-JAN-2024".to_string(),
                kind: "D".to_string(),
                description: "ATM WITHDRAWAL".to_string(),
                debit: 500.0,
                credit: 0.0,
                balance: "1200.00Cr".to_string(),
            },
            TransactionRecord {
                date: "06-JAN-2024".to_string(),
                kind: "C".to_string(),
                description: "SALARY CREDIT".to_string(),
                debit: 0.0,
                credit: 2000.0,
                balance: "3200.00Cr".to_string(),
            },
        ]
    }

    fn grids() -> Vec<TableGrid> {
        vec![
            TableGrid::new(vec![vec![Some("Date".into()), Some("Amount".into())]]),
            TableGrid::new(vec![vec![None, Some("x".into())], vec![Some("y".into())]]),
        ]
    }

    #[test]
    fn test_writes_transactions_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stmt.xlsx");

        write_transactions_xlsx(&records(), &path, TRANSACTIONS_SHEET).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        // xlsx is a zip container
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_empty_transactions_create_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");

        assert!(write_transactions_xlsx(&[], &path, TRANSACTIONS_SHEET).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_same_records_same_bytes() {
        let a = transactions_workbook(&records(), TRANSACTIONS_SHEET)
            .unwrap()
            .save_to_buffer()
            .unwrap();
        let b = transactions_workbook(&records(), TRANSACTIONS_SHEET)
            .unwrap()
            .save_to_buffer()
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_same_tables_same_bytes() {
        let a = tables_workbook(&grids(), TABLE_SHEET_PREFIX).unwrap().save_to_buffer().unwrap();
        let b = tables_workbook(&grids(), TABLE_SHEET_PREFIX).unwrap().save_to_buffer().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_writes_tables_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stmt_tables.xlsx");

        write_tables_xlsx(&grids(), &path, TABLE_SHEET_PREFIX).unwrap();
        assert!(path.exists());
        assert!(write_tables_xlsx(&[], &dir.path().join("none.xlsx"), TABLE_SHEET_PREFIX).is_err());
    }

    #[test]
    fn test_invalid_sheet_name_is_an_error() {
        // Excel forbids '[' and ']' in sheet names
        assert!(transactions_workbook(&records(), "bad[name]").is_err());
    }

    #[test]
    fn test_transactions_sheet_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stmt.xlsx");
        write_transactions_xlsx(&records(), &path, TRANSACTIONS_SHEET).unwrap();

        let sheets = read_sheets(&path);
        assert_eq!(sheets.len(), 1);
        let (name, rows) = &sheets[0];
        assert_eq!(name, "Transactions");
        assert_eq!(rows.len(), 3);

        let header: Vec<Data> = TransactionRecord::COLUMNS.iter().map(|c| text(c)).collect();
        assert_eq!(rows[0], header);
        assert_eq!(
            rows[1],
            vec![
                text("05-JAN-2024"),
                text("D"),
                text("ATM WITHDRAWAL"),
                Data::Float(500.0),
                Data::Float(0.0),
                text("1200.00Cr"),
            ]
        );
        assert_eq!(rows[2][4], Data::Float(2000.0));
        assert_eq!(rows[2][5], text("3200.00Cr"));
    }

    #[test]
    fn test_table_sheets_in_detection_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stmt_tables.xlsx");
        let grids = vec![
            TableGrid::new(vec![
                vec![Some("Date".into()), Some("Amount".into())],
                vec![Some("05-JAN-2024".into()), Some("500.00".into())],
            ]),
            TableGrid::new(vec![vec![Some("a".into()), None, Some("c".into())]]),
        ];
        write_tables_xlsx(&grids, &path, TABLE_SHEET_PREFIX).unwrap();

        let sheets = read_sheets(&path);
        let names: Vec<&str> = sheets.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Table_1", "Table_2"]);

        // no header inferred: the first grid row is the first sheet row
        assert_eq!(sheets[0].1[0], vec![text("Date"), text("Amount")]);
        assert_eq!(sheets[0].1[1], vec![text("05-JAN-2024"), text("500.00")]);
        assert_eq!(sheets[1].1[0], vec![text("a"), Data::Empty, text("c")]);
    }

    #[test]
    fn test_grid_wider_than_sheet_index_fails() {
        let mut row: Vec<Option<String>> = vec![None; u16::MAX as usize + 1];
        row.push(Some("overflow".into()));
        let grid = TableGrid::new(vec![row]);

        assert!(tables_workbook(&[grid], TABLE_SHEET_PREFIX).is_err());
    }
}
