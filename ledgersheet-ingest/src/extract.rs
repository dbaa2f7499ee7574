//! PDF access: page text for the transaction pipeline, table grids for the
//! table pipeline. Both sit behind traits so callers can be exercised
//! without real documents.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use lopdf::Document;
use pdfplumber::{Pdf, TableSettings};
use tracing::{debug, warn};

use crate::clean::clean_table;
use crate::types::{Cell, TableGrid};

/// Produces the text of each page, in page order.
pub trait TextSource {
    fn page_texts(&self, path: &Path) -> Result<Vec<String>>;
}

/// Produces the tables detected on each page, in page order.
///
/// The outer vec has one entry per page, possibly empty.
pub trait TableSource {
    fn page_tables(&self, path: &Path) -> Result<Vec<Vec<TableGrid>>>;
}

/// Text extraction through lopdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfText;

impl TextSource for LopdfText {
    fn page_texts(&self, path: &Path) -> Result<Vec<String>> {
        let doc = Document::load(path).with_context(|| format!("opening {}", path.display()))?;

        let mut pages = Vec::new();
        for page_no in doc.get_pages().keys() {
            match doc.extract_text(&[*page_no]) {
                Ok(text) => pages.push(text),
                Err(e) => {
                    // one unreadable page should not cost the whole statement
                    warn!(page = page_no, file = %path.display(), "skipping page text: {e}");
                    pages.push(String::new());
                }
            }
        }

        Ok(pages)
    }
}

/// Table detection through pdfplumber's table finder.
pub struct PlumberTables {
    settings: TableSettings,
}

impl PlumberTables {
    pub fn new(settings: TableSettings) -> Self {
        Self { settings }
    }
}

impl Default for PlumberTables {
    fn default() -> Self {
        Self::new(TableSettings::default())
    }
}

impl TableSource for PlumberTables {
    fn page_tables(&self, path: &Path) -> Result<Vec<Vec<TableGrid>>> {
        let pdf = Pdf::open_file(path, None).map_err(|e| anyhow!("opening {}: {e}", path.display()))?;

        let mut pages = Vec::new();
        for (idx, page) in pdf.pages_iter().enumerate() {
            let page = match page {
                Ok(page) => page,
                Err(e) => {
                    warn!(page = idx + 1, file = %path.display(), "skipping page tables: {e}");
                    pages.push(Vec::new());
                    continue;
                }
            };

            let tables = page
                .find_tables(&self.settings)
                .iter()
                .map(|table| {
                    let rows = table
                        .rows
                        .iter()
                        .map(|row| row.iter().map(|c| c.text.clone()).collect::<Vec<Cell>>())
                        .collect();
                    TableGrid::new(rows)
                })
                .collect();
            pages.push(tables);
        }

        Ok(pages)
    }
}

/// Whole-document text: every page followed by a line break.
pub fn extract_text(source: &dyn TextSource, path: &Path) -> Result<String> {
    let pages = source.page_texts(path)?;

    let mut all_text = String::new();
    for text in &pages {
        all_text.push_str(text);
        all_text.push('\n');
    }

    Ok(all_text)
}

/// All usable tables of a document, pages in order, tables in detection
/// order. Blank rows are dropped and tables left empty are skipped.
pub fn extract_tables(source: &dyn TableSource, path: &Path) -> Result<Vec<TableGrid>> {
    let pages = source.page_tables(path)?;

    let mut out = Vec::new();
    for (idx, tables) in pages.into_iter().enumerate() {
        if tables.is_empty() {
            debug!(page = idx + 1, file = %path.display(), "no tables detected");
            continue;
        }

        for (t_idx, table) in tables.into_iter().enumerate() {
            match clean_table(table) {
                Some(grid) => out.push(grid),
                None => debug!(page = idx + 1, table = t_idx + 1, "table has no non-blank rows"),
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPages(Vec<&'static str>);

    impl TextSource for FixedPages {
        fn page_texts(&self, _path: &Path) -> Result<Vec<String>> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    struct FixedTables(Vec<Vec<TableGrid>>);

    impl TableSource for FixedTables {
        fn page_tables(&self, _path: &Path) -> Result<Vec<Vec<TableGrid>>> {
            Ok(self.0.clone())
        }
    }

    fn grid(rows: &[&[Option<&str>]]) -> TableGrid {
        TableGrid::new(
            rows.iter()
                .map(|r| r.iter().map(|c| c.map(str::to_string)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_pages_joined_with_trailing_breaks() {
        let source = FixedPages(vec!["page one", "page two"]);
        let text = extract_text(&source, Path::new("stmt.pdf")).unwrap();
        assert_eq!(text, "page one\npage two\n");
    }

    #[test]
    fn test_tables_keep_page_then_detection_order() {
        let source = FixedTables(vec![
            vec![grid(&[&[Some("p1t1")]]), grid(&[&[Some("p1t2")]])],
            vec![],
            vec![grid(&[&[Some("p3t1")], &[None]])],
        ]);

        let tables = extract_tables(&source, Path::new("stmt.pdf")).unwrap();
        let firsts: Vec<_> = tables.iter().map(|t| t.rows[0][0].as_deref().unwrap()).collect();
        assert_eq!(firsts, vec!["p1t1", "p1t2", "p3t1"]);
        // the blank row of the last table is gone
        assert_eq!(tables[2].len(), 1);
    }

    #[test]
    fn test_blank_tables_are_skipped() {
        let source = FixedTables(vec![vec![grid(&[&[None, Some(" ")]]), grid(&[&[Some("x")]])]]);
        let tables = extract_tables(&source, Path::new("stmt.pdf")).unwrap();
        assert_eq!(tables.len(), 1);
    }

    #[test]
    fn test_unreadable_file_fails() {
        let dir = std::env::temp_dir().join(format!("ledgersheet-extract-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let bad = dir.join("broken.pdf");
        std::fs::write(&bad, b"this is not a pdf").unwrap();

        let err = extract_text(&LopdfText, &bad).unwrap_err();
        assert!(format!("{err:#}").contains("broken.pdf"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
