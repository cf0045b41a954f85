//! File renditions of the export table: xlsx by default, CSV on request.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;
use tidings_core::table::{Cell, ExportTable, FIELDS};
use tidings_core::traits::ExportSink;
use tracing::info;

/// Creates the parent directory of `path` when it has one.
fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    Ok(())
}

/// Single-sheet workbook: the field names as a header row, then one row per
/// record. Text stays text, flags are boolean cells, counts are numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxExportSink;

impl ExportSink for XlsxExportSink {
    fn persist(&self, table: &ExportTable, path: &Path) -> Result<()> {
        ensure_parent(path)?;

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, name) in (0u16..).zip(FIELDS) {
            sheet.write_string(0, col, name)?;
        }
        for (row, cells) in (1u32..).zip(table.rows()) {
            for (col, cell) in (0u16..).zip(cells) {
                match cell {
                    Cell::Text(text) => sheet.write_string(row, col, text.as_str())?,
                    Cell::Flag(flag) => sheet.write_boolean(row, col, *flag)?,
                    Cell::Count(count) => sheet.write_number(row, col, *count as f64)?,
                };
            }
        }
        workbook
            .save(path)
            .with_context(|| format!("saving {}", path.display()))?;

        info!(path = %path.display(), rows = table.len(), "export.written");
        Ok(())
    }
}

/// Writes one header row (the field names, in column order) and one row per
/// record. Flags render as `true`/`false`, counts as integers.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExportSink;

impl ExportSink for CsvExportSink {
    fn persist(&self, table: &ExportTable, path: &Path) -> Result<()> {
        ensure_parent(path)?;

        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("opening {}", path.display()))?;
        writer.write_record(FIELDS)?;
        for row in table.rows() {
            writer.write_record(row.iter().map(|cell| cell.to_string()))?;
        }
        writer.flush()?;

        info!(path = %path.display(), rows = table.len(), "export.written");
        Ok(())
    }
}

/// Picks the rendition from the file extension: `.csv` gets CSV, anything
/// else an xlsx workbook.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileExportSink;

impl ExportSink for FileExportSink {
    fn persist(&self, table: &ExportTable, path: &Path) -> Result<()> {
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            CsvExportSink.persist(table, path)
        } else {
            XlsxExportSink.persist(table, path)
        }
    }
}
