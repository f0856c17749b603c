//! Winner list export to `.xlsx` or `.csv`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::core::export::winner_rows;
use crate::core::session::Session;
use crate::core::types::WinnerRow;

/// Sheet name used for xlsx exports.
pub const SHEET_NAME: &str = "Winners";
/// Column headers: prize, name, department, id.
pub const HEADERS: [&str; 4] = ["奖项", "姓名", "部门", "工号"];

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Export every recorded winner to `path`. Returns the number of rows written.
///
/// Fails with [`crate::core::export::EmptyExportWarning`] before touching the
/// filesystem when nobody has won yet.
pub fn export_winners(session: &Session, path: &Path) -> Result<usize> {
    let rows = winner_rows(session.ledger(), session.catalog())?;
    write_rows(path, &rows)?;
    info!(path = %path.display(), rows = rows.len(), "winners exported");
    Ok(rows.len())
}

/// Write rows as CSV when `path` ends in `.csv`, otherwise as xlsx.
pub fn write_rows(path: &Path, rows: &[WinnerRow]) -> Result<()> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        write_csv(path, rows)
    } else {
        xlsx::write_xlsx(path, rows)
    }
}

fn write_csv(path: &Path, rows: &[WinnerRow]) -> Result<()> {
    // BOM so spreadsheet apps detect UTF-8 headers.
    let mut buf = UTF8_BOM.to_vec();
    {
        let mut writer = csv::Writer::from_writer(&mut buf);
        for row in rows {
            writer.serialize(row).context("serialize winner row")?;
        }
        writer.flush().context("flush csv")?;
    }
    fs::write(path, buf).with_context(|| format!("write {}", path.display()))
}

#[cfg(feature = "spreadsheet")]
mod xlsx {
    use std::path::Path;

    use anyhow::{Context, Result};
    use rust_xlsxwriter::Workbook;

    use super::{HEADERS, SHEET_NAME};
    use crate::core::types::WinnerRow;

    pub(super) fn write_xlsx(path: &Path, rows: &[WinnerRow]) -> Result<()> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;
        for (col, header) in (0u16..).zip(HEADERS) {
            sheet.write_string(0, col, header)?;
        }
        for (row_num, row) in (1u32..).zip(rows) {
            sheet.write_string(row_num, 0, row.prize.as_str())?;
            sheet.write_string(row_num, 1, row.name.as_str())?;
            sheet.write_string(row_num, 2, row.department.as_str())?;
            sheet.write_string(row_num, 3, row.id.as_str())?;
        }
        workbook
            .save(path)
            .with_context(|| format!("write {}", path.display()))
    }
}

#[cfg(not(feature = "spreadsheet"))]
mod xlsx {
    use std::path::Path;

    use anyhow::Result;

    use crate::core::types::WinnerRow;
    use crate::io::import::MissingSpreadsheetDependency;

    pub(super) fn write_xlsx(_path: &Path, _rows: &[WinnerRow]) -> Result<()> {
        Err(MissingSpreadsheetDependency {
            capability: "xlsx export",
        }
        .into())
    }
}
