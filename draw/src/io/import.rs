//! Roster import from `.xlsx`, `.xls`, and `.csv` files.
//!
//! Only the first sheet is read. Its first row is the header; each following
//! non-blank row becomes one participant. Columns are matched against fixed,
//! case-sensitive header aliases.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::core::types::Participant;

const ID_ALIASES: [&str; 3] = ["id", "ID", "工号"];
const NAME_ALIASES: [&str; 3] = ["name", "Name", "姓名"];
const DEPARTMENT_ALIASES: [&str; 3] = ["department", "Department", "部门"];

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// The file could not be read as a roster. The current roster must stay as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportParseError {
    pub message: String,
}

impl ImportParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ImportParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse roster: {}", self.message)
    }
}

impl std::error::Error for ImportParseError {}

/// An optional spreadsheet capability was compiled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingSpreadsheetDependency {
    pub capability: &'static str,
}

impl fmt::Display for MissingSpreadsheetDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} support is unavailable (built without the `spreadsheet` feature)",
            self.capability
        )
    }
}

impl std::error::Error for MissingSpreadsheetDependency {}

/// Container format detected from file contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Xlsx,
    Xls,
    Csv,
}

/// Detect the format from magic bytes; anything that is not a zip or OLE
/// container is treated as CSV.
pub fn sniff_format(bytes: &[u8]) -> SheetFormat {
    if bytes.starts_with(ZIP_MAGIC) {
        SheetFormat::Xlsx
    } else if bytes.starts_with(OLE_MAGIC) {
        SheetFormat::Xls
    } else {
        SheetFormat::Csv
    }
}

/// Parse a roster from raw file bytes.
///
/// Errors are [`ImportParseError`] for unreadable content or
/// [`MissingSpreadsheetDependency`] when the format needs a compiled-out
/// capability. Either way nothing is returned, so callers never apply a
/// partial roster.
pub fn import_roster(bytes: &[u8]) -> Result<Vec<Participant>> {
    if bytes.is_empty() {
        return Err(ImportParseError::new("file is empty").into());
    }
    let format = sniff_format(bytes);
    debug!(?format, len = bytes.len(), "importing roster");
    let table = match format {
        SheetFormat::Csv => csv_rows(bytes)?,
        SheetFormat::Xlsx => workbook::xlsx_rows(bytes)?,
        SheetFormat::Xls => workbook::xls_rows(bytes)?,
    };
    let participants = rows_to_participants(&table)?;
    info!(?format, participants = participants.len(), "roster parsed");
    Ok(participants)
}

/// Read and parse a roster file.
pub fn read_roster_file(path: &Path) -> Result<Vec<Participant>> {
    let bytes = fs::read(path).with_context(|| format!("read roster {}", path.display()))?;
    import_roster(&bytes).with_context(|| format!("import roster {}", path.display()))
}

fn csv_rows(bytes: &[u8]) -> Result<Vec<Vec<String>>, ImportParseError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record =
            record.map_err(|err| ImportParseError::new(format!("csv line {}: {err}", line + 1)))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

#[cfg(feature = "spreadsheet")]
mod workbook {
    use std::fmt::Display;
    use std::io::Cursor;

    use anyhow::Result;
    use calamine::{Reader, Xls, Xlsx, open_workbook_from_rs};

    use super::ImportParseError;

    pub(super) fn xlsx_rows(bytes: &[u8]) -> Result<Vec<Vec<String>>> {
        Ok(first_sheet_rows::<Xlsx<_>>(bytes)?)
    }

    pub(super) fn xls_rows(bytes: &[u8]) -> Result<Vec<Vec<String>>> {
        Ok(first_sheet_rows::<Xls<_>>(bytes)?)
    }

    fn first_sheet_rows<'a, W>(bytes: &'a [u8]) -> Result<Vec<Vec<String>>, ImportParseError>
    where
        W: Reader<Cursor<&'a [u8]>>,
        W::Error: Display,
    {
        let mut workbook: W = open_workbook_from_rs(Cursor::new(bytes))
            .map_err(|err| ImportParseError::new(format!("open workbook: {err}")))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ImportParseError::new("workbook has no sheets"))?
            .map_err(|err| ImportParseError::new(format!("read first sheet: {err}")))?;
        Ok(range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect())
    }
}

#[cfg(not(feature = "spreadsheet"))]
mod workbook {
    use anyhow::Result;

    use super::MissingSpreadsheetDependency;

    pub(super) fn xlsx_rows(_bytes: &[u8]) -> Result<Vec<Vec<String>>> {
        Err(MissingSpreadsheetDependency {
            capability: "xlsx import",
        }
        .into())
    }

    pub(super) fn xls_rows(_bytes: &[u8]) -> Result<Vec<Vec<String>>> {
        Err(MissingSpreadsheetDependency {
            capability: "xls import",
        }
        .into())
    }
}

/// Column positions of one field's aliases, in alias priority order.
fn alias_columns(header: &[String], aliases: &[&str]) -> Vec<usize> {
    aliases
        .iter()
        .filter_map(|alias| header.iter().position(|h| h == alias))
        .collect()
}

/// First non-blank value among the alias columns.
fn resolve(row: &[String], columns: &[usize]) -> Option<String> {
    columns
        .iter()
        .filter_map(|&col| row.get(col))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn rows_to_participants(table: &[Vec<String>]) -> Result<Vec<Participant>, ImportParseError> {
    let (header, body) = table
        .split_first()
        .ok_or_else(|| ImportParseError::new("missing header row"))?;
    let id_cols = alias_columns(header, &ID_ALIASES);
    let name_cols = alias_columns(header, &NAME_ALIASES);
    let department_cols = alias_columns(header, &DEPARTMENT_ALIASES);

    let mut participants = Vec::new();
    let mut seen = HashSet::new();
    let rows = body
        .iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()));
    for (index, row) in rows.enumerate() {
        let participant = Participant {
            id: resolve(row, &id_cols).unwrap_or_else(|| format!("imported-{index}")),
            name: resolve(row, &name_cols).unwrap_or_else(|| format!("User {index}")),
            department: resolve(row, &department_cols),
        };
        if !seen.insert(participant.id.clone()) {
            return Err(ImportParseError::new(format!(
                "duplicate participant id '{}' in data row {}",
                participant.id,
                index + 1
            )));
        }
        participants.push(participant);
    }

    if participants.is_empty() {
        return Err(ImportParseError::new("no participant rows"));
    }
    Ok(participants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_file;

    fn parse_error(bytes: &[u8]) -> ImportParseError {
        let err = import_roster(bytes).expect_err("parse failure");
        err.downcast_ref::<ImportParseError>()
            .cloned()
            .expect("ImportParseError")
    }

    #[test]
    fn csv_with_english_headers() {
        let csv = "id,name,department\n1001,Alice,Sales\n1002,Bob,Ops\n";
        let roster = import_roster(csv.as_bytes()).expect("import");
        assert_eq!(
            roster,
            vec![
                Participant::new("1001", "Alice").with_department("Sales"),
                Participant::new("1002", "Bob").with_department("Ops"),
            ]
        );
    }

    #[test]
    fn csv_with_chinese_headers_and_bom() {
        let csv = "\u{feff}工号,姓名,部门\nA1,张三,技术部\n";
        let roster = import_roster(csv.as_bytes()).expect("import");
        assert_eq!(
            roster,
            vec![Participant::new("A1", "张三").with_department("技术部")]
        );
    }

    #[test]
    fn header_aliases_are_case_sensitive() {
        let csv = "NAME,Id\nAlice,7\n";
        let roster = import_roster(csv.as_bytes()).expect("import");
        assert_eq!(roster, vec![Participant::new("imported-0", "User 0")]);
    }

    #[test]
    fn earlier_alias_wins_and_blank_falls_through() {
        let csv = "ID,id,Name\n,x1,Ann\ny2,x2,Ben\n";
        let roster = import_roster(csv.as_bytes()).expect("import");
        let ids: Vec<&str> = roster.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["x1", "x2"]);
    }

    #[test]
    fn missing_fields_are_synthesized_by_row_index() {
        let csv = "department,name\nOps,\n,,\nSales,Cara\nHR,\n";
        let roster = import_roster(csv.as_bytes()).expect("import");
        assert_eq!(
            roster,
            vec![
                Participant::new("imported-0", "User 0").with_department("Ops"),
                Participant::new("imported-1", "Cara").with_department("Sales"),
                Participant::new("imported-2", "User 2").with_department("HR"),
            ]
        );
    }

    #[test]
    fn duplicate_ids_fail_the_whole_import() {
        let err = parse_error(b"id,name\n1,A\n1,B\n");
        assert!(err.message.contains("duplicate participant id '1'"));
    }

    #[test]
    fn header_only_and_empty_files_fail() {
        assert!(parse_error(b"id,name\n").message.contains("no participant rows"));
        assert!(parse_error(b"").message.contains("empty"));
    }

    #[test]
    fn invalid_utf8_csv_fails() {
        let err = parse_error(b"id,name\n1,\xff\xfe\n");
        assert!(err.message.contains("csv line"));
    }

    #[test]
    fn sniffs_container_formats() {
        assert_eq!(sniff_format(b"PK\x03\x04rest"), SheetFormat::Xlsx);
        assert_eq!(sniff_format(OLE_MAGIC), SheetFormat::Xls);
        assert_eq!(sniff_format(b"id,name\n"), SheetFormat::Csv);
    }

    #[cfg(feature = "spreadsheet")]
    #[test]
    fn truncated_xlsx_is_a_parse_error() {
        let err = parse_error(b"PK\x03\x04not really a zip");
        assert!(err.message.contains("open workbook"));
    }

    #[test]
    fn read_roster_file_reports_path() {
        let (_dir, path) = temp_file("roster.csv", b"name\nAlice\n");
        let roster = read_roster_file(&path).expect("read");
        assert_eq!(roster, vec![Participant::new("imported-0", "Alice")]);

        let missing = path.with_file_name("missing.csv");
        let err = read_roster_file(&missing).expect_err("missing");
        assert!(format!("{err:#}").contains("missing.csv"));
    }
}
