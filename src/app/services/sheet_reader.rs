//! Spreadsheet reading into a raw cell grid
//!
//! CSV files go through the `csv` crate; workbooks (`.xlsx`, `.xlsm`,
//! `.xlsb`, `.xls`, `.ods`) go through `calamine`, first worksheet only. Both
//! paths produce the same `Vec<Row>` with row 0 as the header, the grid
//! anchored at column A and wholly blank rows removed.

use crate::app::models::{Cell, Row};
use crate::constants::{CSV_EXTENSIONS, WORKBOOK_EXTENSIONS};
use crate::{Error, Result};
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::debug;

/// Input family chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetKind {
    Csv,
    Workbook,
}

impl SheetKind {
    /// Classify a file name by extension, case-insensitively
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())?
            .to_ascii_lowercase();

        if CSV_EXTENSIONS.contains(&extension.as_str()) {
            Some(SheetKind::Csv)
        } else if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
            Some(SheetKind::Workbook)
        } else {
            None
        }
    }
}

/// True when the path has a readable spreadsheet extension
pub fn is_supported(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(SheetKind::from_file_name)
        .is_some()
}

/// Read a spreadsheet from disk
pub fn read_path(path: &Path) -> Result<Vec<Row>> {
    let file_name = display_name(path);
    let kind = SheetKind::from_file_name(&file_name)
        .ok_or_else(|| Error::unsupported_file(file_name.clone()))?;

    let rows = match kind {
        SheetKind::Csv => {
            let bytes = std::fs::read(path)
                .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))?;
            read_csv(&file_name, &bytes)?
        }
        SheetKind::Workbook => {
            let mut workbook =
                open_workbook_auto(path).map_err(|e| Error::workbook(&file_name, e.to_string()))?;
            let range = first_worksheet(&mut workbook, &file_name)?;
            grid_from_range(&range)
        }
    };

    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Read a spreadsheet already held in memory
pub fn read_bytes(file_name: &str, bytes: &[u8]) -> Result<Vec<Row>> {
    let kind = SheetKind::from_file_name(file_name)
        .ok_or_else(|| Error::unsupported_file(file_name))?;

    let rows = match kind {
        SheetKind::Csv => read_csv(file_name, bytes)?,
        SheetKind::Workbook => {
            let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
                .map_err(|e| Error::workbook(file_name, e.to_string()))?;
            let range = first_worksheet(&mut workbook, file_name)?;
            grid_from_range(&range)
        }
    };

    debug!("Read {} rows from {} ({} bytes)", rows.len(), file_name, bytes.len());
    Ok(rows)
}

fn first_worksheet<RS: Read + Seek>(workbook: &mut Sheets<RS>, file_name: &str) -> Result<Range<Data>> {
    match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => Ok(range),
        Some(Err(e)) => Err(Error::workbook(file_name, e.to_string())),
        None => Err(Error::workbook(file_name, "workbook contains no worksheets")),
    }
}

fn read_csv(file_name: &str, bytes: &[u8]) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record.map_err(|e| Error::csv(file_name, e))?;
        let row: Row = record
            .iter()
            .map(|field| Cell::from(String::from_utf8_lossy(field).into_owned()))
            .collect();
        if !is_blank_row(&row) {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Convert a calamine range into rows anchored at column A
fn grid_from_range(range: &Range<Data>) -> Vec<Row> {
    let column_offset = range.start().map(|(_, col)| col as usize).unwrap_or(0);

    range
        .rows()
        .map(|cells| {
            let mut row = Vec::with_capacity(column_offset + cells.len());
            row.resize(column_offset, Cell::Empty);
            row.extend(cells.iter().map(cell_from_data));
            row
        })
        .filter(|row| !is_blank_row(row))
        .collect()
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::from(s.as_str()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::from(s.as_str()),
        Data::Error(_) => Cell::Empty,
    }
}

fn is_blank_row(row: &[Cell]) -> bool {
    row.iter().all(Cell::is_blank)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
