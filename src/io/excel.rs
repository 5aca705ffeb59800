//! Workbook bytes to and from [`RawTable`].
//!
//! Remote backends hand over whole files as byte buffers, so both directions
//! work in memory rather than on paths.

use std::io::Cursor;

use calamine::{DataType, Reader, Xlsx};
use rust_xlsxwriter::Workbook;

use crate::error::{Result, TrackerError};
use crate::model::RawTable;

/// Reads the first worksheet of an xlsx payload into a raw table.
///
/// The first row is taken as the header row; data rows are padded with empty
/// cells to the header width.
pub fn read_table(bytes: &[u8]) -> Result<RawTable> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| TrackerError::Parse("workbook contains no sheets".into()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .ok_or_else(|| TrackerError::Parse(format!("missing sheet '{sheet_name}'")))?
        .map_err(TrackerError::from)?;

    let mut rows = range.rows();
    let columns: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|cell| cell_to_string(Some(cell))).collect(),
        None => return Err(TrackerError::Parse("workbook sheet is empty".into())),
    };

    let data = rows
        .map(|row| {
            let mut cells: Vec<String> =
                row.iter().map(|cell| cell_to_string(Some(cell))).collect();
            cells.resize(columns.len(), String::new());
            cells
        })
        .collect();

    Ok(RawTable {
        columns,
        rows: data,
    })
}

/// Writes a raw table as a single-sheet xlsx payload.
pub fn write_table(raw: &RawTable) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col_idx, header) in raw.columns.iter().enumerate() {
        worksheet.write_string(0, col_idx as u16, header)?;
    }
    for (row_idx, row) in raw.rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            worksheet.write_string((row_idx + 1) as u32, col_idx as u16, cell)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
