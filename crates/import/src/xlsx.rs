use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDateTime;
use saldo_core::{Cell, RawTable};
use std::path::Path;

use crate::read::ReadError;
use crate::util::excel_serial_to_datetime;

/// Reads the first worksheet of an Excel or OpenDocument workbook. The first
/// row is the header; fully empty rows are skipped.
pub fn read_workbook(path: &Path) -> Result<RawTable, ReadError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ReadError::NoWorksheet)??;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(RawTable::default());
    };

    let mut table = RawTable::new(header.iter().map(header_name));
    for row in rows {
        let cells: Vec<Cell> = row.iter().map(to_cell).collect();
        if cells.iter().all(Cell::is_empty) {
            continue;
        }
        table.push_row(cells);
    }

    tracing::debug!(
        path = %path.display(),
        rows = table.len(),
        columns = table.columns().len(),
        "read worksheet"
    );
    Ok(table)
}

fn header_name(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty | Data::Error(_) => String::new(),
        other => to_cell(other).to_string(),
    }
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::text(s),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => excel_serial_to_datetime(dt.as_f64())
            .map(Cell::DateTime)
            .unwrap_or(Cell::Float(dt.as_f64())),
        Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%dT%H:%M:%S")
            .map(Cell::DateTime)
            .unwrap_or_else(|_| Cell::text(s)),
        Data::DurationIso(s) => Cell::text(s),
    }
}
