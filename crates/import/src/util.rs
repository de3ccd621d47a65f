use chrono::{Duration, NaiveDate, NaiveDateTime};
use saldo_core::Cell;

/// Largest serial Excel accepts (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y%m%d",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Converts an Excel serial day number to a timestamp.
///
/// The epoch is 1899-12-30, which absorbs Excel's phantom 1900-02-29.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 1.0 || serial > MAX_EXCEL_SERIAL {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (serial * 86_400.0).round() as i64;
    base.checked_add_signed(Duration::seconds(seconds))
}

/// Parses a textual date. Slash and dash forms are read day-first, so
/// `03/02/2024` is 3 February; month-first US dates are not accepted.
pub fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Reads a date from any cell a statement might carry in its date column.
pub fn parse_date_cell(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::DateTime(dt) => Some(dt.date()),
        Cell::Text(s) => parse_date_str(s),
        // Compact YYYYMMDD integers, otherwise an Excel serial.
        Cell::Int(i) if (19_000_101..=29_991_231).contains(i) => parse_date_str(&i.to_string()),
        Cell::Int(i) => excel_serial_to_datetime(*i as f64).map(|dt| dt.date()),
        Cell::Float(f) => excel_serial_to_datetime(*f).map(|dt| dt.date()),
        Cell::Empty | Cell::Bool(_) | Cell::Decimal(_) => None,
    }
}
