use saldo_core::RawTable;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("Workbook has no worksheets")]
    NoWorksheet,
    #[error("Unsupported file type: '{0}'")]
    UnsupportedFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    pub csv_delimiter: u8,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self { csv_delimiter: b',' }
    }
}

/// Reads a statement file, choosing the reader from the file extension.
pub fn read_path(path: &Path, options: &ReadOptions) -> Result<RawTable, ReadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();

    match ext.as_str() {
        "csv" | "txt" => {
            let file = File::open(path)?;
            crate::csv::read_csv(BufReader::new(file), options.csv_delimiter)
        }
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => crate::xlsx::read_workbook(path),
        other => Err(ReadError::UnsupportedFormat(other.to_string())),
    }
}
