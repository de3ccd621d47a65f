use encoding_rs::WINDOWS_1252;
use saldo_core::{Cell, RawTable};
use std::borrow::Cow;
use std::io::Read;

use crate::read::ReadError;

/// Reads a delimited statement. The first record is the header row; every
/// field is kept as text so amount parsing sees exactly what the bank wrote.
///
/// Fields are decoded one by one: UTF-8 when valid, Windows-1252 otherwise,
/// so a single Latin-1 byte never costs the rest of the statement.
pub fn read_csv<R: Read>(data: R, delimiter: u8) -> Result<RawTable, ReadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(data);

    let headers = reader.byte_headers()?.clone();
    let mut table = RawTable::new(headers.iter().enumerate().map(|(ix, h)| {
        let name = decode_field(h);
        if ix == 0 {
            name.trim_start_matches('\u{feff}').to_string()
        } else {
            name.into_owned()
        }
    }));

    let mut recoded = 0usize;
    for result in reader.byte_records() {
        let record = result?;
        let fields: Vec<Cow<'_, str>> = record.iter().map(decode_field).collect();
        if fields.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        recoded += fields.iter().filter(|f| matches!(f, Cow::Owned(_))).count();
        table.push_row(fields.iter().map(|f| Cell::text(f)).collect());
    }

    if recoded > 0 {
        tracing::debug!(fields = recoded, "decoded non-UTF-8 fields as Windows-1252");
    }
    Ok(table)
}

fn decode_field(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned()),
    }
}
