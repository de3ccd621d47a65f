use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// A single spreadsheet value as it came out of the reader.
///
/// `Decimal` is never produced by a reader; normalization writes it into the
/// amount column once the raw value has been parsed.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Decimal(Decimal),
}

impl Cell {
    /// Builds a cell from free text, mapping blank strings to `Empty`.
    pub fn text(s: &str) -> Self {
        if s.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Int(i) => write!(f, "{i}"),
            Cell::Float(x) => write!(f, "{x}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::DateTime(dt) => {
                if dt.time() == chrono::NaiveTime::MIN {
                    write!(f, "{}", dt.date())
                } else {
                    write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S"))
                }
            }
            Cell::Decimal(d) => write!(f, "{d}"),
        }
    }
}

/// An in-memory statement table: a header row plus data rows aligned with it.
///
/// Header names are trimmed on construction. Rows shorter than the header are
/// padded with `Cell::Empty`; cells beyond the last header are discarded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new<S: AsRef<str>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns
                .into_iter()
                .map(|c| c.as_ref().trim().to_string())
                .collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, mut cells: Vec<Cell>) {
        cells.resize(self.columns.len(), Cell::Empty);
        self.rows.push(cells);
    }

    pub fn with_rows(mut self, rows: impl IntoIterator<Item = Vec<Cell>>) -> Self {
        for row in rows {
            self.push_row(row);
        }
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = RawRecord<'_>> {
        self.rows.iter().map(|cells| RawRecord { cells })
    }
}

/// A borrowed view of one row, addressed by the positions from
/// [`RawTable::column_index`].
#[derive(Debug, Clone, Copy)]
pub struct RawRecord<'a> {
    cells: &'a [Cell],
}

impl<'a> RawRecord<'a> {
    /// Returns the cell at column position `ix`, or `Cell::Empty` past the end.
    pub fn cell(&self, ix: usize) -> &'a Cell {
        static EMPTY: Cell = Cell::Empty;
        self.cells.get(ix).unwrap_or(&EMPTY)
    }
}
