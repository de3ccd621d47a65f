//! Statement ingestion: schema check, amount normalization, flow
//! classification, categorization, period derivation and the debit/credit
//! split, in that order.
//!
//! Only a missing required column or an unreadable file fails an ingestion.
//! Everything else (bad amounts, bad dates, a split mismatch) is reported in
//! the outcome next to the data that could be recovered.

use saldo_core::{parse_amount, CategoryTable, Cell, Flow, NormalizedTransaction, RawTable};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::read::{read_path, ReadError, ReadOptions};
use crate::rules::CategoryMatcher;
use crate::split::{split, SplitInvariantWarning};
use crate::upload::UploadedFile;
use crate::util::parse_date_cell;

pub const AMOUNT_COLUMN: &str = "VALOR";
pub const DESCRIPTION_COLUMN: &str = "DESCRIPCIÓN";
pub const DATE_COLUMN: &str = "FECHA";
/// Legacy discount column, dropped on ingestion.
pub const DISCOUNT_COLUMN: &str = "DCTO.";

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },
    #[error("Unreadable input: {0}")]
    Unreadable(#[from] ReadError),
}

/// A row whose amount could not be parsed. The row is kept with no amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueParseWarning {
    pub row: usize,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    SplitInvariant(SplitInvariantWarning),
    /// Rows in a dated statement whose date is blank or unreadable.
    UnparseableDates { rows: Vec<usize> },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::SplitInvariant(w) => write!(f, "{w}"),
            Diagnostic::UnparseableDates { rows } => {
                write!(f, "{} row(s) have no usable date", rows.len())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestCounts {
    pub total: usize,
    pub debits: usize,
    pub credits: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    /// Output column order; every transaction's `cells` follow it.
    pub columns: Vec<String>,
    pub transactions: Vec<NormalizedTransaction>,
    pub debits: Vec<NormalizedTransaction>,
    pub credits: Vec<NormalizedTransaction>,
    pub counts: IngestCounts,
    pub parse_failures: Vec<ValueParseWarning>,
    pub diagnostics: Vec<Diagnostic>,
}

impl IngestOutcome {
    /// Number of amounts that need the user's attention.
    pub fn needs_attention(&self) -> usize {
        self.parse_failures.len()
    }

    pub fn summary_message(&self) -> String {
        format!("Successfully loaded {} transactions", self.counts.total)
    }
}

/// Column positions resolved during schema validation.
struct Schema {
    amount: usize,
    description: usize,
    date: Option<usize>,
    discount: Option<usize>,
}

fn validate_schema(table: &RawTable) -> Result<Schema, IngestError> {
    let amount = table.column_index(AMOUNT_COLUMN);
    let description = table.column_index(DESCRIPTION_COLUMN);

    match (amount, description) {
        (Some(amount), Some(description)) => Ok(Schema {
            amount,
            description,
            date: table.column_index(DATE_COLUMN),
            discount: table.column_index(DISCOUNT_COLUMN),
        }),
        _ => {
            let missing: Vec<String> = [(AMOUNT_COLUMN, amount), (DESCRIPTION_COLUMN, description)]
                .into_iter()
                .filter(|(_, ix)| ix.is_none())
                .map(|(name, _)| name.to_string())
                .collect();
            warn!(missing = ?missing, "statement is missing required columns");
            Err(IngestError::Schema { missing })
        }
    }
}

/// Normalizes a statement table against a snapshot of the category table.
pub fn ingest(table: &RawTable, categories: &CategoryTable) -> Result<IngestOutcome, IngestError> {
    let schema = validate_schema(table)?;
    debug!(rows = table.len(), columns = table.columns().len(), "ingesting statement");

    let kept: Vec<usize> = (0..table.columns().len())
        .filter(|ix| Some(*ix) != schema.discount)
        .collect();
    let columns: Vec<String> = kept.iter().map(|&ix| table.columns()[ix].clone()).collect();

    let mut parse_failures = Vec::new();
    let mut transactions: Vec<NormalizedTransaction> = Vec::with_capacity(table.len());

    for (row, record) in table.records().enumerate() {
        let raw_amount = record.cell(schema.amount);
        let amount = parse_amount(raw_amount);
        if amount.is_none() {
            debug!(row, raw = %raw_amount, "unparseable amount");
            parse_failures.push(ValueParseWarning {
                row,
                raw: raw_amount.to_string(),
            });
        }

        let cells = kept
            .iter()
            .map(|&ix| {
                if ix == schema.amount {
                    amount.map(Cell::Decimal).unwrap_or_default()
                } else {
                    record.cell(ix).clone()
                }
            })
            .collect();

        transactions.push(NormalizedTransaction {
            row,
            amount,
            flow: Flow::classify(amount),
            category: String::new(),
            description: record.cell(schema.description).to_string(),
            date: None,
            period_month: None,
            period_week: None,
            cells,
        });
    }

    let descriptions: Vec<&str> = transactions.iter().map(|t| t.description.as_str()).collect();
    let assigned = CategoryMatcher::new(categories).categorize(&descriptions);
    for (tx, category) in transactions.iter_mut().zip(assigned) {
        tx.category = category;
    }

    let mut diagnostics = Vec::new();
    if let Some(date_ix) = schema.date {
        let mut undated = Vec::new();
        for (tx, record) in transactions.iter_mut().zip(table.records()) {
            let date = parse_date_cell(record.cell(date_ix));
            if date.is_none() {
                undated.push(tx.row);
            }
            tx.set_date(date);
        }
        if !undated.is_empty() {
            debug!(rows = undated.len(), "rows without a usable date");
            diagnostics.push(Diagnostic::UnparseableDates { rows: undated });
        }
    }

    let split = split(&transactions);
    if let Some(warning) = split.mismatch {
        diagnostics.push(Diagnostic::SplitInvariant(warning));
    }

    if !parse_failures.is_empty() {
        warn!(count = parse_failures.len(), "amount values need attention");
    }

    let counts = IngestCounts {
        total: transactions.len(),
        debits: split.debits.len(),
        credits: split.credits.len(),
    };
    info!(
        total = counts.total,
        debits = counts.debits,
        credits = counts.credits,
        "statement ingested"
    );

    Ok(IngestOutcome {
        columns,
        transactions,
        debits: split.debits,
        credits: split.credits,
        counts,
        parse_failures,
        diagnostics,
    })
}

/// Reads a statement file and ingests it.
pub fn ingest_path(
    path: &Path,
    categories: &CategoryTable,
    options: &ReadOptions,
) -> Result<IngestOutcome, IngestError> {
    debug!(path = %path.display(), "loading statement");
    let table = read_path(path, options)?;
    ingest(&table, categories)
}

/// Ingests uploaded bytes through a temporary file that is removed afterwards.
pub fn ingest_upload(
    data: &[u8],
    extension: &str,
    categories: &CategoryTable,
    options: &ReadOptions,
) -> Result<IngestOutcome, IngestError> {
    ingest_upload_in(&std::env::temp_dir(), data, extension, categories, options)
}

/// Like [`ingest_upload`], spooling into `dir`. The spooled file is gone when
/// this returns, on success and on error alike.
pub fn ingest_upload_in(
    dir: &Path,
    data: &[u8],
    extension: &str,
    categories: &CategoryTable,
    options: &ReadOptions,
) -> Result<IngestOutcome, IngestError> {
    let upload = UploadedFile::create_in(dir, data, extension).map_err(ReadError::from)?;
    ingest_path(upload.path(), categories, options)
}
