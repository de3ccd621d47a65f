pub mod csv;
pub mod export;
pub mod pipeline;
pub mod read;
pub mod rules;
pub mod split;
pub mod upload;
pub mod util;
pub mod xlsx;

pub use crate::export::write_csv;
pub use crate::pipeline::{
    ingest, ingest_path, ingest_upload, ingest_upload_in, Diagnostic, IngestCounts, IngestError,
    IngestOutcome, ValueParseWarning, AMOUNT_COLUMN, DATE_COLUMN, DESCRIPTION_COLUMN,
    DISCOUNT_COLUMN,
};
pub use crate::read::{read_path, ReadError, ReadOptions};
pub use crate::rules::CategoryMatcher;
pub use crate::split::{split, Split, SplitInvariantWarning};
pub use crate::upload::UploadedFile;
