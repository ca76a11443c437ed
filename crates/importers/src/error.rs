//! The module contains the error an import can throw.

use thiserror::Error;

/// Import custom errors.
///
/// These cover structural problems only: a missing column or field, a value
/// whose shape cannot be interpreted, or an unreadable source. Per-row CSV
/// problems are skipped and reported on [`CsvItems::skipped`] instead.
///
/// [`CsvItems::skipped`]: crate::CsvItems
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("missing required column: {0}")]
    MissingColumn(String),
    #[error("missing required field: {0}")]
    MissingField(String),
    #[error("malformed {context}: {message}")]
    Malformed { context: String, message: String },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
