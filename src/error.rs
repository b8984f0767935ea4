//! Error taxonomy for the ingestion-and-search engine.
//!
//! Every failure surfaced to a caller is one of four kinds: an unreadable
//! workbook, a rejected duplicate upload, a backing-store failure, or an
//! unknown file id. Cell normalization never fails, so lower layers do not
//! contribute additional kinds.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetgrepError {
    /// The uploaded bytes are not a recognizable workbook. Fatal to the
    /// upload; nothing is persisted.
    #[error("unreadable workbook: {0}")]
    Parse(String),

    /// An existing file already has this original name and byte size.
    #[error("file '{name}' has already been uploaded")]
    DuplicateUpload { name: String },

    /// The relational store or the byte store failed during a read or write.
    #[error("storage error: {0}")]
    Persistence(String),

    /// No file with this id exists.
    #[error("file {0} not found")]
    NotFound(i64),
}

impl From<sqlx::Error> for SheetgrepError {
    fn from(err: sqlx::Error) -> Self {
        SheetgrepError::Persistence(err.to_string())
    }
}

impl From<std::io::Error> for SheetgrepError {
    fn from(err: std::io::Error) -> Self {
        SheetgrepError::Persistence(err.to_string())
    }
}

// Row cells travel through the store as serialized JSON; a codec failure is
// a storage failure.
impl From<serde_json::Error> for SheetgrepError {
    fn from(err: serde_json::Error) -> Self {
        SheetgrepError::Persistence(err.to_string())
    }
}
