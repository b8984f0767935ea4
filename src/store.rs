//! Persistence service interface.
//!
//! The [`Store`] trait is the engine's only view of the relational backend:
//! file and row creation, lookup, cascading deletion, and conjunctive
//! substring search. Implementations must be `Send + Sync` so one store can
//! serve concurrent uploads, searches, and deletes.

use async_trait::async_trait;

use crate::error::SheetgrepError;
use crate::models::{FileRecord, NewFile, NewRow, RowRecord, SearchHit};

#[async_trait]
pub trait Store: Send + Sync {
    /// Persists a file record and returns it with its assigned id.
    async fn insert_file(&self, file: &NewFile) -> Result<FileRecord, SheetgrepError>;

    /// Persists one batch of rows atomically. Callers chunk large row sets;
    /// a batch is never split internally.
    async fn insert_rows(&self, rows: &[NewRow]) -> Result<(), SheetgrepError>;

    async fn get_file(&self, id: i64) -> Result<Option<FileRecord>, SheetgrepError>;

    /// All file records, in stable persistence order.
    async fn list_files(&self) -> Result<Vec<FileRecord>, SheetgrepError>;

    /// Removes every row owned by the file.
    async fn delete_rows(&self, file_id: i64) -> Result<(), SheetgrepError>;

    /// Removes the file record itself. Returns false when the id is unknown.
    async fn delete_file(&self, file_id: i64) -> Result<bool, SheetgrepError>;

    /// Rows whose search text contains every term as a substring, joined
    /// with the owning file's original name, capped at `limit`.
    ///
    /// Terms must already be trimmed, non-empty, and lowercased; an empty
    /// term set is the caller's short-circuit, not the store's.
    async fn find_rows(&self, terms: &[String], limit: i64)
        -> Result<Vec<SearchHit>, SheetgrepError>;

    /// All rows owned by the file, ordered by row number (id as tiebreak).
    async fn rows_for_file(&self, file_id: i64) -> Result<Vec<RowRecord>, SheetgrepError>;
}
