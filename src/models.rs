//! Core data models for uploaded files and their indexed rows.

use serde::Serialize;

/// One uploaded workbook, as stored.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub id: i64,
    /// Internal name of the binary artifact in the byte store.
    pub stored_name: String,
    /// User-facing name the file was uploaded under. Not unique.
    pub original_name: String,
    /// Location of the binary artifact in the byte store.
    pub storage_path: String,
    /// Unix seconds.
    pub created_at: i64,
}

/// A file about to be created; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewFile {
    pub stored_name: String,
    pub original_name: String,
    pub storage_path: String,
    pub created_at: i64,
}

/// One non-blank sheet row, flattened for indexing.
///
/// `row_number` is the 1-based position in the source sheet, counting the
/// header and any blank rows that were skipped. `cells` is positional: one
/// canonical display string per column, empty string for empty cells.
/// `search_text` is always the lowercased, space-joined form of `cells`.
#[derive(Debug, Clone)]
pub struct RowRecord {
    pub id: i64,
    pub file_id: i64,
    pub sheet_name: String,
    pub row_number: i64,
    pub cells: Vec<String>,
    pub search_text: String,
}

/// A row about to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRow {
    pub file_id: i64,
    pub sheet_name: String,
    pub row_number: i64,
    pub cells: Vec<String>,
    pub search_text: String,
}

/// A matching row joined with its owning file's original name. Transient;
/// never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: i64,
    #[serde(rename = "fileId")]
    pub file_id: i64,
    #[serde(rename = "originalName")]
    pub original_name: String,
    #[serde(rename = "sheetName")]
    pub sheet_name: String,
    #[serde(rename = "rowNumber")]
    pub row_number: i64,
    pub cells: Vec<String>,
}
