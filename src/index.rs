//! Row indexing: flattening parsed sheets into persistable rows.
//!
//! Row numbers are 1-based positions in the source sheet, counted over every
//! raw row whether or not it survives filtering, so blank rows leave gaps
//! instead of renumbering what follows. Rows that normalize to nothing are
//! never emitted.

use crate::cell::normalize_cell;
use crate::config::DateSerialConfig;
use crate::models::NewRow;
use crate::workbook::SheetData;

/// Flattens parsed sheets into the full ordered set of rows to persist for
/// one file.
pub fn index_sheets(file_id: i64, sheets: &[SheetData], window: &DateSerialConfig) -> Vec<NewRow> {
    let mut out = Vec::new();
    for sheet in sheets {
        for (position, raw_row) in sheet.rows.iter().enumerate() {
            let cells: Vec<String> = raw_row
                .iter()
                .map(|cell| normalize_cell(cell, window))
                .collect();
            let search_text = cells.join(" ").to_lowercase();
            if search_text.trim().is_empty() {
                continue;
            }
            out.push(NewRow {
                file_id,
                sheet_name: sheet.name.clone(),
                row_number: (position + 1) as i64,
                cells,
                search_text,
            });
        }
    }
    out
}
