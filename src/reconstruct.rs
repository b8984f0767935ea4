//! Sheet reconstruction for the viewer.
//!
//! Regroups a file's stored rows into per-sheet 2-D grids. The result is a
//! compacted view: fully blank rows were never persisted, so original row
//! spacing is not reproduced; callers needing positional fidelity must read
//! the preserved row numbers.

use anyhow::Result;
use serde::Serialize;

use crate::config::Config;
use crate::db;
use crate::error::SheetgrepError;
use crate::files::get_file;
use crate::models::RowRecord;
use crate::sqlite_store::SqliteStore;
use crate::store::Store;

/// One reconstructed sheet: display rows in ascending row-number order.
#[derive(Debug, Clone, Serialize)]
pub struct SheetGrid {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

/// Groups rows by sheet, preserving first-encounter sheet order and the
/// incoming (row-number ascending) order within each sheet.
fn group_rows(rows: Vec<RowRecord>) -> Vec<SheetGrid> {
    let mut grids: Vec<SheetGrid> = Vec::new();
    for row in rows {
        match grids.iter_mut().find(|g| g.name == row.sheet_name) {
            Some(grid) => grid.rows.push(row.cells),
            None => grids.push(SheetGrid {
                name: row.sheet_name,
                rows: vec![row.cells],
            }),
        }
    }
    grids
}

/// Reconstructs every sheet of a file. Unknown id is `NotFound`.
pub async fn reconstruct_sheets(
    store: &dyn Store,
    file_id: i64,
) -> Result<Vec<SheetGrid>, SheetgrepError> {
    get_file(store, file_id).await?;
    let rows = store.rows_for_file(file_id).await?;
    Ok(group_rows(rows))
}

/// CLI entry point: prints a file's reconstructed sheets.
pub async fn run_view(config: &Config, id: i64) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool);
    let result = match get_file(&store, id).await {
        Ok(file) => store
            .rows_for_file(id)
            .await
            .map(|rows| (file, group_rows(rows))),
        Err(e) => Err(e),
    };
    store.close().await;
    let (file, grids) = result?;

    println!("--- {} ---", file.original_name);
    for grid in &grids {
        println!("[{}] ({} rows)", grid.name, grid.rows.len());
        for row in &grid.rows {
            println!("  {}", row.join(" | "));
        }
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sheet: &str, number: i64, cell: &str) -> RowRecord {
        RowRecord {
            id: number,
            file_id: 1,
            sheet_name: sheet.to_string(),
            row_number: number,
            cells: vec![cell.to_string()],
            search_text: cell.to_lowercase(),
        }
    }

    #[test]
    fn grouping_preserves_relative_order_with_gaps() {
        // Row numbers 1, 3, 5: 2 and 4 were blank and never persisted.
        let rows = vec![
            record("Sheet1", 1, "first"),
            record("Sheet1", 3, "third"),
            record("Sheet1", 5, "fifth"),
        ];

        let grids = group_rows(rows);
        assert_eq!(grids.len(), 1);
        assert_eq!(grids[0].rows.len(), 3);
        assert_eq!(
            grids[0].rows,
            vec![vec!["first"], vec!["third"], vec!["fifth"]]
        );
    }

    #[test]
    fn interleaved_sheets_group_cleanly() {
        // A global row-number ordering interleaves sheets; grouping is
        // stable regardless.
        let rows = vec![
            record("A", 1, "a1"),
            record("B", 1, "b1"),
            record("A", 2, "a2"),
            record("B", 2, "b2"),
        ];

        let grids = group_rows(rows);
        assert_eq!(grids.len(), 2);
        assert_eq!(grids[0].name, "A");
        assert_eq!(grids[0].rows, vec![vec!["a1"], vec!["a2"]]);
        assert_eq!(grids[1].name, "B");
        assert_eq!(grids[1].rows, vec![vec!["b1"], vec!["b2"]]);
    }

    #[test]
    fn empty_input_yields_no_grids() {
        assert!(group_rows(Vec::new()).is_empty());
    }
}
