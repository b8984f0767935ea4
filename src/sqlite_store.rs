//! SQLite-backed [`Store`] implementation.
//!
//! Maps each [`Store`] operation onto SQL over the files and rows tables.
//! Row cells are serialized as a JSON array of strings; search is a
//! conjunction of escaped LIKE predicates over the precomputed lowercase
//! search text.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::error::SheetgrepError;
use crate::models::{FileRecord, NewFile, NewRow, RowRecord, SearchHit};
use crate::store::Store;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[allow(dead_code)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Escapes LIKE wildcards so a term matches as a literal substring.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if c == '\\' || c == '%' || c == '_' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn file_from_row(row: &sqlx::sqlite::SqliteRow) -> FileRecord {
    FileRecord {
        id: row.get("id"),
        stored_name: row.get("stored_name"),
        original_name: row.get("original_name"),
        storage_path: row.get("storage_path"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert_file(&self, file: &NewFile) -> Result<FileRecord, SheetgrepError> {
        let result = sqlx::query(
            r#"
            INSERT INTO files (stored_name, original_name, storage_path, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&file.stored_name)
        .bind(&file.original_name)
        .bind(&file.storage_path)
        .bind(file.created_at)
        .execute(&self.pool)
        .await?;

        Ok(FileRecord {
            id: result.last_insert_rowid(),
            stored_name: file.stored_name.clone(),
            original_name: file.original_name.clone(),
            storage_path: file.storage_path.clone(),
            created_at: file.created_at,
        })
    }

    async fn insert_rows(&self, rows: &[NewRow]) -> Result<(), SheetgrepError> {
        let mut tx = self.pool.begin().await?;
        for row in rows {
            let cells = serde_json::to_string(&row.cells)?;
            sqlx::query(
                r#"
                INSERT INTO rows (file_id, sheet_name, row_number, cells, search_text)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(row.file_id)
            .bind(&row.sheet_name)
            .bind(row.row_number)
            .bind(&cells)
            .bind(&row.search_text)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn get_file(&self, id: i64) -> Result<Option<FileRecord>, SheetgrepError> {
        let row = sqlx::query(
            "SELECT id, stored_name, original_name, storage_path, created_at FROM files WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(file_from_row))
    }

    async fn list_files(&self) -> Result<Vec<FileRecord>, SheetgrepError> {
        let rows = sqlx::query(
            "SELECT id, stored_name, original_name, storage_path, created_at FROM files ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(file_from_row).collect())
    }

    async fn delete_rows(&self, file_id: i64) -> Result<(), SheetgrepError> {
        sqlx::query("DELETE FROM rows WHERE file_id = ?")
            .bind(file_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_file(&self, file_id: i64) -> Result<bool, SheetgrepError> {
        let result = sqlx::query("DELETE FROM files WHERE id = ?")
            .bind(file_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_rows(
        &self,
        terms: &[String],
        limit: i64,
    ) -> Result<Vec<SearchHit>, SheetgrepError> {
        let mut query: sqlx::QueryBuilder<'_, sqlx::Sqlite> = sqlx::QueryBuilder::new(
            r#"
            SELECT r.id, r.file_id, r.sheet_name, r.row_number, r.cells, f.original_name
            FROM rows r
            JOIN files f ON f.id = r.file_id
            WHERE 1 = 1
            "#,
        );
        for term in terms {
            query.push(" AND r.search_text LIKE ");
            query.push_bind(format!("%{}%", escape_like(term)));
            query.push(" ESCAPE '\\'");
        }
        // Stable but not semantically meaningful order under the cap.
        query.push(" ORDER BY r.id ASC LIMIT ");
        query.push_bind(limit);

        let rows = query.build().fetch_all(&self.pool).await?;

        let mut hits = Vec::with_capacity(rows.len());
        for row in &rows {
            let cells: String = row.get("cells");
            hits.push(SearchHit {
                id: row.get("id"),
                file_id: row.get("file_id"),
                original_name: row.get("original_name"),
                sheet_name: row.get("sheet_name"),
                row_number: row.get("row_number"),
                cells: serde_json::from_str(&cells)?,
            });
        }
        Ok(hits)
    }

    async fn rows_for_file(&self, file_id: i64) -> Result<Vec<RowRecord>, SheetgrepError> {
        let rows = sqlx::query(
            r#"
            SELECT id, file_id, sheet_name, row_number, cells, search_text
            FROM rows
            WHERE file_id = ?
            ORDER BY row_number ASC, id ASC
            "#,
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            let cells: String = row.get("cells");
            out.push(RowRecord {
                id: row.get("id"),
                file_id: row.get("file_id"),
                sheet_name: row.get("sheet_name"),
                row_number: row.get("row_number"),
                cells: serde_json::from_str(&cells)?,
                search_text: row.get("search_text"),
            });
        }
        Ok(out)
    }
}
