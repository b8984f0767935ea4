use anyhow::Result;
use sqlx::SqlitePool;

/// Creates the schema. Idempotent; safe to run on every startup.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    // Create files table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS files (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            stored_name TEXT NOT NULL,
            original_name TEXT NOT NULL,
            storage_path TEXT NOT NULL,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create rows table. cells is a JSON array of canonical cell strings;
    // search_text is the lowercased space-joined form of cells.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS rows (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            file_id INTEGER NOT NULL,
            sheet_name TEXT NOT NULL,
            row_number INTEGER NOT NULL,
            cells TEXT NOT NULL,
            search_text TEXT NOT NULL,
            UNIQUE(file_id, sheet_name, row_number),
            FOREIGN KEY (file_id) REFERENCES files(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_rows_file_id ON rows(file_id)")
        .execute(pool)
        .await?;

    Ok(())
}
