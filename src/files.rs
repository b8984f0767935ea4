//! File lifecycle: listing, lookup, deletion, and re-export of the original
//! binary.

use anyhow::Result;

use crate::blob::BlobStore;
use crate::config::Config;
use crate::db;
use crate::error::SheetgrepError;
use crate::models::FileRecord;
use crate::sqlite_store::SqliteStore;
use crate::store::Store;

pub async fn list_files(store: &dyn Store) -> Result<Vec<FileRecord>, SheetgrepError> {
    store.list_files().await
}

pub async fn get_file(store: &dyn Store, id: i64) -> Result<FileRecord, SheetgrepError> {
    store
        .get_file(id)
        .await?
        .ok_or(SheetgrepError::NotFound(id))
}

/// Deletes a file and everything it owns.
///
/// Rows go first, then the file record, so a crash in between leaves no row
/// reachable through a live file id. The binary artifact is removed last,
/// best effort: its loss is reported but does not fail the delete.
pub async fn delete_file(
    store: &dyn Store,
    blobs: &BlobStore,
    id: i64,
) -> Result<(), SheetgrepError> {
    let file = get_file(store, id).await?;

    store.delete_rows(id).await?;
    store.delete_file(id).await?;

    if let Err(e) = blobs.delete(&file.storage_path) {
        eprintln!(
            "warning: could not remove artifact {}: {}",
            file.storage_path, e
        );
    }
    Ok(())
}

/// Returns the original uploaded bytes and the name they arrived under.
pub async fn download_file(
    store: &dyn Store,
    blobs: &BlobStore,
    id: i64,
) -> Result<(FileRecord, Vec<u8>), SheetgrepError> {
    let file = get_file(store, id).await?;
    let bytes = blobs.read(&file.storage_path)?;
    Ok((file, bytes))
}

fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_else(|| ts.to_string())
}

/// CLI entry point: lists uploaded files.
pub async fn run_list(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool);
    let files = list_files(&store).await;
    store.close().await;
    let files = files?;

    if files.is_empty() {
        println!("No files uploaded.");
        return Ok(());
    }
    for file in &files {
        println!(
            "{}  {}  (uploaded {})",
            file.id,
            file.original_name,
            format_ts_iso(file.created_at)
        );
    }
    Ok(())
}

/// CLI entry point: deletes a file and its rows.
pub async fn run_delete(config: &Config, id: i64) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool);
    let blobs = BlobStore::new(config.storage.dir.clone());
    let result = delete_file(&store, &blobs, id).await;
    store.close().await;
    result?;
    println!("Deleted file {}.", id);
    Ok(())
}

/// CLI entry point: writes the original workbook bytes back out.
pub async fn run_download(
    config: &Config,
    id: i64,
    output: Option<std::path::PathBuf>,
) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool);
    let blobs = BlobStore::new(config.storage.dir.clone());
    let result = download_file(&store, &blobs, id).await;
    store.close().await;
    let (file, bytes) = result?;

    let target = output.unwrap_or_else(|| std::path::PathBuf::from(&file.original_name));
    std::fs::write(&target, bytes)?;
    println!("Wrote {} to {}.", file.original_name, target.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate::run_migrations;
    use crate::models::{NewFile, NewRow};
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    async fn test_store() -> SqliteStore {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteStore::new(pool)
    }

    #[tokio::test]
    async fn get_unknown_file_is_not_found() {
        let store = test_store().await;
        let err = get_file(&store, 42).await.unwrap_err();
        assert!(matches!(err, SheetgrepError::NotFound(42)));
    }

    #[tokio::test]
    async fn delete_removes_rows_record_and_artifact() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = test_store().await;
        let blobs = BlobStore::new(tmp.path().join("artifacts"));

        let (stored_name, storage_path) = blobs.save(b"bytes").unwrap();
        let file = store
            .insert_file(&NewFile {
                stored_name,
                original_name: "victim.xlsx".to_string(),
                storage_path: storage_path.clone(),
                created_at: 0,
            })
            .await
            .unwrap();
        store
            .insert_rows(&[NewRow {
                file_id: file.id,
                sheet_name: "Sheet1".to_string(),
                row_number: 1,
                cells: vec!["x".to_string()],
                search_text: "x".to_string(),
            }])
            .await
            .unwrap();

        delete_file(&store, &blobs, file.id).await.unwrap();

        let err = get_file(&store, file.id).await.unwrap_err();
        assert!(matches!(err, SheetgrepError::NotFound(_)));
        assert!(store
            .find_rows(&["x".to_string()], 100)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(blobs.size(&storage_path), None);
    }

    #[tokio::test]
    async fn delete_unknown_file_is_not_found() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = test_store().await;
        let blobs = BlobStore::new(tmp.path().join("artifacts"));
        let err = delete_file(&store, &blobs, 7).await.unwrap_err();
        assert!(matches!(err, SheetgrepError::NotFound(7)));
    }

    #[tokio::test]
    async fn delete_survives_missing_artifact() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = test_store().await;
        let blobs = BlobStore::new(tmp.path().join("artifacts"));

        let file = store
            .insert_file(&NewFile {
                stored_name: "phantom".to_string(),
                original_name: "phantom.xlsx".to_string(),
                storage_path: tmp
                    .path()
                    .join("artifacts/phantom")
                    .to_string_lossy()
                    .into_owned(),
                created_at: 0,
            })
            .await
            .unwrap();

        // Artifact never existed; the delete still succeeds.
        delete_file(&store, &blobs, file.id).await.unwrap();
        assert!(store.get_file(file.id).await.unwrap().is_none());
    }
}
