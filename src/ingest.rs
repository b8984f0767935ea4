//! Upload pipeline orchestration.
//!
//! One upload runs to completion inside its request: duplicate check, parse,
//! binary save, file record, then batched row inserts. A parse failure or
//! duplicate persists nothing; a persistence failure mid-batch aborts the
//! upload and the caller must not assume partial indexing succeeded.

use anyhow::Result;

use crate::blob::BlobStore;
use crate::config::Config;
use crate::db;
use crate::error::SheetgrepError;
use crate::index::index_sheets;
use crate::models::NewFile;
use crate::sqlite_store::SqliteStore;
use crate::store::Store;
use crate::workbook::parse_workbook;

/// What one successful upload produced.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub file_id: i64,
    pub original_name: String,
    pub sheets: usize,
    pub rows_indexed: u64,
}

/// Rejects an upload whose (original name, byte size) pair matches an
/// existing file. Name+size is a heuristic identity check, not a content
/// hash; two distinct files sharing both are indistinguishable here.
async fn check_duplicate(
    store: &dyn Store,
    blobs: &BlobStore,
    original_name: &str,
    byte_len: u64,
) -> Result<(), SheetgrepError> {
    for existing in store.list_files().await? {
        if existing.original_name == original_name
            && blobs.size(&existing.storage_path) == Some(byte_len)
        {
            return Err(SheetgrepError::DuplicateUpload {
                name: original_name.to_string(),
            });
        }
    }
    Ok(())
}

/// Ingests one workbook: on success the file and all of its rows are
/// findable; on failure the incoming bytes are discarded.
pub async fn ingest_workbook(
    config: &Config,
    store: &dyn Store,
    blobs: &BlobStore,
    original_name: &str,
    bytes: &[u8],
) -> Result<UploadOutcome, SheetgrepError> {
    check_duplicate(store, blobs, original_name, bytes.len() as u64).await?;

    // Parse before anything is persisted so an unreadable workbook leaves
    // no trace.
    let sheets = parse_workbook(bytes)?;

    let (stored_name, storage_path) = blobs.save(bytes)?;
    let file = store
        .insert_file(&NewFile {
            stored_name,
            original_name: original_name.to_string(),
            storage_path,
            created_at: chrono::Utc::now().timestamp(),
        })
        .await?;

    let rows = index_sheets(file.id, &sheets, &config.dates);
    let total = rows.len() as u64;
    for batch in rows.chunks(config.ingest.batch_size) {
        store.insert_rows(batch).await?;
    }

    Ok(UploadOutcome {
        file_id: file.id,
        original_name: original_name.to_string(),
        sheets: sheets.len(),
        rows_indexed: total,
    })
}

/// CLI entry point: uploads a workbook from the local filesystem.
pub async fn run_upload(config: &Config, path: &std::path::Path) -> Result<()> {
    let bytes = std::fs::read(path)?;
    let original_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool);
    let blobs = BlobStore::new(config.storage.dir.clone());

    let outcome = ingest_workbook(config, &store, &blobs, &original_name, &bytes).await;
    store.close().await;

    let outcome = outcome?;
    println!("upload {}", outcome.original_name);
    println!("  file id: {}", outcome.file_id);
    println!("  sheets: {}", outcome.sheets);
    println!("  rows indexed: {}", outcome.rows_indexed);
    println!("ok");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate::run_migrations;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::io::Write;
    use std::str::FromStr;

    fn test_config(tmp: &tempfile::TempDir) -> Config {
        let body = format!(
            r#"
[db]
path = "{0}/data/sheetgrep.sqlite"

[storage]
dir = "{0}/artifacts"

[server]
bind = "127.0.0.1:0"

[ingest]
batch_size = 2
"#,
            tmp.path().display()
        );
        let path = tmp.path().join("sheetgrep.toml");
        std::fs::write(&path, body).unwrap();
        crate::config::load_config(&path).unwrap()
    }

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

    fn tiny_workbook(cell_text: &str) -> Vec<u8> {
        let workbook = r#"<?xml version="1.0"?>
<workbook xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#;
        let rels = r#"<?xml version="1.0"?>
<Relationships>
  <Relationship Id="rId1" Target="worksheets/sheet1.xml"/>
</Relationships>"#;
        let sheet = format!(
            r#"<?xml version="1.0"?>
<worksheet><sheetData>
  <row r="1"><c r="A1" t="inlineStr"><is><t>{}</t></is></c></row>
  <row r="2"><c r="A2"><v>41</v></c></row>
  <row r="3"><c r="A3"><v>42</v></c></row>
</sheetData></worksheet>"#,
            cell_text
        );

        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
            for (name, body) in [
                ("xl/workbook.xml", workbook),
                ("xl/_rels/workbook.xml.rels", rels),
                ("xl/worksheets/sheet1.xml", sheet.as_str()),
            ] {
                zip.start_file(name, zip::write::SimpleFileOptions::default())
                    .unwrap();
                zip.write_all(body.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buf
    }

    #[tokio::test]
    async fn upload_indexes_rows_across_batches() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = test_config(&tmp);
        let store = test_store().await;
        let blobs = BlobStore::new(config.storage.dir.clone());

        let bytes = tiny_workbook("hello world");
        let outcome = ingest_workbook(&config, &store, &blobs, "demo.xlsx", &bytes)
            .await
            .unwrap();

        // Three rows through batch_size 2 exercises the chunk boundary.
        assert_eq!(outcome.rows_indexed, 3);
        assert_eq!(outcome.sheets, 1);

        let hits = store.find_rows(&["hello".to_string()], 100).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].original_name, "demo.xlsx");

        let file = store.get_file(outcome.file_id).await.unwrap().unwrap();
        assert_eq!(blobs.read(&file.storage_path).unwrap(), bytes);
    }

    #[tokio::test]
    async fn same_name_and_size_is_rejected_as_duplicate() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = test_config(&tmp);
        let store = test_store().await;
        let blobs = BlobStore::new(config.storage.dir.clone());

        let bytes = tiny_workbook("duplicated");
        ingest_workbook(&config, &store, &blobs, "dup.xlsx", &bytes)
            .await
            .unwrap();

        let err = ingest_workbook(&config, &store, &blobs, "dup.xlsx", &bytes)
            .await
            .unwrap_err();
        assert!(matches!(err, SheetgrepError::DuplicateUpload { .. }));

        // One file, one artifact: the rejected bytes were discarded.
        assert_eq!(store.list_files().await.unwrap().len(), 1);
        assert_eq!(std::fs::read_dir(blobs.dir()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn different_name_or_size_is_accepted() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = test_config(&tmp);
        let store = test_store().await;
        let blobs = BlobStore::new(config.storage.dir.clone());

        let bytes = tiny_workbook("original");
        ingest_workbook(&config, &store, &blobs, "a.xlsx", &bytes)
            .await
            .unwrap();

        // Same bytes under another name.
        ingest_workbook(&config, &store, &blobs, "b.xlsx", &bytes)
            .await
            .unwrap();

        // Same name with different content length.
        let longer = tiny_workbook("original plus a little more");
        ingest_workbook(&config, &store, &blobs, "a.xlsx", &longer)
            .await
            .unwrap();

        assert_eq!(store.list_files().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn unreadable_workbook_persists_nothing() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = test_config(&tmp);
        let store = test_store().await;
        let blobs = BlobStore::new(config.storage.dir.clone());

        let err = ingest_workbook(&config, &store, &blobs, "junk.xlsx", b"not a workbook")
            .await
            .unwrap_err();
        assert!(matches!(err, SheetgrepError::Parse(_)));

        assert!(store.list_files().await.unwrap().is_empty());
        assert!(!blobs.dir().exists() || std::fs::read_dir(blobs.dir()).unwrap().count() == 0);
    }

    #[tokio::test]
    async fn reingesting_identical_bytes_yields_identical_rows() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = test_config(&tmp);
        let store = test_store().await;
        let blobs = BlobStore::new(config.storage.dir.clone());

        let bytes = tiny_workbook("stable");
        let first = ingest_workbook(&config, &store, &blobs, "one.xlsx", &bytes)
            .await
            .unwrap();
        let second = ingest_workbook(&config, &store, &blobs, "two.xlsx", &bytes)
            .await
            .unwrap();

        let rows_a = store.rows_for_file(first.file_id).await.unwrap();
        let rows_b = store.rows_for_file(second.file_id).await.unwrap();
        assert_eq!(rows_a.len(), rows_b.len());
        for (a, b) in rows_a.iter().zip(rows_b.iter()) {
            assert_eq!(a.sheet_name, b.sheet_name);
            assert_eq!(a.row_number, b.row_number);
            assert_eq!(a.cells, b.cells);
            assert_eq!(a.search_text, b.search_text);
        }
    }
}
