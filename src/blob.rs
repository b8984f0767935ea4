//! Directory-backed byte store for the original workbook binaries.
//!
//! Uploaded bytes are kept verbatim under a generated name so they can be
//! re-exported later; the relational store only carries the path.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::SheetgrepError;

pub struct BlobStore {
    dir: PathBuf,
}

impl BlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Writes the bytes under a fresh stored name and returns
    /// `(stored_name, storage_path)`.
    pub fn save(&self, bytes: &[u8]) -> Result<(String, String), SheetgrepError> {
        fs::create_dir_all(&self.dir)?;
        let stored_name = Uuid::new_v4().to_string();
        let path = self.dir.join(&stored_name);
        fs::write(&path, bytes)?;
        Ok((stored_name, path.to_string_lossy().into_owned()))
    }

    pub fn read(&self, storage_path: &str) -> Result<Vec<u8>, SheetgrepError> {
        Ok(fs::read(storage_path)?)
    }

    /// Byte size of a stored artifact, or `None` when it no longer exists.
    pub fn size(&self, storage_path: &str) -> Option<u64> {
        fs::metadata(storage_path).ok().map(|m| m.len())
    }

    pub fn delete(&self, storage_path: &str) -> Result<(), SheetgrepError> {
        fs::remove_file(storage_path)?;
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_read_delete_roundtrip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let blobs = BlobStore::new(tmp.path().join("artifacts"));

        let (stored_name, path) = blobs.save(b"workbook bytes").unwrap();
        assert!(!stored_name.is_empty());
        assert_eq!(blobs.read(&path).unwrap(), b"workbook bytes");
        assert_eq!(blobs.size(&path), Some(14));

        blobs.delete(&path).unwrap();
        assert_eq!(blobs.size(&path), None);
        assert!(blobs.read(&path).is_err());
    }

    #[test]
    fn stored_names_are_unique() {
        let tmp = tempfile::TempDir::new().unwrap();
        let blobs = BlobStore::new(tmp.path().join("artifacts"));
        let (a, _) = blobs.save(b"same").unwrap();
        let (b, _) = blobs.save(b"same").unwrap();
        assert_ne!(a, b);
    }
}
