//! Date-partitioned file store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::Store;
use super::error::StoreError;

/// Extension used for persisted snapshots.
pub const SNAPSHOT_EXTENSION: &str = "txt";

/// Returns the partition directory name for a date (`YYYY-MM-DD`).
#[must_use]
pub fn date_partition(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Stores each content item as its own file under a per-day directory.
///
/// Filenames are random v4 UUIDs and files are opened with create-new
/// semantics, so an existing snapshot is never overwritten.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `base_dir`. The directory is created lazily.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Returns the base directory.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns today's partition directory (local time).
    #[must_use]
    pub fn partition_dir(&self) -> PathBuf {
        self.base_dir
            .join(date_partition(Local::now().date_naive()))
    }
}

#[async_trait]
impl Store for FileStore {
    #[instrument(level = "debug", skip(self, content), fields(bytes = content.len()))]
    async fn persist(&self, content: &[u8]) -> Result<PathBuf, StoreError> {
        let folder = self.partition_dir();
        fs::create_dir_all(&folder)
            .await
            .map_err(|e| StoreError::io(folder.clone(), e))?;

        let file_path = folder.join(format!("{}.{SNAPSHOT_EXTENSION}", Uuid::new_v4()));
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&file_path)
            .await
            .map_err(|e| StoreError::io(file_path.clone(), e))?;

        file.write_all(content)
            .await
            .map_err(|e| StoreError::io(file_path.clone(), e))?;
        file.flush()
            .await
            .map_err(|e| StoreError::io(file_path.clone(), e))?;

        debug!(path = %file_path.display(), "snapshot written");
        Ok(file_path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_date_partition_format() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(date_partition(date), "2024-03-07");
    }

    #[tokio::test]
    async fn test_persist_valid_content_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        let content = b"This is some test content.";

        let path = store.persist(content).await.unwrap();

        let expected_folder = temp_dir
            .path()
            .join(date_partition(Local::now().date_naive()));
        assert!(expected_folder.is_dir());
        assert!(path.starts_with(&expected_folder));
        assert_eq!(
            path.extension().and_then(|e| e.to_str()),
            Some(SNAPSHOT_EXTENSION)
        );
        assert_eq!(std::fs::read(&path).unwrap(), content);
    }

    #[tokio::test]
    async fn test_persist_writes_non_utf8_bytes_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        let raw: [u8; 8] = [0x63, 0x61, 0x66, 0xe9, 0x0a, 0xff, 0x00, 0x41];

        let path = store.persist(&raw).await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), raw);
    }

    #[tokio::test]
    async fn test_persist_empty_content_creates_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        let path = store.persist(b"").await.unwrap();

        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_persist_same_content_twice_yields_distinct_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        let first = store.persist(b"same").await.unwrap();
        let second = store.persist(b"same").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(std::fs::read_to_string(&first).unwrap(), "same");
        assert_eq!(std::fs::read_to_string(&second).unwrap(), "same");
    }

    #[tokio::test]
    async fn test_persist_base_dir_is_a_file_returns_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"occupied").unwrap();
        let store = FileStore::new(&blocker);

        let result = store.persist(b"content").await;

        match result {
            Err(StoreError::Io { path, .. }) => assert!(path.starts_with(&blocker)),
            other => panic!("Expected Io error, got: {:?}", other),
        }
    }
}
