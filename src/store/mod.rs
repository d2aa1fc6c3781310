//! Persistence of fetched content.
//!
//! [`FileStore`] writes each item to `<base-dir>/<YYYY-MM-DD>/<uuid>.txt`.

mod error;
mod file;

use std::path::PathBuf;

use async_trait::async_trait;

pub use error::StoreError;
pub use file::{FileStore, SNAPSHOT_EXTENSION, date_partition};

/// Persists one content item and reports where it landed.
#[async_trait]
pub trait Store: Send + Sync {
    /// Writes `content` byte for byte to a new, uniquely named location.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the location cannot be created or written.
    async fn persist(&self, content: &[u8]) -> Result<PathBuf, StoreError>;
}
