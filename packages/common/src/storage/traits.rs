use std::path::PathBuf;

use async_trait::async_trait;

use super::error::StorageError;

/// Directory-backed storage for uploaded item images.
///
/// Images are addressed by a path relative to the store root (for example
/// `uploads/0f3c...e1.png`). That relative path is what gets persisted on the
/// item row and what the static route serves.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist `data` under a freshly generated file name with the given
    /// extension and return its relative path.
    async fn store(&self, data: &[u8], extension: &str) -> Result<String, StorageError>;

    /// Read the full contents of a stored image.
    async fn read(&self, relative_path: &str) -> Result<Vec<u8>, StorageError>;

    /// Remove a stored image.
    ///
    /// Returns `true` if the file was removed, `false` if it did not exist.
    async fn remove(&self, relative_path: &str) -> Result<bool, StorageError>;

    /// Map a relative path onto the filesystem, rejecting paths that would
    /// escape the store root.
    fn resolve(&self, relative_path: &str) -> Result<PathBuf, StorageError>;
}
