use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::traits::ImageStore;

/// Filesystem-backed image store.
///
/// Uploads land in `{root}/{upload_dir}/{uuid}.{ext}`; the path handed back to
/// callers is `{upload_dir}/{uuid}.{ext}` with forward slashes.
pub struct FilesystemImageStore {
    root: PathBuf,
    upload_dir: String,
    max_size: u64,
}

impl FilesystemImageStore {
    /// Create a new filesystem image store, creating the upload directory.
    pub async fn new(
        root: PathBuf,
        upload_dir: impl Into<String>,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        let upload_dir = upload_dir.into().trim_matches('/').to_string();
        if upload_dir.is_empty() {
            return Err(StorageError::InvalidPath(upload_dir));
        }
        let store = Self {
            root,
            upload_dir,
            max_size,
        };
        // Validates the configured sub-directory as a side effect.
        let dir = store.resolve(&store.upload_dir)?;
        fs::create_dir_all(&dir).await?;
        Ok(store)
    }

    /// Path for a temporary file during writes. Hidden, so never resolvable.
    fn temp_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!(".{}.part", uuid::Uuid::new_v4().simple()))
    }
}

/// Lowercase and check an extension supplied by a caller.
fn normalize_extension(extension: &str) -> Result<String, StorageError> {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();
    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(StorageError::InvalidPath(format!("*.{extension}")));
    }
    Ok(ext)
}

#[async_trait]
impl ImageStore for FilesystemImageStore {
    async fn store(&self, data: &[u8], extension: &str) -> Result<String, StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let ext = normalize_extension(extension)?;
        let dir = self.root.join(&self.upload_dir);
        // The directory may have been removed since startup.
        fs::create_dir_all(&dir).await?;

        let file_name = format!("{}.{ext}", uuid::Uuid::new_v4().simple());
        let final_path = dir.join(&file_name);
        let temp_path = self.temp_path(&dir);

        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        tracing::debug!(path = %final_path.display(), size = data.len(), "Stored image");
        Ok(format!("{}/{file_name}", self.upload_dir))
    }

    async fn read(&self, relative_path: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.resolve(relative_path)?;
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(relative_path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, relative_path: &str) -> Result<bool, StorageError> {
        let path = self.resolve(relative_path)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn resolve(&self, relative_path: &str) -> Result<PathBuf, StorageError> {
        let invalid = || StorageError::InvalidPath(relative_path.to_string());

        if relative_path.trim().is_empty()
            || relative_path.contains('\\')
            || relative_path.contains('\0')
        {
            return Err(invalid());
        }

        let mut resolved = self.root.clone();
        for component in Path::new(relative_path).components() {
            match component {
                Component::Normal(part) => {
                    let part = part.to_str().ok_or_else(invalid)?;
                    if part.starts_with('.') {
                        return Err(invalid());
                    }
                    resolved.push(part);
                }
                _ => return Err(invalid()),
            }
        }

        Ok(resolved)
    }
}
