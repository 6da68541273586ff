use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::backend::{StorageBackend, StoreRequest, StoredFile};
use crate::core::error::{AppError, Result};

/// URL path under which the router serves the upload directory
pub const LOCAL_UPLOADS_ROUTE: &str = "/uploads";

/// Filesystem storage backend.
///
/// Files live under `root/<key>` and are served at `<public_base_url>/uploads/<key>`.
pub struct LocalDiskStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalDiskStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root directory if missing
    pub async fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::Storage(format!(
                "Failed to create upload directory {}: {}",
                self.root.display(),
                e
            ))
        })
    }

    fn url_prefix(&self) -> String {
        format!("{}{}/", self.public_base_url, LOCAL_UPLOADS_ROUTE)
    }

    /// Resolve a key to a path under root, refusing anything that escapes it
    fn path_for_key(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe || key.is_empty() {
            return Err(AppError::Storage(format!("Invalid storage key '{}'", key)));
        }
        Ok(self.root.join(relative))
    }

    fn key_from_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(&self.url_prefix())
    }
}

async fn write_then_rename(temp_path: &Path, full_path: &Path, data: &[u8]) -> Result<()> {
    let mut file = fs::File::create(temp_path)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to create file: {}", e)))?;
    file.write_all(data)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to write file: {}", e)))?;
    file.sync_all()
        .await
        .map_err(|e| AppError::Storage(format!("Failed to sync file: {}", e)))?;
    drop(file);

    fs::rename(temp_path, full_path).await.map_err(|e| {
        warn!(from = %temp_path.display(), to = %full_path.display(), error = %e, "local_storage: rename failed");
        AppError::Storage(format!("Failed to finalize file: {}", e))
    })
}

#[async_trait]
impl StorageBackend for LocalDiskStorage {
    async fn store(&self, request: StoreRequest) -> Result<StoredFile> {
        let full_path = self.path_for_key(&request.key)?;
        debug!(key = %request.key, size = request.data.len(), "local_storage: write");

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                warn!(parent = %parent.display(), error = %e, "local_storage: create_dir_all failed");
                AppError::Storage(format!("Failed to create directory: {}", e))
            })?;
        }

        // Atomic write: temp file + rename
        let temp_path = full_path.with_extension("tmp");
        if let Err(e) = write_then_rename(&temp_path, &full_path, &request.data).await {
            if let Err(cleanup) = fs::remove_file(&temp_path).await {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %temp_path.display(), error = %cleanup, "local_storage: temp cleanup failed");
                }
            }
            return Err(e);
        }

        Ok(StoredFile {
            url: format!("{}{}", self.url_prefix(), request.key),
            size: request.data.len() as i64,
            mime_type: request.content_type,
            name: request.file_name,
        })
    }

    async fn delete(&self, url: &str) -> Result<()> {
        let key = self
            .key_from_url(url)
            .ok_or_else(|| AppError::Storage(format!("URL '{}' is not a local upload", url)))?;
        let full_path = self.path_for_key(key)?;

        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(key = %key, "local_storage: deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to delete '{}': {}",
                key, e
            ))),
        }
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
