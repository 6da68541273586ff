use async_trait::async_trait;
use axum::body::Bytes;

use crate::core::error::Result;

/// A file ready to be written to storage
#[derive(Debug, Clone)]
pub struct StoreRequest {
    /// Object key relative to the storage root, e.g. `inspections/<id>/exterior/<uuid>.jpg`
    pub key: String,
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Where a stored file ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub url: String,
    pub size: i64,
    pub mime_type: String,
    pub name: String,
}

/// Storage backend for inspection attachments.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Persist the file and return a retrievable URL.
    async fn store(&self, request: StoreRequest) -> Result<StoredFile>;

    /// Remove a previously stored file by the URL `store` returned.
    async fn delete(&self, url: &str) -> Result<()>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}
