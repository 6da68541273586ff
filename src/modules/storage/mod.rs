//! Attachment storage
//!
//! Uploaded inspection files go through [`StorageBackend`]. Two interchangeable
//! implementations exist: local disk and a MinIO/S3-compatible bucket.

mod backend;
mod local;
mod minio_client;

pub use backend::{StorageBackend, StoreRequest, StoredFile};
pub use local::{LocalDiskStorage, LOCAL_UPLOADS_ROUTE};
pub use minio_client::MinIOClient;
