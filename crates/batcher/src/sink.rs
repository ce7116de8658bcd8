//! Upload sink seam
//!
//! The batcher only needs "put these bytes at this key"; everything
//! else about the remote side lives behind this trait, which also
//! keeps the flush logic testable without a real bucket.

use async_trait::async_trait;
use skiff_storage::{ObjectStore, StorageError};
use thiserror::Error;

/// Error surfaced by an upload sink. Deliberately opaque: the batcher
/// reacts to every upload failure the same way, by keeping the batch
/// pending.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct UploadError(pub String);

impl From<StorageError> for UploadError {
	fn from(e: StorageError) -> Self {
		Self(e.to_string())
	}
}

/// Destination for finished archive bundles.
#[async_trait]
pub trait UploadSink: Send + Sync {
	async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), UploadError>;
}

#[async_trait]
impl UploadSink for ObjectStore {
	async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), UploadError> {
		self.put_object(key, bytes).await.map_err(Into::into)
	}
}
