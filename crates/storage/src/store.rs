//! Object store wrapper
//!
//! Keeps the opendal surface contained to this module so the rest of
//! the workspace deals in keys and byte buffers only.

use crate::{StorageConfig, StorageError};
use opendal::{services::S3, Operator};
use tracing::{debug, instrument};

/// Handle to a single bucket of the configured object storage service.
#[derive(Clone)]
pub struct ObjectStore {
	operator: Operator,
	bucket: String,
}

impl ObjectStore {
	pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
		let mut builder = S3::default()
			.bucket(&config.bucket)
			.region(&config.region)
			.access_key_id(&config.access_key_id)
			.secret_access_key(&config.secret_access_key);

		if let Some(endpoint) = &config.endpoint {
			builder = builder.endpoint(endpoint);
		}

		Ok(Self {
			operator: Operator::new(builder)?.finish(),
			bucket: config.bucket.clone(),
		})
	}

	pub fn bucket(&self) -> &str {
		&self.bucket
	}

	/// Verify the bucket is reachable with the configured credentials.
	pub async fn check(&self) -> Result<(), StorageError> {
		self.operator.check().await?;
		Ok(())
	}

	/// Write (or overwrite) the object at `key`.
	#[instrument(skip(self, bytes), fields(bucket = %self.bucket, key, len = bytes.len()))]
	pub async fn put_object(&self, key: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
		self.operator.write(key, bytes).await?;
		debug!("Object written");
		Ok(())
	}

	#[instrument(skip(self), fields(bucket = %self.bucket, key))]
	pub async fn get_object(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		let buffer = self.operator.read(key).await?;
		Ok(buffer.to_vec())
	}

	/// Keys of all objects under `prefix`.
	#[instrument(skip(self), fields(bucket = %self.bucket, prefix))]
	pub async fn list_objects(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
		let prefix = if prefix.is_empty() || prefix.ends_with('/') {
			prefix.to_string()
		} else {
			format!("{prefix}/")
		};

		let entries = self.operator.list(&prefix).await?;
		Ok(entries
			.into_iter()
			.filter(|entry| !entry.path().ends_with('/'))
			.map(|entry| entry.path().to_string())
			.collect())
	}

	#[instrument(skip(self), fields(bucket = %self.bucket, key))]
	pub async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
		self.operator.delete(key).await?;
		debug!("Object deleted");
		Ok(())
	}

	/// Size in bytes of the object at `key`.
	pub async fn object_size(&self, key: &str) -> Result<u64, StorageError> {
		let meta = self.operator.stat(key).await?;
		Ok(meta.content_length())
	}
}

impl std::fmt::Debug for ObjectStore {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ObjectStore")
			.field("bucket", &self.bucket)
			.finish()
	}
}
