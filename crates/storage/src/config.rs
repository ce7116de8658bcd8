//! Env-driven storage configuration
//!
//! All values are opaque inputs; we only check that the required ones
//! are present and non-empty before handing them to the backend.

use crate::StorageError;

pub const BUCKET_NAME: &str = "BUCKET_NAME";
pub const ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const REGION: &str = "AWS_DEFAULT_REGION";
pub const ENDPOINT_URL: &str = "AWS_ENDPOINT_URL";

/// Connection settings for the object store.
#[derive(Debug, Clone)]
pub struct StorageConfig {
	pub bucket: String,
	pub region: String,
	pub access_key_id: String,
	pub secret_access_key: String,
	/// Custom endpoint, for S3-compatible services and test stacks
	pub endpoint: Option<String>,
}

impl StorageConfig {
	/// Load from process environment variables.
	pub fn from_env() -> Result<Self, StorageError> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Load from an arbitrary key/value lookup. Separated from
	/// [`Self::from_env`] so validation can be tested without touching
	/// process-global state.
	pub fn from_lookup(
		lookup: impl Fn(&str) -> Option<String>,
	) -> Result<Self, StorageError> {
		Ok(Self {
			bucket: required(&lookup, BUCKET_NAME)?,
			region: required(&lookup, REGION)?,
			access_key_id: required(&lookup, ACCESS_KEY_ID)?,
			secret_access_key: required(&lookup, SECRET_ACCESS_KEY)?,
			endpoint: lookup(ENDPOINT_URL).filter(|v| !v.trim().is_empty()),
		})
	}
}

fn required(
	lookup: impl Fn(&str) -> Option<String>,
	key: &'static str,
) -> Result<String, StorageError> {
	match lookup(key) {
		Some(value) if !value.trim().is_empty() => Ok(value),
		_ => Err(StorageError::MissingConfig(key)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	fn full_vars() -> HashMap<String, String> {
		vars(&[
			(BUCKET_NAME, "my-bucket"),
			(REGION, "ap-south-1"),
			(ACCESS_KEY_ID, "AKIA123"),
			(SECRET_ACCESS_KEY, "secret"),
		])
	}

	#[test]
	fn test_full_config_loads() {
		let vars = full_vars();
		let config = StorageConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();
		assert_eq!(config.bucket, "my-bucket");
		assert_eq!(config.region, "ap-south-1");
		assert!(config.endpoint.is_none());
	}

	#[test]
	fn test_missing_bucket_is_rejected() {
		let mut vars = full_vars();
		vars.remove(BUCKET_NAME);
		let err = StorageConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
		assert!(matches!(err, StorageError::MissingConfig(BUCKET_NAME)));
	}

	#[test]
	fn test_blank_credential_is_rejected() {
		let mut vars = full_vars();
		vars.insert(SECRET_ACCESS_KEY.to_string(), "   ".to_string());
		let err = StorageConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
		assert!(matches!(err, StorageError::MissingConfig(SECRET_ACCESS_KEY)));
	}

	#[test]
	fn test_optional_endpoint_is_picked_up() {
		let mut vars = full_vars();
		vars.insert(ENDPOINT_URL.to_string(), "http://localhost:9000".to_string());
		let config = StorageConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();
		assert_eq!(config.endpoint.as_deref(), Some("http://localhost:9000"));
	}
}
