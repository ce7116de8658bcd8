//! Object storage access for the workspace.
//!
//! Configuration comes from the environment ([`StorageConfig`]); all
//! remote access goes through [`ObjectStore`]. Nothing here knows about
//! archives or watch roots.

mod config;
mod store;

pub use config::StorageConfig;
pub use store::ObjectStore;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
	#[error("missing or empty configuration value: {0}")]
	MissingConfig(&'static str),
	#[error("object storage error: {0}")]
	Backend(#[from] opendal::Error),
}
