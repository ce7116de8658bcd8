//! Walks the object store through its basic operations: access check,
//! upload, list, overwrite, stat, dated-prefix copies, delete.
//!
//! Needs `BUCKET_NAME`, `AWS_DEFAULT_REGION`, `AWS_ACCESS_KEY_ID` and
//! `AWS_SECRET_ACCESS_KEY` in the environment (or a `.env` file), plus
//! an optional directory argument whose supported files get copied
//! under a dated `pictures/` prefix.
//!
//! ```sh
//! cargo run -p skiff-storage --example object_ops -- ~/Pictures
//! ```

use anyhow::Context;
use skiff_storage::{ObjectStore, StorageConfig};
use std::path::Path;
use tracing::{info, warn};

const SAMPLE_KEY: &str = "documents/sample.txt";
const SAMPLE_CONTENT: &[u8] = b"Hello, object storage!";
const UPDATED_CONTENT: &[u8] = b"Hello, updated object storage!";
const SUPPORTED_EXT: &[&str] = &["pdf", "jpeg", "jpg", "mp4", "doc", "docx", "txt"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	dotenvy::dotenv().ok();
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
		)
		.init();

	let config = StorageConfig::from_env().context("loading storage configuration")?;
	let store = ObjectStore::new(&config)?;

	store.check().await.context("bucket is not reachable")?;
	info!(bucket = store.bucket(), "Bucket reachable");

	store.put_object(SAMPLE_KEY, SAMPLE_CONTENT.to_vec()).await?;
	info!(key = SAMPLE_KEY, "Uploaded sample object");

	let keys = store.list_objects("documents").await?;
	info!(?keys, "Objects under documents/");

	store
		.put_object(SAMPLE_KEY, UPDATED_CONTENT.to_vec())
		.await?;
	let size = store.object_size(SAMPLE_KEY).await?;
	info!(key = SAMPLE_KEY, size, "Overwrote sample object");

	if let Some(dir) = std::env::args().nth(1) {
		upload_supported_files(&store, Path::new(&dir)).await?;
	}

	store.delete_object(SAMPLE_KEY).await?;
	info!(key = SAMPLE_KEY, "Deleted sample object");

	let keys = store.list_objects("").await?;
	info!(?keys, "Remaining objects");

	Ok(())
}

/// Copy every supported file in `dir` under `pictures/<today>/`.
async fn upload_supported_files(store: &ObjectStore, dir: &Path) -> anyhow::Result<()> {
	let today = chrono::Local::now().format("%Y-%m-%d");
	let prefix = format!("pictures/{today}");

	for entry in std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
		let path = entry?.path();
		if !path.is_file() {
			continue;
		}

		let supported = path
			.extension()
			.and_then(|ext| ext.to_str())
			.map(|ext| SUPPORTED_EXT.contains(&ext.to_ascii_lowercase().as_str()))
			.unwrap_or(false);
		if !supported {
			warn!(path = %path.display(), "Unsupported extension, skipping");
			continue;
		}

		let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
			continue;
		};
		let key = format!("{prefix}/{name}");
		let bytes = std::fs::read(&path)?;
		store.put_object(&key, bytes).await?;
		info!(from = %path.display(), key, "Copied file to dated prefix");
	}

	Ok(())
}
