//! The check-and-upload cycle

use crate::bundle;
use crate::{BatcherError, PendingChanges, UploadError, UploadSink};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, trace};

/// Accumulates changed files and ships them as one bundle per flush.
///
/// Two states: idle (empty pending set) and pending-flush. A recorded
/// change moves it to pending-flush; a successful flush back to idle; a
/// failed flush keeps the batch for the next cycle.
pub struct ChangeBatcher<S> {
	root: PathBuf,
	pending: PendingChanges,
	sink: S,
	destination_key: String,
	upload_timeout: Option<Duration>,
}

/// What a single flush cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
	/// Nothing pending, nothing uploaded
	Idle,
	/// A bundle was uploaded and its entries cleared
	Uploaded { files: usize, bytes: u64 },
}

impl<S: UploadSink> ChangeBatcher<S> {
	/// `key_prefix` and `bundle_name` compose the destination key as
	/// `<prefix>/<name>`.
	pub fn new(
		root: impl Into<PathBuf>,
		sink: S,
		key_prefix: &str,
		bundle_name: &str,
	) -> Self {
		Self {
			root: root.into(),
			pending: PendingChanges::new(),
			sink,
			destination_key: format!("{}/{}", key_prefix.trim_matches('/'), bundle_name),
			upload_timeout: None,
		}
	}

	/// Bound the time a single upload may take. Unset by default.
	pub fn with_upload_timeout(mut self, timeout: Duration) -> Self {
		self.upload_timeout = Some(timeout);
		self
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn destination_key(&self) -> &str {
		&self.destination_key
	}

	/// Record a changed file. Cheap enough for the event delivery path:
	/// one set insert under the lock, nothing else.
	pub async fn record(&self, path: PathBuf) {
		if self.pending.record(path.clone()).await {
			trace!(path = %path.display(), "Recorded pending change");
		}
	}

	pub async fn pending_len(&self) -> usize {
		self.pending.len().await
	}

	/// One check-and-upload step.
	///
	/// Empty pending set: no bundle is built and no upload happens.
	/// Otherwise the set is snapshotted under the lock, the bundle is
	/// built and uploaded outside it, and only a successful upload
	/// clears the snapshotted entries. Anything recorded mid-upload
	/// stays pending for the next cycle.
	pub async fn flush_cycle(&self) -> Result<FlushOutcome, BatcherError> {
		let snapshot = self.pending.snapshot().await;
		if snapshot.is_empty() {
			return Ok(FlushOutcome::Idle);
		}

		let bundle = bundle::build(&self.root, &snapshot)?;

		// Vanished files have no upload obligation left
		if !bundle.missing.is_empty() {
			self.pending.remove(bundle.missing.iter()).await;
		}

		if bundle.bundled.is_empty() {
			debug!("Every snapshotted file vanished before the point read, skipping upload");
			return Ok(FlushOutcome::Idle);
		}

		let files = bundle.bundled.len();
		let bytes = bundle.bytes.len() as u64;

		self.upload(bundle.bytes).await?;

		self.pending.remove(bundle.bundled.iter()).await;

		info!(files, bytes, key = %self.destination_key, "Uploaded change bundle");

		Ok(FlushOutcome::Uploaded { files, bytes })
	}

	async fn upload(&self, bytes: Vec<u8>) -> Result<(), BatcherError> {
		match self.upload_timeout {
			Some(timeout) => tokio::time::timeout(timeout, self.sink.put(&self.destination_key, bytes))
				.await
				.map_err(|_| {
					UploadError(format!("upload timed out after {}s", timeout.as_secs_f64()))
				})??,
			None => self.sink.put(&self.destination_key, bytes).await?,
		}
		Ok(())
	}
}
