//! Change batching
//!
//! Decouples fast, frequent filesystem events from slower, batched
//! remote uploads. Changed paths accumulate in a [`PendingChanges`]
//! set; on a fixed interval the [`ChangeBatcher`] snapshots the set,
//! packs the files into a zip bundle and hands it to an [`UploadSink`].
//! Pending entries are only cleared once the sink accepts the bundle,
//! so a failed upload is retried on the next non-empty cycle.

pub mod bundle;

mod batcher;
mod pending;
mod service;
mod sink;

pub use batcher::{ChangeBatcher, FlushOutcome};
pub use pending::PendingChanges;
pub use service::ChangeBatcherService;
pub use sink::{UploadError, UploadSink};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatcherError {
	#[error("I/O error while building bundle: {0}")]
	Io(#[from] std::io::Error),
	#[error("archive write error: {0}")]
	Zip(#[from] zip::result::ZipError),
	#[error("upload failed: {0}")]
	Upload(#[from] UploadError),
	#[error(transparent)]
	Watcher(#[from] skiff_fs_events::WatcherError),
}
