//! Pending change set
//!
//! Shared between the event path and the flush tick, so every access
//! goes through the lock. The lock is only ever held for set
//! operations, never across bundle building or uploads.

use std::collections::HashSet;
use std::path::PathBuf;
use tokio::sync::RwLock;

/// Paths changed since the last successful flush.
#[derive(Debug, Default)]
pub struct PendingChanges {
	paths: RwLock<HashSet<PathBuf>>,
}

impl PendingChanges {
	pub fn new() -> Self {
		Self::default()
	}

	/// Record a changed path. Recording the same path twice before a
	/// flush has the same effect as once. Returns whether the path was
	/// newly recorded.
	pub async fn record(&self, path: PathBuf) -> bool {
		self.paths.write().await.insert(path)
	}

	pub async fn is_empty(&self) -> bool {
		self.paths.read().await.is_empty()
	}

	pub async fn len(&self) -> usize {
		self.paths.read().await.len()
	}

	/// Point-in-time copy of the set, sorted so bundles built from it
	/// are deterministic.
	pub async fn snapshot(&self) -> Vec<PathBuf> {
		let mut snapshot = self
			.paths
			.read()
			.await
			.iter()
			.cloned()
			.collect::<Vec<_>>();
		snapshot.sort();
		snapshot
	}

	/// Forget exactly `paths`. Entries recorded after a snapshot was
	/// taken are untouched, so nothing recorded during an upload can be
	/// lost.
	pub async fn remove<'a>(&self, paths: impl IntoIterator<Item = &'a PathBuf>) {
		let mut guard = self.paths.write().await;
		for path in paths {
			guard.remove(path);
		}
	}
}
