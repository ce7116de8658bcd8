//! Archive bundle building
//!
//! One zip bundle is built in memory per flush and consumed by the
//! upload immediately after. Entry names are relative to the watch
//! root, so the bundle is reproducible regardless of where the root
//! lives on disk.

use crate::BatcherError;
use std::io::{Cursor, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A finished bundle plus the bookkeeping the flush cycle needs.
pub struct Bundle {
	/// The zip container, ready to upload
	pub bytes: Vec<u8>,
	/// Paths that made it into the bundle
	pub bundled: Vec<PathBuf>,
	/// Paths that vanished before the point read; their upload
	/// obligation is void
	pub missing: Vec<PathBuf>,
}

/// Pack `paths` into a zip bundle with entry names relative to `root`.
///
/// Files that can't be read are dropped from this bundle only: a
/// vanished file is reported in [`Bundle::missing`], any other read
/// failure is logged and the path is left out so it is retried on the
/// next cycle.
pub fn build(root: &Path, paths: &[PathBuf]) -> Result<Bundle, BatcherError> {
	let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
	let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

	let mut bundled = Vec::new();
	let mut missing = Vec::new();

	for path in paths {
		let Ok(relative) = path.strip_prefix(root) else {
			warn!(
				path = %path.display(),
				root = %root.display(),
				"Recorded path is outside the watch root, skipping;"
			);
			continue;
		};

		let bytes = match std::fs::read(path) {
			Ok(bytes) => bytes,
			Err(e) if e.kind() == ErrorKind::NotFound => {
				debug!(path = %path.display(), "File vanished before the point read");
				missing.push(path.clone());
				continue;
			}
			Err(e) => {
				warn!(
					path = %path.display(),
					?e,
					"Failed to read changed file, will retry next flush;"
				);
				continue;
			}
		};

		writer.start_file(entry_name(relative), options)?;
		writer.write_all(&bytes)?;
		bundled.push(path.clone());
	}

	let cursor = writer.finish()?;

	Ok(Bundle {
		bytes: cursor.into_inner(),
		bundled,
		missing,
	})
}

/// Zip entry names always use forward slashes, whatever the platform.
fn entry_name(relative: &Path) -> String {
	relative
		.components()
		.map(|c| c.as_os_str().to_string_lossy())
		.collect::<Vec<_>>()
		.join("/")
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Read;
	use tempfile::TempDir;
	use zip::ZipArchive;

	fn open(bundle: &Bundle) -> ZipArchive<Cursor<&[u8]>> {
		ZipArchive::new(Cursor::new(bundle.bytes.as_slice())).unwrap()
	}

	#[test]
	fn test_entries_are_relative_to_root() {
		let root = TempDir::new().unwrap();
		let nested = root.path().join("a");
		std::fs::create_dir(&nested).unwrap();
		let file = nested.join("b.txt");
		std::fs::write(&file, b"nested content").unwrap();

		let bundle = build(root.path(), &[file.clone()]).unwrap();
		assert_eq!(bundle.bundled, vec![file.clone()]);

		let mut archive = open(&bundle);
		let mut entry = archive.by_name("a/b.txt").expect("relative entry name");
		let mut content = String::new();
		entry.read_to_string(&mut content).unwrap();
		assert_eq!(content, "nested content");
		drop(entry);

		assert!(archive.by_name(&file.to_string_lossy()).is_err());
	}

	#[test]
	fn test_vanished_file_is_reported_missing() {
		let root = TempDir::new().unwrap();
		let real = root.path().join("real.txt");
		std::fs::write(&real, b"here").unwrap();
		let gone = root.path().join("gone.txt");

		let bundle = build(root.path(), &[gone.clone(), real.clone()]).unwrap();
		assert_eq!(bundle.bundled, vec![real]);
		assert_eq!(bundle.missing, vec![gone]);

		let archive = open(&bundle);
		assert_eq!(archive.len(), 1);
	}

	#[test]
	fn test_path_outside_root_is_skipped() {
		let root = TempDir::new().unwrap();
		let elsewhere = TempDir::new().unwrap();
		let outside = elsewhere.path().join("outside.txt");
		std::fs::write(&outside, b"nope").unwrap();

		let bundle = build(root.path(), &[outside]).unwrap();
		assert!(bundle.bundled.is_empty());
		assert!(bundle.missing.is_empty());
	}

	#[test]
	fn test_empty_input_builds_empty_bundle() {
		let root = TempDir::new().unwrap();
		let bundle = build(root.path(), &[]).unwrap();
		assert!(bundle.bundled.is_empty());
		assert_eq!(open(&bundle).len(), 0);
	}
}
