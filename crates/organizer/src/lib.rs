//! Date-folder organizer
//!
//! Sorts the files sitting directly in a directory into `YYYY-MM-DD`
//! folders named after each file's modification time. Non-recursive:
//! subdirectories (including previously created date folders) are left
//! alone. Files whose extension is not in the supported set are
//! skipped, and per-file failures leave the file in place while the run
//! continues.

use chrono::{DateTime, Local};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Extension set of the file types worth sorting, matched
/// case-insensitively.
pub const DEFAULT_EXTENSIONS: &[&str] = &["pdf", "jpeg", "jpg", "mp4", "doc", "docx", "txt"];

#[derive(Error, Debug)]
pub enum OrganizeError {
	#[error("not a directory: {0}")]
	InvalidRoot(PathBuf),
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

/// Moves supported files of one directory into date-named folders.
#[derive(Debug)]
pub struct Organizer {
	root: PathBuf,
	extensions: Vec<String>,
}

/// What one run did, file by file.
#[derive(Debug, Default)]
pub struct OrganizeReport {
	/// (source, destination) for each file moved
	pub moved: Vec<(PathBuf, PathBuf)>,
	/// Files left alone because their extension isn't supported
	pub skipped: usize,
	/// Files that hit an error and were left in place
	pub failed: usize,
}

impl Organizer {
	pub fn new(root: impl Into<PathBuf>) -> Result<Self, OrganizeError> {
		let root = root.into();
		if !root.is_dir() {
			return Err(OrganizeError::InvalidRoot(root));
		}
		Ok(Self {
			root,
			extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
		})
	}

	/// Replace the supported extension set.
	pub fn with_extensions<I, T>(mut self, extensions: I) -> Self
	where
		I: IntoIterator<Item = T>,
		T: AsRef<str>,
	{
		self.extensions = extensions
			.into_iter()
			.map(|e| e.as_ref().to_ascii_lowercase())
			.collect();
		self
	}

	/// Sort every supported file into its date folder.
	pub fn organize(&self) -> Result<OrganizeReport, OrganizeError> {
		let mut report = OrganizeReport::default();

		for entry in std::fs::read_dir(&self.root)? {
			let path = match entry {
				Ok(entry) => entry.path(),
				Err(e) => {
					warn!(?e, "Unreadable directory entry;");
					report.failed += 1;
					continue;
				}
			};

			if !path.is_file() {
				continue;
			}

			if !self.is_supported(&path) {
				debug!(path = %path.display(), "Unsupported extension, skipping");
				report.skipped += 1;
				continue;
			}

			match self.move_into_date_folder(&path) {
				Ok(destination) => {
					info!(
						from = %path.display(),
						to = %destination.display(),
						"Moved file into date folder"
					);
					report.moved.push((path, destination));
				}
				Err(e) => {
					warn!(path = %path.display(), ?e, "Failed to organize file, leaving in place;");
					report.failed += 1;
				}
			}
		}

		Ok(report)
	}

	fn is_supported(&self, path: &Path) -> bool {
		path.extension()
			.and_then(|ext| ext.to_str())
			.map(|ext| self.extensions.iter().any(|e| e == &ext.to_ascii_lowercase()))
			.unwrap_or(false)
	}

	fn move_into_date_folder(&self, path: &Path) -> Result<PathBuf, OrganizeError> {
		let modified = path.metadata()?.modified()?;
		let folder_name = DateTime::<Local>::from(modified)
			.format("%Y-%m-%d")
			.to_string();

		let folder = self.root.join(folder_name);
		std::fs::create_dir_all(&folder)?;

		let name = path
			.file_name()
			.ok_or_else(|| std::io::Error::new(ErrorKind::InvalidInput, "path has no file name"))?;
		let destination = folder.join(name);
		std::fs::rename(path, &destination)?;

		Ok(destination)
	}
}
