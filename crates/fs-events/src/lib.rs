//! Platform-agnostic directory watcher that emits normalized events.
//!
//! The notify backend delivers raw events on its own thread; the
//! callback only forwards normalized events into an unbounded channel,
//! so delivery is never blocked on a consumer.

mod event;

pub use event::{FsEvent, FsEventKind};

use async_channel as chan;
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, trace};

#[derive(Error, Debug)]
pub enum WatcherError {
    #[error("watch root does not exist or is not a directory: {0}")]
    InvalidRoot(PathBuf),
    #[error("watcher backend error: {0}")]
    Notify(#[from] notify::Error),
}

pub type Result<T> = std::result::Result<T, WatcherError>;

/// Watches a directory tree and delivers normalized create/modify events.
///
/// Dropping the watcher stops the backend and closes the event channel.
#[derive(Debug)]
pub struct FsEventWatcher {
    root: PathBuf,
    watcher: RecommendedWatcher,
    events_rx: chan::Receiver<FsEvent>,
}

impl FsEventWatcher {
    /// Start watching `root`. The root must already exist and be a
    /// directory; a missing root is a hard error, not something we
    /// retry our way out of.
    pub fn new(root: impl AsRef<Path>, recursive: bool) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(WatcherError::InvalidRoot(root));
        }

        let (events_tx, events_rx) = chan::unbounded();

        let mut watcher = RecommendedWatcher::new(
            move |result: notify::Result<notify::Event>| match result {
                Ok(raw) => {
                    for event in FsEvent::from_notify(&raw) {
                        // SAFETY: we are not blocking the backend thread as this
                        // is an unbounded channel
                        if events_tx.send_blocking(event).is_err() {
                            error!("Tried to send filesystem event to a closed channel;");
                            return;
                        }
                    }
                }
                Err(e) => error!(?e, "Watcher backend error;"),
            },
            Config::default(),
        )?;

        let mode = if recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher.watch(&root, mode)?;

        trace!(root = %root.display(), "Now watching root");

        Ok(Self {
            root,
            watcher,
            events_rx,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Receiver for the normalized event stream.
    pub fn events(&self) -> chan::Receiver<FsEvent> {
        self.events_rx.clone()
    }

    /// Stop delivering events for the root. Usually unnecessary, as
    /// dropping the watcher has the same effect.
    pub fn unwatch(&mut self) -> Result<()> {
        self.watcher.unwatch(&self.root)?;
        Ok(())
    }
}
