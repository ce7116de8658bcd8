//! Normalized filesystem events
//!
//! Backends disagree on event granularity: inotify reports separate
//! create/data/metadata events, FSEvents coalesces, Windows splits
//! renames. Everything is flattened here into plain create/modify
//! events so consumers never see backend-specific kinds.

use notify::event::{CreateKind, ModifyKind};
use notify::{Event, EventKind};
use std::path::PathBuf;
use std::time::SystemTime;

/// Kind of a normalized filesystem event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsEventKind {
    /// A file or directory was created
    Created,
    /// A file's content or metadata changed
    Modified,
}

impl FsEventKind {
    pub fn is_create(&self) -> bool {
        matches!(self, FsEventKind::Created)
    }

    pub fn is_modify(&self) -> bool {
        matches!(self, FsEventKind::Modified)
    }
}

/// A normalized filesystem event for a single path.
#[derive(Debug, Clone)]
pub struct FsEvent {
    pub path: PathBuf,
    pub kind: FsEventKind,
    pub is_directory: bool,
    pub timestamp: SystemTime,
}

impl FsEvent {
    pub fn created(path: PathBuf, is_directory: bool) -> Self {
        Self {
            path,
            kind: FsEventKind::Created,
            is_directory,
            timestamp: SystemTime::now(),
        }
    }

    pub fn modified(path: PathBuf, is_directory: bool) -> Self {
        Self {
            path,
            kind: FsEventKind::Modified,
            is_directory,
            timestamp: SystemTime::now(),
        }
    }

    /// Normalize a raw notify event into zero or more `FsEvent`s.
    ///
    /// Remove, access and rename events are dropped: the consumers of
    /// this crate only react to files coming into existence or being
    /// rewritten in place.
    pub fn from_notify(event: &Event) -> Vec<FsEvent> {
        match &event.kind {
            EventKind::Create(kind) => event
                .paths
                .iter()
                .map(|path| {
                    let is_directory = match kind {
                        CreateKind::Folder => true,
                        CreateKind::File => false,
                        // CreateKind::Any and friends don't say; ask the filesystem
                        _ => path.is_dir(),
                    };
                    FsEvent::created(path.clone(), is_directory)
                })
                .collect(),
            EventKind::Modify(ModifyKind::Name(_)) => vec![],
            EventKind::Modify(_) => event
                .paths
                .iter()
                .map(|path| FsEvent::modified(path.clone(), path.is_dir()))
                .collect(),
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{DataChange, MetadataKind, RenameMode};

    #[test]
    fn test_create_file_event() {
        let raw = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/watched/a.txt"));

        let events = FsEvent::from_notify(&raw);
        assert_eq!(events.len(), 1);
        assert!(events[0].kind.is_create());
        assert!(!events[0].is_directory);
        assert_eq!(events[0].path, PathBuf::from("/watched/a.txt"));
    }

    #[test]
    fn test_create_folder_event() {
        let raw = Event::new(EventKind::Create(CreateKind::Folder))
            .add_path(PathBuf::from("/watched/subdir"));

        let events = FsEvent::from_notify(&raw);
        assert_eq!(events.len(), 1);
        assert!(events[0].kind.is_create());
        assert!(events[0].is_directory);
    }

    #[test]
    fn test_data_modify_event() {
        let raw = Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(PathBuf::from("/watched/a.txt"));

        let events = FsEvent::from_notify(&raw);
        assert_eq!(events.len(), 1);
        assert!(events[0].kind.is_modify());
    }

    #[test]
    fn test_metadata_modify_event() {
        let raw = Event::new(EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any)))
            .add_path(PathBuf::from("/watched/a.txt"));

        let events = FsEvent::from_notify(&raw);
        assert_eq!(events.len(), 1);
        assert!(events[0].kind.is_modify());
    }

    #[test]
    fn test_rename_event_is_dropped() {
        let raw = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
            .add_path(PathBuf::from("/watched/old.txt"))
            .add_path(PathBuf::from("/watched/new.txt"));

        assert!(FsEvent::from_notify(&raw).is_empty());
    }

    #[test]
    fn test_remove_event_is_dropped() {
        let raw = Event::new(EventKind::Remove(notify::event::RemoveKind::File))
            .add_path(PathBuf::from("/watched/a.txt"));

        assert!(FsEvent::from_notify(&raw).is_empty());
    }

    #[test]
    fn test_multi_path_event_fans_out() {
        let raw = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/watched/a.txt"))
            .add_path(PathBuf::from("/watched/b.txt"));

        let events = FsEvent::from_notify(&raw);
        assert_eq!(events.len(), 2);
    }
}
