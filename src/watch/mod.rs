//! File system watcher and initial scan for the library roots.
//!
//! Uses the `notify` crate to watch the three configured roots and emit
//! events when media files are added or removed.
//!
//! # Design
//!
//! - **Debounced events**: Multiple rapid changes coalesce into single events
//! - **Media files only**: Filters by extension, video or audio per root
//! - **Hidden paths excluded**: Any dot-prefixed component is ignored, so
//!   editor droppings and partial downloads never reach the engine
//! - **Non-blocking**: Runs on a dedicated thread, sends events via channel
//! - **Graceful shutdown**: Drop the handle to stop watching

use crossbeam_channel::{Receiver, Sender, bounded};
use futures::stream::Stream;
use notify::{
    RecommendedWatcher, RecursiveMode,
    event::{CreateKind, RemoveKind},
};
use notify_debouncer_full::{DebounceEventResult, Debouncer, RecommendedCache, new_debouncer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use walkdir::WalkDir;

use crate::model::MediaKind;
use crate::roots::MediaRoots;

/// Events emitted by the library watcher.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// A media file appeared
    Created(PathBuf),
    /// A media file vanished
    Removed(PathBuf),
    /// A directory appeared (may contain media files; rescan it)
    DirCreated(PathBuf),
    /// An error occurred while watching
    Error(String),
}

/// Handle to a running library watcher.
///
/// Dropping this handle will stop the watcher.
pub struct LibraryWatcher {
    _debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
    running: Arc<AtomicBool>,
}

impl LibraryWatcher {
    /// Watch all three library roots. Returns the watcher handle and a
    /// receiver for watch events.
    pub fn new(roots: &MediaRoots) -> Result<(Self, Receiver<WatchEvent>), WatchError> {
        let (tx, rx) = bounded(256);
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = Arc::clone(&running);
        let filter_roots = roots.clone();

        // Create debouncer with 500ms timeout
        let mut debouncer = new_debouncer(
            Duration::from_millis(500),
            None, // No tick rate limit
            move |result: DebounceEventResult| {
                if !running_clone.load(Ordering::Relaxed) {
                    return;
                }
                handle_debounced_events(result, &filter_roots, &tx);
            },
        )
        .map_err(|e| WatchError::Init(e.to_string()))?;

        for root in roots.all() {
            tracing::info!(target: "watch", path = %root.display(), "Watching directory");
            debouncer
                .watch(root, RecursiveMode::Recursive)
                .map_err(|e| WatchError::Watch(e.to_string()))?;
        }

        Ok((
            Self {
                _debouncer: debouncer,
                running,
            },
            rx,
        ))
    }
}

impl Drop for LibraryWatcher {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        tracing::debug!(target: "watch", "Library watcher stopped");
    }
}

/// Handle debounced events from notify.
fn handle_debounced_events(
    result: DebounceEventResult,
    roots: &MediaRoots,
    tx: &Sender<WatchEvent>,
) {
    match result {
        Ok(events) => {
            for event in events {
                for path in &event.paths {
                    let watch_event = match event.kind {
                        notify::EventKind::Create(CreateKind::File) => {
                            if is_media_file(path, roots) {
                                tracing::debug!(target: "watch", path = %path.display(), "File created");
                                Some(WatchEvent::Created(path.clone()))
                            } else {
                                None
                            }
                        }
                        notify::EventKind::Create(CreateKind::Folder) => {
                            if hidden_within_root(path, roots) {
                                None
                            } else {
                                tracing::debug!(target: "watch", path = %path.display(), "Directory created");
                                Some(WatchEvent::DirCreated(path.clone()))
                            }
                        }
                        notify::EventKind::Remove(RemoveKind::File) => {
                            // The file is gone; judge by path shape alone
                            if is_media_file(path, roots) {
                                tracing::debug!(target: "watch", path = %path.display(), "File removed");
                                Some(WatchEvent::Removed(path.clone()))
                            } else {
                                None
                            }
                        }
                        _ => None,
                    };

                    if let Some(evt) = watch_event {
                        let _ = tx.try_send(evt);
                    }
                }
            }
        }
        Err(errors) => {
            for error in errors {
                tracing::warn!(target: "watch", error = %error, "Watch error");
                let _ = tx.try_send(WatchEvent::Error(error.to_string()));
            }
        }
    }
}

/// Walk all three roots and stream the media files currently on disk.
///
/// This seeds the engine's live set before the watcher takes over; the same
/// hidden-path and extension filters apply so the snapshot and the event
/// stream agree on what counts. The traversal runs on a blocking task and
/// stops early if the receiver is dropped.
pub fn scan_roots(roots: &MediaRoots) -> impl Stream<Item = String> {
    let (tx, rx) = mpsc::channel(100);
    let roots = roots.clone();

    tokio::task::spawn_blocking(move || {
        for root in roots.all().map(Path::to_path_buf) {
            for entry in WalkDir::new(&root)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                if is_media_file(entry.path(), &roots)
                    && tx
                        .blocking_send(entry.path().to_string_lossy().into_owned())
                        .is_err()
                {
                    return;
                }
            }
        }
    });

    futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|path| (path, rx))
    })
}

/// Walk one directory for media files (used when a directory appears under
/// a watched root after startup).
pub fn scan_dir(dir: &Path, roots: &MediaRoots) -> Vec<String> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_media_file(e.path(), roots))
        .map(|e| e.path().to_string_lossy().into_owned())
        .collect()
}

/// Check whether a path is a media file for the root it falls under:
/// video extensions under the movie and TV roots, audio under the music
/// root. Hidden paths never qualify.
pub fn is_media_file(path: &Path, roots: &MediaRoots) -> bool {
    if hidden_within_root(path, roots) {
        return false;
    }
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let ext = ext.to_lowercase();
    match roots.classify(path) {
        Some(MediaKind::Movie) | Some(MediaKind::TvEpisode) => {
            matches!(ext.as_str(), "mkv" | "mp4" | "avi" | "m4v" | "webm")
        }
        Some(MediaKind::Song) => {
            matches!(ext.as_str(), "mp3" | "flac" | "ogg" | "wav" | "m4a")
        }
        None => false,
    }
}

/// A dot-prefixed component below the library root hides the whole path.
/// The root's own ancestry is not inspected, so libraries may live under
/// dotted directories.
fn hidden_within_root(path: &Path, roots: &MediaRoots) -> bool {
    let Some(kind) = roots.classify(path) else {
        return false;
    };
    let Ok(rel) = path.strip_prefix(roots.root_for(kind)) else {
        return false;
    };
    rel.components().any(|c| {
        c.as_os_str()
            .to_str()
            .map(|s| s.starts_with('.'))
            .unwrap_or(false)
    })
}

/// Errors that can occur during file watching.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WatchError {
    #[error("Failed to initialize watcher: {0}")]
    Init(String),
    #[error("Failed to watch path: {0}")]
    Watch(String),
}
