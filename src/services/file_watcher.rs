//! File watcher for the project config.
//!
//! Watches the directory containing the project file (editors usually
//! replace files rather than write in place) and reports debounced batches
//! of changes to that one file.
//!
//! The CLI is synchronous, so there is no async runtime here: `notify`
//! forwards raw events over a `std::sync::mpsc` channel to a plain thread
//! that does the debouncing, and [`FileWatcher::recv`] blocks on a second
//! channel.

use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::error::AppError;

/// Quiet period that closes a batch of changes.
pub const DEBOUNCE: Duration = Duration::from_millis(200);

/// Event sent when the watched file changes
#[derive(Debug, Clone)]
pub struct FileChangeEvent {
    /// Paths that changed
    pub paths: Vec<PathBuf>,
}

/// Watches a single project file.
pub struct FileWatcher {
    receiver: mpsc::Receiver<FileChangeEvent>,
    /// Handle to the watcher (kept alive)
    _watcher: RecommendedWatcher,
    path: PathBuf,
}

impl FileWatcher {
    /// Start watching `path`.
    pub fn new(path: &Path) -> Result<Self, AppError> {
        let file_name = path
            .file_name()
            .map(OsString::from)
            .ok_or_else(|| notify::Error::path_not_found().add_path(path.to_path_buf()))?;
        let directory = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (raw_tx, raw_rx) = mpsc::channel::<PathBuf>();
        let (tx, receiver) = mpsc::channel::<FileChangeEvent>();
        thread::spawn(move || debounce(raw_rx, tx));

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<notify::Event, notify::Error>| match res {
                Ok(event) if !event.kind.is_access() => {
                    for path in event.paths {
                        if path.file_name() == Some(file_name.as_os_str()) {
                            let _ = raw_tx.send(path);
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "File watcher error"),
            },
            Config::default(),
        )?;
        watcher.watch(&directory, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %path.display(), "File watcher started");
        Ok(Self {
            receiver,
            _watcher: watcher,
            path: path.to_path_buf(),
        })
    }

    /// The watched file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Block until the next batch of changes. `None` once the watcher
    /// has shut down.
    pub fn recv(&self) -> Option<FileChangeEvent> {
        self.receiver.recv().ok()
    }

    /// Like [`recv`](Self::recv) but gives up after `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<FileChangeEvent> {
        self.receiver.recv_timeout(timeout).ok()
    }
}

/// Collect raw paths until [`DEBOUNCE`] passes without a new one, then send
/// the batch.
fn debounce(raw: mpsc::Receiver<PathBuf>, sender: mpsc::Sender<FileChangeEvent>) {
    while let Ok(first) = raw.recv() {
        let mut pending = HashSet::from([first]);
        loop {
            match raw.recv_timeout(DEBOUNCE) {
                Ok(path) => {
                    pending.insert(path);
                }
                Err(mpsc::RecvTimeoutError::Timeout) => break,
                Err(mpsc::RecvTimeoutError::Disconnected) => return,
            }
        }
        let paths: Vec<PathBuf> = pending.into_iter().collect();
        tracing::debug!(paths = ?paths, "Files changed (debounced)");
        if sender.send(FileChangeEvent { paths }).is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debounce_merges_burst() {
        let (raw_tx, raw_rx) = mpsc::channel();
        let (tx, rx) = mpsc::channel();
        let handle = thread::spawn(move || debounce(raw_rx, tx));

        for _ in 0..5 {
            raw_tx.send(PathBuf::from("project.json")).unwrap();
        }
        raw_tx.send(PathBuf::from("other/project.json")).unwrap();

        let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        let mut paths = event.paths;
        paths.sort();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("other/project.json"),
                PathBuf::from("project.json")
            ]
        );

        drop(raw_tx);
        handle.join().unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_watch_missing_directory_fails() {
        let result = FileWatcher::new(Path::new("/nonexistent/halftone/project.json"));
        assert!(result.is_err());
    }
}
