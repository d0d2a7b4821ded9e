pub mod file_watcher;
pub mod pipeline;

pub use file_watcher::{FileChangeEvent, FileWatcher};
pub use pipeline::{Clipboard, Frame, Pipeline};
