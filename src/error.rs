use std::path::PathBuf;

use halftone_core::{
    CurveError, HalftoneError, ParseColorError, ParseSelectorError, RasterError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Render error: {0}")]
    Render(#[from] HalftoneError),

    #[error("No source image loaded")]
    NoSource,

    #[error("Screen #{0} not found")]
    ScreenNotFound(u32),

    #[error("No free screen index left")]
    IndicesExhausted,

    #[error("Clipboard is empty")]
    EmptyClipboard,

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),
}

/// Errors reading, writing or validating a project file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Project size must be positive")]
    ZeroSize,

    #[error("Duplicate screen index {0}")]
    DuplicateIndex(u32),

    #[error("Screen #{index}: {source}")]
    UnknownShape {
        index: u32,
        #[source]
        source: ParseSelectorError,
    },

    #[error("Screen #{index}: {source}")]
    UnknownChannel {
        index: u32,
        #[source]
        source: ParseSelectorError,
    },

    #[error("Output: {0}")]
    UnknownBlendMode(#[source] ParseSelectorError),

    #[error("Invalid color {value:?} for {field}: {source}")]
    InvalidColor {
        field: String,
        value: String,
        #[source]
        source: ParseColorError,
    },

    #[error("Screen #{index} tone curve: {source}")]
    ToneCurve {
        index: u32,
        #[source]
        source: CurveError,
    },

    #[error("Invalid {field} in {scope}: {value}")]
    InvalidValue {
        scope: String,
        field: &'static str,
        value: f64,
    },

    #[error("Rejected {scope}: {source}")]
    Rejected {
        scope: String,
        #[source]
        source: HalftoneError,
    },
}

/// Errors decoding or preparing a source image.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG decode error: {0}")]
    Decode(String),

    #[error("Unsupported PNG format: {0}")]
    Unsupported(String),

    #[error("Image has zero size: {width}x{height}")]
    Empty { width: u32, height: u32 },

    #[error("Failed to allocate {width}x{height} pixmap")]
    PixmapAllocation { width: u32, height: u32 },
}

/// Errors producing an export PNG.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Export scale must be at least 1, got {0}")]
    InvalidScale(u32),

    #[error("Cannot scale output: {0}")]
    Scale(#[from] RasterError),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
