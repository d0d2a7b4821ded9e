//! Unified error type for the halftone-core public API.
//!
//! [`HalftoneError`] wraps every error the crate can produce so that
//! application code can propagate them with `?`.

use crate::color::ParseColorError;
use crate::compose::ComposeError;
use crate::curve::CurveError;
use crate::output::RasterError;

/// An unrecognised selector name (shape, channel or blend mode).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} {value:?}, expected one of: {expected}")]
pub struct ParseSelectorError {
    /// What was being parsed, e.g. `"dot style"`
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
    /// Comma-separated list of accepted names
    pub expected: String,
}

impl ParseSelectorError {
    pub(crate) fn new(kind: &'static str, value: &str, names: &[&str]) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected: names.join(", "),
        }
    }
}

/// Unified error type for the halftone-core public API.
///
/// # Example
///
/// ```
/// use halftone_core::{HalftoneError, Rgb};
///
/// fn ink(hex: &str) -> Result<Rgb, HalftoneError> {
///     Ok(hex.parse::<Rgb>()?)
/// }
///
/// assert!(ink("#00ff00").is_ok());
/// assert!(ink("green").is_err());
/// ```
#[derive(Debug, thiserror::Error)]
pub enum HalftoneError {
    /// Tone curve construction failed
    #[error("tone curve error: {0}")]
    Curve(#[from] CurveError),
    /// Color parsing error (invalid hex string)
    #[error("color parse error: {0}")]
    ParseColor(#[from] ParseColorError),
    /// Unknown shape, channel or blend mode name
    #[error(transparent)]
    Selector(#[from] ParseSelectorError),
    /// Pixel buffer error
    #[error("raster error: {0}")]
    Raster(#[from] RasterError),
    /// Layer buffers do not match the output
    #[error("compose error: {0}")]
    Compose(#[from] ComposeError),
    /// A numeric parameter is negative, zero where it must not be, or not finite
    #[error("invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}
