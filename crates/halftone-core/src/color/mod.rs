//! Color types used by layers, the sampler and the compositor.
//!
//! - [`Rgb`]: 8-bit ink and background colors, parsed from hex strings.
//! - [`Hsl`]: derived hue/saturation/lightness for channel sampling.

mod hsl;
mod rgb;

pub use hsl::Hsl;
pub use rgb::Rgb;

/// Error returned when a hex color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseColorError {
    /// Wrong number of hex digits (must be 3 or 6 after stripping '#')
    #[error("invalid hex color length (expected 3 or 6 digits): {0:?}")]
    InvalidLength(String),
    /// A character that is not a hexadecimal digit
    #[error("invalid hex digit in color: {0:?}")]
    InvalidHex(String),
}
