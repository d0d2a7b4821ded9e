//! Per-layer screen parameters.

use crate::api::HalftoneError;
use crate::color::Rgb;
use crate::sampler::Channel;

use super::DotShape;

/// Configuration of one halftone screen.
///
/// # Defaults
///
/// - Angle: 30°
/// - Grid size: 16 px
/// - Dot-size ratio: 1
/// - Interlaced, enabled, circle dots in black, darkness channel
///
/// # Example
///
/// ```
/// use halftone_core::{Channel, DotShape, Rgb, ScreenOptions};
///
/// let cyan = ScreenOptions::new()
///     .angle(15.0)
///     .grid_size(8.0)
///     .shape(DotShape::Euclidean)
///     .channel(Channel::Cyan)
///     .color(Rgb::new(0, 255, 255));
/// assert!(cyan.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenOptions {
    /// Grid rotation in degrees.
    pub angle_degrees: f64,
    /// Side of one grid cell in pixels. Zero disables the layer.
    pub grid_size: f64,
    /// Dot size relative to the cell. Zero disables the layer.
    pub raster_size: f64,
    /// Stroke each cell outline in black before drawing its dot.
    pub show_grid: bool,
    /// Shift odd rows by half a cell.
    pub interlaced: bool,
    pub shape: DotShape,
    /// Squash rows together by the dot-size ratio so dots touch vertically.
    /// `offset_y` is ignored while collapsed.
    pub collapsed: bool,
    /// Ink color.
    pub color: Rgb,
    pub channel: Channel,
    /// Whether the layer contributes to the output.
    pub enabled: bool,
    /// Invert the intensity after the tone curve.
    pub negative: bool,
    /// Horizontal grid shift as a fraction of a cell.
    pub offset_x: f64,
    /// Vertical grid shift as a fraction of a cell.
    pub offset_y: f64,
}

impl Default for ScreenOptions {
    fn default() -> Self {
        Self {
            angle_degrees: 30.0,
            grid_size: 16.0,
            raster_size: 1.0,
            show_grid: false,
            interlaced: true,
            shape: DotShape::Circle,
            collapsed: false,
            color: Rgb::BLACK,
            channel: Channel::Darkness,
            enabled: true,
            negative: false,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl ScreenOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn angle(mut self, degrees: f64) -> Self {
        self.angle_degrees = degrees;
        self
    }

    #[inline]
    pub fn grid_size(mut self, size: f64) -> Self {
        self.grid_size = size;
        self
    }

    #[inline]
    pub fn raster_size(mut self, ratio: f64) -> Self {
        self.raster_size = ratio;
        self
    }

    #[inline]
    pub fn show_grid(mut self, enabled: bool) -> Self {
        self.show_grid = enabled;
        self
    }

    #[inline]
    pub fn interlaced(mut self, enabled: bool) -> Self {
        self.interlaced = enabled;
        self
    }

    #[inline]
    pub fn shape(mut self, shape: DotShape) -> Self {
        self.shape = shape;
        self
    }

    #[inline]
    pub fn collapsed(mut self, enabled: bool) -> Self {
        self.collapsed = enabled;
        self
    }

    #[inline]
    pub fn color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    #[inline]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[inline]
    pub fn negative(mut self, enabled: bool) -> Self {
        self.negative = enabled;
        self
    }

    /// Set the grid offset in cell fractions.
    #[inline]
    pub fn offset(mut self, x: f64, y: f64) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    /// Rotation in radians.
    #[inline]
    pub fn angle_radians(&self) -> f64 {
        self.angle_degrees / 180.0 * std::f64::consts::PI
    }

    /// Whether a pass would draw anything at all.
    pub fn is_active(&self) -> bool {
        self.enabled && self.raster_size != 0.0 && self.grid_size > 0.0
    }

    /// Reject non-finite numbers and negative sizes.
    pub fn validate(&self) -> Result<(), HalftoneError> {
        let finite = [
            ("angle_degree", self.angle_degrees),
            ("offset_x", self.offset_x),
            ("offset_y", self.offset_y),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(HalftoneError::InvalidParameter { name, value });
            }
        }

        let non_negative = [
            ("grid_size", self.grid_size),
            ("raster_size", self.raster_size),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(HalftoneError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let opts = ScreenOptions::default();
        assert_eq!(opts.angle_degrees, 30.0);
        assert_eq!(opts.grid_size, 16.0);
        assert_eq!(opts.raster_size, 1.0);
        assert!(opts.interlaced);
        assert!(opts.enabled);
        assert!(!opts.collapsed);
        assert_eq!(opts.shape, DotShape::Circle);
        assert_eq!(opts.color, Rgb::BLACK);
        assert_eq!(opts.channel, Channel::Darkness);
    }

    #[test]
    fn test_inactive_states() {
        assert!(ScreenOptions::new().is_active());
        assert!(!ScreenOptions::new().enabled(false).is_active());
        assert!(!ScreenOptions::new().raster_size(0.0).is_active());
        assert!(!ScreenOptions::new().grid_size(0.0).is_active());
    }

    #[test]
    fn test_validate_rejects_bad_numbers() {
        assert!(ScreenOptions::new().grid_size(-1.0).validate().is_err());
        assert!(ScreenOptions::new().raster_size(f64::INFINITY).validate().is_err());
        assert!(ScreenOptions::new().angle(f64::NAN).validate().is_err());
        assert!(ScreenOptions::new().offset(0.5, -0.25).validate().is_ok());
    }

    #[test]
    fn test_angle_radians() {
        let opts = ScreenOptions::new().angle(180.0);
        assert!((opts.angle_radians() - std::f64::consts::PI).abs() < 1e-12);
    }
}
