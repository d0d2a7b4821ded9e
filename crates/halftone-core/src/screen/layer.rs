//! The per-layer rasterization engine.

use crate::api::HalftoneError;
use crate::color::Rgb;
use crate::curve::ToneCurve;
use crate::geometry::{rotate_about, rotated_square, Point};
use crate::output::{Canvas, Raster};
use crate::sampler::IntensitySampler;

use super::{CellMetrics, ScreenOptions};

/// Offset added to the grid on every animation tick, in cell fractions.
pub const ANIMATION_STEP: f64 = 0.01;

/// One halftone screen: options, tone curve, animation state and the
/// private pixel buffer it renders into.
///
/// # Example
///
/// ```
/// use halftone_core::{IntensitySampler, Raster, ScreenLayer, ScreenOptions};
///
/// let source = Raster::filled(32, 32, [0, 0, 0, 255]);
/// let sampler = IntensitySampler::new(source).unwrap();
///
/// let mut layer = ScreenLayer::new(0, ScreenOptions::new().grid_size(8.0)).unwrap();
/// let buffer = layer.render(&sampler).unwrap();
/// assert_eq!((buffer.width(), buffer.height()), (32, 32));
/// assert!(!buffer.is_transparent());
/// ```
#[derive(Debug, Clone)]
pub struct ScreenLayer {
    index: u32,
    options: ScreenOptions,
    tone_curve: ToneCurve,
    animation_offset: f64,
    animated: bool,
    buffer: Raster,
}

impl ScreenLayer {
    /// Create a layer with the identity tone curve.
    pub fn new(index: u32, options: ScreenOptions) -> Result<Self, HalftoneError> {
        options.validate()?;
        Ok(Self {
            index,
            options,
            tone_curve: ToneCurve::identity(),
            animation_offset: 0.0,
            animated: false,
            buffer: Raster::default(),
        })
    }

    /// Set the tone curve (builder form).
    pub fn with_tone_curve(mut self, curve: ToneCurve) -> Self {
        self.tone_curve = curve;
        self
    }

    /// Stable identifier within a project.
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[inline]
    pub fn options(&self) -> &ScreenOptions {
        &self.options
    }

    /// Replace the options. Invalid options leave the layer unchanged.
    pub fn set_options(&mut self, options: ScreenOptions) -> Result<(), HalftoneError> {
        options.validate()?;
        self.options = options;
        Ok(())
    }

    #[inline]
    pub fn tone_curve(&self) -> &ToneCurve {
        &self.tone_curve
    }

    pub fn set_tone_curve(&mut self, curve: ToneCurve) {
        self.tone_curve = curve;
    }

    /// Whether a pass draws anything.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.options.is_active()
    }

    /// The buffer produced by the last [`render`](Self::render).
    #[inline]
    pub fn buffer(&self) -> &Raster {
        &self.buffer
    }

    /// Centre of grid cell `(row, col)` in image space for a
    /// `width × height` source.
    ///
    /// Rows and columns may be fractional; the grid walk starts at
    /// `−height/grid` which is rarely an integer.
    pub fn cell_center(&self, row: f64, col: f64, width: u32, height: u32) -> Point {
        let opts = &self.options;
        let grid = opts.grid_size;
        let center = Point::new(f64::from(width) / 2.0, f64::from(height) / 2.0);

        let y_base = if opts.collapsed {
            row * grid * opts.raster_size + 0.5 * grid * opts.raster_size
        } else {
            row * grid + 0.5 * grid + opts.offset_y * grid
        };
        let mut x_base = col * grid + 0.5 * grid + (opts.offset_x + self.animation_offset) * grid;
        if opts.interlaced {
            // Remainder keeps the sign of `row`: row -1 shifts left
            x_base += row % 2.0 * 0.5 * grid;
        }

        rotate_about(Point::new(x_base, y_base), center, opts.angle_radians())
    }

    /// Tone-mapped, clamped and optionally negated intensity at `(x, y)`.
    pub fn intensity_at(&self, sampler: &IntensitySampler, x: f64, y: f64) -> f64 {
        let raw = sampler.sample(x, y, self.options.channel);
        let mapped = self.tone_curve.evaluate(raw);
        let clamped = if mapped.is_nan() {
            0.0
        } else {
            mapped.clamp(0.0, 1.0)
        };
        if self.options.negative {
            1.0 - clamped
        } else {
            clamped
        }
    }

    /// Rasterize the layer for the sampler's current image.
    ///
    /// The buffer is resized to the source resolution and fully overwritten.
    /// Inactive layers produce a transparent buffer.
    pub fn render(&mut self, sampler: &IntensitySampler) -> Result<&Raster, HalftoneError> {
        let (width, height) = (sampler.width(), sampler.height());
        self.buffer.reset(width, height);
        if !self.is_active() {
            tracing::trace!(index = self.index, "Screen inactive, buffer cleared");
            return Ok(&self.buffer);
        }

        let opts = &self.options;
        let grid = opts.grid_size;
        let cell = CellMetrics {
            grid,
            ratio: opts.raster_size,
            angle: opts.angle_radians(),
        };
        let grid_square = rotated_square(grid, cell.angle);
        let (w, h) = (f64::from(width), f64::from(height));
        let grid_width = w / grid;
        let grid_height = h / grid / if opts.collapsed { opts.raster_size } else { 1.0 };

        let mut canvas = Canvas::new(width, height, opts.color)?;
        let mut cells = 0usize;

        let mut row = -grid_height;
        while row < 2.0 * grid_height {
            let mut col = -grid_width;
            while col < 2.0 * grid_width {
                let Point { x, y } = self.cell_center(row, col, width, height);
                col += 1.0;

                if x < -grid || x >= w + grid || y < -grid || y >= h + grid {
                    continue;
                }
                if opts.show_grid {
                    canvas.stroke_polygon(x, y, &grid_square, Rgb::BLACK);
                }
                let intensity = self.intensity_at(sampler, x, y);
                opts.shape.draw(&mut canvas, x, y, intensity, &cell);
                cells += 1;
            }
            row += 1.0;
        }

        tracing::debug!(
            index = self.index,
            shape = %opts.shape,
            cells,
            width,
            height,
            "Rendered screen"
        );

        self.buffer = canvas.into_raster();
        Ok(&self.buffer)
    }

    /// Advance the animation by one tick.
    ///
    /// The offset wraps back into `[0, 1)` before the step is added, so it
    /// cycles through `(0, 1]`.
    pub fn advance(&mut self) {
        if self.animation_offset >= 1.0 {
            self.animation_offset -= 1.0;
        }
        self.animation_offset += ANIMATION_STEP;
    }

    /// Mark the layer as driven by the animation loop.
    pub fn start_animation(&mut self) {
        self.animated = true;
    }

    /// Stop animating and snap the grid back to its configured offset.
    pub fn stop_animation(&mut self) {
        self.animated = false;
        self.animation_offset = 0.0;
    }

    #[inline]
    pub fn is_animated(&self) -> bool {
        self.animated
    }

    #[inline]
    pub fn animation_offset(&self) -> f64 {
        self.animation_offset
    }
}
