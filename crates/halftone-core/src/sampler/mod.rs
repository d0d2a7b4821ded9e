//! Source image sampling.
//!
//! [`IntensitySampler`] owns the source raster for one update cycle and
//! answers `sample(x, y, channel)` queries from every layer. Coordinates are
//! floored and clamped to the image, so grid cells hanging over the edge
//! read the nearest border pixel. Fully transparent pixels always read 0.

mod channel;
mod noise;

pub use channel::Channel;
pub use noise::{inject_noise, NoiseOptions};

use rand::Rng;

use crate::output::{Raster, RasterError};

/// Read-only view of the (possibly noised) source image.
#[derive(Debug, Clone)]
pub struct IntensitySampler {
    raster: Raster,
}

impl IntensitySampler {
    /// Wrap a source image. Zero-sized images are rejected.
    pub fn new(raster: Raster) -> Result<Self, RasterError> {
        if raster.width() == 0 || raster.height() == 0 {
            return Err(RasterError::Empty {
                width: raster.width(),
                height: raster.height(),
            });
        }
        Ok(Self { raster })
    }

    /// Wrap a source image after blending source noise into it.
    pub fn with_noise<R: Rng + ?Sized>(
        mut raster: Raster,
        noise: &NoiseOptions,
        rng: &mut R,
    ) -> Result<Self, RasterError> {
        inject_noise(&mut raster, noise, rng);
        Self::new(raster)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// The image being sampled.
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Channel value in `[0, 1]` at image coordinates `(x, y)`.
    pub fn sample(&self, x: f64, y: f64, channel: Channel) -> f64 {
        let [r, g, b, a] = self.pixel_clamped(x, y);
        if a == 0 {
            return 0.0;
        }
        channel.of_rgb([r, g, b])
    }

    fn pixel_clamped(&self, x: f64, y: f64) -> [u8; 4] {
        let max_x = f64::from(self.width() - 1);
        let max_y = f64::from(self.height() - 1);
        // NaN falls through clamp unchanged and casts to 0
        let col = x.floor().clamp(0.0, max_x) as u32;
        let row = y.floor().clamp(0.0, max_y) as u32;
        self.raster.pixel(col, row)
    }
}
