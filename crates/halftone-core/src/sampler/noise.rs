//! Blocky random noise blended into an image.
//!
//! Used twice per pass: on the source before channel sampling, and on the
//! composited output. Each `scale × scale` block gets one random color and
//! every pixel in the block is pulled towards it by `level`.

use rand::Rng;

use crate::api::HalftoneError;
use crate::output::Raster;

/// Noise stage parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseOptions {
    /// Blend factor in `[0, 1]`; 0 disables the stage
    pub level: f64,
    /// Block side in pixels, at least 1
    pub scale: u32,
    /// One grey value per block instead of an independent RGB triple
    pub grey: bool,
}

impl Default for NoiseOptions {
    fn default() -> Self {
        Self {
            level: 0.0,
            scale: 1,
            grey: false,
        }
    }
}

impl NoiseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: f64) -> Self {
        self.level = level;
        self
    }

    pub fn scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    pub fn grey(mut self, grey: bool) -> Self {
        self.grey = grey;
        self
    }

    /// Whether the stage changes anything.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.level != 0.0
    }

    /// Reject a non-finite or out-of-range level and a zero block size.
    pub fn validate(&self) -> Result<(), HalftoneError> {
        if !self.level.is_finite() || !(0.0..=1.0).contains(&self.level) {
            return Err(HalftoneError::InvalidParameter {
                name: "noise_level",
                value: self.level,
            });
        }
        if self.scale == 0 {
            return Err(HalftoneError::InvalidParameter {
                name: "noise_scale",
                value: 0.0,
            });
        }
        Ok(())
    }
}

/// Blend block noise into the RGB channels of `raster` in place.
///
/// Blocks are laid out from the top-left corner and clipped at the right
/// and bottom edges. Alpha is left untouched. A level of 0 returns without
/// drawing from `rng`.
pub fn inject_noise<R: Rng + ?Sized>(raster: &mut Raster, options: &NoiseOptions, rng: &mut R) {
    if !options.is_active() {
        return;
    }
    let level = options.level;
    let block = options.scale.max(1);
    let (width, height) = (raster.width(), raster.height());
    let stride = width as usize * 4;
    let data = raster.data_mut();

    for by in (0..height).step_by(block as usize) {
        for bx in (0..width).step_by(block as usize) {
            let noise: [u8; 3] = if options.grey {
                let v = rng.gen::<u8>();
                [v, v, v]
            } else {
                rng.gen()
            };

            for y in by..(by + block).min(height) {
                let row = y as usize * stride;
                for x in bx..(bx + block).min(width) {
                    let k = row + x as usize * 4;
                    for (c, &n) in noise.iter().enumerate() {
                        let v = (1.0 - level) * f64::from(data[k + c]) + level * f64::from(n);
                        data[k + c] = v.round_ties_even().clamp(0.0, 255.0) as u8;
                    }
                }
            }
        }
    }
}
