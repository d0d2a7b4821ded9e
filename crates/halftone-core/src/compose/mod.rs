//! Layer composition.
//!
//! [`composite`] fills the output with the background color, blends every
//! layer buffer on top in order (bottom first) and finally applies the
//! output noise stage. Channels are rounded back to bytes after every
//! blend step, so stacking order matters even for the commutative modes.
//!
//! | Mode | Per channel, coverage `a` |
//! |------|---------------------------|
//! | normal | `out = (1−a)·out + a·ink` |
//! | additive | `out = min(255, out + a·ink)` |
//! | subtractive | `out = max(0, out − (255 − (255·(1−a) + a·ink)))` |
//!
//! With `smooth` off, any non-zero alpha counts as full coverage.

mod mode;

pub use mode::BlendMode;

use rand::Rng;

use crate::color::Rgb;
use crate::output::Raster;
use crate::sampler::{inject_noise, NoiseOptions};

/// Error composing layers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComposeError {
    /// A layer buffer does not match the output size
    #[error("layer {layer} is {actual_width}x{actual_height}, output is {width}x{height}")]
    DimensionMismatch {
        layer: usize,
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}

/// Output stage settings.
///
/// # Defaults
///
/// White background, normal blending, smooth edges, grey noise switched off
/// (level 0).
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeOptions {
    pub background: Rgb,
    pub mode: BlendMode,
    /// Use fractional alpha; off makes every inked pixel fully opaque.
    pub smooth: bool,
    /// Noise applied after all layers are blended.
    pub noise: NoiseOptions,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            background: Rgb::WHITE,
            mode: BlendMode::Normal,
            smooth: true,
            noise: NoiseOptions::new().grey(true),
        }
    }
}

impl ComposeOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn background(mut self, color: Rgb) -> Self {
        self.background = color;
        self
    }

    #[inline]
    pub fn mode(mut self, mode: BlendMode) -> Self {
        self.mode = mode;
        self
    }

    #[inline]
    pub fn smooth(mut self, enabled: bool) -> Self {
        self.smooth = enabled;
        self
    }

    #[inline]
    pub fn noise(mut self, noise: NoiseOptions) -> Self {
        self.noise = noise;
        self
    }
}

/// Blend `layers` bottom-to-top onto a `width × height` background.
///
/// The result is fully opaque. Every layer must have the output's size.
pub fn composite<R: Rng + ?Sized>(
    layers: &[&Raster],
    width: u32,
    height: u32,
    options: &ComposeOptions,
    rng: &mut R,
) -> Result<Raster, ComposeError> {
    if let Some((layer, raster)) = layers
        .iter()
        .enumerate()
        .find(|(_, r)| r.width() != width || r.height() != height)
    {
        return Err(ComposeError::DimensionMismatch {
            layer,
            width,
            height,
            actual_width: raster.width(),
            actual_height: raster.height(),
        });
    }

    let mut output = Raster::filled(width, height, options.background.to_rgba());
    for layer in layers {
        blend_layer(&mut output, layer, options.mode, options.smooth);
    }
    inject_noise(&mut output, &options.noise, rng);
    Ok(output)
}

fn blend_layer(output: &mut Raster, layer: &Raster, mode: BlendMode, smooth: bool) {
    for (out, ink) in output
        .data_mut()
        .chunks_exact_mut(4)
        .zip(layer.data().chunks_exact(4))
    {
        if ink[3] == 0 {
            continue;
        }
        let a = if smooth {
            f64::from(ink[3]) / 255.0
        } else {
            1.0
        };
        for c in 0..3 {
            let v = mode.blend(f64::from(out[c]), f64::from(ink[c]), a);
            out[c] = v.round_ties_even().clamp(0.0, 255.0) as u8;
        }
    }
}
