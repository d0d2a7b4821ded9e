//! Halftoner builder -- one full pipeline pass behind a single call.
//!
//! [`Halftoner`] owns the layer stack plus the source and output settings
//! and runs sample → rasterize every layer → composite.

use rand::Rng;

use super::HalftoneError;
use crate::compose::{composite, ComposeOptions};
use crate::output::Raster;
use crate::sampler::{IntensitySampler, NoiseOptions};
use crate::screen::ScreenLayer;

/// High-level halftone renderer.
///
/// - Configuration methods consume and return `self` (builder pattern)
/// - [`render()`](Self::render) takes `&mut self` because every layer keeps
///   its last buffer; the builder is reusable across frames
///
/// # Example
///
/// ```
/// use halftone_core::{BlendMode, ComposeOptions, Halftoner, Raster, Rgb, ScreenLayer, ScreenOptions};
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let cyan = ScreenLayer::new(0, ScreenOptions::new().color(Rgb::new(0, 255, 255))).unwrap();
/// let mut halftoner = Halftoner::new()
///     .screen(cyan)
///     .compose(ComposeOptions::new().mode(BlendMode::Subtractive));
///
/// let source = Raster::filled(16, 16, [128, 128, 128, 255]);
/// let output = halftoner.render(source, &mut StdRng::seed_from_u64(1)).unwrap();
/// assert_eq!((output.width(), output.height()), (16, 16));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Halftoner {
    layers: Vec<ScreenLayer>,
    compose: ComposeOptions,
    source_noise: NoiseOptions,
}

impl Halftoner {
    /// An empty stack with default output settings and no source noise.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a layer on top of the stack.
    #[inline]
    pub fn screen(mut self, layer: ScreenLayer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Set the output stage.
    #[inline]
    pub fn compose(mut self, options: ComposeOptions) -> Self {
        self.compose = options;
        self
    }

    /// Set the noise applied to the source before sampling.
    #[inline]
    pub fn source_noise(mut self, noise: NoiseOptions) -> Self {
        self.source_noise = noise;
        self
    }

    pub fn layers(&self) -> &[ScreenLayer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut Vec<ScreenLayer> {
        &mut self.layers
    }

    pub fn compose_options(&self) -> &ComposeOptions {
        &self.compose
    }

    pub fn compose_options_mut(&mut self) -> &mut ComposeOptions {
        &mut self.compose
    }

    pub fn source_noise_options(&self) -> &NoiseOptions {
        &self.source_noise
    }

    pub fn source_noise_options_mut(&mut self) -> &mut NoiseOptions {
        &mut self.source_noise
    }

    /// Run a full pass over `source`.
    ///
    /// Source noise and output noise both draw from `rng`, in that order.
    pub fn render<R: Rng + ?Sized>(
        &mut self,
        source: Raster,
        rng: &mut R,
    ) -> Result<Raster, HalftoneError> {
        self.source_noise.validate()?;
        let sampler = IntensitySampler::with_noise(source, &self.source_noise, rng)?;
        self.render_sampler(&sampler, rng)
    }

    /// Run a full pass over an already prepared sampler.
    pub fn render_sampler<R: Rng + ?Sized>(
        &mut self,
        sampler: &IntensitySampler,
        rng: &mut R,
    ) -> Result<Raster, HalftoneError> {
        self.compose.noise.validate()?;
        for layer in &mut self.layers {
            layer.render(sampler)?;
        }

        let buffers: Vec<&Raster> = self.layers.iter().map(ScreenLayer::buffer).collect();
        let output = composite(
            &buffers,
            sampler.width(),
            sampler.height(),
            &self.compose,
            rng,
        )?;

        tracing::debug!(
            layers = self.layers.len(),
            active = self.layers.iter().filter(|l| l.is_active()).count(),
            mode = %self.compose.mode,
            "Composited output"
        );
        Ok(output)
    }
}
