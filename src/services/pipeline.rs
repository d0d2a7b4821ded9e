//! The update pipeline: project state plus one full render per trigger.
//!
//! A [`Pipeline`] owns everything a pass needs: the fitted source image,
//! the validated layer stack, the source and output settings, and the
//! screen clipboard. Every trigger (a config reload, a new source image, an
//! animation tick) runs [`Pipeline::update`] to completion.

use std::collections::HashMap;

use halftone_core::{
    ComposeOptions, Halftoner, NoiseOptions, Raster, ScreenLayer, ScreenOptions, ToneCurve,
};
use rand::Rng;

use crate::error::{AppError, ConfigError};
use crate::models::{OutputConfig, ProjectConfig, ScreenConfig, SourceConfig};
use crate::rendering::image_io::{fit_to_size, gradient_source};

/// Holds one copied screen as its serialized configuration.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    content: Option<String>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize `screen` into the clipboard, replacing what was there.
    pub fn store(&mut self, screen: &ScreenConfig) -> Result<(), ConfigError> {
        self.content = Some(serde_json::to_string(screen)?);
        Ok(())
    }

    /// The copied screen, if any.
    pub fn load(&self) -> Result<Option<ScreenConfig>, ConfigError> {
        match &self.content {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none()
    }
}

/// Result of one pass.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Each layer's private buffer as `(index, buffer)`, bottom first
    pub layers: Vec<(u32, Raster)>,
    /// Composited output
    pub output: Raster,
}

/// Project state and the render loop around [`Halftoner`].
#[derive(Debug, Clone)]
pub struct Pipeline {
    size: u32,
    source_config: SourceConfig,
    /// Image as provided, before fitting
    original: Option<Raster>,
    /// Image fitted to `size`
    source: Option<Raster>,
    halftoner: Halftoner,
    screen_counter: u32,
    clipboard: Clipboard,
    /// Color strings as loaded, by screen index
    color_texts: HashMap<u32, String>,
    /// Background string as loaded
    background_text: Option<String>,
}

impl Pipeline {
    /// Build a pipeline from a project, validating every field.
    pub fn new(config: &ProjectConfig) -> Result<Self, AppError> {
        let mut pipeline = Self {
            size: config.size,
            source_config: SourceConfig::default(),
            original: None,
            source: None,
            halftoner: Halftoner::new(),
            screen_counter: 0,
            clipboard: Clipboard::new(),
            color_texts: HashMap::new(),
            background_text: None,
        };
        pipeline.load_config(config)?;
        Ok(pipeline)
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn source_config(&self) -> &SourceConfig {
        &self.source_config
    }

    pub fn compose_options(&self) -> &ComposeOptions {
        self.halftoner.compose_options()
    }

    pub fn screens(&self) -> &[ScreenLayer] {
        self.halftoner.layers()
    }

    pub fn screen(&self, index: u32) -> Option<&ScreenLayer> {
        self.screens().iter().find(|layer| layer.index() == index)
    }

    fn screen_mut(&mut self, index: u32) -> Result<&mut ScreenLayer, AppError> {
        self.halftoner
            .layers_mut()
            .iter_mut()
            .find(|layer| layer.index() == index)
            .ok_or(AppError::ScreenNotFound(index))
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    /// The fitted source image, if one was set.
    pub fn source(&self) -> Option<&Raster> {
        self.source.as_ref()
    }

    /// Replace the source image; it is fitted to the project size.
    pub fn set_source(&mut self, raster: Raster) -> Result<(), AppError> {
        let fitted = fit_to_size(&raster, self.size)?;
        tracing::info!(
            width = fitted.width(),
            height = fitted.height(),
            "Source image set"
        );
        self.source = Some(fitted);
        self.original = Some(raster);
        Ok(())
    }

    /// Append a default layer with the next free index, returning the index.
    ///
    /// Fails once the highest index (`u32::MAX`) is taken.
    pub fn add_screen(&mut self) -> Result<u32, AppError> {
        let index = self.screen_counter;
        if self.screen(index).is_some() {
            return Err(AppError::IndicesExhausted);
        }
        let layer = ScreenLayer::new(index, ScreenOptions::default())?;
        self.halftoner.layers_mut().push(layer);
        self.screen_counter = index.saturating_add(1);
        tracing::info!(index, screens = self.screens().len(), "Added screen");
        Ok(index)
    }

    /// Remove the layer with `index`.
    pub fn remove_screen(&mut self, index: u32) -> Result<(), AppError> {
        let layers = self.halftoner.layers_mut();
        let position = layers
            .iter()
            .position(|layer| layer.index() == index)
            .ok_or(AppError::ScreenNotFound(index))?;
        layers.remove(position);
        tracing::info!(index, screens = layers.len(), "Removed screen");
        self.color_texts.remove(&index);
        Ok(())
    }

    /// Copy a layer's configuration to the clipboard.
    pub fn copy_screen(&mut self, index: u32) -> Result<(), AppError> {
        let layer = self.screen(index).ok_or(AppError::ScreenNotFound(index))?;
        let config = self.screen_config(layer);
        self.clipboard.store(&config)?;
        tracing::debug!(index, "Copied screen");
        Ok(())
    }

    /// Overwrite a layer with the clipboard content.
    ///
    /// The target keeps its own index and animation state.
    pub fn paste_screen(&mut self, index: u32) -> Result<(), AppError> {
        let mut config = self.clipboard.load()?.ok_or(AppError::EmptyClipboard)?;
        config.index = index;
        let pasted = config.to_layer()?;

        let layer = self.screen_mut(index)?;
        layer.set_options(pasted.options().clone())?;
        layer.set_tone_curve(pasted.tone_curve().clone());
        self.color_texts.insert(index, config.color);
        tracing::debug!(index, "Pasted screen");
        Ok(())
    }

    /// Put every layer, the source settings and the output settings back to
    /// their defaults. Layers, indices and the source image are kept.
    pub fn reset(&mut self) -> Result<(), AppError> {
        for layer in self.halftoner.layers_mut() {
            reset_layer(layer)?;
        }
        self.color_texts.clear();
        self.background_text = None;
        self.source_config = SourceConfig::default();
        *self.halftoner.compose_options_mut() = ComposeOptions::default();
        self.sync_source_noise();
        tracing::info!(screens = self.screens().len(), "Reset project");
        Ok(())
    }

    /// Put one layer back to its defaults.
    pub fn reset_screen(&mut self, index: u32) -> Result<(), AppError> {
        reset_layer(self.screen_mut(index)?)?;
        self.color_texts.remove(&index);
        tracing::debug!(index, "Reset screen");
        Ok(())
    }

    pub fn start_animation(&mut self, index: u32) -> Result<(), AppError> {
        self.screen_mut(index)?.start_animation();
        tracing::debug!(index, "Animation started");
        Ok(())
    }

    pub fn stop_animation(&mut self, index: u32) -> Result<(), AppError> {
        self.screen_mut(index)?.stop_animation();
        tracing::debug!(index, "Animation stopped");
        Ok(())
    }

    /// Start animating every enabled layer, returning how many were started.
    pub fn animate_enabled(&mut self) -> usize {
        let mut started = 0;
        for layer in self.halftoner.layers_mut() {
            if layer.options().enabled {
                layer.start_animation();
                started += 1;
            }
        }
        tracing::info!(layers = started, "Animation started");
        started
    }

    /// The image the next pass samples: the ramp when `gradient` is set,
    /// otherwise the fitted source.
    fn pass_source(&self) -> Result<Raster, AppError> {
        if self.source_config.gradient {
            let (width, height) = self
                .source
                .as_ref()
                .map_or((self.size, self.size), |s| (s.width(), s.height()));
            return Ok(gradient_source(width, height));
        }
        self.source.clone().ok_or(AppError::NoSource)
    }

    /// Run one full pass.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Frame, AppError> {
        let source = self.pass_source()?;
        let (width, height) = (source.width(), source.height());
        let output = self.halftoner.render(source, rng)?;

        let layers = self
            .screens()
            .iter()
            .map(|layer| (layer.index(), layer.buffer().clone()))
            .collect();
        tracing::debug!(width, height, screens = self.screens().len(), "Updated");
        Ok(Frame { layers, output })
    }

    /// Advance every animated layer one step, then run a pass.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Frame, AppError> {
        for layer in self.halftoner.layers_mut() {
            if layer.is_animated() {
                layer.advance();
            }
        }
        self.update(rng)
    }

    /// A layer's configuration, with its color written as it was loaded.
    fn screen_config(&self, layer: &ScreenLayer) -> ScreenConfig {
        let config = ScreenConfig::from_layer(layer);
        match self.color_texts.get(&layer.index()) {
            Some(text) => config.with_color_text(text),
            None => config,
        }
    }

    /// Snapshot of every parameter. Animation state is not included.
    ///
    /// Color strings come back exactly as they were loaded while they still
    /// name the current color.
    pub fn export_config(&self) -> ProjectConfig {
        let output = OutputConfig::from(self.halftoner.compose_options());
        ProjectConfig {
            size: self.size,
            source: self.source_config.clone(),
            screens: self
                .screens()
                .iter()
                .map(|layer| self.screen_config(layer))
                .collect(),
            output: match &self.background_text {
                Some(text) => output.with_background_text(text),
                None => output,
            },
        }
    }

    /// Replace the whole project state.
    ///
    /// The config is validated first; on error nothing changes. Screen
    /// indices are kept and the next new screen gets `max(index) + 1`.
    pub fn load_config(&mut self, config: &ProjectConfig) -> Result<(), AppError> {
        config.validate()?;
        let layers = config.layers()?;
        let compose = config.output.compose_options()?;
        let refitted = match &self.original {
            Some(original) if config.size != self.size => {
                Some(fit_to_size(original, config.size)?)
            }
            _ => None,
        };

        self.size = config.size;
        if let Some(source) = refitted {
            self.source = Some(source);
        }
        self.source_config = config.source.clone();
        self.screen_counter = layers
            .iter()
            .map(|l| l.index().saturating_add(1))
            .max()
            .unwrap_or(0);
        self.color_texts = config
            .screens
            .iter()
            .map(|screen| (screen.index, screen.color.clone()))
            .collect();
        self.background_text = Some(config.output.background.clone());
        *self.halftoner.layers_mut() = layers;
        *self.halftoner.compose_options_mut() = compose;
        self.sync_source_noise();

        tracing::info!(
            size = self.size,
            screens = self.screens().len(),
            "Loaded project"
        );
        Ok(())
    }

    fn sync_source_noise(&mut self) {
        *self.halftoner.source_noise_options_mut() = NoiseOptions::new()
            .level(self.source_config.noise_level)
            .scale(self.source_config.noise_scale)
            .grey(self.source_config.grey_noise);
    }
}

fn reset_layer(layer: &mut ScreenLayer) -> Result<(), AppError> {
    layer.set_options(ScreenOptions::default())?;
    layer.set_tone_curve(ToneCurve::identity());
    layer.stop_animation();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use halftone_core::{DotShape, Rgb};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(5)
    }

    fn pipeline_with(screens: u32) -> Pipeline {
        let mut config = ProjectConfig::with_screens(screens);
        config.size = 32;
        let mut pipeline = Pipeline::new(&config).unwrap();
        pipeline
            .set_source(Raster::filled(32, 32, [60, 60, 60, 255]))
            .unwrap();
        pipeline
    }

    #[test]
    fn test_add_screen_uses_next_index() {
        let mut pipeline = pipeline_with(2);
        assert_eq!(pipeline.add_screen().unwrap(), 2);
        pipeline.remove_screen(2).unwrap();
        assert_eq!(pipeline.add_screen().unwrap(), 3);
        let indices: Vec<u32> = pipeline.screens().iter().map(|l| l.index()).collect();
        assert_eq!(indices, vec![0, 1, 3]);
    }

    #[test]
    fn test_add_screen_after_highest_index_fails() {
        let mut config = ProjectConfig::with_screens(0);
        config.screens = vec![ScreenConfig::with_index(u32::MAX)];
        let mut pipeline = Pipeline::new(&config).unwrap();

        assert!(matches!(
            pipeline.add_screen(),
            Err(AppError::IndicesExhausted)
        ));
        assert_eq!(pipeline.screens().len(), 1);
    }

    #[test]
    fn test_remove_unknown_screen() {
        let mut pipeline = pipeline_with(1);
        assert!(matches!(
            pipeline.remove_screen(9),
            Err(AppError::ScreenNotFound(9))
        ));
    }

    #[test]
    fn test_update_without_source() {
        let mut pipeline = Pipeline::new(&ProjectConfig::with_screens(1)).unwrap();
        assert!(matches!(
            pipeline.update(&mut rng()),
            Err(AppError::NoSource)
        ));
    }

    #[test]
    fn test_gradient_needs_no_source() {
        let mut config = ProjectConfig::with_screens(1);
        config.size = 20;
        config.source.gradient = true;
        let mut pipeline = Pipeline::new(&config).unwrap();
        let frame = pipeline.update(&mut rng()).unwrap();
        assert_eq!((frame.output.width(), frame.output.height()), (20, 20));
        assert_eq!(frame.layers.len(), 1);
    }

    #[test]
    fn test_update_returns_layer_buffers() {
        let mut pipeline = pipeline_with(2);
        let frame = pipeline.update(&mut rng()).unwrap();
        assert_eq!(frame.layers.len(), 2);
        assert_eq!(frame.layers[1].0, 1);
        assert_eq!(frame.layers[0].1.width(), 32);
        assert_eq!(frame.output.width(), 32);
    }

    #[test]
    fn test_copy_paste_keeps_target_index() {
        let mut config = ProjectConfig::with_screens(2);
        config.screens[0].dot_style = "triangle".to_string();
        config.screens[0].color = "#ff0000".to_string();
        let mut pipeline = Pipeline::new(&config).unwrap();

        pipeline.copy_screen(0).unwrap();
        pipeline.paste_screen(1).unwrap();

        let pasted = pipeline.screen(1).unwrap();
        assert_eq!(pasted.index(), 1);
        assert_eq!(pasted.options().shape, DotShape::Triangle);
        assert_eq!(pasted.options().color, Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_paste_empty_clipboard() {
        let mut pipeline = pipeline_with(1);
        assert!(pipeline.clipboard().is_empty());
        assert!(matches!(
            pipeline.paste_screen(0),
            Err(AppError::EmptyClipboard)
        ));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut config = ProjectConfig::with_screens(2);
        config.screens[1].grid_size = 40.0;
        config.output.composition_mode = "additive".to_string();
        config.source.noise_level = 0.5;
        let mut pipeline = Pipeline::new(&config).unwrap();
        pipeline.start_animation(1).unwrap();

        pipeline.reset().unwrap();

        assert_eq!(pipeline.screen(1).unwrap().options(), &ScreenOptions::default());
        assert!(!pipeline.screen(1).unwrap().is_animated());
        assert_eq!(pipeline.compose_options(), &ComposeOptions::default());
        assert_eq!(pipeline.source_config(), &SourceConfig::default());
        assert_eq!(pipeline.screens().len(), 2);
    }

    #[test]
    fn test_reset_single_screen() {
        let mut config = ProjectConfig::with_screens(2);
        config.screens[0].angle_degree = 10.0;
        config.screens[1].angle_degree = 10.0;
        let mut pipeline = Pipeline::new(&config).unwrap();

        pipeline.reset_screen(1).unwrap();

        assert_eq!(pipeline.screen(0).unwrap().options().angle_degrees, 10.0);
        assert_eq!(pipeline.screen(1).unwrap().options().angle_degrees, 30.0);
    }

    #[test]
    fn test_tick_advances_animated_layers_only() {
        let mut pipeline = pipeline_with(2);
        pipeline.start_animation(0).unwrap();
        pipeline.tick(&mut rng()).unwrap();
        pipeline.tick(&mut rng()).unwrap();

        assert!((pipeline.screen(0).unwrap().animation_offset() - 0.02).abs() < 1e-12);
        assert_eq!(pipeline.screen(1).unwrap().animation_offset(), 0.0);

        pipeline.stop_animation(0).unwrap();
        assert_eq!(pipeline.screen(0).unwrap().animation_offset(), 0.0);
    }

    #[test]
    fn test_animate_enabled_skips_disabled() {
        let mut config = ProjectConfig::with_screens(3);
        config.screens[1].toggled = false;
        let mut pipeline = Pipeline::new(&config).unwrap();
        assert_eq!(pipeline.animate_enabled(), 2);
        assert!(!pipeline.screen(1).unwrap().is_animated());
    }

    #[test]
    fn test_load_config_keeps_indices() {
        let mut config = ProjectConfig::with_screens(0);
        config.screens = vec![ScreenConfig::with_index(4), ScreenConfig::with_index(7)];
        let mut pipeline = Pipeline::new(&ProjectConfig::default()).unwrap();
        pipeline.load_config(&config).unwrap();

        let indices: Vec<u32> = pipeline.screens().iter().map(|l| l.index()).collect();
        assert_eq!(indices, vec![4, 7]);
        assert_eq!(pipeline.add_screen().unwrap(), 8);
    }

    #[test]
    fn test_invalid_config_leaves_state() {
        let mut pipeline = pipeline_with(1);
        let mut config = pipeline.export_config();
        config.screens[0].channel = "alpha".to_string();
        config.screens.push(ScreenConfig::with_index(5));

        assert!(pipeline.load_config(&config).is_err());
        assert_eq!(pipeline.screens().len(), 1);
    }

    #[test]
    fn test_failed_refit_leaves_state() {
        let mut pipeline = pipeline_with(1);
        let mut config = pipeline.export_config();
        config.size = u32::MAX;
        config.screens[0].angle_degree = 75.0;

        assert!(matches!(
            pipeline.load_config(&config),
            Err(AppError::Image(_))
        ));
        assert_eq!(pipeline.size(), 32);
        assert_eq!(pipeline.source().unwrap().width(), 32);
        assert_eq!(pipeline.screen(0).unwrap().options().angle_degrees, 30.0);
    }

    #[test]
    fn test_size_change_refits_source() {
        let mut pipeline = pipeline_with(1);
        let mut config = pipeline.export_config();
        config.size = 16;
        pipeline.load_config(&config).unwrap();
        let source = pipeline.source().unwrap();
        assert_eq!((source.width(), source.height()), (16, 16));
    }

    #[test]
    fn test_export_config_round_trip() {
        let mut config = ProjectConfig::with_screens(2);
        config.size = 32;
        config.screens[1].dot_style = "bayer4".to_string();
        config.output.noise_level = 0.25;
        let pipeline = Pipeline::new(&config).unwrap();
        assert_eq!(pipeline.export_config(), config);
    }

    #[test]
    fn test_color_strings_export_unchanged() {
        let mut config = ProjectConfig::with_screens(2);
        config.screens[0].color = "#00FFFF".to_string();
        config.screens[1].color = "#F0a".to_string();
        config.output.background = "#FAFAFA".to_string();
        let mut pipeline = Pipeline::new(&config).unwrap();

        let exported = pipeline.export_config();
        assert_eq!(exported.screens[0].color, "#00FFFF");
        assert_eq!(exported.screens[1].color, "#F0a");
        assert_eq!(exported.output.background, "#FAFAFA");

        pipeline.copy_screen(0).unwrap();
        pipeline.paste_screen(1).unwrap();
        assert_eq!(pipeline.export_config().screens[1].color, "#00FFFF");

        pipeline.reset_screen(0).unwrap();
        assert_eq!(pipeline.export_config().screens[0].color, "#000000");
    }
}
