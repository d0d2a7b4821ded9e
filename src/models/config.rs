use serde::{Deserialize, Serialize};
use std::path::Path;

use halftone_core::{
    BlendMode, Channel, ComposeOptions, DotShape, HalftoneError, NoiseOptions, Rgb, ScreenLayer,
    ScreenOptions, ToneCurve,
};

use crate::error::ConfigError;

/// Project file: every parameter of a halftone project.
///
/// Field names follow the project file format so existing files load
/// unchanged. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Longest side of the working image in pixels
    pub size: u32,

    /// Source image settings
    pub source: SourceConfig,

    /// Screen layers, bottom first
    pub screens: Vec<ScreenConfig>,

    /// Output stage settings
    pub output: OutputConfig,
}

fn default_size() -> u32 {
    512
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            source: SourceConfig::default(),
            screens: Vec::new(),
            output: OutputConfig::default(),
        }
    }
}

/// Source image preprocessing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Replace the image with a horizontal white-to-black ramp
    #[serde(alias = "debug")]
    pub gradient: bool,
    pub noise_level: f64,
    pub noise_scale: u32,
    pub grey_noise: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            gradient: false,
            noise_level: 0.0,
            noise_scale: 1,
            grey_noise: false,
        }
    }
}

/// One screen layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub index: u32,
    pub angle_degree: f64,
    pub grid_size: f64,
    /// Dot size relative to the grid cell
    pub raster_size: f64,
    pub show_grid: bool,
    pub interlaced: bool,
    pub dot_style: String,
    pub collapsed: bool,
    pub color: String,
    pub channel: String,
    /// Whether the layer is enabled
    pub toggled: bool,
    pub negative: bool,
    pub offset_x: f64,
    pub offset_y: f64,
    pub tone_curve: CurveConfig,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self::from_layer_parts(0, &ScreenOptions::default(), &ToneCurve::identity())
    }
}

/// Serialized tone curve: parallel control point coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveConfig {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self::from(&ToneCurve::identity())
    }
}

impl From<&ToneCurve> for CurveConfig {
    fn from(curve: &ToneCurve) -> Self {
        Self {
            xs: curve.xs().to_vec(),
            ys: curve.ys().to_vec(),
        }
    }
}

impl CurveConfig {
    /// Build the curve, recomputing its weights.
    pub fn to_curve(&self) -> Result<ToneCurve, halftone_core::CurveError> {
        ToneCurve::from_xs_ys(self.xs.clone(), self.ys.clone())
    }
}

/// Output stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub noise_level: f64,
    pub noise_scale: u32,
    pub grey_noise: bool,
    /// Anti-aliased edges; off makes every inked pixel fully opaque
    pub smooth: bool,
    pub background: String,
    pub composition_mode: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from(&ComposeOptions::default())
    }
}

impl From<&ComposeOptions> for OutputConfig {
    fn from(options: &ComposeOptions) -> Self {
        Self {
            noise_level: options.noise.level,
            noise_scale: options.noise.scale,
            grey_noise: options.noise.grey,
            smooth: options.smooth,
            background: options.background.to_hex(),
            composition_mode: options.mode.name().to_string(),
        }
    }
}

/// Serialization format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// `.yaml` / `.yml` select YAML, everything else JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

fn parse_color(field: String, value: &str) -> Result<Rgb, ConfigError> {
    value.parse().map_err(|source| ConfigError::InvalidColor {
        field,
        value: value.to_string(),
        source,
    })
}

/// `text` when it still names `color`, otherwise the canonical hex form.
fn color_text(text: &str, color: Rgb) -> String {
    match text.parse::<Rgb>() {
        Ok(parsed) if parsed == color => text.to_string(),
        _ => color.to_hex(),
    }
}

fn invalid_value(scope: impl Into<String>) -> impl FnOnce(HalftoneError) -> ConfigError {
    let scope = scope.into();
    move |err| match err {
        HalftoneError::InvalidParameter { name, value } => ConfigError::InvalidValue {
            scope,
            field: name,
            value,
        },
        source => ConfigError::Rejected { scope, source },
    }
}

impl SourceConfig {
    /// Noise applied to the source before sampling.
    pub fn noise_options(&self) -> Result<NoiseOptions, ConfigError> {
        let noise = NoiseOptions::new()
            .level(self.noise_level)
            .scale(self.noise_scale)
            .grey(self.grey_noise);
        noise.validate().map_err(invalid_value("source"))?;
        Ok(noise)
    }
}

impl OutputConfig {
    /// Write the background as `text` if it still names the same color.
    pub fn with_background_text(mut self, text: &str) -> Self {
        if let Ok(color) = self.background.parse::<Rgb>() {
            self.background = color_text(text, color);
        }
        self
    }

    pub fn compose_options(&self) -> Result<ComposeOptions, ConfigError> {
        let mode: BlendMode = self
            .composition_mode
            .parse()
            .map_err(ConfigError::UnknownBlendMode)?;
        let background = parse_color("output background".to_string(), &self.background)?;
        let noise = NoiseOptions::new()
            .level(self.noise_level)
            .scale(self.noise_scale)
            .grey(self.grey_noise);
        noise.validate().map_err(invalid_value("output"))?;

        Ok(ComposeOptions::new()
            .background(background)
            .mode(mode)
            .smooth(self.smooth)
            .noise(noise))
    }
}

impl ScreenConfig {
    /// A default screen with the given index.
    pub fn with_index(index: u32) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    /// Parse selectors and colors and build the core layer.
    pub fn to_layer(&self) -> Result<ScreenLayer, ConfigError> {
        let index = self.index;
        let shape: DotShape = self
            .dot_style
            .parse()
            .map_err(|source| ConfigError::UnknownShape { index, source })?;
        let channel: Channel = self
            .channel
            .parse()
            .map_err(|source| ConfigError::UnknownChannel { index, source })?;
        let color = parse_color(format!("screen #{index} color"), &self.color)?;
        let tone_curve = self
            .tone_curve
            .to_curve()
            .map_err(|source| ConfigError::ToneCurve { index, source })?;

        let options = ScreenOptions {
            angle_degrees: self.angle_degree,
            grid_size: self.grid_size,
            raster_size: self.raster_size,
            show_grid: self.show_grid,
            interlaced: self.interlaced,
            shape,
            collapsed: self.collapsed,
            color,
            channel,
            enabled: self.toggled,
            negative: self.negative,
            offset_x: self.offset_x,
            offset_y: self.offset_y,
        };
        let layer = ScreenLayer::new(index, options)
            .map_err(invalid_value(format!("screen #{index}")))?;
        Ok(layer.with_tone_curve(tone_curve))
    }

    /// Write the color as `text` if it still names the layer's color.
    pub fn with_color_text(mut self, text: &str) -> Self {
        if let Ok(color) = self.color.parse::<Rgb>() {
            self.color = color_text(text, color);
        }
        self
    }

    /// Serialize a layer's configuration (animation state is not saved).
    pub fn from_layer(layer: &ScreenLayer) -> Self {
        Self::from_layer_parts(layer.index(), layer.options(), layer.tone_curve())
    }

    fn from_layer_parts(index: u32, options: &ScreenOptions, curve: &ToneCurve) -> Self {
        Self {
            index,
            angle_degree: options.angle_degrees,
            grid_size: options.grid_size,
            raster_size: options.raster_size,
            show_grid: options.show_grid,
            interlaced: options.interlaced,
            dot_style: options.shape.name().to_string(),
            collapsed: options.collapsed,
            color: options.color.to_hex(),
            channel: options.channel.name().to_string(),
            toggled: options.enabled,
            negative: options.negative,
            offset_x: options.offset_x,
            offset_y: options.offset_y,
            tone_curve: CurveConfig::from(curve),
        }
    }
}

impl ProjectConfig {
    /// Load a project file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, ConfigFormat::from_path(path))
    }

    /// Load a project file, falling back to defaults when it is missing or
    /// invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                tracing::info!(
                    path = %path.display(),
                    screens = config.screens.len(),
                    size = config.size,
                    "Loaded project"
                );
                config
            }
            Err(e) => {
                tracing::warn!(%e, "Failed to load project, using defaults");
                Self::default()
            }
        }
    }

    /// Parse project file contents.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        Ok(match format {
            ConfigFormat::Json => serde_json::from_str(content)?,
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
        })
    }

    /// Serialize to project file contents.
    pub fn to_string(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        Ok(match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Yaml => serde_yaml::to_string(self)?,
        })
    }

    /// Write the project file, format chosen by extension.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_string(ConfigFormat::from_path(path))?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Saved project");
        Ok(())
    }

    /// A project with `count` default screens indexed from 0.
    pub fn with_screens(count: u32) -> Self {
        Self {
            screens: (0..count).map(ScreenConfig::with_index).collect(),
            ..Self::default()
        }
    }

    /// Check the whole tree, reporting the first problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::ZeroSize);
        }
        self.source.noise_options()?;
        self.output.compose_options()?;
        self.layers()?;
        Ok(())
    }

    /// Build every screen layer, rejecting duplicate indices.
    pub fn layers(&self) -> Result<Vec<ScreenLayer>, ConfigError> {
        let mut seen = std::collections::HashSet::new();
        self.screens
            .iter()
            .map(|screen| {
                if !seen.insert(screen.index) {
                    return Err(ConfigError::DuplicateIndex(screen.index));
                }
                screen.to_layer()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = ProjectConfig::default();
        assert_eq!(config.size, 512);
        assert!(config.screens.is_empty());
        assert_eq!(config.source, SourceConfig::default());
        assert_eq!(config.output.background, "#ffffff");
        assert_eq!(config.output.composition_mode, "normal");
        assert!(config.output.grey_noise);
        assert!(config.output.smooth);
    }

    #[test]
    fn test_default_size_function() {
        assert_eq!(default_size(), 512);
    }

    #[test]
    fn test_screen_defaults() {
        let screen = ScreenConfig::default();
        assert_eq!(screen.angle_degree, 30.0);
        assert_eq!(screen.grid_size, 16.0);
        assert_eq!(screen.raster_size, 1.0);
        assert_eq!(screen.dot_style, "circle");
        assert_eq!(screen.color, "#000000");
        assert_eq!(screen.channel, "darkness");
        assert!(screen.toggled);
        assert!(screen.interlaced);
        assert_eq!(screen.tone_curve.xs, vec![0.0, 1.0]);
        assert_eq!(screen.tone_curve.ys, vec![0.0, 1.0]);
    }

    #[test]
    fn test_deserialize_partial_json() {
        let json = r##"{
            "size": 256,
            "source": { "debug": true },
            "screens": [
                { "index": 4, "dot_style": "bayer8", "color": "#00FFFF", "channel": "cyan" }
            ],
            "output": { "composition_mode": "subtractive" },
            "auto_update": true
        }"##;
        let config = ProjectConfig::parse(json, ConfigFormat::Json).unwrap();
        assert_eq!(config.size, 256);
        assert!(config.source.gradient);
        assert_eq!(config.screens[0].index, 4);
        assert_eq!(config.screens[0].grid_size, 16.0);

        let layer = config.screens[0].to_layer().unwrap();
        assert_eq!(layer.options().shape, DotShape::Bayer8);
        assert_eq!(layer.options().color, Rgb::new(0, 255, 255));
        assert_eq!(
            config.output.compose_options().unwrap().mode,
            BlendMode::Subtractive
        );
    }

    #[test]
    fn test_deserialize_yaml() {
        let yaml = r##"
size: 128
screens:
  - index: 0
    dot_style: euclidean
    tone_curve:
      xs: [0.0, 0.5, 1.0]
      ys: [0.0, 0.8, 1.0]
output:
  background: "#000"
  composition_mode: additive
"##;
        let config = ProjectConfig::parse(yaml, ConfigFormat::Yaml).unwrap();
        config.validate().unwrap();
        let layer = config.screens[0].to_layer().unwrap();
        assert_eq!(layer.tone_curve().evaluate(0.5), 0.8);
        assert_eq!(
            config.output.compose_options().unwrap().background,
            Rgb::BLACK
        );
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.yaml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.YML")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("project")), ConfigFormat::Json);
    }

    #[test]
    fn test_unknown_selectors_rejected() {
        let mut screen = ScreenConfig::default();
        screen.dot_style = "star".to_string();
        assert!(matches!(
            screen.to_layer(),
            Err(ConfigError::UnknownShape { index: 0, .. })
        ));

        let mut screen = ScreenConfig::default();
        screen.channel = "alpha".to_string();
        assert!(matches!(
            screen.to_layer(),
            Err(ConfigError::UnknownChannel { .. })
        ));

        let output = OutputConfig {
            composition_mode: "screen".to_string(),
            ..OutputConfig::default()
        };
        assert!(matches!(
            output.compose_options(),
            Err(ConfigError::UnknownBlendMode(_))
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut screen = ScreenConfig::with_index(3);
        screen.grid_size = -2.0;
        match screen.to_layer() {
            Err(ConfigError::InvalidValue { scope, field, .. }) => {
                assert_eq!(scope, "screen #3");
                assert_eq!(field, "grid_size");
            }
            other => panic!("Expected InvalidValue, got {other:?}"),
        }

        let source = SourceConfig {
            noise_scale: 0,
            ..SourceConfig::default()
        };
        assert!(source.noise_options().is_err());

        let mut screen = ScreenConfig::default();
        screen.color = "#12345".to_string();
        assert!(matches!(
            screen.to_layer(),
            Err(ConfigError::InvalidColor { .. })
        ));
    }

    #[test]
    fn test_duplicate_curve_x_rejected() {
        let mut screen = ScreenConfig::default();
        screen.tone_curve = CurveConfig {
            xs: vec![0.0, 0.0],
            ys: vec![0.0, 1.0],
        };
        assert!(matches!(
            screen.to_layer(),
            Err(ConfigError::ToneCurve { .. })
        ));
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let mut config = ProjectConfig::with_screens(2);
        config.screens[1].index = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateIndex(0))
        ));
    }

    #[test]
    fn test_layer_round_trip() {
        let mut screen = ScreenConfig::with_index(9);
        screen.dot_style = "hexagon".to_string();
        screen.color = "#ff8000".to_string();
        screen.offset_x = 0.125;
        screen.tone_curve = CurveConfig {
            xs: vec![0.0, 0.3, 1.0],
            ys: vec![0.1, 0.6, 0.9],
        };
        let layer = screen.to_layer().unwrap();
        assert_eq!(ScreenConfig::from_layer(&layer), screen);
    }

    #[test]
    fn test_color_text_kept_while_it_matches() {
        let screen = ScreenConfig::default();
        assert_eq!(screen.clone().with_color_text("#000").color, "#000");
        assert_eq!(screen.clone().with_color_text("#00000A").color, "#000000");
        assert_eq!(screen.with_color_text("black").color, "#000000");

        let output = OutputConfig::default().with_background_text("#FFFFFF");
        assert_eq!(output.background, "#FFFFFF");
    }

    #[test]
    fn test_zero_size_rejected() {
        let config = ProjectConfig {
            size: 0,
            ..ProjectConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroSize)));
    }
}
