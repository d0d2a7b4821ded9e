pub mod config;

pub use config::{
    ConfigFormat, CurveConfig, OutputConfig, ProjectConfig, ScreenConfig, SourceConfig,
};
