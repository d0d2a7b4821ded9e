//! Test fixtures: source images and sample projects.

use halftone::models::{CurveConfig, ProjectConfig, ScreenConfig};
use halftone_core::Raster;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Seed shared by every integration test
pub const SEED: u64 = 0x5eed;

pub fn rng() -> StdRng {
    StdRng::seed_from_u64(SEED)
}

/// Diagonal color ramp with full alpha.
pub fn ramp(width: u32, height: u32) -> Raster {
    let data = (0..height)
        .flat_map(|y| {
            (0..width).flat_map(move |x| {
                let r = (x * 255 / (width - 1).max(1)) as u8;
                let g = (y * 255 / (height - 1).max(1)) as u8;
                [r, g, 255 - r / 2, 255]
            })
        })
        .collect();
    Raster::from_rgba(width, height, data).unwrap()
}

/// Encode a raster as an uncompressed RGBA PNG.
pub fn png_bytes(raster: &Raster) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, raster.width(), raster.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(raster.data()).unwrap();
    }
    buf
}

/// A CMY project exercising several shapes, channels and a custom curve.
pub fn cmy_project(size: u32) -> ProjectConfig {
    let screen = |index: u32, style: &str, color: &str, channel: &str, angle: f64| ScreenConfig {
        angle_degree: angle,
        grid_size: 6.0,
        dot_style: style.to_string(),
        color: color.to_string(),
        channel: channel.to_string(),
        ..ScreenConfig::with_index(index)
    };

    let mut magenta = screen(1, "euclidean", "#ff00ff", "magenta", 75.0);
    magenta.tone_curve = CurveConfig {
        xs: vec![0.0, 0.4, 1.0],
        ys: vec![0.0, 0.7, 1.0],
    };
    magenta.offset_x = 0.25;
    magenta.interlaced = false;

    let mut yellow = screen(2, "bayer4", "#ffff00", "yellow", 0.0);
    yellow.negative = true;
    yellow.collapsed = true;

    let mut config = ProjectConfig {
        size,
        screens: vec![
            screen(0, "circle", "#00ffff", "cyan", 15.0),
            magenta,
            yellow,
        ],
        ..ProjectConfig::default()
    };
    config.output.composition_mode = "subtractive".to_string();
    config
}
