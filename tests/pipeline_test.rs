//! End-to-end flow tests: PNG in, pipeline, PNG out.

mod common;

use std::io::Cursor;

use common::fixtures;
use halftone::models::ProjectConfig;
use halftone::rendering::{decode_png, encode_png, load_png, write_png};
use halftone::services::Pipeline;
use halftone_core::Raster;
use pretty_assertions::assert_eq;

#[test]
fn test_png_to_png_flow() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.png");
    let output = dir.path().join("output.png");
    std::fs::write(&input, fixtures::png_bytes(&fixtures::ramp(80, 40))).unwrap();

    let config = fixtures::cmy_project(64);
    let mut pipeline = Pipeline::new(&config).unwrap();
    pipeline.set_source(load_png(&input, 64).unwrap()).unwrap();
    let frame = pipeline.update(&mut fixtures::rng()).unwrap();
    assert_eq!((frame.output.width(), frame.output.height()), (64, 32));
    common::assert_opaque(&frame.output);

    write_png(&frame.output, 2, &output).unwrap();
    let bytes = std::fs::read(&output).unwrap();
    common::assert_png(&bytes);

    let decoded = decode_png(Cursor::new(bytes)).unwrap();
    common::assert_same_pixels(&decoded, &frame.output.upscale(2).unwrap());
}

#[test]
fn test_load_png_fits_portrait() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("portrait.png");
    std::fs::write(&input, fixtures::png_bytes(&fixtures::ramp(30, 90))).unwrap();

    let raster = load_png(&input, 60).unwrap();
    assert_eq!((raster.width(), raster.height()), (20, 60));
}

#[test]
fn test_load_png_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_png(&dir.path().join("nope.png"), 64).is_err());
}

#[test]
fn test_same_seed_same_frames() {
    let mut config = fixtures::cmy_project(32);
    config.source.noise_level = 0.2;
    config.source.noise_scale = 3;
    config.output.noise_level = 0.1;

    let run = || {
        let mut pipeline = Pipeline::new(&config).unwrap();
        pipeline.set_source(fixtures::ramp(32, 32)).unwrap();
        pipeline.animate_enabled();
        let mut rng = fixtures::rng();
        (0..3)
            .map(|_| pipeline.tick(&mut rng).unwrap().output)
            .collect::<Vec<Raster>>()
    };

    let a = run();
    let b = run();
    for (fa, fb) in a.iter().zip(&b) {
        common::assert_same_pixels(fa, fb);
    }
}

#[test]
fn test_animation_moves_the_grid() {
    let mut config = ProjectConfig::with_screens(1);
    config.size = 40;
    config.screens[0].grid_size = 10.0;
    config.screens[0].angle_degree = 0.0;

    let mut pipeline = Pipeline::new(&config).unwrap();
    pipeline
        .set_source(Raster::filled(40, 40, [128, 128, 128, 255]))
        .unwrap();
    let still = pipeline.update(&mut fixtures::rng()).unwrap().output;

    pipeline.animate_enabled();
    for _ in 0..25 {
        pipeline.tick(&mut fixtures::rng()).unwrap();
    }
    let moved = pipeline.update(&mut fixtures::rng()).unwrap().output;
    assert_ne!(still, moved);
}

#[test]
fn test_disabled_project_renders_background() {
    let mut config = fixtures::cmy_project(24);
    for screen in &mut config.screens {
        screen.toggled = false;
    }
    config.output.background = "#336699".to_string();

    let mut pipeline = Pipeline::new(&config).unwrap();
    pipeline.set_source(fixtures::ramp(24, 24)).unwrap();
    let frame = pipeline.update(&mut fixtures::rng()).unwrap();
    assert_eq!(frame.output, Raster::filled(24, 24, [0x33, 0x66, 0x99, 255]));
    assert!(frame.layers.iter().all(|(_, buffer)| buffer.is_transparent()));
}

#[test]
fn test_export_scale_zero_rejected() {
    let raster = Raster::filled(4, 4, [0, 0, 0, 255]);
    assert!(encode_png(&raster, 0).is_err());
}
