//! Assertion helpers for tests.

use halftone_core::Raster;
use pretty_assertions::assert_eq;

/// Assert bytes start with the PNG signature
pub fn assert_png(bytes: &[u8]) {
    assert!(
        bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}

/// Assert two rasters have identical dimensions and pixels
pub fn assert_same_pixels(actual: &Raster, expected: &Raster) {
    assert_eq!(
        (actual.width(), actual.height()),
        (expected.width(), expected.height()),
        "Dimensions differ"
    );
    let differing = actual
        .data()
        .chunks_exact(4)
        .zip(expected.data().chunks_exact(4))
        .filter(|(a, b)| a != b)
        .count();
    assert_eq!(differing, 0, "{differing} pixels differ");
}

/// Assert every pixel of the output is fully opaque
pub fn assert_opaque(raster: &Raster) {
    assert!(
        raster.data().chunks_exact(4).all(|px| px[3] == 255),
        "Output contains non-opaque pixels"
    );
}
