//! Source image loading.
//!
//! PNGs of any color type and bit depth are normalised to straight RGBA8,
//! then resampled so the longest side equals the project size while keeping
//! the aspect ratio:
//!
//! | Aspect | Width | Height |
//! |--------|-------|--------|
//! | `w >= h` | `size` | `floor(size / aspect)` |
//! | `w < h` | `floor(size * aspect)` | `size` |

use std::io::{BufRead, Seek};
use std::path::Path;

use halftone_core::Raster;
use tiny_skia::{ColorU8, FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::error::ImageError;

/// Decode a PNG file and fit it to `size`.
pub fn load_png(path: &Path, size: u32) -> Result<Raster, ImageError> {
    let file = std::fs::File::open(path)?;
    let decoded = decode_png(std::io::BufReader::new(file))?;
    tracing::info!(
        path = %path.display(),
        width = decoded.width(),
        height = decoded.height(),
        "Decoded source image"
    );
    fit_to_size(&decoded, size)
}

/// Decode PNG bytes into straight RGBA8 at their native size.
pub fn decode_png<R: BufRead + Seek>(reader: R) -> Result<Raster, ImageError> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| ImageError::Decode(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| ImageError::Decode(e.to_string()))?;
    buf.truncate(info.buffer_size());

    if info.width == 0 || info.height == 0 {
        return Err(ImageError::Empty {
            width: info.width,
            height: info.height,
        });
    }

    let rgba: Vec<u8> = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|px| [px[0], px[0], px[0], px[1]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        other => return Err(ImageError::Unsupported(format!("{other:?}"))),
    };

    Raster::from_rgba(info.width, info.height, rgba)
        .map_err(|e| ImageError::Decode(e.to_string()))
}

/// Target dimensions for fitting `width × height` into `size`.
pub fn fitted_dimensions(width: u32, height: u32, size: u32) -> (u32, u32) {
    let aspect = f64::from(width) / f64::from(height);
    let (w, h) = if aspect >= 1.0 {
        (size, (f64::from(size) / aspect).floor() as u32)
    } else {
        ((f64::from(size) * aspect).floor() as u32, size)
    };
    (w.max(1), h.max(1))
}

/// Resample `source` so its longest side is `size`, bilinear filtered.
///
/// A source that already has the target dimensions is returned unchanged.
pub fn fit_to_size(source: &Raster, size: u32) -> Result<Raster, ImageError> {
    if source.is_empty() || size == 0 {
        return Err(ImageError::Empty {
            width: source.width(),
            height: source.height(),
        });
    }

    let (width, height) = fitted_dimensions(source.width(), source.height(), size);
    if (width, height) == (source.width(), source.height()) {
        return Ok(source.clone());
    }

    let src = to_pixmap(source)?;
    let mut dst = Pixmap::new(width, height)
        .ok_or(ImageError::PixmapAllocation { width, height })?;

    let transform = Transform::from_scale(
        width as f32 / source.width() as f32,
        height as f32 / source.height() as f32,
    );
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    dst.draw_pixmap(0, 0, src.as_ref(), &paint, transform, None);

    tracing::debug!(
        from_width = source.width(),
        from_height = source.height(),
        width,
        height,
        "Resampled source image"
    );
    Ok(from_pixmap(&dst))
}

/// Horizontal white-to-black ramp used as a test pattern.
///
/// Column `x` has grey `round(255 · (1 − x / (width − 1)))`.
pub fn gradient_source(width: u32, height: u32) -> Raster {
    let mut raster = Raster::new(width, height);
    if width == 0 || height == 0 {
        return raster;
    }

    let span = f64::from(width.saturating_sub(1).max(1));
    let row: Vec<u8> = (0..width)
        .flat_map(|x| {
            let grey = (255.0 * (1.0 - f64::from(x) / span) + 0.5).floor() as u8;
            [grey, grey, grey, 255]
        })
        .collect();
    for chunk in raster.data_mut().chunks_exact_mut(row.len()) {
        chunk.copy_from_slice(&row);
    }
    raster
}

fn to_pixmap(raster: &Raster) -> Result<Pixmap, ImageError> {
    let (width, height) = (raster.width(), raster.height());
    let mut pixmap =
        Pixmap::new(width, height).ok_or(ImageError::PixmapAllocation { width, height })?;
    for (dst, px) in pixmap
        .pixels_mut()
        .iter_mut()
        .zip(raster.data().chunks_exact(4))
    {
        *dst = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
    }
    Ok(pixmap)
}

fn from_pixmap(pixmap: &Pixmap) -> Raster {
    let data = pixmap
        .pixels()
        .iter()
        .flat_map(|px| {
            let c = px.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    // Dimensions come from the pixmap itself, so the length always matches.
    Raster::from_rgba(pixmap.width(), pixmap.height(), data)
        .unwrap_or_else(|_| Raster::new(pixmap.width(), pixmap.height()))
}
