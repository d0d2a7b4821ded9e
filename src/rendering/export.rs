//! PNG export of the composited output.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use halftone_core::Raster;

use crate::error::ExportError;

/// Encode `raster` as an RGBA PNG, upscaled `scale×` nearest-neighbour.
///
/// The encoder output is passed through oxipng; the smaller of the two is
/// returned.
pub fn encode_png(raster: &Raster, scale: u32) -> Result<Vec<u8>, ExportError> {
    if scale == 0 {
        return Err(ExportError::InvalidScale(scale));
    }
    let scaled = if scale == 1 {
        raster.clone()
    } else {
        raster.upscale(scale)?
    };

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, scaled.width(), scaled.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_filter(png::FilterType::NoFilter);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ExportError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(scaled.data())
            .map_err(|e| ExportError::PngEncode(e.to_string()))?;
    }
    let png_bytes = buf.into_inner();

    let opts = oxipng::Options {
        strip: oxipng::StripChunks::Safe,
        optimize_alpha: false,
        ..Default::default()
    };
    let optimized = match oxipng::optimize_from_memory(&png_bytes, &opts) {
        Ok(bytes) if bytes.len() < png_bytes.len() => bytes,
        Ok(_) => png_bytes,
        Err(e) => {
            tracing::debug!(error = %e, "oxipng failed, keeping encoder output");
            png_bytes
        }
    };

    tracing::debug!(
        width = scaled.width(),
        height = scaled.height(),
        scale,
        bytes = optimized.len(),
        "Encoded PNG"
    );
    Ok(optimized)
}

/// `halftone.<YYYYMMDD-HHMMSS>.png` for the current local time.
pub fn default_file_name() -> String {
    format!(
        "halftone.{}.png",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    )
}

/// Encode and write `raster`, returning the path written.
pub fn write_png(raster: &Raster, scale: u32, path: &Path) -> Result<PathBuf, ExportError> {
    let bytes = encode_png(raster, scale)?;
    std::fs::write(path, &bytes)?;
    tracing::info!(
        path = %path.display(),
        bytes = bytes.len(),
        scale,
        "Exported PNG"
    );
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::image_io::decode_png;
    use halftone_core::RasterError;

    #[test]
    fn test_zero_scale_rejected() {
        let raster = Raster::filled(2, 2, [0, 0, 0, 255]);
        assert!(matches!(
            encode_png(&raster, 0),
            Err(ExportError::InvalidScale(0))
        ));
    }

    #[test]
    fn test_oversized_scale_rejected() {
        let raster = Raster::filled(4, 4, [0, 0, 0, 255]);
        assert!(matches!(
            encode_png(&raster, u32::MAX),
            Err(ExportError::Scale(RasterError::TooLarge { factor: u32::MAX, .. }))
        ));
    }

    #[test]
    fn test_encode_is_lossless() {
        let data: Vec<u8> = (0..3u8 * 2)
            .flat_map(|k| [k * 40, 255 - k * 40, k, 255])
            .collect();
        let raster = Raster::from_rgba(3, 2, data).unwrap();
        let png = encode_png(&raster, 1).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(decode_png(Cursor::new(png)).unwrap(), raster);
    }

    #[test]
    fn test_encode_upscaled() {
        let data = vec![255, 0, 0, 255, 0, 0, 255, 255];
        let raster = Raster::from_rgba(2, 1, data).unwrap();
        let decoded = decode_png(Cursor::new(encode_png(&raster, 3).unwrap())).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (6, 3));
        assert_eq!(decoded.pixel(2, 2), [255, 0, 0, 255]);
        assert_eq!(decoded.pixel(3, 0), [0, 0, 255, 255]);
    }

    #[test]
    fn test_default_file_name_shape() {
        let name = default_file_name();
        assert!(name.starts_with("halftone."));
        assert!(name.ends_with(".png"));
        // halftone. + YYYYMMDD-HHMMSS + .png
        assert_eq!(name.len(), 9 + 15 + 4);
    }
}
