//! Straight-alpha RGBA8 pixel buffers.

/// Error constructing or allocating a pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RasterError {
    /// Pixel data does not match `width * height * 4`
    #[error("pixel data has {actual} bytes, expected {expected} for {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    /// Zero-sized source image
    #[error("image has zero size: {width}x{height}")]
    Empty { width: u32, height: u32 },
    /// The rasterizer could not allocate a pixmap
    #[error("failed to allocate {width}x{height} pixmap")]
    Allocation { width: u32, height: u32 },
    /// Upscaled dimensions do not fit the pixel buffer
    #[error("{width}x{height} scaled by {factor} is too large")]
    TooLarge { width: u32, height: u32, factor: u32 },
}

/// A row-major RGBA8 image with non-premultiplied alpha.
///
/// Used for the source image, every layer buffer and the composited output.
///
/// ```
/// use halftone_core::Raster;
///
/// let raster = Raster::filled(2, 2, [255, 0, 0, 255]);
/// assert_eq!(raster.pixel(1, 1), [255, 0, 0, 255]);
/// assert_eq!(raster.data().len(), 2 * 2 * 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    /// A fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// A buffer with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * 4);
        for _ in 0..pixels {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Wrap existing RGBA bytes.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, RasterError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(RasterError::SizeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the buffer has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[inline]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Byte offset of pixel `(x, y)`.
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// RGBA value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the buffer.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let k = self.offset(x, y);
        [
            self.data[k],
            self.data[k + 1],
            self.data[k + 2],
            self.data[k + 3],
        ]
    }

    /// Set every byte to zero (transparent black).
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Reallocate to `width × height` and clear.
    pub fn reset(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(width as usize * height as usize * 4, 0);
    }

    /// Whether every pixel has zero alpha.
    pub fn is_transparent(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Nearest-neighbour upscale by an integer factor.
    ///
    /// Each source pixel becomes a `factor × factor` block. A factor of 1
    /// returns an identical copy. Fails when the scaled image would not fit
    /// in `u32` dimensions or addressable memory.
    pub fn upscale(&self, factor: u32) -> Result<Raster, RasterError> {
        let factor = factor.max(1);
        let too_large = || RasterError::TooLarge {
            width: self.width,
            height: self.height,
            factor,
        };
        let width = self.width.checked_mul(factor).ok_or_else(too_large)?;
        let height = self.height.checked_mul(factor).ok_or_else(too_large)?;
        let row_bytes = (width as usize).checked_mul(4).ok_or_else(too_large)?;
        let len = row_bytes
            .checked_mul(height as usize)
            .ok_or_else(too_large)?;
        let mut data = Vec::with_capacity(len);

        for row in self.data.chunks_exact(self.width.max(1) as usize * 4) {
            let start = data.len();
            for px in row.chunks_exact(4) {
                for _ in 0..factor {
                    data.extend_from_slice(px);
                }
            }
            for _ in 1..factor {
                data.extend_from_within(start..start + row_bytes);
            }
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }
}
