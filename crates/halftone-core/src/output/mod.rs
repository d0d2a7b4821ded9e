//! Pixel buffers and the shape rasterizer.
//!
//! [`Raster`] is the exchange format between every stage of the pipeline:
//! the decoded source, each layer's private buffer and the composited output
//! are all straight-alpha RGBA8. [`Canvas`] is the drawing surface a layer
//! fills during one pass; it is converted into a [`Raster`] when the pass
//! finishes.

mod canvas;
mod raster;

pub use canvas::Canvas;
pub use raster::{Raster, RasterError};
