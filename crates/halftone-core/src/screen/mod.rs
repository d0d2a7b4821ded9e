//! Halftone screens.
//!
//! A [`ScreenLayer`] walks a rotated, optionally interlaced grid over the
//! source image. For every cell centre that lands near the image it samples
//! one channel, maps it through the layer's tone curve and stamps a
//! [`DotShape`] sized by the result.
//!
//! # Grid walk
//!
//! ```text
//! rows  i ∈ [−gh, 2gh)    gh = height / grid  (÷ ratio when collapsed)
//! cols  j ∈ [−gw, 2gw)    gw = width / grid
//! ```
//!
//! The walk covers three times the image in each direction so that the
//! rotated grid still reaches every corner. Cells whose centre is more than
//! one grid step outside the image are skipped.

mod layer;
mod options;
mod shape;

pub use layer::{ScreenLayer, ANIMATION_STEP};
pub use options::ScreenOptions;
pub use shape::{CellMetrics, DotShape};
