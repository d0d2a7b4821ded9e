//! halftone-core: multi-layer halftone rendering
//!
//! This library turns a raster image into a stack of halftone screens. Each
//! screen samples one intensity channel on a rotated grid, maps it through a
//! tone curve and draws a dot per cell; the screens are then blended onto a
//! background.
//!
//! # Quick Start
//!
//! The [`Halftoner`] builder is the primary entry point:
//!
//! ```
//! use halftone_core::{Halftoner, Raster, ScreenLayer, ScreenOptions};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let layer = ScreenLayer::new(0, ScreenOptions::new().grid_size(6.0)).unwrap();
//! let mut halftoner = Halftoner::new().screen(layer);
//!
//! let source = Raster::filled(24, 24, [90, 90, 90, 255]);
//! let output = halftoner.render(source, &mut StdRng::seed_from_u64(7)).unwrap();
//!
//! assert_eq!(output.width(), 24);
//! assert_eq!(output.height(), 24);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! source RGBA ──► source noise ──► IntensitySampler
//!                                        │
//!                  ┌─────────────────────┼─────────────────────┐
//!                  ▼                     ▼                     ▼
//!             ScreenLayer 0         ScreenLayer 1   ...   ScreenLayer n
//!        (grid walk, tone curve, dot shape → private buffer)
//!                  │                     │                     │
//!                  └──────────► composite (background, ◄───────┘
//!                                blend mode, smooth)
//!                                        │
//!                                        ▼
//!                                 output noise ──► output RGBA
//! ```
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`curve`] | Barycentric Lagrange tone curves |
//! | [`geometry`] | Rotated rectangles and regular polygons |
//! | [`texture`] | Clustered-dot, Euclidean and Bayer texture packs |
//! | [`sampler`] | Channel extraction and block noise |
//! | [`screen`] | Layer options, dot shapes and the grid walk |
//! | [`compose`] | Normal, additive and subtractive blending |
//! | [`output`] | RGBA buffers and the anti-aliased rasterizer |
//!
//! # Rotation convention
//!
//! Every rotation (grid, texture cells, rotated rectangles) uses
//! `x' = x·cos + y·sin`, `y' = −x·sin + y·cos`. In image coordinates this
//! turns counter-clockwise as seen on screen.
//!
//! # Determinism
//!
//! Apart from the two noise stages, a pass is a pure function of the source
//! and the options. Noise takes an injected [`rand::Rng`], so seeding it
//! makes the whole pass reproducible.

pub mod api;
pub mod color;
pub mod compose;
pub mod curve;
pub mod geometry;
pub mod output;
pub mod sampler;
pub mod screen;
pub mod texture;


pub use api::{HalftoneError, Halftoner, ParseSelectorError};
pub use color::{Hsl, ParseColorError, Rgb};
pub use compose::{composite, BlendMode, ComposeError, ComposeOptions};
pub use curve::{ControlPoint, CurveError, ToneCurve};
pub use geometry::Point;
pub use output::{Raster, RasterError};
pub use sampler::{inject_noise, Channel, IntensitySampler, NoiseOptions};
pub use screen::{DotShape, ScreenLayer, ScreenOptions};
pub use texture::{PackKind, TextureMask, TexturePack};
