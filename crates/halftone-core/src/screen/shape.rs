//! The twelve dot shapes a layer can stamp into its grid cells.
//!
//! Every shape is sized from the cell intensity, the grid size and the
//! layer's dot-size ratio. `r` below is `intensity · grid / 2 · ratio`.
//!
//! | Shape | Geometry |
//! |-------|----------|
//! | `circle` | circle of radius `r` |
//! | `ellipse` | radii `r` and `r/2`, tilted −45° |
//! | `horizontal` | `grid × intensity·grid·ratio` bar, rotated with the grid |
//! | `vertical` | `intensity·grid·ratio × grid` bar, rotated with the grid |
//! | `square` | side `intensity·grid·ratio`, rotated with the grid |
//! | `triangle` / `hexagon` / `octagon` | regular polygon of radius `r`, fixed orientation |
//! | `dot` / `euclidean` / `bayer4` / `bayer8` | texture mask for the intensity, spanning `grid·ratio` |

use std::f64::consts::{FRAC_PI_4, PI};
use std::fmt;
use std::str::FromStr;

use crate::api::ParseSelectorError;
use crate::geometry::{regular_polygon, rotated_rectangle, rotated_square};
use crate::output::Canvas;
use crate::texture::PackKind;

/// Dot shape selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DotShape {
    Dot,
    Euclidean,
    Bayer4,
    Bayer8,
    #[default]
    Circle,
    Ellipse,
    Horizontal,
    Vertical,
    Triangle,
    Square,
    Hexagon,
    Octagon,
}

/// Cell geometry shared by every shape in one layer pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    /// Grid cell size in pixels
    pub grid: f64,
    /// Dot-size ratio (raster size)
    pub ratio: f64,
    /// Grid rotation in radians
    pub angle: f64,
}

impl DotShape {
    /// Shapes in the order the editor lists them.
    pub const ALL: [DotShape; 12] = [
        Self::Dot,
        Self::Euclidean,
        Self::Bayer4,
        Self::Bayer8,
        Self::Circle,
        Self::Ellipse,
        Self::Horizontal,
        Self::Vertical,
        Self::Triangle,
        Self::Square,
        Self::Hexagon,
        Self::Octagon,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Euclidean => "euclidean",
            Self::Bayer4 => "bayer4",
            Self::Bayer8 => "bayer8",
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
            Self::Triangle => "triangle",
            Self::Square => "square",
            Self::Hexagon => "hexagon",
            Self::Octagon => "octagon",
        }
    }

    /// The texture pack behind a texture shape.
    pub fn texture(self) -> Option<PackKind> {
        match self {
            Self::Dot => Some(PackKind::Dot),
            Self::Euclidean => Some(PackKind::Euclidean),
            Self::Bayer4 => Some(PackKind::Bayer4),
            Self::Bayer8 => Some(PackKind::Bayer8),
            _ => None,
        }
    }

    /// Stamp the shape for one cell centred on `(x, y)`.
    pub fn draw(self, canvas: &mut Canvas, x: f64, y: f64, intensity: f64, cell: &CellMetrics) {
        let CellMetrics { grid, ratio, angle } = *cell;
        let extent = intensity * grid * ratio;
        let radius = extent / 2.0;

        match self {
            Self::Circle => canvas.fill_circle(x, y, radius),
            Self::Ellipse => canvas.fill_ellipse(x, y, radius, radius * 0.5, -FRAC_PI_4),
            Self::Horizontal => {
                if extent > 0.0 {
                    canvas.fill_polygon(x, y, &rotated_rectangle(grid, extent, angle));
                }
            }
            Self::Vertical => {
                if extent > 0.0 {
                    canvas.fill_polygon(x, y, &rotated_rectangle(extent, grid, angle));
                }
            }
            Self::Square => {
                if extent > 0.0 {
                    canvas.fill_polygon(x, y, &rotated_square(extent, angle));
                }
            }
            Self::Triangle => fill_regular(canvas, x, y, 3, radius, PI),
            Self::Hexagon => fill_regular(canvas, x, y, 6, radius, PI / 6.0),
            Self::Octagon => fill_regular(canvas, x, y, 8, radius, PI / 8.0),
            Self::Dot | Self::Euclidean | Self::Bayer4 | Self::Bayer8 => {
                let Some(kind) = self.texture() else {
                    return;
                };
                if let Some(mask) = kind.pack().for_intensity(intensity) {
                    mask.draw(canvas, x, y, grid * ratio, angle);
                }
            }
        }
    }
}

fn fill_regular(canvas: &mut Canvas, x: f64, y: f64, n: usize, radius: f64, offset: f64) {
    if radius > 0.0 {
        canvas.fill_polygon(x, y, &regular_polygon(n, radius, offset));
    }
}

impl fmt::Display for DotShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DotShape {
    type Err = ParseSelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|shape| shape.name()).collect();
                ParseSelectorError::new("dot style", s, &names)
            })
    }
}
