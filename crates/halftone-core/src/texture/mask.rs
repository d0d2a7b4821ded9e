//! A single binary dither mask.

use crate::geometry::{rotate, rotated_square, Point};
use crate::output::Canvas;

/// Square grid of on/off cells covering one halftone cell.
///
/// `relative_size` scales the mask relative to the grid cell it is drawn
/// into: a mask with relative size 3 spans three cells in each direction and
/// its centre third lines up with the target cell.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureMask {
    size: usize,
    relative_size: f64,
    cells: Vec<bool>,
}

impl TextureMask {
    /// An all-off mask of side `size`.
    pub fn new(size: usize, relative_size: f64) -> Self {
        Self {
            size,
            relative_size,
            cells: vec![false; size * size],
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn relative_size(&self) -> f64 {
        self.relative_size
    }

    /// Whether cell `(row, col)` is on.
    #[inline]
    pub fn is_on(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.size + col]
    }

    #[inline]
    pub(crate) fn set(&mut self, row: usize, col: usize) {
        self.cells[row * self.size + col] = true;
    }

    /// Number of cells that are on.
    pub fn count_on(&self) -> usize {
        self.cells.iter().filter(|&&on| on).count()
    }

    /// Iterate `(row, col)` of every on cell in row-major order.
    pub fn on_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &on)| on)
            .map(move |(k, _)| (k / self.size, k % self.size))
    }

    /// Centres of the on cells relative to the mask centre, rotated by `angle`.
    ///
    /// `cell_size` is the halftone cell the mask is drawn into; each mask
    /// cell has side `cell_size / size * relative_size`.
    pub fn cell_offsets(&self, cell_size: f64, angle: f64) -> Vec<Point> {
        let scale = self.cell_scale(cell_size);
        let half = self.size as f64 / 2.0;
        self.on_cells()
            .map(|(i, j)| {
                let dx = (j as f64 - half + 0.5) * scale;
                let dy = (i as f64 - half + 0.5) * scale;
                rotate(dx, dy, angle)
            })
            .collect()
    }

    /// Side of one mask cell when drawn into a halftone cell of `cell_size`.
    #[inline]
    pub fn cell_scale(&self, cell_size: f64) -> f64 {
        cell_size / self.size as f64 * self.relative_size
    }

    /// Fill every on cell as a rotated square centred on `(cx, cy)`.
    pub fn draw(&self, canvas: &mut Canvas, cx: f64, cy: f64, cell_size: f64, angle: f64) {
        let scale = self.cell_scale(cell_size);
        if scale <= 0.0 {
            return;
        }
        let square = rotated_square(scale, angle);
        let offsets = self.cell_offsets(cell_size, angle);
        canvas.fill_polygons(
            offsets
                .into_iter()
                .map(|p| (p.offset(cx, cy), square.as_slice())),
        );
    }
}
