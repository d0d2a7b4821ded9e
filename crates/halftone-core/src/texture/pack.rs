//! Procedural construction of the texture packs.
//!
//! Every builder returns `size² + 1` masks. Mask `b` is the pattern for
//! coverage level `b / size²`; mask 0 is always empty.

use super::TextureMask;

/// An ordered sequence of masks indexed by coverage level.
#[derive(Debug, Clone, PartialEq)]
pub struct TexturePack {
    masks: Vec<TextureMask>,
}

impl TexturePack {
    pub fn new(masks: Vec<TextureMask>) -> Self {
        Self { masks }
    }

    /// Number of masks (coverage levels).
    #[inline]
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&TextureMask> {
        self.masks.get(index)
    }

    pub fn masks(&self) -> &[TextureMask] {
        &self.masks
    }

    /// Mask for an intensity in `[0, 1]`: index `round(intensity · (len − 1))`,
    /// clamped to the pack.
    pub fn for_intensity(&self, intensity: f64) -> Option<&TextureMask> {
        let last = self.masks.len().checked_sub(1)?;
        let index = (intensity * last as f64).round();
        let index = if index.is_nan() || index < 0.0 {
            0
        } else {
            (index as usize).min(last)
        };
        self.masks.get(index)
    }
}

/// `(row, col)` of every cell in a `size × size` square, ranked by distance
/// from the square's centre point `(size/2, size/2)`.
///
/// The sort is stable, so equidistant cells keep row-major order.
fn ranked_cells(size: usize) -> Vec<(usize, usize)> {
    let half = size as f64 / 2.0;
    let mut cells: Vec<(usize, usize, f64)> = (0..size)
        .flat_map(|k| (0..size).map(move |l| (k, l)))
        .map(|(k, l)| {
            let i = k as f64 - half;
            let j = l as f64 - half;
            (k, l, (i * i + j * j).sqrt())
        })
        .collect();
    cells.sort_by(|a, b| a.2.total_cmp(&b.2));
    cells.into_iter().map(|(k, l, _)| (k, l)).collect()
}

/// Clustered-dot pack: a single dot grows outward from the centre.
///
/// Level `b` turns on the `b` cells closest to the centre.
pub fn clustered_dot_pack(size: usize) -> TexturePack {
    let ranked = ranked_cells(size);
    let masks = (0..=size * size)
        .map(|bound| {
            let mut mask = TextureMask::new(size, 1.0);
            for &(k, l) in &ranked[..bound] {
                mask.set(k, l);
            }
            mask
        })
        .collect();
    TexturePack::new(masks)
}

/// Euclidean growth pack.
///
/// Masks are `3·size` wide with relative size 3 so they spill into the
/// neighbouring halftone cells. Below half coverage a dot grows in the
/// centre block at twice the clustered rate. From half coverage on the
/// centre block is solid and the cells ranked from `2·(size² − b)` onward
/// are mirrored into the adjacent blocks, so neighbouring dots merge into
/// a checkerboard and finally into solid ink.
///
/// Cells on the half-way row or column satisfy both the `>=` and `<=`
/// tests and are mirrored in both directions.
pub fn euclidean_pack(size: usize) -> TexturePack {
    let ranked = ranked_cells(size);
    let area = size * size;
    let half = size as f64 / 2.0;

    let masks = (0..=area)
        .map(|bound| {
            let mut mask = TextureMask::new(3 * size, 3.0);

            if (bound as f64) < area as f64 / 2.0 {
                for &(kk, ll) in ranked.iter().take(bound * 2) {
                    mask.set(kk + size, ll + size);
                }
                return mask;
            }

            for k in size..2 * size {
                for l in size..2 * size {
                    mask.set(k, l);
                }
            }
            for &(kk, ll) in ranked.iter().skip(2 * (area - bound)) {
                let (k, l) = (kk + size, ll + size);
                let up = kk as f64 >= half;
                let down = kk as f64 <= half;
                let left = ll as f64 >= half;
                let right = ll as f64 <= half;

                if up {
                    mask.set(k - size, l);
                }
                if down {
                    mask.set(k + size, l);
                }
                if left {
                    mask.set(k, l - size);
                }
                if right {
                    mask.set(k, l + size);
                }
                if up && left {
                    mask.set(k - size, l - size);
                }
                if up && right {
                    mask.set(k - size, l + size);
                }
                if down && left {
                    mask.set(k + size, l - size);
                }
                if down && right {
                    mask.set(k + size, l + size);
                }
            }
            mask
        })
        .collect();
    TexturePack::new(masks)
}

/// Recursive Bayer index matrix of side `n` (a power of two, at least 2).
///
/// ```text
/// n = 2:  1 2      n = 2m:  4M+1  4M+2
///         3 0               4M+3  4M
/// ```
///
/// where `M` is the `m × m` matrix. The result is a permutation of
/// `0..n²`.
pub fn bayer_index_matrix(n: usize) -> Vec<Vec<usize>> {
    if n <= 2 {
        return vec![vec![1, 2], vec![3, 0]];
    }
    let m = n / 2;
    let inner = bayer_index_matrix(m);
    let mut matrix = vec![vec![0; n]; n];
    for i in 0..m {
        for j in 0..m {
            let base = 4 * inner[i][j];
            matrix[i][j] = base + 1;
            matrix[i + m][j] = base + 3;
            matrix[i][j + m] = base + 2;
            matrix[i + m][j + m] = base;
        }
    }
    matrix
}

/// Bayer ordered-dither pack.
///
/// Level `b` turns on every cell whose index is at most `b`: level 0 already
/// shows one cell and the last two levels are both full. Sizes that are not
/// a power of two tile the matrix for the largest power of two not
/// exceeding `size`.
pub fn bayer_pack(size: usize) -> TexturePack {
    let n = if size < 2 {
        2
    } else {
        1 << (usize::BITS - 1 - size.leading_zeros())
    };
    let matrix = bayer_index_matrix(n);
    let masks = (0..=size * size)
        .map(|bound| {
            let mut mask = TextureMask::new(size, 1.0);
            for i in 0..size {
                for j in 0..size {
                    if matrix[i % n][j % n] <= bound {
                        mask.set(i, j);
                    }
                }
            }
            mask
        })
        .collect();
    TexturePack::new(masks)
}
