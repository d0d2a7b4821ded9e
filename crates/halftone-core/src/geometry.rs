//! Rotated rectangles, regular polygons and the grid rotation convention.
//!
//! Every rotation in the crate uses the same sign convention:
//!
//! ```text
//! rx =  x·cos(a) + y·sin(a)
//! ry = -x·sin(a) + y·cos(a)
//! ```
//!
//! In image coordinates (y pointing down) this turns shapes counter-clockwise
//! on screen, which is the same as rotating the canvas under a fixed shape.
//! Grid walking, texture masks and dot shapes must all agree on it.

/// A point in image space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by `(dx, dy)`.
    #[inline]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Rotate a vector about the origin.
#[inline]
pub fn rotate(x: f64, y: f64, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    Point::new(x * cos + y * sin, -x * sin + y * cos)
}

/// Rotate `point` about `center`.
#[inline]
pub fn rotate_about(point: Point, center: Point, angle: f64) -> Point {
    rotate(point.x - center.x, point.y - center.y, angle).offset(center.x, center.y)
}

/// Corners of a `width × height` rectangle centred on the origin, rotated by
/// `angle` radians.
///
/// Corners are listed as `(-w/2, -h/2)`, `(-w/2, h/2)`, `(w/2, h/2)`,
/// `(w/2, -h/2)` before rotation.
pub fn rotated_rectangle(width: f64, height: f64, angle: f64) -> [Point; 4] {
    let hw = width / 2.0;
    let hh = height / 2.0;
    [(-hw, -hh), (-hw, hh), (hw, hh), (hw, -hh)].map(|(x, y)| rotate(x, y, angle))
}

/// Corners of a rotated square; see [`rotated_rectangle`].
#[inline]
pub fn rotated_square(size: f64, angle: f64) -> [Point; 4] {
    rotated_rectangle(size, size, angle)
}

/// Vertices of a regular `n`-gon of the given radius around the origin.
///
/// Returns `n + 1` points: the outline is closed by repeating the first
/// vertex. Vertex `k` sits at angle `2πk/n + angle_offset`.
pub fn regular_polygon(n: usize, radius: f64, angle_offset: f64) -> Vec<Point> {
    (0..=n)
        .map(|k| {
            let theta = 2.0 * k as f64 * std::f64::consts::PI / n as f64 + angle_offset;
            Point::new(radius * theta.cos(), radius * theta.sin())
        })
        .collect()
}
