//! Anti-aliased shape filling for layer buffers.
//!
//! [`Canvas`] wraps a `tiny_skia::Pixmap` with the handful of primitives the
//! dot shapes need. Shapes that collapse to nothing (zero radius, fewer than
//! three distinct vertices) are skipped silently, matching how a 2D canvas
//! draws nothing for empty paths.

use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform};

use super::{Raster, RasterError};
use crate::color::Rgb;
use crate::geometry::Point;

/// Drawing surface for one layer pass.
pub struct Canvas {
    pixmap: Pixmap,
    ink: Rgb,
}

impl Canvas {
    /// Create a transparent canvas that fills shapes with `ink`.
    pub fn new(width: u32, height: u32, ink: Rgb) -> Result<Self, RasterError> {
        let pixmap = Pixmap::new(width, height).ok_or(RasterError::Allocation { width, height })?;
        Ok(Self { pixmap, ink })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn paint(color: Rgb) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, 255);
        paint.anti_alias = true;
        paint
    }

    fn fill(&mut self, path: &Path) {
        let paint = Self::paint(self.ink);
        self.pixmap
            .fill_path(path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    /// Fill a circle of radius `r` centred at `(cx, cy)`.
    pub fn fill_circle(&mut self, cx: f64, cy: f64, r: f64) {
        if r <= 0.0 {
            return;
        }
        if let Some(path) = PathBuilder::from_circle(cx as f32, cy as f32, r as f32) {
            self.fill(&path);
        }
    }

    /// Fill an ellipse with radii `(rx, ry)` rotated by `rotation` radians
    /// (positive turns clockwise on screen).
    pub fn fill_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, rotation: f64) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let path = Rect::from_xywh(
            (cx - rx) as f32,
            (cy - ry) as f32,
            (2.0 * rx) as f32,
            (2.0 * ry) as f32,
        )
        .and_then(PathBuilder::from_oval)
        .and_then(|oval| {
            oval.transform(Transform::from_rotate_at(
                rotation.to_degrees() as f32,
                cx as f32,
                cy as f32,
            ))
        });
        if let Some(path) = path {
            self.fill(&path);
        }
    }

    /// Fill a polygon given by its vertices, offset by `(cx, cy)`.
    pub fn fill_polygon(&mut self, cx: f64, cy: f64, vertices: &[Point]) {
        let mut builder = PathBuilder::new();
        push_polygon(&mut builder, cx, cy, vertices);
        if let Some(path) = builder.finish() {
            self.fill(&path);
        }
    }

    /// Fill several polygons as one path so shared edges leave no seams.
    pub fn fill_polygons<'a, I>(&mut self, polygons: I)
    where
        I: IntoIterator<Item = (Point, &'a [Point])>,
    {
        let mut builder = PathBuilder::new();
        for (center, vertices) in polygons {
            push_polygon(&mut builder, center.x, center.y, vertices);
        }
        if let Some(path) = builder.finish() {
            self.fill(&path);
        }
    }

    /// Stroke a closed polygon outline one pixel wide.
    pub fn stroke_polygon(&mut self, cx: f64, cy: f64, vertices: &[Point], color: Rgb) {
        let mut builder = PathBuilder::new();
        push_polygon(&mut builder, cx, cy, vertices);
        if let Some(path) = builder.finish() {
            let paint = Self::paint(color);
            let stroke = Stroke {
                width: 1.0,
                ..Stroke::default()
            };
            self.pixmap
                .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    /// Convert the premultiplied pixmap into a straight-alpha [`Raster`].
    pub fn into_raster(self) -> Raster {
        let mut data = Vec::with_capacity(self.pixmap.data().len());
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        Raster::from_rgba(width, height, data).unwrap_or_else(|_| Raster::new(width, height))
    }
}

fn push_polygon(builder: &mut PathBuilder, cx: f64, cy: f64, vertices: &[Point]) {
    let mut points = vertices.iter();
    let Some(first) = points.next() else {
        return;
    };
    builder.move_to((first.x + cx) as f32, (first.y + cy) as f32);
    for p in points {
        builder.line_to((p.x + cx) as f32, (p.y + cy) as f32);
    }
    builder.close();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rotated_square;

    #[test]
    fn test_circle_fills_center_with_ink() {
        let mut canvas = Canvas::new(20, 20, Rgb::new(200, 10, 30)).unwrap();
        canvas.fill_circle(10.0, 10.0, 5.0);
        let raster = canvas.into_raster();
        assert_eq!(raster.pixel(10, 10), [200, 10, 30, 255]);
        assert_eq!(raster.pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_zero_radius_draws_nothing() {
        let mut canvas = Canvas::new(8, 8, Rgb::BLACK).unwrap();
        canvas.fill_circle(4.0, 4.0, 0.0);
        canvas.fill_ellipse(4.0, 4.0, 0.0, 0.0, 0.3);
        canvas.fill_polygon(4.0, 4.0, &rotated_square(0.0, 0.0));
        assert!(canvas.into_raster().is_transparent());
    }

    #[test]
    fn test_square_covers_whole_canvas() {
        let mut canvas = Canvas::new(4, 4, Rgb::BLACK).unwrap();
        canvas.fill_polygon(2.0, 2.0, &rotated_square(4.0, 0.0));
        let raster = canvas.into_raster();
        assert!(raster
            .data()
            .chunks_exact(4)
            .all(|px| px[..3] == [0, 0, 0] && px[3] >= 250));
    }

    #[test]
    fn test_ellipse_is_narrow_across_minor_axis() {
        let mut canvas = Canvas::new(40, 40, Rgb::BLACK).unwrap();
        canvas.fill_ellipse(20.0, 20.0, 15.0, 5.0, 0.0);
        let raster = canvas.into_raster();
        assert_eq!(raster.pixel(32, 20)[3], 255);
        assert_eq!(raster.pixel(20, 32)[3], 0);
    }

    #[test]
    fn test_stroke_leaves_interior_empty() {
        let mut canvas = Canvas::new(20, 20, Rgb::WHITE).unwrap();
        canvas.stroke_polygon(10.0, 10.0, &rotated_square(10.0, 0.0), Rgb::BLACK);
        let raster = canvas.into_raster();
        assert_eq!(raster.pixel(10, 10)[3], 0);
        assert!(raster.pixel(5, 10)[3] > 0);
    }

    #[test]
    fn test_zero_size_pixmap_is_error() {
        assert_eq!(
            Canvas::new(0, 5, Rgb::BLACK).err(),
            Some(RasterError::Allocation {
                width: 0,
                height: 5
            })
        );
    }
}
