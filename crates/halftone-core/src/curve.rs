//! Tone curves: barycentric Lagrange interpolation through control points.
//!
//! A [`ToneCurve`] maps a sampled intensity to an adjusted intensity. The
//! curve passes exactly through every control point and extrapolates
//! polynomially outside their span. No clamping is done here; layers clamp
//! the result to `[0, 1]` themselves.
//!
//! Weights follow the barycentric form
//!
//! ```text
//! w_j = 1 / Π_{i≠j} (x_j - x_i)
//! f(x) = Σ w_j·y_j/(x - x_j) / Σ w_j/(x - x_j)
//! ```
//!
//! which is undefined at `x == x_j`; evaluation returns `y_j` directly there.

/// A single interpolation anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    pub x: f64,
    pub y: f64,
}

impl ControlPoint {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for ControlPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Error building a tone curve.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurveError {
    /// No control points were given
    #[error("tone curve needs at least one control point")]
    Empty,
    /// Two control points share an x-coordinate; the weights would divide by zero
    #[error("duplicate control point x-coordinate {x}")]
    DuplicateX { x: f64 },
    /// A control point coordinate is NaN or infinite
    #[error("non-finite control point ({x}, {y})")]
    NonFinite { x: f64, y: f64 },
    /// Serialized `xs` and `ys` differ in length
    #[error("tone curve has {xs} x values but {ys} y values")]
    LengthMismatch { xs: usize, ys: usize },
}

/// Lagrange interpolation through a set of control points.
///
/// Weights are a pure function of the x-coordinates and are recomputed on
/// every [`update`](ToneCurve::update).
///
/// ```
/// use halftone_core::ToneCurve;
///
/// let curve = ToneCurve::identity();
/// assert_eq!(curve.evaluate(0.5), 0.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ToneCurve {
    xs: Vec<f64>,
    ys: Vec<f64>,
    weights: Vec<f64>,
}

impl ToneCurve {
    /// Build a curve from control points.
    ///
    /// Points are used in the given order; x-coordinates must be distinct.
    pub fn new(points: &[ControlPoint]) -> Result<Self, CurveError> {
        let xs = points.iter().map(|p| p.x).collect();
        let ys = points.iter().map(|p| p.y).collect();
        Self::from_xs_ys(xs, ys)
    }

    /// Build a curve from parallel coordinate vectors, the serialized form.
    pub fn from_xs_ys(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, CurveError> {
        if xs.len() != ys.len() {
            return Err(CurveError::LengthMismatch {
                xs: xs.len(),
                ys: ys.len(),
            });
        }
        let weights = compute_weights(&xs, &ys)?;
        Ok(Self { xs, ys, weights })
    }

    /// The straight line through `(0, 0)` and `(1, 1)`.
    pub fn identity() -> Self {
        Self {
            xs: vec![0.0, 1.0],
            ys: vec![0.0, 1.0],
            weights: vec![-1.0, 1.0],
        }
    }

    /// Build a curve from points placed in a curve editor.
    ///
    /// Points are sorted by x, then `(0, 0)` is prepended when the first
    /// point is not at `x = 0` and `(1, 1)` appended when the last point is
    /// not at `x = 1`, so the curve always spans the unit interval.
    pub fn from_editor_points(points: &[ControlPoint]) -> Result<Self, CurveError> {
        let mut sorted = points.to_vec();
        sorted.sort_by(|a, b| a.x.total_cmp(&b.x));

        if sorted.first().map_or(true, |p| p.x != 0.0) {
            sorted.insert(0, ControlPoint::new(0.0, 0.0));
        }
        if sorted.last().map_or(true, |p| p.x != 1.0) {
            sorted.push(ControlPoint::new(1.0, 1.0));
        }

        Self::new(&sorted)
    }

    /// Replace the control points and recompute the weights.
    ///
    /// On error the curve is left unchanged.
    pub fn update(&mut self, points: &[ControlPoint]) -> Result<(), CurveError> {
        *self = Self::new(points)?;
        Ok(())
    }

    /// Evaluate the curve at `x`.
    ///
    /// Returns the control point's y exactly when `x` equals one of the
    /// control x-coordinates.
    pub fn evaluate(&self, x: f64) -> f64 {
        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for ((&xj, &yj), &wj) in self.xs.iter().zip(&self.ys).zip(&self.weights) {
            if x == xj {
                return yj;
            }
            let a = wj / (x - xj);
            numerator += a * yj;
            denominator += a;
        }
        numerator / denominator
    }

    /// Control point x-coordinates.
    #[inline]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Control point y-coordinates.
    #[inline]
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Barycentric weights, one per control point.
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Iterate over the control points.
    pub fn points(&self) -> impl Iterator<Item = ControlPoint> + '_ {
        self.xs
            .iter()
            .zip(&self.ys)
            .map(|(&x, &y)| ControlPoint::new(x, y))
    }

    /// Number of control points.
    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

impl Default for ToneCurve {
    fn default() -> Self {
        Self::identity()
    }
}

fn compute_weights(xs: &[f64], ys: &[f64]) -> Result<Vec<f64>, CurveError> {
    if xs.is_empty() {
        return Err(CurveError::Empty);
    }
    if let Some((&x, &y)) = xs
        .iter()
        .zip(ys)
        .find(|(x, y)| !x.is_finite() || !y.is_finite())
    {
        return Err(CurveError::NonFinite { x, y });
    }

    let mut weights = Vec::with_capacity(xs.len());
    for (j, &xj) in xs.iter().enumerate() {
        let mut product = 1.0;
        for (i, &xi) in xs.iter().enumerate() {
            if i != j {
                product *= xj - xi;
            }
        }
        if product == 0.0 {
            return Err(CurveError::DuplicateX { x: xj });
        }
        weights.push(1.0 / product);
    }
    Ok(weights)
}
