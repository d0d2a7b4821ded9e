//! RGB to HSL conversion for the hue, saturation and lightness channels.

/// A color in HSL space with every component in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    /// Hue as a fraction of a full turn, in `[0, 1)`.
    pub h: f64,
    /// Saturation, 0 for achromatic colors.
    pub s: f64,
    /// Lightness, the midpoint of the largest and smallest channel.
    pub l: f64,
}

impl Hsl {
    /// Convert RGB components in `0.0..=1.0` to HSL.
    ///
    /// Uses the standard hexcone formulation. The hue sector is wrapped
    /// with a Euclidean remainder so reds leaning towards magenta stay in
    /// `[0, 1)` instead of going negative.
    pub fn from_rgb(r: f64, g: f64, b: f64) -> Self {
        let cmax = r.max(g).max(b);
        let cmin = r.min(g).min(b);
        let delta = cmax - cmin;

        let mut hue = 0.0;
        if delta > 0.0 {
            hue = if cmax == r {
                60.0 * ((g - b) / delta).rem_euclid(6.0)
            } else if cmax == g {
                60.0 * ((b - r) / delta + 2.0)
            } else {
                60.0 * ((r - g) / delta + 4.0)
            };
        }

        let lightness = (cmax + cmin) / 2.0;
        let saturation = if delta == 0.0 {
            0.0
        } else {
            delta / (1.0 - (2.0 * lightness - 1.0).abs())
        };

        Self {
            h: hue / 360.0,
            s: saturation,
            l: lightness,
        }
    }
}
