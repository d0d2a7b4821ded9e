//! Blend rules for stacking layer ink onto the output.

use std::fmt;
use std::str::FromStr;

use crate::api::ParseSelectorError;

/// How a layer's ink combines with what is already on the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    /// Alpha-over: ink covers the output
    #[default]
    Normal,
    /// Light mixing: ink is added and saturates at white
    Additive,
    /// Ink mixing: each layer filters the light that passes through it
    Subtractive,
}

impl BlendMode {
    pub const ALL: [BlendMode; 3] = [Self::Normal, Self::Additive, Self::Subtractive];

    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Additive => "additive",
            Self::Subtractive => "subtractive",
        }
    }

    /// Blend one channel value `upper` with coverage `a` onto `lower`.
    ///
    /// The result is unrounded; callers store it as a byte.
    #[inline]
    pub fn blend(self, lower: f64, upper: f64, a: f64) -> f64 {
        match self {
            Self::Normal => (1.0 - a) * lower + a * upper,
            Self::Additive => (lower + a * upper).min(255.0),
            Self::Subtractive => {
                let base = 255.0 * (1.0 - a) + upper * a;
                (lower - (255.0 - base)).max(0.0)
            }
        }
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlendMode {
    type Err = ParseSelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|mode| mode.name()).collect();
                ParseSelectorError::new("composition mode", s, &names)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("subtractive".parse::<BlendMode>().unwrap(), BlendMode::Subtractive);
        assert!("multiply".parse::<BlendMode>().is_err());
    }

    #[test]
    fn test_zero_coverage_is_identity() {
        for mode in BlendMode::ALL {
            assert_eq!(mode.blend(123.0, 7.0, 0.0), 123.0);
        }
    }

    #[test]
    fn test_full_coverage() {
        assert_eq!(BlendMode::Normal.blend(255.0, 10.0, 1.0), 10.0);
        assert_eq!(BlendMode::Additive.blend(200.0, 100.0, 1.0), 255.0);
        assert_eq!(BlendMode::Subtractive.blend(255.0, 0.0, 1.0), 0.0);
        assert_eq!(BlendMode::Subtractive.blend(100.0, 255.0, 1.0), 100.0);
    }
}
