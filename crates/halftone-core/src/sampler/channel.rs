//! Scalar channels derived from an RGBA pixel.

use std::fmt;
use std::str::FromStr;

use crate::api::ParseSelectorError;
use crate::color::Hsl;

/// Which scalar a layer reads from the source image.
///
/// All channels are in `[0, 1]`. Darkness and the CMY channels are
/// inverted so that "more ink" means a larger value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Channel {
    /// `1 − mean(R, G, B)`
    #[default]
    Darkness,
    Red,
    Green,
    Blue,
    /// `1 − R`
    Cyan,
    /// `1 − G`
    Magenta,
    /// `1 − B`
    Yellow,
    Hue,
    Saturation,
    Lightness,
}

impl Channel {
    pub const ALL: [Channel; 10] = [
        Self::Darkness,
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Cyan,
        Self::Magenta,
        Self::Yellow,
        Self::Hue,
        Self::Saturation,
        Self::Lightness,
    ];

    /// Lowercase name used in project files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Darkness => "darkness",
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Cyan => "cyan",
            Self::Magenta => "magenta",
            Self::Yellow => "yellow",
            Self::Hue => "hue",
            Self::Saturation => "saturation",
            Self::Lightness => "lightness",
        }
    }

    /// Evaluate the channel for one opaque-enough pixel.
    pub fn of_rgb(self, rgb: [u8; 3]) -> f64 {
        let r = f64::from(rgb[0]) / 255.0;
        let g = f64::from(rgb[1]) / 255.0;
        let b = f64::from(rgb[2]) / 255.0;
        match self {
            Self::Darkness => 1.0 - (r + g + b) / 3.0,
            Self::Red => r,
            Self::Green => g,
            Self::Blue => b,
            Self::Cyan => 1.0 - r,
            Self::Magenta => 1.0 - g,
            Self::Yellow => 1.0 - b,
            Self::Hue => Hsl::from_rgb(r, g, b).h,
            Self::Saturation => Hsl::from_rgb(r, g, b).s,
            Self::Lightness => Hsl::from_rgb(r, g, b).l,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Channel {
    type Err = ParseSelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|c| c.name()).collect();
                ParseSelectorError::new("channel", s, &names)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for channel in Channel::ALL {
            assert_eq!(channel.name().parse::<Channel>().unwrap(), channel);
        }
    }

    #[test]
    fn test_unknown_name_lists_choices() {
        let err = "brightness".parse::<Channel>().unwrap_err();
        assert_eq!(err.value, "brightness");
        assert!(err.expected.starts_with("darkness, red"));
    }

    #[test]
    fn test_darkness_of_black_and_white() {
        assert_eq!(Channel::Darkness.of_rgb([0, 0, 0]), 1.0);
        assert_eq!(Channel::Darkness.of_rgb([255, 255, 255]), 0.0);
    }

    #[test]
    fn test_cmy_invert_rgb() {
        let px = [255, 0, 51];
        assert_eq!(Channel::Cyan.of_rgb(px), 0.0);
        assert_eq!(Channel::Magenta.of_rgb(px), 1.0);
        assert!((Channel::Yellow.of_rgb(px) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_hsl_channels() {
        // Pure green: hue 1/3, fully saturated, half lightness
        let px = [0, 255, 0];
        assert!((Channel::Hue.of_rgb(px) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(Channel::Saturation.of_rgb(px), 1.0);
        assert_eq!(Channel::Lightness.of_rgb(px), 0.5);
    }
}
