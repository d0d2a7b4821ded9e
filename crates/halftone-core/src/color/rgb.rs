//! 8-bit RGB ink and background colors.
//!
//! Colors enter the pipeline as hex strings from the project file and are
//! parsed once at the configuration boundary.

use std::fmt;
use std::str::FromStr;

use super::ParseColorError;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    /// Red channel (0..=255)
    pub r: u8,
    /// Green channel (0..=255)
    pub g: u8,
    /// Blue channel (0..=255)
    pub b: u8,
}

impl Rgb {
    /// Pure black, the default ink.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Pure white, the default background.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a color from 8-bit channel values.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channel values as `[R, G, B]`.
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Channel values as `[R, G, B, 255]`.
    #[inline]
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    /// Lowercase `#rrggbb` representation.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Parse a color from a hex string.
    ///
    /// Accepts `#RRGGBB`, `RRGGBB`, `#RGB` and `RGB`, case-insensitive,
    /// with surrounding whitespace trimmed.
    ///
    /// ```
    /// use halftone_core::Rgb;
    ///
    /// let red: Rgb = "#F00".parse().unwrap();
    /// assert_eq!(red, Rgb::new(255, 0, 0));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseColorError::InvalidHex(s.to_string()));
        }

        // All characters are ASCII hex digits from here on, so byte slicing is safe.
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ParseColorError::InvalidHex(s.to_string()))
        };

        match digits.len() {
            3 => Ok(Self::new(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
            )),
            6 => Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            _ => Err(ParseColorError::InvalidLength(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_six_digit() {
        let color: Rgb = "#1a2B3c".parse().unwrap();
        assert_eq!(color, Rgb::new(0x1a, 0x2b, 0x3c));
    }

    #[test]
    fn test_parse_without_hash_and_whitespace() {
        let color: Rgb = "  ffffff ".parse().unwrap();
        assert_eq!(color, Rgb::WHITE);
    }

    #[test]
    fn test_parse_shorthand_expands() {
        let color: Rgb = "#0f8".parse().unwrap();
        assert_eq!(color, Rgb::new(0, 255, 136));
    }

    #[test]
    fn test_parse_invalid_length() {
        let err = "#12345".parse::<Rgb>().unwrap_err();
        assert_eq!(err, ParseColorError::InvalidLength("#12345".to_string()));
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        assert!(matches!(
            "#gg0000".parse::<Rgb>(),
            Err(ParseColorError::InvalidHex(_))
        ));
        // A sign is accepted by from_str_radix but never by a color
        assert!(matches!(
            "#+f0000".parse::<Rgb>(),
            Err(ParseColorError::InvalidHex(_))
        ));
        assert!(matches!(
            "#ééé".parse::<Rgb>(),
            Err(ParseColorError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_hex_display() {
        assert_eq!(Rgb::new(255, 0, 16).to_hex(), "#ff0010");
        assert_eq!(Rgb::BLACK.to_string(), "#000000");
    }
}
