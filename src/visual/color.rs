//! Hex colors and interpolation

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("invalid color '{0}': expected #rrggbb or #rgb")]
    InvalidFormat(String),
}

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb`; the leading `#` is optional
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::InvalidFormat(input.to_string());
        let hex = input.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self::new(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Self::new(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(invalid()),
        }
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channel-wise linear interpolation, `t` clamped to `[0, 1]`
    pub fn lerp(&self, other: &Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_and_short_forms() {
        assert_eq!(Rgb::parse("#FF69B4").unwrap(), Rgb::new(255, 105, 180));
        assert_eq!(Rgb::parse("1e90ff").unwrap(), Rgb::new(30, 144, 255));
        assert_eq!(Rgb::parse("#f0a").unwrap(), Rgb::new(255, 0, 170));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", "#", "#12345", "#gggggg", "red", "#1234567"] {
            assert!(Rgb::parse(input).is_err(), "{input} should be rejected");
        }
    }

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        let black = Rgb::new(0, 0, 0);
        let white = Rgb::new(255, 255, 255);
        assert_eq!(black.lerp(&white, 0.0), black);
        assert_eq!(black.lerp(&white, 1.0), white);
        // 127.5 rounds away from zero
        assert_eq!(black.lerp(&white, 0.5).to_hex(), "#808080");
    }
}
