use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{CaptionError, CaptionResult};

/// Opaque sRGB color, written as `#RRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Construct from channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` string.
    pub fn from_hex(hex: &str) -> CaptionResult<Self> {
        if hex.len() != 7 || !hex.starts_with('#') {
            return Err(CaptionError::invalid_color(format!(
                "expected #RRGGBB, got \"{hex}\""
            )));
        }
        let digits = &hex[1..];
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CaptionError::invalid_color(format!(
                "non-hex digit in \"{hex}\""
            )));
        }

        let byte = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| CaptionError::invalid_color(format!("invalid hex byte in \"{hex}\"")))
        };
        Ok(Self {
            r: byte(0..2)?,
            g: byte(2..4)?,
            b: byte(4..6)?,
        })
    }

    /// Uppercase `#RRGGBB` form.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Attach an opacity, producing a translucent color.
    pub fn with_opacity(self, opacity: f32) -> RgbaColor {
        RgbaColor {
            r: self.r,
            g: self.g,
            b: self.b,
            alpha: opacity,
        }
    }
}

impl TryFrom<String> for Rgb8 {
    type Error = CaptionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(value.trim())
    }
}

impl From<Rgb8> for String {
    fn from(value: Rgb8) -> Self {
        value.to_hex()
    }
}

/// Straight-alpha color with fractional opacity, as used for band fills.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RgbaColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
}

impl RgbaColor {
    /// Quantize to straight RGBA8.
    pub fn to_rgba8(self) -> [u8; 4] {
        let a = (self.alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        [self.r, self.g, self.b, a]
    }
}

impl fmt::Display for RgbaColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.alpha)
    }
}

/// Convert `#RRGGBB` plus an opacity into an [`RgbaColor`].
pub fn hex_to_rgba(hex: &str, opacity: f32) -> CaptionResult<RgbaColor> {
    Ok(Rgb8::from_hex(hex)?.with_opacity(opacity))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
