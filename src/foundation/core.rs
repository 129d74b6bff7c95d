use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::foundation::{
    color::Rgb8,
    error::{CaptionError, CaptionResult},
};

/// Caption styling shared by every layer of one job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    /// Font size in pixels; also drives the band height.
    pub font_size_px: u32,
    /// CSS-like family list, e.g. `"Noto Sans, sans-serif"`.
    pub font_family: String,
    /// Caption text color.
    pub text_color: Rgb8,
    /// Band fill color.
    pub bg_color: Rgb8,
    /// Band fill opacity in `[0, 1]`.
    pub bg_opacity: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_size_px: 24,
            font_family: "sans-serif".to_owned(),
            text_color: Rgb8::new(255, 255, 255),
            bg_color: Rgb8::new(0, 0, 0),
            bg_opacity: 0.5,
        }
    }
}

impl StyleConfig {
    /// Parse a style from JSON. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> CaptionResult<Self> {
        let style: Self = serde_json::from_str(s)
            .map_err(|e| CaptionError::validation(format!("style json: {e}")))?;
        style.validate()?;
        Ok(style)
    }

    /// Read and parse a JSON style file.
    pub fn from_path(path: &Path) -> CaptionResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read style file '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Check value ranges.
    pub fn validate(&self) -> CaptionResult<()> {
        if self.font_size_px == 0 {
            return Err(CaptionError::validation("font_size_px must be > 0"));
        }
        if !self.bg_opacity.is_finite() || !(0.0..=1.0).contains(&self.bg_opacity) {
            return Err(CaptionError::validation(format!(
                "bg_opacity must be within [0, 1], got {}",
                self.bg_opacity
            )));
        }
        Ok(())
    }
}

/// Size limits applied to a source image before any rendering happens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputLimits {
    /// Maximum encoded file size in bytes.
    pub max_bytes: u64,
    /// Maximum width and height in pixels.
    pub max_dimension: u32,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            max_dimension: 4096,
        }
    }
}

impl InputLimits {
    /// Reject encoded sources larger than `max_bytes`.
    pub fn check_byte_len(&self, len: u64) -> CaptionResult<()> {
        if len > self.max_bytes {
            return Err(CaptionError::oversized(format!(
                "source is {len} bytes, limit is {}",
                self.max_bytes
            )));
        }
        Ok(())
    }

    /// Reject sources wider or taller than `max_dimension`.
    pub fn check_dimensions(&self, width: u32, height: u32) -> CaptionResult<()> {
        if width > self.max_dimension || height > self.max_dimension {
            return Err(CaptionError::oversized(format!(
                "source is {width}x{height}, limit is {0}x{0}",
                self.max_dimension
            )));
        }
        Ok(())
    }
}

/// Trim each caption and drop the blank ones, keeping order.
pub fn normalize_caption_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .map(|l| l.as_ref().trim())
        .filter(|l| !l.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Split a multi-line text blob into caption lines.
pub fn caption_lines_from_text(text: &str) -> Vec<String> {
    normalize_caption_lines(&text.lines().collect::<Vec<_>>())
}

/// Output file name for an export taken at `unix_millis`.
pub fn default_output_name(unix_millis: u128) -> String {
    format!("caption_puzzle_{unix_millis}.png")
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
