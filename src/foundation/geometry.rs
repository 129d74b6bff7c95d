use crate::foundation::error::{CaptionError, CaptionResult};

/// Fraction of the image height a caption band may occupy.
pub const MAX_BAND_FRACTION: f64 = 0.3;

/// Vertical padding around the glyphs, relative to the font size.
pub const BAND_PADDING_FACTOR: f64 = 1.2;

/// Height in pixels of the caption band for an image of `image_height` rows.
///
/// This is the only place band height is derived. The renderer and the
/// compositor both call it with the same `(image_height, font_size_px)` pair,
/// so layers are always sliced exactly at the band seam.
pub fn compute_band_height(image_height: u32, font_size_px: u32) -> CaptionResult<u32> {
    if image_height == 0 {
        return Err(CaptionError::validation("image height must be > 0"));
    }
    if font_size_px == 0 {
        return Err(CaptionError::validation("font_size_px must be > 0"));
    }

    let font = f64::from(font_size_px);
    let padded = font + (font * BAND_PADDING_FACTOR).ceil();
    let ceiling = (f64::from(image_height) * MAX_BAND_FRACTION).floor();
    let band = padded.min(ceiling);

    if band < 1.0 {
        return Err(CaptionError::validation(format!(
            "image height {image_height} is too small to hold a caption band"
        )));
    }
    Ok(band as u32)
}

/// Band placement within one layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BandGeometry {
    /// Layer width in pixels.
    pub width: u32,
    /// Layer height in pixels.
    pub height: u32,
    /// Rows covered by the band.
    pub band_height: u32,
}

impl BandGeometry {
    /// Derive the band for a `width x height` layer.
    pub fn for_image(width: u32, height: u32, font_size_px: u32) -> CaptionResult<Self> {
        if width == 0 {
            return Err(CaptionError::validation("image width must be > 0"));
        }
        let band_height = compute_band_height(height, font_size_px)?;
        Ok(Self {
            width,
            height,
            band_height,
        })
    }

    /// First row of the band.
    pub fn band_top_y(self) -> u32 {
        self.height - self.band_height
    }

    /// Height of a composite holding `layers` stacked layers.
    pub fn stacked_height(self, layers: usize) -> u64 {
        let extra = layers.saturating_sub(1) as u64;
        u64::from(self.height) + extra * u64::from(self.band_height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/geometry.rs"]
mod tests;
