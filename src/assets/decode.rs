use std::{io::Cursor, path::Path};

use anyhow::Context;

use crate::foundation::{core::InputLimits, error::CaptionResult};

/// Decode encoded image bytes into straight RGBA8, enforcing `limits` first.
///
/// The byte length and the header dimensions are checked before any pixel
/// data is decoded.
pub fn decode_source_image(bytes: &[u8], limits: &InputLimits) -> CaptionResult<image::RgbaImage> {
    limits.check_byte_len(bytes.len() as u64)?;

    let (width, height) = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("guess image format")?
        .into_dimensions()
        .context("read image dimensions")?;
    limits.check_dimensions(width, height)?;

    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(dyn_img.to_rgba8())
}

/// Read and decode a source image file.
pub fn load_source_image(path: &Path, limits: &InputLimits) -> CaptionResult<image::RgbaImage> {
    let len = std::fs::metadata(path)
        .with_context(|| format!("stat image '{}'", path.display()))?
        .len();
    limits.check_byte_len(len)?;

    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_source_image(&bytes, limits)
}

/// Encode an RGBA8 image as PNG bytes.
pub fn encode_png(img: &image::RgbaImage) -> CaptionResult<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
