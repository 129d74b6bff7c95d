use crate::{
    foundation::{
        error::{CaptionError, CaptionResult},
        geometry::BandGeometry,
    },
    render::blend::over_row,
};

/// Stack caption layers into one image.
///
/// `layers` arrive in reverse caption order: `layers[0]` holds the last
/// caption and ends up at the bottom, `layers[n - 1]` holds the first caption
/// and is drawn in full at the top. The result is
/// `H + (n - 1) * band_height` rows tall.
///
/// Bodies are drawn first, then the top layer, then every band, so no band is
/// ever covered by image content.
pub fn composite(layers: &[image::RgbaImage], band_height: u32) -> CaptionResult<image::RgbaImage> {
    let (first, rest) = layers
        .split_first()
        .ok_or_else(|| CaptionError::empty_input("no layers to composite"))?;
    let (width, height) = first.dimensions();
    for (i, layer) in rest.iter().enumerate() {
        let (w, h) = layer.dimensions();
        if (w, h) != (width, height) {
            return Err(CaptionError::DimensionMismatch {
                index: i + 1,
                expected_width: width,
                expected_height: height,
                found_width: w,
                found_height: h,
            });
        }
    }
    if band_height == 0 || band_height > height {
        return Err(CaptionError::validation(format!(
            "band height {band_height} must be within 1..={height}"
        )));
    }

    if rest.is_empty() {
        return Ok(first.clone());
    }

    let geom = BandGeometry {
        width,
        height,
        band_height,
    };
    let total_height: u32 = geom
        .stacked_height(layers.len())
        .try_into()
        .map_err(|_| CaptionError::oversized("composite height exceeds u32"))?;
    let body_height = geom.band_top_y();

    let mut out = image::RgbaImage::new(width, total_height);
    let (under, top) = layers.split_at(layers.len() - 1);

    for (i, layer) in under.iter().enumerate() {
        let text_y = total_height - (i as u32 + 1) * band_height;
        let layer_y = text_y - body_height;
        draw_rows(&mut out, layer, 0, layer_y, body_height);
    }

    draw_rows(&mut out, &top[0], 0, 0, height);

    for (i, layer) in under.iter().enumerate() {
        let text_y = total_height - (i as u32 + 1) * band_height;
        draw_rows(&mut out, layer, body_height, text_y, band_height);
    }

    tracing::info!(
        width,
        height = total_height,
        band_height,
        layers = layers.len(),
        "composited caption stack"
    );
    Ok(out)
}

/// Source-over `rows` full-width rows of `src`, starting at `src_y`, onto
/// `dst` at `dst_y`. Both images share a width.
fn draw_rows(dst: &mut image::RgbaImage, src: &image::RgbaImage, src_y: u32, dst_y: u32, rows: u32) {
    let stride = src.width() as usize * 4;
    let len = rows as usize * stride;
    let src_start = src_y as usize * stride;
    let dst_start = dst_y as usize * stride;

    let src_px: &[u8] = src;
    let dst_px: &mut [u8] = dst;
    over_row(
        &mut dst_px[dst_start..dst_start + len],
        &src_px[src_start..src_start + len],
    );
}

#[cfg(test)]
#[path = "../../tests/unit/render/stack.rs"]
mod tests;
