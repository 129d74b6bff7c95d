use std::collections::HashMap;

use crate::{
    assets::fonts::{FontFace, FontLibrary, TextBrushRgba8, TextLayoutEngine},
    foundation::{
        core::StyleConfig,
        error::{CaptionError, CaptionResult},
        geometry::BandGeometry,
    },
    render::blend::{fill_over, over, unpremultiply},
};

/// Paints one caption band onto a copy of the source image.
///
/// Holds a text layout engine and decoded fonts, so one renderer should be
/// reused for every line a worker handles.
#[derive(Default)]
pub struct BandRenderer {
    engine: TextLayoutEngine,
    font_cache: HashMap<usvg::fontdb::ID, vello_cpu::peniko::FontData>,
}

impl BandRenderer {
    /// Fresh renderer with empty caches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce a layer: `source` with `text` in a translucent band along its bottom edge.
    ///
    /// Rows above the band are copied untouched. The band fill is blended over
    /// the source pixels, then the text is blended over the fill.
    pub fn render_layer(
        &mut self,
        source: &image::RgbaImage,
        text: &str,
        style: &StyleConfig,
        face: &FontFace,
    ) -> CaptionResult<image::RgbaImage> {
        let (width, height) = source.dimensions();
        let geom = BandGeometry::for_image(width, height, style.font_size_px)?;

        let text_px = self.rasterize_caption(text, geom, style, face)?;

        let mut out = source.clone();
        paint_band_fill(&mut out, geom, style);
        blend_text_strip(&mut out, geom, &text_px);

        tracing::debug!(
            width,
            height,
            band_height = geom.band_height,
            chars = text.chars().count(),
            "rendered caption layer"
        );
        Ok(out)
    }

    /// Rasterize `text` into a transparent `width x band_height` strip of
    /// premultiplied RGBA8.
    fn rasterize_caption(
        &mut self,
        text: &str,
        geom: BandGeometry,
        style: &StyleConfig,
        face: &FontFace,
    ) -> CaptionResult<Vec<u8>> {
        let width_u16: u16 = geom
            .width
            .try_into()
            .map_err(|_| CaptionError::render("layer width exceeds u16"))?;
        let band_u16: u16 = geom
            .band_height
            .try_into()
            .map_err(|_| CaptionError::render("band height exceeds u16"))?;

        let brush = TextBrushRgba8 {
            r: style.text_color.r,
            g: style.text_color.g,
            b: style.text_color.b,
            a: 255,
        };
        let layout = self
            .engine
            .layout_line(text, face, style.font_size_px as f32, brush)?;
        let origin = caption_origin(
            geom,
            f64::from(layout.width()),
            f64::from(layout.height()),
        );
        let font = self.font_for(face);

        let mut ctx = vello_cpu::RenderContext::new(width_u16, band_u16);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(width_u16, band_u16);
        ctx.render_to_pixmap(&mut pixmap);
        Ok(pixmap.data_as_u8_slice().to_vec())
    }

    fn font_for(&mut self, face: &FontFace) -> vello_cpu::peniko::FontData {
        self.font_cache
            .entry(face.id)
            .or_insert_with(|| {
                let bytes = face.bytes.as_ref().clone();
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(bytes),
                    face.index,
                )
            })
            .clone()
    }
}

/// Blend the style's band fill over the band rows of `img`.
pub(crate) fn paint_band_fill(img: &mut image::RgbaImage, geom: BandGeometry, style: &StyleConfig) {
    let bg = style.bg_color;
    fill_over(
        band_rows_mut(img, geom),
        [bg.r, bg.g, bg.b, 255],
        style.bg_opacity,
    );
}

fn blend_text_strip(img: &mut image::RgbaImage, geom: BandGeometry, text_px: &[u8]) {
    for (d, s) in band_rows_mut(img, geom)
        .chunks_exact_mut(4)
        .zip(text_px.chunks_exact(4))
    {
        if s[3] == 0 {
            continue;
        }
        let blended = over(
            [d[0], d[1], d[2], d[3]],
            unpremultiply([s[0], s[1], s[2], s[3]]),
            1.0,
        );
        d.copy_from_slice(&blended);
    }
}

fn band_rows_mut(img: &mut image::RgbaImage, geom: BandGeometry) -> &mut [u8] {
    let start = geom.band_top_y() as usize * geom.width as usize * 4;
    let pixels: &mut [u8] = img;
    &mut pixels[start..]
}

/// Top-left corner, in band coordinates, of a `text_width x text_height` box
/// centered in the band. Negative when the text is wider than the image.
pub fn caption_origin(geom: BandGeometry, text_width: f64, text_height: f64) -> kurbo::Point {
    kurbo::Point::new(
        (f64::from(geom.width) - text_width) / 2.0,
        (f64::from(geom.band_height) - text_height) / 2.0,
    )
}

/// Render one layer, resolving the style's font family from `fonts`.
pub fn render_band_layer(
    source: &image::RgbaImage,
    text: &str,
    style: &StyleConfig,
    fonts: &FontLibrary,
) -> CaptionResult<image::RgbaImage> {
    style.validate()?;
    let face = fonts.resolve(&style.font_family)?;
    BandRenderer::new().render_layer(source, text, style, &face)
}

#[cfg(test)]
#[path = "../../tests/unit/render/band.rs"]
mod tests;
