//! Pixel blending on straight-alpha RGBA8.

/// Straight (non-premultiplied) RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// Source-over of `src` onto `dst`, with `src` alpha further scaled by `opacity`.
///
/// Fully opaque sources replace `dst` exactly and fully transparent ones leave
/// it untouched, so opaque content survives any number of passes unchanged.
pub fn over(dst: Rgba8, src: Rgba8, opacity: f32) -> Rgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u32;
    let sa = mul_div255(u32::from(src[3]), op);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return [src[0], src[1], src[2], 255];
    }

    let da = mul_div255(u32::from(dst[3]), 255 - sa);
    let oa = sa + da;

    let mut out = [0u8; 4];
    for i in 0..3 {
        let num = u32::from(src[i]) * sa + u32::from(dst[i]) * da;
        out[i] = ((num + oa / 2) / oa).min(255) as u8;
    }
    out[3] = oa.min(255) as u8;
    out
}

/// Blend `src` row-for-row onto `dst`. Both are tightly packed RGBA8.
pub fn over_row(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], 1.0);
        d.copy_from_slice(&out);
    }
}

/// Blend one flat color with `opacity` over every pixel of `dst`.
pub fn fill_over(dst: &mut [u8], color: Rgba8, opacity: f32) {
    for d in dst.chunks_exact_mut(4) {
        let out = over([d[0], d[1], d[2], d[3]], color, opacity);
        d.copy_from_slice(&out);
    }
}

/// Convert a premultiplied pixel back to straight alpha.
pub fn unpremultiply(px: Rgba8) -> Rgba8 {
    let a = u32::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    if a == 255 {
        return px;
    }
    let un = |c: u8| -> u8 { ((u32::from(c) * 255 + a / 2) / a).min(255) as u8 };
    [un(px[0]), un(px[1]), un(px[2]), px[3]]
}

fn mul_div255(x: u32, y: u32) -> u32 {
    (x * y + 127) / 255
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
