//! captionstack turns one image and a list of caption lines into a single
//! "comic strip" composite.
//!
//! Every caption gets its own copy of the source image with a translucent
//! band painted along the bottom edge. The copies are then stacked so each
//! band sits one band-height above the previous one, with the first caption's
//! copy shown in full at the top.
//!
//! # Pipeline overview
//!
//! 1. **Render**: `source + caption + StyleConfig -> layer` ([`BandRenderer`]), one task per line
//! 2. **Composite**: `layers (last caption first) -> RgbaImage` ([`composite`])
//! 3. **Export** (optional): [`Puzzle::encode_png`] / [`Puzzle::save_png`]
//!
//! [`generate_puzzle`] runs the whole pipeline. Band height always comes from
//! [`compute_band_height`], so renderer and compositor cut layers at the same row.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: identical inputs produce byte-identical output.
//! - **All-or-nothing**: a failing line fails the job; no partial image is returned.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;
mod render;

pub use assets::decode::{decode_source_image, encode_png, load_source_image};
pub use assets::fonts::{FontFace, FontLibrary, TextBrushRgba8, TextLayoutEngine};
pub use foundation::color::{Rgb8, RgbaColor, hex_to_rgba};
pub use foundation::core::{
    InputLimits, StyleConfig, caption_lines_from_text, default_output_name,
    normalize_caption_lines,
};
pub use foundation::error::{CaptionError, CaptionResult};
pub use foundation::geometry::{
    BAND_PADDING_FACTOR, BandGeometry, MAX_BAND_FRACTION, compute_band_height,
};
pub use render::band::{BandRenderer, caption_origin, render_band_layer};
pub use render::blend::{Rgba8, over, unpremultiply};
pub use render::pipeline::{Puzzle, PuzzleJob, PuzzleOptions, generate_puzzle};
pub use render::stack::composite;
