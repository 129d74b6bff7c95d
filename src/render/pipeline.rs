use std::path::Path;

use anyhow::Context;
use rayon::prelude::*;

use crate::{
    assets::{decode::encode_png, fonts::FontLibrary},
    foundation::{
        core::{StyleConfig, normalize_caption_lines},
        error::{CaptionError, CaptionResult},
        geometry::compute_band_height,
    },
    render::{band::BandRenderer, stack::composite},
};

/// Threading knobs for per-line rendering.
#[derive(Clone, Debug)]
pub struct PuzzleOptions {
    /// Render caption layers on a rayon pool.
    pub parallel: bool,
    /// Override rayon worker threads (parallel mode only).
    pub threads: Option<usize>,
}

impl Default for PuzzleOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
        }
    }
}

/// A finished composite.
///
/// The pixel buffer held here is the one to export; nothing else keeps a copy.
#[derive(Clone, Debug, PartialEq)]
pub struct Puzzle {
    /// Composite pixels, straight RGBA8.
    pub image: image::RgbaImage,
    /// Band height every layer was sliced at.
    pub band_height: u32,
    /// Number of caption lines stacked.
    pub line_count: usize,
}

impl Puzzle {
    /// Composite width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Composite height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Encode the composite as PNG bytes.
    pub fn encode_png(&self) -> CaptionResult<Vec<u8>> {
        encode_png(&self.image)
    }

    /// Write the composite to `path` as PNG, creating parent directories.
    pub fn save_png(&self, path: &Path) -> CaptionResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes).with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// Build the caption stack for `lines` over `image`.
///
/// Lines are trimmed and blank ones dropped; `lines[0]` ends up on top.
/// Each line is rendered independently (in parallel unless disabled) and the
/// layers are stacked once all of them succeed. Any failure fails the job.
pub fn generate_puzzle<S: AsRef<str>>(
    image: &image::RgbaImage,
    lines: &[S],
    style: &StyleConfig,
    fonts: &FontLibrary,
    opts: &PuzzleOptions,
) -> CaptionResult<Puzzle> {
    let lines = normalize_caption_lines(lines);
    if lines.is_empty() {
        return Err(CaptionError::empty_input("at least one caption line is required"));
    }
    style.validate()?;

    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(CaptionError::validation(format!(
            "source image must be non-empty, got {width}x{height}"
        )));
    }
    let band_height = compute_band_height(height, style.font_size_px)?;
    let face = fonts.resolve(&style.font_family)?;

    // Bottom caption first, so compositing can proceed bottom-up.
    let reversed: Vec<&str> = lines.iter().rev().map(String::as_str).collect();

    let rendered: Vec<CaptionResult<image::RgbaImage>> = if opts.parallel {
        let pool = build_thread_pool(opts.threads)?;
        pool.install(|| {
            reversed
                .par_iter()
                .map_init(BandRenderer::new, |renderer, text| {
                    renderer.render_layer(image, text, style, &face)
                })
                .collect()
        })
    } else {
        let mut renderer = BandRenderer::new();
        reversed
            .iter()
            .map(|text| renderer.render_layer(image, text, style, &face))
            .collect()
    };
    let layers = rendered.into_iter().collect::<CaptionResult<Vec<_>>>()?;

    let out = composite(&layers, band_height)?;
    Ok(Puzzle {
        image: out,
        band_height,
        line_count: lines.len(),
    })
}

/// A [`generate_puzzle`] call running on its own thread.
pub struct PuzzleJob {
    handle: std::thread::JoinHandle<CaptionResult<Puzzle>>,
}

impl PuzzleJob {
    /// Start a job on a background thread, taking ownership of its inputs.
    pub fn spawn(
        image: image::RgbaImage,
        lines: Vec<String>,
        style: StyleConfig,
        fonts: FontLibrary,
        opts: PuzzleOptions,
    ) -> CaptionResult<Self> {
        let handle = std::thread::Builder::new()
            .name("captionstack-job".to_owned())
            .spawn(move || generate_puzzle(&image, &lines, &style, &fonts, &opts))
            .context("spawn puzzle job thread")?;
        Ok(Self { handle })
    }

    /// True once the job has finished, successfully or not.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the job completes.
    pub fn join(self) -> CaptionResult<Puzzle> {
        self.handle
            .join()
            .map_err(|_| CaptionError::render("puzzle job thread panicked"))?
    }
}

fn build_thread_pool(threads: Option<usize>) -> CaptionResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(CaptionError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| CaptionError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
