use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

use captionstack::{
    FontLibrary, InputLimits, PuzzleOptions, Rgb8, StyleConfig, caption_lines_from_text,
    default_output_name, generate_puzzle, load_source_image, normalize_caption_lines,
};

/// Stack caption bands over copies of one image.
#[derive(Parser, Debug)]
#[command(name = "captionstack", version)]
struct Cli {
    /// Source image (PNG, JPEG, ...).
    #[arg(long)]
    image: PathBuf,

    /// Caption line, top to bottom. Repeatable.
    #[arg(long = "line")]
    lines: Vec<String>,

    /// Text file with one caption per line (blank lines are ignored).
    #[arg(long)]
    text: Option<PathBuf>,

    /// JSON style file; the flags below override its fields.
    #[arg(long)]
    style: Option<PathBuf>,

    /// Font size in pixels.
    #[arg(long)]
    font_size: Option<u32>,

    /// Font family list, e.g. "Noto Sans, sans-serif".
    #[arg(long)]
    font_family: Option<String>,

    /// Text color as #RRGGBB.
    #[arg(long)]
    text_color: Option<String>,

    /// Band color as #RRGGBB.
    #[arg(long)]
    bg_color: Option<String>,

    /// Band opacity in [0, 1].
    #[arg(long)]
    bg_opacity: Option<f32>,

    /// Font file to register. Repeatable.
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,

    /// Directory scanned for .ttf/.otf/.ttc files. Repeatable.
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,

    /// Skip loading the installed system fonts.
    #[arg(long, default_value_t = false)]
    no_system_fonts: bool,

    /// Output PNG path (defaults to caption_puzzle_<millis>.png).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Render caption layers one at a time.
    #[arg(long, default_value_t = false)]
    sequential: bool,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Log at debug level.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let style = build_style(&cli)?;
    let lines = collect_lines(&cli)?;
    let fonts = build_fonts(&cli)?;

    let image = load_source_image(&cli.image, &InputLimits::default())
        .with_context(|| format!("load source image '{}'", cli.image.display()))?;

    let opts = PuzzleOptions {
        parallel: !cli.sequential,
        threads: cli.threads,
    };
    let puzzle = generate_puzzle(&image, &lines, &style, &fonts, &opts)?;

    let out = match cli.out {
        Some(p) => p,
        None => {
            let millis = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .context("system clock before unix epoch")?
                .as_millis();
            PathBuf::from(default_output_name(millis))
        }
    };
    puzzle.save_png(&out)?;

    eprintln!(
        "wrote {} ({}x{}, {} captions)",
        out.display(),
        puzzle.width(),
        puzzle.height(),
        puzzle.line_count
    );
    Ok(())
}

fn build_style(cli: &Cli) -> anyhow::Result<StyleConfig> {
    let mut style = match &cli.style {
        Some(path) => StyleConfig::from_path(path)?,
        None => StyleConfig::default(),
    };
    if let Some(v) = cli.font_size {
        style.font_size_px = v;
    }
    if let Some(v) = &cli.font_family {
        style.font_family = v.clone();
    }
    if let Some(v) = &cli.text_color {
        style.text_color = Rgb8::from_hex(v)?;
    }
    if let Some(v) = &cli.bg_color {
        style.bg_color = Rgb8::from_hex(v)?;
    }
    if let Some(v) = cli.bg_opacity {
        style.bg_opacity = v;
    }
    style.validate()?;
    Ok(style)
}

fn collect_lines(cli: &Cli) -> anyhow::Result<Vec<String>> {
    let mut lines = normalize_caption_lines(&cli.lines);
    if let Some(path) = &cli.text {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read caption file '{}'", path.display()))?;
        lines.extend(caption_lines_from_text(&text));
    }
    Ok(lines)
}

fn build_fonts(cli: &Cli) -> anyhow::Result<FontLibrary> {
    let mut fonts = FontLibrary::new();
    for path in &cli.fonts {
        fonts.add_font_file(path)?;
    }
    for dir in &cli.font_dirs {
        let n = fonts.load_dir(dir);
        tracing::debug!(dir = %dir.display(), fonts = n, "loaded font dir");
    }
    if !cli.no_system_fonts {
        let n = fonts.load_system_fonts();
        tracing::debug!(fonts = n, "loaded system fonts");
    }
    Ok(fonts)
}
