use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use softshadow::{
    BlurKind, Container, Edges, PixelBuffer, Rect, Rgba8Premul, ShadowConfig, ShadowGeometry,
    ShadowRenderer, compositing_rect, draw_scaled,
};

#[derive(Parser, Debug)]
#[command(name = "softshadow", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw a PNG with a soft shadow behind it and write the result as a PNG.
    Render(RenderArgs),
    /// Print the pipeline geometry for a container size as JSON.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct StyleArgs {
    /// Shadow style JSON. Flags below override individual keys.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Blur radius in pixels.
    #[arg(long)]
    blur_radius: Option<i64>,

    /// Downscale factor applied before blurring.
    #[arg(long)]
    downscale_rate: Option<i64>,

    /// Shadow opacity in percent.
    #[arg(long)]
    alpha: Option<i64>,

    /// Offset applied to all four sides.
    #[arg(long)]
    offset: Option<u32>,

    /// Blur implementation.
    #[arg(long, value_enum)]
    strategy: Option<StrategyChoice>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyChoice {
    Stack,
    Platform,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input PNG used as the container content.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Surface background as RRGGBBAA hex.
    #[arg(long, default_value = "ffffffff")]
    background: String,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Container width in pixels.
    #[arg(long)]
    width: i32,

    /// Container height in pixels.
    #[arg(long)]
    height: i32,

    #[command(flatten)]
    style: StyleArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn load_style(args: &StyleArgs) -> anyhow::Result<ShadowConfig> {
    let base = match &args.config {
        Some(path) => ShadowConfig::from_path(path)
            .with_context(|| format!("load shadow config '{}'", path.display()))?,
        None => ShadowConfig::default(),
    };

    let mut b = base.to_builder();
    if let Some(v) = args.blur_radius {
        b = b.blur_radius(v);
    }
    if let Some(v) = args.downscale_rate {
        b = b.downscale_rate(v);
    }
    if let Some(v) = args.alpha {
        b = b.alpha_percent(v);
    }
    if let Some(v) = args.offset {
        b = b.offsets(Edges::uniform(v));
    }
    if let Some(s) = args.strategy {
        b = b.blur_strategy(match s {
            StrategyChoice::Stack => BlurKind::StackBlur,
            StrategyChoice::Platform => BlurKind::PlatformNative,
        });
    }
    Ok(b.build()?)
}

fn parse_hex_rgba(s: &str) -> anyhow::Result<Rgba8Premul> {
    let s = s.trim_start_matches('#');
    if s.len() != 8 {
        anyhow::bail!("expected RRGGBBAA, got '{s}'");
    }
    let byte = |i: usize| {
        u8::from_str_radix(&s[i..i + 2], 16).with_context(|| format!("parse hex color '{s}'"))
    };
    Ok(Rgba8Premul::from_straight_rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?))
}

struct ImageCard {
    bounds: Rect,
    content: PixelBuffer,
}

impl Container for ImageCard {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn render_content_into(&mut self, buffer: &mut PixelBuffer) {
        buffer.copy_from(&self.content, 0, 0);
    }

    fn draw_content(&mut self, surface: &mut PixelBuffer) {
        draw_scaled(surface, &self.content, self.bounds, 255);
    }
}

/// Upper bound on the output canvas, 1 GiB of RGBA8.
const MAX_SURFACE_PIXELS: u64 = 1 << 28;

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = load_style(&args.style)?;
    let background = parse_hex_rgba(&args.background)?;

    let img = image::open(&args.in_path)
        .with_context(|| format!("read image '{}'", args.in_path.display()))?;
    let content = PixelBuffer::from_image(&img)?;

    let o = config.offsets();
    let max_offset = o.left.max(o.right).max(o.top).max(o.bottom);
    let Some(margin) = config.blur_radius().checked_add(max_offset) else {
        anyhow::bail!("surface size overflows");
    };
    let grow = |side: u32| margin.checked_mul(2).and_then(|m2| side.checked_add(m2));
    let (Some(surface_w), Some(surface_h)) = (grow(content.width()), grow(content.height()))
    else {
        anyhow::bail!("surface size overflows");
    };
    if u64::from(surface_w) * u64::from(surface_h) > MAX_SURFACE_PIXELS {
        anyhow::bail!("surface {surface_w}x{surface_h} exceeds {MAX_SURFACE_PIXELS} pixels");
    }
    let mut surface = PixelBuffer::filled(surface_w, surface_h, background)?;

    let origin = f64::from(margin);
    let mut card = ImageCard {
        bounds: Rect::new(
            origin,
            origin,
            origin + f64::from(content.width()),
            origin + f64::from(content.height()),
        ),
        content,
    };

    let mut renderer = ShadowRenderer::new(config);
    renderer.draw(&mut card, &mut surface)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    surface
        .to_rgba_image()
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let config = load_style(&args.style)?;
    let geometry = ShadowGeometry::compute(args.width, args.height, &config)?;
    let container = Rect::new(0.0, 0.0, f64::from(args.width), f64::from(args.height));
    let rect = compositing_rect(container, config.offsets());

    let report = serde_json::json!({
        "config": config,
        "geometry": geometry,
        "paintAlpha": config.paint_alpha(),
        "compositingRect": [rect.x0, rect.y0, rect.x1, rect.y1],
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
