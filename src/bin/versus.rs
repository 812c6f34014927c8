use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use versus::dedup::suggested_file_name;
use versus::{ComparisonSpec, Compositor, JsonFileRegistry, RunConfig, UniquenessCheck};

#[derive(Parser, Debug)]
#[command(name = "versus", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the full comparison video (requires `ffmpeg` and `ffprobe` on PATH).
    Render(RenderArgs),
    /// Render the frame shown at a given time as a PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Comparison JSON (`title`, `subjectA`, `subjectB`, `statA`, `statB`).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output MP4 path; defaults to a name derived from the comparison.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Run configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Skip title narration.
    #[arg(long, default_value_t = false)]
    no_narration: bool,

    /// Render without any overlay clips.
    #[arg(long, default_value_t = false)]
    no_overlays: bool,

    /// JSON registry of produced comparisons; duplicates are refused.
    #[arg(long)]
    registry: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Comparison JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Run configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Timeline position in seconds.
    #[arg(long, default_value_t = 9.0)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RunConfig> {
    match path {
        Some(p) => Ok(RunConfig::from_path(p)?),
        None => Ok(RunConfig::default()),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let spec = ComparisonSpec::from_path(&args.in_path)?;
    let mut config = load_config(args.config.as_deref())?;
    config.render.parallel |= args.parallel;
    if args.threads.is_some() {
        config.render.threads = args.threads;
    }
    if args.no_narration {
        config.narration.enabled = false;
    }

    let mut registry = match &args.registry {
        Some(path) => Some(JsonFileRegistry::open(path)?),
        None => None,
    };
    if let Some(reg) = &registry
        && !reg.is_unique(&spec)
    {
        anyhow::bail!(
            "comparison '{}' was already produced (registry '{}')",
            spec.title(),
            reg.path().display()
        );
    }

    let out = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(suggested_file_name(&spec)));
    let overlays = if args.no_overlays {
        Vec::new()
    } else {
        config.overlay_assets()
    };

    let compositor = Compositor::new(config)?;
    let report = compositor.composite(&spec, &overlays, &out)?;

    if let Some(reg) = registry.as_mut() {
        reg.record(&spec)
            .with_context(|| format!("record '{}' in registry", spec.title()))?;
    }

    tracing::info!(
        frames = report.frames,
        rendered = report.render.frames_rendered,
        layers = report.layers.len(),
        "wrote {}",
        report.output.display()
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let spec = ComparisonSpec::from_path(&args.in_path)?;
    let config = load_config(args.config.as_deref())?;
    let frame = Compositor::new(config)?
        .without_narration()
        .render_still(&spec, args.time)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    tracing::info!("wrote {}", args.out.display());
    Ok(())
}
