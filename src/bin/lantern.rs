use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lantern::{
    FsFetcher, LoadPhase, PixelSize, Rect, Resource, ResourceManager, Rgba8Premul,
    RuntimeConfig, SpriteRenderer, SpriteTimeline, Surface, TimelinePhase, TransitionRegistry,
};

#[derive(Parser, Debug)]
#[command(name = "lantern", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a sprite's images and render one sampled time as a PNG.
    Frame(FrameArgs),
    /// Print the timeline state at each sampled time.
    States(StatesArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Sprite timeline JSON.
    #[arg(long)]
    sprite: PathBuf,

    /// Directory frame sources are resolved against (overrides the config's asset_root).
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Sample time in seconds.
    #[arg(long)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Locale used to pick resource variants.
    #[arg(long)]
    locale: Option<String>,

    /// Output width (defaults to the first frame's size).
    #[arg(long)]
    width: Option<u32>,

    /// Output height (defaults to the first frame's size).
    #[arg(long)]
    height: Option<u32>,

    /// Runtime configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct StatesArgs {
    /// Sprite timeline JSON.
    #[arg(long)]
    sprite: PathBuf,

    /// Comma-separated sample times in seconds.
    #[arg(long, value_delimiter = ',', num_args = 1.., allow_negative_numbers = true)]
    times: Vec<f64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args).await,
        Command::States(args) => cmd_states(args),
    }
}

fn read_timeline(path: &Path) -> anyhow::Result<SpriteTimeline> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read sprite '{}'", path.display()))?;
    let timeline = lantern::timeline_from_json(&json)
        .with_context(|| format!("parse sprite '{}'", path.display()))?;
    Ok(timeline)
}

async fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut cfg = match &args.config {
        Some(path) => RuntimeConfig::from_json_path(path)?,
        None => RuntimeConfig::default(),
    };
    if let Some(root) = args.assets {
        cfg.asset_root = root;
    }
    if args.locale.is_some() {
        cfg.loader.locale = args.locale;
    }

    let timeline = read_timeline(&args.sprite)?;
    let sources: BTreeSet<&str> = timeline
        .frames()
        .iter()
        .map(|f| f.source.as_str())
        .collect();

    let manager = ResourceManager::with_opts(FsFetcher::new(&cfg.asset_root), cfg.loader.clone());
    manager.progress().subscribe(|e| {
        if e.phase == LoadPhase::ResourceFinished {
            tracing::debug!(
                key = e.key.as_deref().unwrap_or(""),
                loaded = e.number_loaded,
                total = e.total_resources,
                "resource finished"
            );
        }
    });
    for source in &sources {
        manager.add(Resource::from_origin(*source, None, source));
    }
    manager.register_all(sources.iter().copied())?;
    let loaded = manager.load(|_| {}).await?;
    tracing::debug!(loaded, "assets loaded");

    let size = output_size(&timeline, &manager, args.width, args.height)?;
    let mut dst = Surface::new(size.width, size.height)?;
    if let Some([r, g, b, a]) = cfg.clear_rgba {
        dst.clear(Rgba8Premul::from_straight_rgba(r, g, b, a).to_array());
    }

    let registry = TransitionRegistry::with_builtins();
    let mut renderer = SpriteRenderer::new(size);
    let rect = dst.bounds();
    let state = renderer.render(&timeline, args.time, &manager, &registry, &mut dst, rect)?;
    tracing::info!(?state, "rendered sprite frame");

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &dst.to_straight_rgba(),
        size.width,
        size.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn output_size(
    timeline: &SpriteTimeline,
    images: &impl lantern::ImageSource,
    width: Option<u32>,
    height: Option<u32>,
) -> anyhow::Result<PixelSize> {
    let natural = timeline.frame(0).and_then(|f| {
        let crop = match f.crop {
            Some(crop) => crop,
            None => {
                let img = images.image(&f.source)?;
                Rect::new(0.0, 0.0, f64::from(img.width), f64::from(img.height))
            }
        };
        Some((crop.width().round() as u32, crop.height().round() as u32))
    });
    let (w, h) = match (width, height, natural) {
        (Some(w), Some(h), _) => (w, h),
        (w, h, Some((nw, nh))) => (w.unwrap_or(nw), h.unwrap_or(nh)),
        _ => anyhow::bail!("cannot infer output size; pass --width and --height"),
    };
    Ok(PixelSize::new(w, h)?)
}

fn cmd_states(args: StatesArgs) -> anyhow::Result<()> {
    let timeline = read_timeline(&args.sprite)?;
    println!(
        "length={:.3} frames={} looping={}",
        timeline.length(),
        timeline.len(),
        timeline.looping()
    );
    for t in args.times {
        let state = timeline.state_for_time(t)?;
        match state.phase() {
            TimelinePhase::Static { frame, progress } => {
                println!("t={t:.3} static frame={frame} progress={progress:.3}");
            }
            TimelinePhase::Transitioning {
                name,
                from,
                to,
                offset,
            } => {
                println!("t={t:.3} transition={name} from={from} to={to} offset={offset:.3}");
            }
        }
    }
    Ok(())
}
