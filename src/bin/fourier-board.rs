use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use fourier_board::{
    BoardConfig, BoardState, CpuRasterizer, Display, Event, FilePointStore, FrameIndex,
    FrameSource, FrameStyle, LayerToggles, Point, PointStore, PrerenderOpts, Prerenderer,
    RasterSettings, Session, Stroke, Vec2,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fourier-board", version)]
struct Cli {
    /// Board configuration JSON. `FOURIER_BOARD_*` environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the x/y spectra of a point file as JSON.
    Spectrum(SpectrumArgs),
    /// Render a single animation frame as a PNG.
    Frame(FrameArgs),
    /// Pre-render every frame and write a numbered PNG sequence.
    Frames(FramesArgs),
    /// Run the board headless: load, reveal, compute and play back a stroke.
    Simulate(SimulateArgs),
    /// Write a generated closed curve as a point file.
    Sample(SampleArgs),
}

#[derive(Parser, Debug)]
struct SpectrumArgs {
    /// Input point file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Keep frequency order instead of sorting by magnitude.
    #[arg(long)]
    by_freq: bool,
}

#[derive(Parser, Debug)]
struct LayerArgs {
    /// Draw the reconstructed trail's sample dots.
    #[arg(long)]
    dots: bool,

    /// Draw the epicycle circle outlines.
    #[arg(long)]
    epicycles: bool,
}

impl LayerArgs {
    fn toggles(&self) -> LayerToggles {
        LayerToggles {
            show_dots: self.dots,
            show_epicycles: self.epicycles,
        }
    }
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input point file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    layers: LayerArgs,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Input point file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory; frames are written as `frame_00000.png`, ...
    #[arg(long)]
    out_dir: PathBuf,

    #[command(flatten)]
    layers: LayerArgs,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input point file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Sleep between ticks at the configured tick rate.
    #[arg(long)]
    realtime: bool,

    /// Skip the reveal of the stroke.
    #[arg(long)]
    skip_reveal: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Shape {
    Circle,
    Heart,
    Lissajous,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Output point file.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, value_enum, default_value_t = Shape::Heart)]
    shape: Shape,

    /// Number of samples along the curve.
    #[arg(long, default_value_t = 200)]
    samples: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    match cli.cmd {
        Command::Spectrum(args) => cmd_spectrum(&config, args),
        Command::Frame(args) => cmd_frame(&config, args),
        Command::Frames(args) => cmd_frames(&config, args),
        Command::Simulate(args) => cmd_simulate(config, args),
        Command::Sample(args) => cmd_sample(&config, args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<BoardConfig> {
    let config = match path {
        Some(p) => {
            BoardConfig::from_path(p).with_context(|| format!("load config '{}'", p.display()))?
        }
        None => BoardConfig::default(),
    };
    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}

fn read_stroke(path: &Path) -> anyhow::Result<Stroke> {
    let points = fourier_board::read_points(path)
        .with_context(|| format!("read points '{}'", path.display()))?;
    anyhow::ensure!(!points.is_empty(), "'{}' holds no points", path.display());
    Ok(Stroke::from_points(points))
}

fn write_png(path: &Path, frame: &fourier_board::FrameRGBA) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

fn cmd_spectrum(config: &BoardConfig, args: SpectrumArgs) -> anyhow::Result<()> {
    let stroke = read_stroke(&args.in_path)?;
    let (xs, ys) = stroke.centered_samples(config.canvas.half_extent());
    let spectra = fourier_board::SpectrumPair {
        x: fourier_board::transform(&xs, !args.by_freq),
        y: fourier_board::transform(&ys, !args.by_freq),
    };
    let stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(stdout, &spectra).context("write spectrum JSON")?;
    println!();
    Ok(())
}

fn cmd_frame(config: &BoardConfig, args: FrameArgs) -> anyhow::Result<()> {
    let stroke = read_stroke(&args.in_path)?;
    let source = FrameSource::from_stroke(&stroke, config, FrameStyle::default());
    anyhow::ensure!(
        args.frame < source.frame_count(),
        "frame {} out of range (stroke has {} frames)",
        args.frame,
        source.frame_count()
    );

    let artifact = fourier_board::compose_frame(&source, FrameIndex(args.frame))?;
    let mut raster = CpuRasterizer::new(config.canvas, RasterSettings::default())?;
    let frame = raster.rasterize(&artifact.scene, args.layers.toggles())?;
    write_png(&args.out, &frame)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(config: &BoardConfig, args: FramesArgs) -> anyhow::Result<()> {
    let stroke = read_stroke(&args.in_path)?;
    let source = FrameSource::from_stroke(&stroke, config, FrameStyle::default());

    let started = Instant::now();
    let mut pre = Prerenderer::new(PrerenderOpts {
        enabled: true,
        ..config.prerender.clone()
    })?;
    pre.begin(source.into());
    let batches = pre.run_to_completion()?;
    let frames = pre.frames().context("prerender finished without every frame")?;
    tracing::info!(
        frames = frames.len(),
        batches,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "prerender complete"
    );

    let mut raster = CpuRasterizer::new(config.canvas, RasterSettings::default())?;
    let toggles = args.layers.toggles();
    for artifact in &frames {
        let frame = raster.rasterize(&artifact.scene, toggles)?;
        let name = format!("frame_{:05}.png", artifact.frame.0);
        let path = args.out_dir.join(name);
        write_png(&path, &frame)?;
    }

    eprintln!(
        "wrote {} frames to {}",
        frames.len(),
        args.out_dir.display()
    );
    Ok(())
}

fn cmd_simulate(config: BoardConfig, args: SimulateArgs) -> anyhow::Result<()> {
    let interval = config.tick_interval();
    let store = FilePointStore::new(&args.in_path);
    let mut session = Session::new(config, Box::new(store))?;

    session.tick();
    session.handle(Event::Begin);
    session.handle(Event::Load);
    for notice in session.take_notices() {
        eprintln!("{notice}");
    }
    anyhow::ensure!(
        !session.board().stroke().is_empty(),
        "no points loaded from '{}'",
        args.in_path.display()
    );

    session.handle(Event::Play);
    if args.skip_reveal {
        session.handle(Event::SkipReveal);
    }

    let mut ticks = 0u64;
    let mut played = 0u64;
    let mut last_progress = None;
    loop {
        let out = session.tick();
        ticks += 1;
        match out.display {
            Display::Progress { rendered, total } if last_progress != Some(rendered) => {
                eprintln!("prerendering {rendered}/{total}");
                last_progress = Some(rendered);
            }
            Display::Frame(_) => played += 1,
            _ => {}
        }
        for notice in session.take_notices() {
            eprintln!("{notice}");
        }
        if out.state == BoardState::Drawing {
            break;
        }
        if args.realtime {
            std::thread::sleep(interval);
        }
    }

    println!("ticks: {ticks}");
    println!("frames played: {played}");
    Ok(())
}

fn cmd_sample(config: &BoardConfig, args: SampleArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.samples > 0, "--samples must be > 0");
    let center = config.canvas.half_extent().to_point();
    let scale = f64::from(config.canvas.width.min(config.canvas.height)) * 0.3;

    let points: Vec<Point> = (0..args.samples)
        .map(|i| {
            let t = std::f64::consts::TAU * i as f64 / args.samples as f64;
            let (x, y) = match args.shape {
                Shape::Circle => (t.cos(), t.sin()),
                Shape::Heart => (
                    t.sin().powi(3),
                    -(13.0 * t.cos()
                        - 5.0 * (2.0 * t).cos()
                        - 2.0 * (3.0 * t).cos()
                        - (4.0 * t).cos())
                        / 16.0,
                ),
                Shape::Lissajous => ((3.0 * t).sin(), (2.0 * t).sin()),
            };
            center + Vec2::new(x * scale, y * scale)
        })
        .collect();

    FilePointStore::new(&args.out)
        .save(&points)
        .with_context(|| format!("write points '{}'", args.out.display()))?;
    eprintln!("wrote {} points to {}", points.len(), args.out.display());
    Ok(())
}
