use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use waterdrop::{FrameBudget, FrameScheduler, SceneConfig};

#[derive(Parser, Debug)]
#[command(name = "waterdrop", version, about = "Render a pulsing, drifting water drop")]
struct Cli {
    /// More log output (repeat for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render every frame as a numbered PNG.
    Sequence(SequenceArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Print the default scene config as JSON.
    Config,
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Scene JSON; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl SceneArgs {
    fn load(&self) -> anyhow::Result<SceneConfig> {
        let cfg = match &self.config {
            Some(path) => SceneConfig::from_path(path)
                .with_context(|| format!("load scene '{}'", path.display()))?,
            None => SceneConfig::default(),
        };
        cfg.validate().context("invalid scene")?;
        Ok(cfg)
    }
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct SequenceArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    /// Number of frames; defaults to the scene duration.
    #[arg(long)]
    frames: Option<u64>,

    /// Pace frames at the scene fps instead of rendering as fast as possible.
    #[arg(long, default_value_t = false)]
    realtime: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Number of frames; defaults to the scene duration.
    #[arg(long)]
    frames: Option<u64>,

    /// Pace frames at the scene fps instead of rendering as fast as possible.
    #[arg(long, default_value_t = false)]
    realtime: bool,

    /// Fail if the output already exists.
    #[arg(long, default_value_t = false)]
    no_overwrite: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sequence(args) => cmd_sequence(args),
        Command::Render(args) => cmd_render(args),
        Command::Config => cmd_config(),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::WARN,
        (false, 1) => tracing::Level::INFO,
        (false, 2) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn scheduler(cfg: &SceneConfig, frames: Option<u64>, realtime: bool) -> Box<dyn FrameScheduler> {
    let frames = frames.unwrap_or(cfg.duration);
    if realtime {
        Box::new(waterdrop::FixedRate::new(cfg.fps).with_limit(frames))
    } else {
        Box::new(FrameBudget::new(frames))
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = args.scene.load()?;
    let mut anim = cfg.build_animation()?;
    let frame = anim.advance_to(waterdrop::FrameIndex(args.frame))?;
    waterdrop::save_png(&frame, &args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sequence(args: SequenceArgs) -> anyhow::Result<()> {
    let cfg = args.scene.load()?;
    let mut anim = cfg.build_animation()?;
    let mut sink = waterdrop::PngSequenceSink::new(&args.out_dir);
    let mut sched = scheduler(&cfg, args.frames, args.realtime);
    let stats = anim.run(sched.as_mut(), &mut sink)?;

    eprintln!("wrote {} frames to {}", stats.frames, args.out_dir.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = args.scene.load()?;
    let mut anim = cfg.build_animation()?;
    let sink_opts = waterdrop::FfmpegSinkOpts {
        out_path: args.out.clone(),
        overwrite: !args.no_overwrite,
        background: cfg.background,
    };
    let mut sink = waterdrop::FfmpegSink::new(sink_opts);
    let mut sched = scheduler(&cfg, args.frames, args.realtime);
    let _stats = anim.run(sched.as_mut(), &mut sink)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_config() -> anyhow::Result<()> {
    println!("{}", SceneConfig::default().to_json_pretty()?);
    Ok(())
}
