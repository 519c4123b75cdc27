use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sketchreel::{FontSpec, FrameIndex, RenderConfig, Session};

#[derive(Parser, Debug)]
#[command(name = "sketchreel", version, about)]
struct Cli {
    /// Log at debug level (`RUST_LOG` takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a session to an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Print the per-round phase layout as JSON.
    Timeline(TimelineArgs),
}

#[derive(Parser, Debug)]
struct JobArgs {
    /// Session directory with `round_<N>_summary.txt` files and drawings.
    #[arg(long)]
    session: PathBuf,

    /// JSON config file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seconds per round.
    #[arg(long)]
    duration: Option<f64>,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Font file, or `builtin` for the embedded bitmap font.
    #[arg(long)]
    font: Option<String>,

    /// Render at most this many rounds.
    #[arg(long)]
    max_rounds: Option<usize>,

    /// Part number appended to the title.
    #[arg(long)]
    part: Option<u32>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    job: JobArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Frames scheduled per chunk.
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Directory with per-phase audio segments.
    #[arg(long)]
    audio_dir: Option<PathBuf>,

    /// Background music file.
    #[arg(long)]
    music: Option<PathBuf>,

    /// Keep the PNG frame sequence.
    #[arg(long, default_value_t = false)]
    keep_frames: bool,

    /// Directory for the PNG frame sequence.
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// Also write the last title frame as `<out stem>_thumbnail.png`.
    #[arg(long, default_value_t = false)]
    thumbnail: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    job: JobArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct TimelineArgs {
    #[command(flatten)]
    job: JobArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Timeline(args) => cmd_timeline(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn job_config(args: &JobArgs) -> anyhow::Result<RenderConfig> {
    let mut cfg = match &args.config {
        Some(path) => RenderConfig::from_path(path)?,
        None => RenderConfig::default(),
    };
    if let Some(d) = args.duration {
        cfg.duration_per_round_secs = d;
    }
    if let Some(fps) = args.fps {
        cfg.fps = fps;
    }
    if let Some(font) = &args.font {
        cfg.font = if font.eq_ignore_ascii_case("builtin") {
            FontSpec::Builtin
        } else {
            FontSpec::Path(PathBuf::from(font))
        };
    }
    if args.max_rounds.is_some() {
        cfg.max_rounds = args.max_rounds;
    }
    if args.part.is_some() {
        cfg.part_number = args.part;
    }
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = job_config(&args.job)?;
    if let Some(out) = args.out {
        cfg.output_path = out;
    }
    if args.parallel {
        cfg.threading.parallel = true;
    }
    if args.threads.is_some() {
        cfg.threading.threads = args.threads;
    }
    if let Some(n) = args.chunk_size {
        cfg.threading.chunk_size = n;
    }
    if args.audio_dir.is_some() {
        cfg.audio_dir = args.audio_dir;
    }
    if args.music.is_some() {
        cfg.music_path = args.music;
    }
    if args.frames_dir.is_some() {
        cfg.frames_dir = args.frames_dir;
    }
    cfg.keep_frames |= args.keep_frames;
    cfg.write_thumbnail |= args.thumbnail;

    let report = sketchreel::render_to_video(&cfg, &args.job.session)?;
    eprintln!(
        "wrote {} ({} rounds, {}/{} frames, profile {})",
        report.output_path.display(),
        report.rounds,
        report.stats.frames_rendered,
        report.stats.frames_total,
        report.profile.name()
    );
    if !report.stats.failed_frames.is_empty() {
        eprintln!("failed frames: {:?}", report.stats.failed_frames);
    }
    if let Some(thumb) = &report.thumbnail {
        eprintln!("wrote {}", thumb.display());
    }
    if let Some(dir) = &report.frames_dir {
        eprintln!("frames kept in {}", dir.display());
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = job_config(&args.job)?;
    sketchreel::render_single_frame(&cfg, &args.job.session, FrameIndex(args.frame), &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_timeline(args: TimelineArgs) -> anyhow::Result<()> {
    let cfg = job_config(&args.job)?;
    let session = Session::load(&args.job.session, cfg.max_rounds)?;
    let report = sketchreel::describe_timeline(&cfg, &session)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
