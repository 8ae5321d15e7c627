use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use cyclecast::{
    CpuRenderer, Detail, FfmpegSink, FfmpegSinkOpts, FontBook, FrameIndex, FrameRange,
    LessonConfig, PngSink, RenderThreading, Scene, Stage,
};

#[derive(Parser, Debug)]
#[command(name = "cyclecast", version, about = "Render the 8086 MUL execution-cycle explainer")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the presentation as MP4 (requires `ffmpeg` on PATH) or numbered PNGs.
    Render(RenderArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Dump the engine call log as JSON without rendering.
    Plan(PlanArgs),
    /// Print stage names, durations and carried entities.
    Stages(LessonArgs),
}

#[derive(Args, Debug)]
struct LessonArgs {
    /// Lesson configuration JSON (defaults apply to missing fields).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Presentation to build.
    #[arg(long, value_enum, default_value_t = Scene::Mul)]
    scene: Scene,

    /// Override the configured detail level.
    #[arg(long, value_enum)]
    detail: Option<Detail>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    lesson: LessonArgs,

    /// Output MP4 path.
    #[arg(long, required_unless_present = "png_dir")]
    out: Option<PathBuf>,

    /// Write numbered PNG frames into this directory instead of encoding MP4.
    #[arg(long, conflicts_with = "out")]
    png_dir: Option<PathBuf>,

    /// Render chunks of frames on a thread pool.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for `--parallel` (default: one per core).
    #[arg(long)]
    threads: Option<usize>,

    /// Frames per parallel chunk.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,

    /// Replace an existing output file.
    #[arg(long)]
    overwrite: bool,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    lesson: LessonArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[command(flatten)]
    lesson: LessonArgs,

    /// Output JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Stages(args) => cmd_stages(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_lesson(args: &LessonArgs) -> anyhow::Result<(LessonConfig, Vec<Box<dyn Stage>>)> {
    let mut cfg = match &args.config {
        Some(path) => LessonConfig::from_path(path)?,
        None => LessonConfig::default(),
    };
    if let Some(detail) = args.detail {
        cfg.detail = detail;
    }
    let stages = cyclecast::lesson::lesson(args.scene, &cfg).context("build lesson")?;
    Ok((cfg, stages))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (cfg, stages) = load_lesson(&args.lesson)?;
    let (timeline, _) =
        cyclecast::lesson::record_timeline(&cfg, &stages).context("record timeline")?;
    let range = FrameRange::new(FrameIndex(0), FrameIndex(timeline.duration_frames()))?;
    let threading = RenderThreading {
        parallel: args.parallel,
        chunk_size: args.chunk_size,
        threads: args.threads,
        ..RenderThreading::default()
    };
    let fonts = FontBook::system();
    if !fonts.has_faces() {
        tracing::warn!("no system fonts found; labels will not be drawn");
    }

    let (stats, wrote) = match (&args.png_dir, &args.out) {
        (Some(dir), _) => {
            let mut sink = PngSink::new(dir, cfg.background);
            let stats = cyclecast::render_range(&timeline, range, &threading, &fonts, &mut sink)
                .context("render frames")?;
            (stats, dir.clone())
        }
        (None, Some(out)) => {
            let mut opts = FfmpegSinkOpts::new(out);
            opts.overwrite = args.overwrite;
            opts.background = cfg.background;
            let mut sink = FfmpegSink::new(opts);
            let stats = cyclecast::render_range(&timeline, range, &threading, &fonts, &mut sink)
                .context("render video")?;
            (stats, out.clone())
        }
        (None, None) => anyhow::bail!("either --out or --png-dir is required"),
    };

    eprintln!(
        "wrote {} ({} frames, {} rendered, {} reused)",
        wrote.display(),
        stats.frames_total,
        stats.frames_rendered,
        stats.frames_elided
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (cfg, stages) = load_lesson(&args.lesson)?;
    let (timeline, _) =
        cyclecast::lesson::record_timeline(&cfg, &stages).context("record timeline")?;
    let mut renderer = CpuRenderer::new(FontBook::system());
    let frame = cyclecast::render_frame(&timeline, FrameIndex(args.frame), &mut renderer)
        .with_context(|| format!("render frame {}", args.frame))?;

    cyclecast::encode::ffmpeg::ensure_parent_dir(&args.out)?;
    cyclecast::write_png(&args.out, &frame, cfg.background)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let (_, stages) = load_lesson(&args.lesson)?;
    let (log, _) = cyclecast::lesson::record_calls(&stages).context("run stages")?;
    let json = serde_json::to_string_pretty(log.calls()).context("serialize call log")?;
    match &args.out {
        Some(path) => write_text(path, &json)?,
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_stages(args: LessonArgs) -> anyhow::Result<()> {
    let (_, stages) = load_lesson(&args)?;
    let (_, report) = cyclecast::lesson::record_calls(&stages).context("run stages")?;
    for stage in &report.stages {
        println!(
            "{:<14} {:>6.1}s  carried: {}",
            stage.name,
            stage.duration_s,
            stage.carried.join(", ")
        );
    }
    println!("{:<14} {:>6.1}s", "total", report.duration_s());
    Ok(())
}

fn write_text(path: &Path, text: &str) -> anyhow::Result<()> {
    cyclecast::encode::ffmpeg::ensure_parent_dir(path)?;
    std::fs::write(path, text).with_context(|| format!("write '{}'", path.display()))
}
