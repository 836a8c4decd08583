//! Replay a recorded detection log through a counting pipeline.
//!
//! Each input line is one frame: a JSON array of boxes. Lines that do not
//! parse are treated as undecodable frames.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crowdtrack_rs::{BoxFormat, CountingPipeline, JsonBoxSource, PipelineConfig, PolicyConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyKind {
    Band,
    Line,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Tlbr,
    Tlwh,
}

#[derive(Parser, Debug)]
#[command(name = "crowdtrack-replay", about = "Replay detections through the tracker and counter")]
struct Args {
    /// JSON-lines file, one array of boxes per frame
    #[arg(long, value_name = "PATH")]
    input: PathBuf,

    /// Pipeline configuration (JSON). Flags below override it.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    policy: Option<PolicyKind>,

    /// Process every N-th frame
    #[arg(long)]
    every: Option<u32>,

    #[arg(long)]
    max_disappeared: Option<u32>,

    #[arg(long)]
    frame_height: Option<u32>,

    #[arg(long, value_enum, default_value = "tlbr")]
    format: Format,

    /// Print every emitted result instead of only the last one
    #[arg(long)]
    all_frames: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(policy) = args.policy {
        config.policy = match policy {
            PolicyKind::Band => PolicyConfig::band(),
            PolicyKind::Line => PolicyConfig::line(),
        };
    }
    if let Some(every) = args.every {
        config.scheduler.process_every_n_frames = every;
    }
    if let Some(max_disappeared) = args.max_disappeared {
        config.tracker.max_disappeared = max_disappeared;
    }
    if let Some(frame_height) = args.frame_height {
        config.frame_height = frame_height;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(io::stderr)
        .init();

    let config = load_config(&args)?;
    let format = match args.format {
        Format::Tlbr => BoxFormat::Tlbr,
        Format::Tlwh => BoxFormat::Tlwh,
    };
    let mut pipeline = CountingPipeline::from_config(JsonBoxSource::new(format), &config)?;

    let input = File::open(&args.input)
        .with_context(|| format!("opening {}", args.input.display()))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut frames = 0u64;
    for line in BufReader::new(input).lines() {
        let line = line.context("reading input")?;
        frames += 1;
        let result = pipeline.process_frame(line.as_bytes(), 0, config.frame_height);
        if args.all_frames {
            serde_json::to_writer(&mut out, result)?;
            writeln!(out)?;
        }
    }

    let last = pipeline.last_result();
    if !args.all_frames {
        serde_json::to_writer_pretty(&mut out, last)?;
        writeln!(out)?;
    }
    info!(
        frames,
        entered = last.counts.entered,
        exited = last.counts.exited,
        inside = last.counts.inside,
        total = last.counts.total,
        "replay finished"
    );
    Ok(())
}
