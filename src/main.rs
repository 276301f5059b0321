use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use diorama::{AppOptions, Config, Demo, LoggingConfig, StageConfig, init_logging};

#[derive(Parser, Debug)]
#[command(version, about = "Small 3D scene demos")]
struct Args {
    #[arg(long, value_enum, default_value_t)]
    /// Scene to show
    demo: Demo,

    #[arg(long)]
    /// TOML file overriding camera, viewport and scene defaults
    config: Option<PathBuf>,

    #[arg(long)]
    /// Seed for procedural layouts. Without one every run scatters differently.
    seed: Option<u64>,

    #[arg(long)]
    /// Run without a window on a fixed time step
    headless: bool,

    #[arg(long)]
    /// Stop after this many frames
    frames: Option<u64>,

    #[arg(long, default_value_t = 60.0)]
    /// Frame rate of the headless clock
    fps: f32,

    #[arg(long)]
    /// Log filter in env_logger syntax, e.g. "diorama=debug"
    log: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(LoggingConfig {
        filter: args.log.clone(),
        ..Default::default()
    });

    let mut config = match &args.config {
        Some(path) => StageConfig::load_from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => StageConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mut options = AppOptions::new(args.demo).config(config).fps(args.fps);
    options.frames = args.frames;

    if args.headless {
        diorama::run_headless(&options)?;
    } else {
        diorama::run(options)?;
    }
    Ok(())
}
