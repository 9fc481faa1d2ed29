//! Astro CLI
//!
//! Command-line interface for running headless figure simulations and
//! managing figure configuration files.

mod sample;

use anyhow::{bail, Context, Result};
use astro_app::headless::{HeadlessHost, HeadlessRenderer, HeadlessRunConfig, HeadlessRuntime};
use astro_app::{Figure, FigureConfig};
use astro_platform::DisplayMetrics;
use clap::{Args, Parser, Subcommand};
use sample::FrameSample;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "astro.toml";

#[derive(Parser)]
#[command(name = "astro")]
#[command(author, version, about = "Astro animated figure simulator", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a headless session and print one JSON object per sampled frame
    Simulate(SimulateArgs),

    /// Manage figure configuration files
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Args)]
struct SimulateArgs {
    /// Configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of frames to run
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Displayed width in logical pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Displayed height in logical pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Device pixel ratio
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Pointer position as X,Y logical pixels
    #[arg(long, value_parser = parse_pointer, allow_hyphen_values = true)]
    pointer: Option<(f32, f32)>,

    /// Blink RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Print every Nth frame
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    every: u32,

    /// Virtual milliseconds between frames
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Write the default configuration as TOML
    Init {
        /// Output path
        #[arg(default_value = DEFAULT_CONFIG_PATH)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show {
        /// Configuration file (defaults are shown when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Simulate(args) => cmd_simulate(args),
        Commands::Config { action } => match action {
            ConfigCommand::Init { path, force } => cmd_config_init(&path, force),
            ConfigCommand::Show { config } => cmd_config_show(config.as_deref()),
        },
    }
}

fn parse_pointer(value: &str) -> std::result::Result<(f32, f32), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got `{value}`"))?;
    let coord = |s: &str| {
        s.trim()
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("invalid coordinate `{s}`"))
    };
    Ok((coord(x)?, coord(y)?))
}

fn load_config(path: Option<&Path>) -> Result<FigureConfig> {
    match path {
        Some(path) => FigureConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(FigureConfig::default()),
    }
}

fn cmd_simulate(args: SimulateArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let mut figure = match args.seed {
        Some(seed) => Figure::with_seed(&config, seed),
        None => Figure::new(&config),
    }
    .context("Invalid figure configuration")?;

    let mut renderer = HeadlessRenderer::new();
    let mut host = HeadlessHost::new(DisplayMetrics::new(
        args.width as f32,
        args.height as f32,
        args.dpr,
    ));

    if let Some((x, y)) = args.pointer {
        figure.pointer_moved(x, y, &host);
    }

    let run = HeadlessRunConfig {
        width: args.width,
        height: args.height,
        device_pixel_ratio: args.dpr,
        max_frames: args.frames,
        tick_ms: args.tick_ms,
    };

    info!(
        frames = run.max_frames,
        width = run.width,
        height = run.height,
        dpr = run.device_pixel_ratio,
        "Starting simulation"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut write_error = None;
    let every = args.every;

    let frames = HeadlessRuntime::run(
        run,
        &mut figure,
        &mut renderer,
        &mut host,
        |ctx, report, figure, renderer| {
            if write_error.is_some() || ctx.frame_index % every != 0 {
                return;
            }
            let sample = FrameSample::capture(ctx, report, figure, renderer);
            if let Err(err) = write_sample(&mut out, &sample) {
                write_error = Some(err);
            }
        },
    )?;

    if let Some(err) = write_error {
        return Err(err).context("Failed to write frame sample");
    }
    out.flush().context("Failed to flush output")?;

    figure.stop(&mut host);
    info!(
        frames,
        blinks = figure.blink().blink_count(),
        frame_requests = host.frame_requests(),
        "Simulation finished"
    );
    Ok(())
}

fn write_sample<W: Write>(out: &mut W, sample: &FrameSample) -> Result<()> {
    serde_json::to_writer(&mut *out, sample)?;
    writeln!(out)?;
    Ok(())
}

fn cmd_config_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    FigureConfig::default()
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = load_config(path)?;
    let toml = config.to_toml().context("Failed to render config")?;
    print!("{toml}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pointer() {
        assert_eq!(parse_pointer("12,34.5"), Ok((12.0, 34.5)));
        assert_eq!(parse_pointer(" -4 , 8 "), Ok((-4.0, 8.0)));
        assert!(parse_pointer("12").is_err());
        assert!(parse_pointer("a,b").is_err());
        assert!(parse_pointer("inf,1").is_err());
    }

    #[test]
    fn test_cli_parses_simulate() {
        let cli = Cli::try_parse_from([
            "astro", "simulate", "--frames", "10", "--pointer", "0,0", "--seed", "3", "--every",
            "5",
        ])
        .unwrap();
        match cli.command {
            Commands::Simulate(args) => {
                assert_eq!(args.frames, 10);
                assert_eq!(args.pointer, Some((0.0, 0.0)));
                assert_eq!(args.seed, Some(3));
                assert_eq!(args.every, 5);
                assert_eq!(args.width, 800);
            }
            _ => panic!("expected simulate"),
        }
    }

    #[test]
    fn test_cli_rejects_zero_every() {
        assert!(Cli::try_parse_from(["astro", "simulate", "--every", "0"]).is_err());
    }

    #[test]
    fn test_cli_parses_config_init_default_path() {
        let cli = Cli::try_parse_from(["astro", "config", "init"]).unwrap();
        match cli.command {
            Commands::Config {
                action: ConfigCommand::Init { path, force },
            } => {
                assert_eq!(path, PathBuf::from(DEFAULT_CONFIG_PATH));
                assert!(!force);
            }
            _ => panic!("expected config init"),
        }
    }
}
