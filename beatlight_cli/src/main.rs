// CLI entry point for the beatlight effect assignment engine.
//
// Usage:
//   beatlight predict --song 24KMagic            Predict one song
//   beatlight predict --song 24KMagic --compare  Predict + compare with groundtruth
//   beatlight predict --all                      Predict every song in beats/
//   beatlight validate effects/TimeLine_X.json   Validate a program file
//   beatlight compare PRED.json GT.json          Compare two program files
//
// Engine flags (`--seed`, `--cooldown`, `--window`, `--no-band-energy`,
// `--config`) apply to `predict`. Logging goes to stderr through
// `tracing-subscriber`; `RUST_LOG` overrides the level, `-v` raises the
// default from info to debug. Exit status is 1 when a program has hard
// constraint violations or a command fails.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use beatlight_cli::commands::{
    compare_files, compare_song, predict_all, predict_song, validate_file, ConfigOverrides,
};
use beatlight_cli::songs::SongLayout;

/// Assign stage-lighting effects to detected beats
#[derive(Parser, Debug)]
#[command(name = "beatlight", author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level and list advisories
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate lighting programs from beat timelines
    Predict(PredictArgs),
    /// Check a program file against the fixture constraints
    Validate {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Compare a predicted program with a reference program
    Compare {
        #[arg(value_name = "PREDICTED")]
        predicted: PathBuf,
        #[arg(value_name = "GROUNDTRUTH")]
        groundtruth: PathBuf,
    },
}

#[derive(Args, Debug)]
struct PredictArgs {
    /// Song name (reads beats/TimeLine_<SONG>.json)
    #[arg(long, conflicts_with = "all", required_unless_present = "all")]
    song: Option<String>,

    /// Process every TimeLine_*.json in the beats folder
    #[arg(long)]
    all: bool,

    /// Compare the result with TimeLine_<SONG>_groundtruth.json
    #[arg(long, requires = "song", conflicts_with = "all")]
    compare: bool,

    /// Reference program to compare against
    #[arg(long, value_name = "FILE", requires = "compare", conflicts_with = "all")]
    groundtruth: Option<PathBuf>,

    #[arg(long, value_name = "DIR", default_value = "beats")]
    beats_dir: PathBuf,

    #[arg(long, value_name = "DIR", default_value = "effects")]
    effects_dir: PathBuf,

    /// Engine config JSON (camelCase keys; missing keys use defaults)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// PRNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Minimum beats between activations of one VFX group
    #[arg(long, value_name = "BEATS")]
    cooldown: Option<u32>,

    /// Activations remembered per group for variety
    #[arg(long, value_name = "BEATS")]
    window: Option<usize>,

    /// Ignore per-beat band energy
    #[arg(long)]
    no_band_energy: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Command::Predict(args) => {
            let config = ConfigOverrides {
                config: args.config,
                seed: args.seed,
                cooldown: args.cooldown,
                window: args.window,
                no_band_energy: args.no_band_energy,
            }
            .resolve()?;
            let layout = SongLayout {
                beats_dir: args.beats_dir,
                effects_dir: args.effects_dir,
            };

            match args.song {
                Some(song) => {
                    let (out, mut clean) = predict_song(&layout, &song, &config, cli.verbose)?;
                    if args.compare {
                        clean &= compare_song(&out, args.groundtruth.as_deref(), cli.verbose)?;
                    }
                    Ok(clean)
                }
                None => predict_all(&layout, &config),
            }
        }
        Command::Validate { file } => validate_file(&file, cli.verbose),
        Command::Compare {
            predicted,
            groundtruth,
        } => compare_files(&predicted, &groundtruth, cli.verbose),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
