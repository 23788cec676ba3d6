// Command implementations behind the `beatlight` binary.
//
// Each command returns `anyhow::Result` with file context attached, and a
// boolean "clean" flag the binary turns into its exit status: a program
// with hard violations is a failure even though the command itself ran.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use beatlight_engine::batch::{assemble_tracks, Track};
use beatlight_engine::program::{BeatTimeline, RawProgram};
use beatlight_engine::validate::{compare, validate_program};
use beatlight_engine::{assemble_program, EngineConfig};

use crate::report::{render_comparison, render_findings, render_stats};
use crate::songs::{groundtruth_path, song_name_of, SongLayout};

/// Config file plus command-line overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub config: Option<PathBuf>,
    pub seed: Option<u64>,
    pub cooldown: Option<u32>,
    pub window: Option<usize>,
    pub no_band_energy: bool,
}

impl ConfigOverrides {
    /// Load the base config (file or default), apply flags, validate.
    pub fn resolve(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => EngineConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(cooldown) = self.cooldown {
            config.vfx_cooldown_beats = cooldown;
        }
        if let Some(window) = self.window {
            config.history_window = window;
        }
        if self.no_band_energy {
            config.band_energy_enabled = false;
        }
        config.validate().context("invalid engine configuration")?;
        Ok(config)
    }
}

fn load_timeline(path: &Path) -> Result<BeatTimeline> {
    BeatTimeline::load(path).with_context(|| format!("loading beats from {}", path.display()))
}

fn load_program(path: &Path) -> Result<RawProgram> {
    RawProgram::load(path).with_context(|| format!("loading program {}", path.display()))
}

/// Predict one song and write its program. Returns the output path and
/// whether the written program passed validation.
pub fn predict_song(
    layout: &SongLayout,
    song: &str,
    config: &EngineConfig,
    verbose: bool,
) -> Result<(PathBuf, bool)> {
    let timeline = load_timeline(&layout.beats_path(song))?;
    info!(song, beats = timeline.beats.len(), "predicting");

    let assembled = assemble_program(config, timeline.beats)?;
    let out = layout.effects_path(song);
    assembled
        .program
        .save(&out)
        .with_context(|| format!("writing {}", out.display()))?;
    println!("Saved: {}", out.display());

    let report = validate_program(&assembled.program.to_raw());
    print!("{}", render_stats(&format!("Results: {song}"), &report));
    print!("{}", render_findings(&report, Some(5), verbose));
    Ok((out, report.is_valid()))
}

/// Predict every song in the beats folder, tracks in parallel.
pub fn predict_all(layout: &SongLayout, config: &EngineConfig) -> Result<bool> {
    let songs = layout
        .discover()
        .with_context(|| format!("listing {}", layout.beats_dir.display()))?;
    if songs.is_empty() {
        bail!("no TimeLine_*.json files in {}", layout.beats_dir.display());
    }
    println!("Processing {} songs: {songs:?}", songs.len());

    let mut tracks = Vec::with_capacity(songs.len());
    for song in &songs {
        let timeline = load_timeline(&layout.beats_path(song))?;
        tracks.push(Track::new(song.clone(), timeline.beats));
    }

    let mut clean = true;
    for track in assemble_tracks(config, tracks)? {
        let out = layout.effects_path(&track.name);
        track
            .assembled
            .program
            .save(&out)
            .with_context(|| format!("writing {}", out.display()))?;
        let report = validate_program(&track.assembled.program.to_raw());
        println!(
            "{}: {} -> {} ({:.1}% lit, {} violations)",
            track.name,
            track.assembled.report,
            out.display(),
            report.stats.coverage(),
            report.violations().count()
        );
        clean &= report.is_valid();
    }
    Ok(clean)
}

/// Validate a program file and print its stats.
pub fn validate_file(path: &Path, verbose: bool) -> Result<bool> {
    let program = load_program(path)?;
    let report = validate_program(&program);
    print!("{}", render_stats(&path.display().to_string(), &report));
    print!("{}", render_findings(&report, None, verbose));
    Ok(report.is_valid())
}

/// Compare a predicted program with a reference. The flag reflects the
/// predicted side only.
pub fn compare_files(predicted: &Path, groundtruth: &Path, verbose: bool) -> Result<bool> {
    let cmp = compare(&load_program(predicted)?, &load_program(groundtruth)?);
    print!("{}", render_comparison(&cmp, verbose));
    Ok(cmp.predicted.is_valid())
}

/// Compare a freshly predicted song with its reference, if one exists.
pub fn compare_song(predicted: &Path, groundtruth: Option<&Path>, verbose: bool) -> Result<bool> {
    let default_path;
    let gt = match groundtruth {
        Some(p) => p,
        None => {
            default_path = groundtruth_path(&song_name_of(predicted));
            default_path.as_path()
        }
    };
    if !gt.exists() {
        warn!(path = %gt.display(), "groundtruth file not found, skipping comparison");
        return Ok(true);
    }
    println!("\n--- COMPARISON WITH GROUNDTRUTH ---");
    compare_files(predicted, gt, verbose)
}
