// Batch mode across tracks.
//
// Tracks are independent, so they run in parallel on the rayon pool. Within
// one track beats stay strictly sequential: every track gets its own
// `Engine`, and therefore its own generator and coherence history. Output
// order follows input order regardless of scheduling, and each track's
// program is identical to what `assemble_program` gives for it alone.

use rayon::prelude::*;
use tracing::info;

use crate::assembler::{assemble_program, AssembledProgram};
use crate::beat::BeatEvent;
use crate::config::EngineConfig;
use crate::error::ConfigError;

/// A named beat sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub name: String,
    pub beats: Vec<BeatEvent>,
}

impl Track {
    pub fn new(name: impl Into<String>, beats: Vec<BeatEvent>) -> Self {
        Track {
            name: name.into(),
            beats,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrackProgram {
    pub name: String,
    pub assembled: AssembledProgram,
}

/// Assemble every track in parallel, one fresh engine per track.
pub fn assemble_tracks(config: &EngineConfig, tracks: Vec<Track>) -> Result<Vec<TrackProgram>, ConfigError> {
    config.validate()?;
    let count = tracks.len();
    let programs = tracks
        .into_par_iter()
        .map(|track| -> Result<TrackProgram, ConfigError> {
            let assembled = assemble_program(config, track.beats)?;
            info!(track = %track.name, report = %assembled.report, "track done");
            Ok(TrackProgram {
                name: track.name,
                assembled,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    info!(tracks = count, "batch complete");
    Ok(programs)
}
