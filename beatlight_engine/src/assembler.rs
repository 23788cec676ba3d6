// Program assembly: folding per-beat outcomes into a program.
//
// The assembler makes no decisions. It pulls beats one at a time from any
// iterator, hands each to its `Engine`, and accumulates the entries plus an
// `AssemblyReport` of diagnostics. Two shapes:
// - `ProgramAssembler` / `assemble_program`: batch, returns the whole
//   `LightProgram` when the feed is exhausted.
// - `ProgramStream`: a lazy iterator adapter yielding each
//   `BeatProgramEntry` as soon as its beat is processed.
//
// The beat feed is forward-only. Restarting a track means a fresh assembler
// (or `Engine::reset`), never rewinding this one.

use std::fmt;

use tracing::info;

use crate::beat::BeatEvent;
use crate::config::EngineConfig;
use crate::engine::{BeatOutcome, Engine};
use crate::error::{ConfigError, EngineError};
use crate::program::{BeatProgramEntry, LightProgram};

/// Counters and diagnostics collected while assembling a program.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssemblyReport {
    pub beats: usize,
    /// Beats with at least one assignment.
    pub lit_beats: usize,
    pub malformed: usize,
    pub illegal_attempts: usize,
    pub missed_deadlines: usize,
    pub diagnostics: Vec<EngineError>,
}

impl AssemblyReport {
    pub fn observe(&mut self, outcome: &BeatOutcome) {
        self.beats += 1;
        if !outcome.entry.is_dark() {
            self.lit_beats += 1;
        }
        for d in &outcome.diagnostics {
            match d {
                EngineError::MalformedBeatSequence { .. } => self.malformed += 1,
                EngineError::IllegalTupleAttempt { .. } => self.illegal_attempts += 1,
                EngineError::DeadlineMissed { .. } => self.missed_deadlines += 1,
            }
            self.diagnostics.push(d.clone());
        }
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl fmt::Display for AssemblyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} beats, {} lit, {} malformed, {} illegal draws repaired, {} missed deadlines",
            self.beats, self.lit_beats, self.malformed, self.illegal_attempts, self.missed_deadlines
        )
    }
}

/// A finished program and its report.
#[derive(Clone, Debug, PartialEq)]
pub struct AssembledProgram {
    pub program: LightProgram,
    pub report: AssemblyReport,
}

/// Batch accumulator over one engine.
pub struct ProgramAssembler {
    engine: Engine,
    entries: Vec<BeatProgramEntry>,
    report: AssemblyReport,
}

impl ProgramAssembler {
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_engine(Engine::new(config)?))
    }

    pub fn with_engine(engine: Engine) -> Self {
        ProgramAssembler {
            engine,
            entries: Vec::new(),
            report: AssemblyReport::default(),
        }
    }

    /// Process one beat and append its entry.
    pub fn feed(&mut self, beat: BeatEvent) -> &BeatProgramEntry {
        let outcome = self.engine.process(beat);
        self.report.observe(&outcome);
        self.entries.push(outcome.entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn extend<I: IntoIterator<Item = BeatEvent>>(&mut self, beats: I) {
        for beat in beats {
            self.feed(beat);
        }
    }

    pub fn report(&self) -> &AssemblyReport {
        &self.report
    }

    pub fn finish(self) -> AssembledProgram {
        AssembledProgram {
            program: LightProgram {
                beats: self.entries,
            },
            report: self.report,
        }
    }
}

/// Assemble a whole track in one call.
pub fn assemble_program<I>(config: &EngineConfig, beats: I) -> Result<AssembledProgram, ConfigError>
where
    I: IntoIterator<Item = BeatEvent>,
{
    let mut assembler = ProgramAssembler::new(config)?;
    assembler.extend(beats);
    let assembled = assembler.finish();
    info!(report = %assembled.report, "program assembled");
    Ok(assembled)
}

/// Lazy program: yields one entry per beat pulled from `beats`.
pub struct ProgramStream<I> {
    engine: Engine,
    beats: I,
    report: AssemblyReport,
}

impl<I: Iterator<Item = BeatEvent>> ProgramStream<I> {
    pub fn new(config: &EngineConfig, beats: I) -> Result<Self, ConfigError> {
        Ok(ProgramStream {
            engine: Engine::new(config)?,
            beats,
            report: AssemblyReport::default(),
        })
    }

    /// Diagnostics for the entries yielded so far.
    pub fn report(&self) -> &AssemblyReport {
        &self.report
    }
}

impl<I: Iterator<Item = BeatEvent>> Iterator for ProgramStream<I> {
    type Item = BeatProgramEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let beat = self.beats.next()?;
        let outcome = self.engine.process(beat);
        self.report.observe(&outcome);
        Some(outcome.entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.beats.size_hint()
    }
}
