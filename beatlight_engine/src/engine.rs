// One track's engine: input guard + selector + per-beat error recovery.
//
// `Engine::process` is the single entry point shared by batch assembly,
// lazy iteration and the streaming worker. Every call yields exactly one
// `BeatProgramEntry` for the beat it was given, so output always covers the
// input 1:1 in order. Per-beat problems never fail the call:
// - a beat refused by the `SequenceGuard` is emitted dark
//   (`MalformedBeatSequence`);
// - a decision not ready by its deadline is emitted dark and not committed
//   (`DeadlineMissed`);
// - an illegal draw is repaired and reported (`IllegalTupleAttempt`).
// In all three cases the diagnostics travel back in `BeatOutcome` and are
// logged at warn level.
//
// An `Engine` is owned by exactly one track or session. Tracks processed in
// parallel each build their own.

use std::time::Instant;

use smallvec::SmallVec;
use tracing::warn;

use crate::beat::{BeatEvent, SequenceGuard};
use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineError};
use crate::program::BeatProgramEntry;
use crate::selector::EffectSelector;

/// The entry emitted for one beat plus anything that went wrong.
#[derive(Clone, Debug, PartialEq)]
pub struct BeatOutcome {
    pub entry: BeatProgramEntry,
    pub diagnostics: SmallVec<[EngineError; 1]>,
}

impl BeatOutcome {
    fn dark(beat: BeatEvent, error: EngineError) -> Self {
        let mut diagnostics = SmallVec::new();
        diagnostics.push(error);
        BeatOutcome {
            entry: BeatProgramEntry::dark(beat),
            diagnostics,
        }
    }
}

pub struct Engine {
    selector: EffectSelector,
    guard: SequenceGuard,
    next_index: usize,
}

impl Engine {
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        Ok(Engine {
            selector: EffectSelector::new(config)?,
            guard: SequenceGuard::new(),
            next_index: 0,
        })
    }

    /// Number of beats seen so far, refused ones included.
    pub fn beats_processed(&self) -> usize {
        self.next_index
    }

    /// Process the next beat in batch mode (no deadline).
    pub fn process(&mut self, beat: BeatEvent) -> BeatOutcome {
        self.process_with_deadline(beat, None)
    }

    /// Process the next beat, giving up on its decision after `deadline`.
    pub fn process_with_deadline(&mut self, beat: BeatEvent, deadline: Option<Instant>) -> BeatOutcome {
        let index = self.next_index;
        self.next_index += 1;

        if let Err(defect) = self.guard.admit(&beat) {
            warn!(index, time = beat.time, %defect, "malformed beat, emitting dark entry");
            self.selector.skip();
            return BeatOutcome::dark(beat, EngineError::MalformedBeatSequence { index, defect });
        }

        let missed = || {
            warn!(index, time = beat.time, "decision missed its deadline, emitting dark entry");
            BeatOutcome::dark(beat, EngineError::DeadlineMissed { index })
        };
        if deadline.is_some_and(|d| Instant::now() >= d) {
            self.selector.skip();
            return missed();
        }
        let Some(decision) = self.selector.select_before(&beat, deadline) else {
            return missed();
        };

        let mut diagnostics = SmallVec::new();
        for attempt in &decision.illegal_attempts {
            let error = EngineError::IllegalTupleAttempt {
                index,
                key: attempt.key.get(),
                tuple: attempt.tuple,
            };
            warn!(%error, "repaired illegal draw");
            diagnostics.push(error);
        }

        BeatOutcome {
            entry: BeatProgramEntry {
                beat,
                group_lights: decision.assignments,
            },
            diagnostics,
        }
    }

    /// Start a new program: clears coherence history, reseeds the generator
    /// and forgets the last accepted beat time.
    pub fn reset(&mut self) {
        self.selector.reset();
        self.guard = SequenceGuard::new();
        self.next_index = 0;
    }
}
