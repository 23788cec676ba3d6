// beatlight_engine: stage-lighting effect assignment for detected beats.
//
// Given a track's beat sequence (time, duration, optional band energy), the
// engine decides for every beat which lighting groups fire and with which
// Motion / Color / Intensity / VFX effects, and assembles the result into
// the JSON program consumed by show control. Beat detection, audio decoding
// and fixture drivers live elsewhere; only their data crosses this crate.
//
// Module overview:
// - `catalog.rs`:    Fixed registry of group keys 0..=6 and their GroupType.
// - `effect.rs`:     Wire-backed effect enums, EffectTuple, RawEffectTuple.
// - `legalizer.rs`:  Hard legality rules: is_legal / repair / violations.
// - `preference.rs`: Soft per-group-type weights (PreferenceTable).
// - `coherence.rs`:  Per-group rolling history and VFX cooldown clocks.
// - `selector.rs`:   EffectSelector, the per-beat decision core.
// - `beat.rs`:       BeatEvent, BeatClass, SequenceGuard (input contract).
// - `engine.rs`:     Engine: guard + selector + per-beat error recovery.
// - `assembler.rs`:  ProgramAssembler, assemble_program, lazy ProgramStream.
// - `batch.rs`:      Parallel assembly across independent tracks (rayon).
// - `stream.rs`:     Deadline-bound streaming, sync session or worker thread.
// - `program.rs`:    Typed program and the JSON wire format.
// - `validate.rs`:   Program validation, usage stats, comparison.
// - `config.rs`:     EngineConfig, every tunable parameter.
// - `error.rs`:      Error taxonomy.
// - `prng`:          Re-exported from `beatlight_prng`.
//
// **Critical constraint: determinism.** Same config (seed included) and same
// beats give a byte-identical program. All randomness comes from one seeded
// `ShowRng` per engine, collections that affect output order are
// `BTreeMap`/`BTreeSet` or sorted `Vec`s, and the clock is read only to
// enforce streaming deadlines.

pub mod assembler;
pub mod batch;
pub mod beat;
pub mod catalog;
pub mod coherence;
pub mod config;
pub mod effect;
pub mod engine;
pub mod error;
pub mod legalizer;
pub mod preference;
pub use beatlight_prng as prng;
pub mod program;
pub mod selector;
pub mod stream;
pub mod validate;

pub use assembler::{assemble_program, AssembledProgram, AssemblyReport, ProgramAssembler, ProgramStream};
pub use batch::{assemble_tracks, Track, TrackProgram};
pub use beat::{BandEnergy, BeatEvent};
pub use catalog::{type_of, GroupLightKey, GroupType};
pub use config::EngineConfig;
pub use effect::{ColorEffect, EffectTuple, IntensityEffect, MotionEffect, RawEffectTuple, VfxEffect};
pub use engine::{BeatOutcome, Engine};
pub use error::{CatalogError, ConfigError, EngineError, ProgramIoError, StreamError};
pub use program::{BeatProgramEntry, BeatTimeline, GroupLightAssignment, LightProgram, RawProgram};
pub use stream::{start_stream, StreamHandle, StreamSession};
pub use validate::{compare, validate_program, Comparison, ProgramReport, UsageStats};
