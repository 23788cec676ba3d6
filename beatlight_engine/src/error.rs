// Error taxonomy for the effect assignment engine.
//
// Two families with different propagation rules:
// - Startup errors (`CatalogError`, `ConfigError`) are fatal. They surface
//   from `EngineConfig::validate()` / `Engine::new()` before any beat is
//   processed.
// - Per-beat errors (`EngineError`) are never returned as failures. The
//   engine degrades the affected beat to an empty entry (or silently repairs
//   the tuple) and hands the error back as a diagnostic inside
//   `BeatOutcome`, so one bad beat never aborts a whole program.
//
// `ProgramIoError` covers loading and saving timelines and programs at the
// file boundary.

use thiserror::Error;

use crate::effect::RawEffectTuple;

/// Catalog lookup failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogError {
    /// A group key outside the fixed 0..=6 universe.
    #[error("unknown group light key {0} (catalog covers 0..=6)")]
    UnknownKey(i64),
}

/// Why a single beat event was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum BeatDefect {
    #[error("time {time}s does not follow the previous accepted beat at {previous}s")]
    NonIncreasingTime { time: f64, previous: f64 },

    #[error("time {0}s is negative or not finite")]
    InvalidTime(f64),

    #[error("duration {0}s is negative or not finite")]
    InvalidDuration(f64),

    #[error("band energy {band}={value} is outside [0, 1]")]
    BandEnergyOutOfRange { band: &'static str, value: f64 },
}

/// Per-beat diagnostics. Recovered locally; never abort assembly.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The beat was refused and emitted dark.
    #[error("malformed beat #{index}: {defect}")]
    MalformedBeatSequence { index: usize, defect: BeatDefect },

    /// The selector drew a tuple the legalizer rejects. Always repaired
    /// before emission; indicates a selection defect.
    #[error("beat #{index}: selector drew illegal tuple {tuple:?} for key {key}, repaired")]
    IllegalTupleAttempt {
        index: usize,
        key: u8,
        tuple: RawEffectTuple,
    },

    /// Streaming only: the decision could not be committed before the beat's
    /// deadline, so the beat was emitted dark.
    #[error("decision for beat #{index} missed its deadline")]
    DeadlineMissed { index: usize },
}

/// Invalid engine configuration. Fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("activeKeys lists key {0} more than once")]
    DuplicateKey(u8),

    #[error("historyWindow must be at least 1")]
    EmptyHistoryWindow,

    #[error("{name} must be a probability in [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("{name} must be a finite, non-negative number, got {value}")]
    InvalidWeight { name: String, value: f64 },

    #[error("{table} needs one weight per enum value ({expected}), got {actual}")]
    EnumBound {
        table: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("beat duration thresholds must satisfy 0 < shortBeatSecs <= sustainedBeatSecs, got {short} and {sustained}")]
    BeatThresholds { short: f64, sustained: f64 },

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Streaming-mode channel failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamError {
    #[error("stream worker has stopped")]
    Closed,
}

/// Loading or saving beat timelines and lighting programs.
#[derive(Error, Debug)]
pub enum ProgramIoError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProgramIoError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        ProgramIoError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
