// Data-driven engine configuration.
//
// Every tunable number the selector reads lives in `EngineConfig`, loaded
// from JSON (camelCase keys) or built from `Default`. The selector never
// uses magic numbers. The four options the show-control side relies on sit
// at the top level: `seed`, `vfxCooldownBeats`, `historyWindow` and
// `bandEnergyEnabled`. Tuning lives in nested groups:
// - `ActivationParams`: per-group-type activation odds, beat-class
//   thresholds and factors, band-energy gains, per-class caps.
// - `VarietyParams`: anti-repetition and pattern weights applied from
//   coherence history, plus same-type motion mirroring.
// - `PreferenceParams`: soft per-value weights for each effect field
//   (consumed by `preference.rs`).
// - `StreamParams`: streaming-mode deadline lead.
//
// `validate()` must pass before an engine is built. Configuration errors are
// fatal at startup, unlike per-beat errors which are recovered locally.
//
// **Critical constraint: determinism.** Identical config + identical beats
// must produce an identical program. Config is never mutated at runtime.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{GroupLightKey, GroupType};
use crate::effect::{ColorEffect, IntensityEffect, MotionEffect, VfxEffect};
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Activation
// ---------------------------------------------------------------------------

/// Per-group-type multipliers on the base activation probability.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeFactors {
    pub vfx: f64,
    pub single: f64,
    pub multi: f64,
}

impl TypeFactors {
    pub const fn new(vfx: f64, single: f64, multi: f64) -> Self {
        TypeFactors { vfx, single, multi }
    }

    pub fn get(&self, group: GroupType) -> f64 {
        match group {
            GroupType::Vfx => self.vfx,
            GroupType::SingleLight => self.single,
            GroupType::MultiLight => self.multi,
        }
    }
}

/// Controls which groups fire on a beat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivationParams {
    /// Base per-beat activation probability for each group type.
    pub base: TypeFactors,
    /// Beats shorter than this (and longer than 0) are `Short`.
    pub short_beat_secs: f64,
    /// Beats longer than this are `Sustained`.
    pub sustained_beat_secs: f64,
    /// Factors for zero-duration flash beats. Only quick single-light
    /// activations by default.
    pub transient: TypeFactors,
    pub short: TypeFactors,
    pub sustained: TypeFactors,
    /// Maximum groups lit on a flash beat.
    pub transient_cap: usize,
    /// Maximum groups lit on a short beat.
    pub short_cap: usize,
    /// Bass energy raises MultiLight activation by `1 + bassGain * bass`.
    pub bass_gain: f64,
    /// Mid energy raises SingleLight activation by `1 + midGain * mid`.
    pub mid_gain: f64,
    /// High energy raises VFX activation by `1 + highGain * high`.
    pub high_gain: f64,
    /// Bass energy raises the SpectrumBased intensity weight by
    /// `1 + spectrumGain * bass`.
    pub spectrum_gain: f64,
    /// Upper clamp on any single activation probability.
    pub max_probability: f64,
}

impl Default for ActivationParams {
    fn default() -> Self {
        Self {
            base: TypeFactors::new(0.15, 0.55, 0.40),
            short_beat_secs: 1.0,
            sustained_beat_secs: 3.0,
            transient: TypeFactors::new(0.0, 0.8, 0.0),
            short: TypeFactors::new(0.5, 1.2, 0.6),
            sustained: TypeFactors::new(1.5, 0.9, 1.5),
            transient_cap: 1,
            short_cap: 2,
            bass_gain: 1.0,
            mid_gain: 0.5,
            high_gain: 1.5,
            spectrum_gain: 2.0,
            max_probability: 0.95,
        }
    }
}

// ---------------------------------------------------------------------------
// Variety
// ---------------------------------------------------------------------------

/// Weights applied from a group's coherence history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VarietyParams {
    /// Multiplier for a value equal to the group's previous value.
    pub repeat_penalty: f64,
    /// Multiplier for a value equal to the one two activations back (and not
    /// the previous one), encouraging A-B-A alternation.
    pub alternate_bonus: f64,
    /// Multiplier for any other value still inside the history window.
    pub stale_penalty: f64,
    /// Probability that a group mirrors the motion of an earlier group of the
    /// same type lit on the same beat.
    pub mirror_probability: f64,
    /// Multiplier for quick motions (Rotate, PingPong) on flash and short
    /// beats.
    pub quick_motion_bonus: f64,
}

impl Default for VarietyParams {
    fn default() -> Self {
        Self {
            repeat_penalty: 0.25,
            alternate_bonus: 1.5,
            stale_penalty: 0.6,
            mirror_probability: 0.6,
            quick_motion_bonus: 2.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Preference weights
// ---------------------------------------------------------------------------

/// Soft weights, one per enum value in wire order.
///
/// Light groups share color and intensity tables. VFX groups only draw their
/// `vfx` table; light groups never draw VFX. A weight of 0 simply means the
/// value is never drawn; it is not a legality rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreferenceParams {
    pub single_motion: Vec<f64>,
    pub multi_motion: Vec<f64>,
    pub light_color: Vec<f64>,
    pub light_intensity: Vec<f64>,
    pub vfx: Vec<f64>,
}

/// Weight given to a motion outside a group type's preferred set.
const DISCOURAGED_MOTION_WEIGHT: f64 = 0.05;
/// Weight given to leaving a field off on an active group.
const OFF_WEIGHT: f64 = 0.02;

fn motion_weights(group: GroupType) -> Vec<f64> {
    let preferred = group.preferred_motions();
    MotionEffect::ALL
        .iter()
        .map(|m| {
            if m.is_off() {
                OFF_WEIGHT
            } else if preferred.contains(m) {
                1.0
            } else {
                DISCOURAGED_MOTION_WEIGHT
            }
        })
        .collect()
}

impl Default for PreferenceParams {
    fn default() -> Self {
        Self {
            single_motion: motion_weights(GroupType::SingleLight),
            multi_motion: motion_weights(GroupType::MultiLight),
            light_color: ColorEffect::ALL
                .iter()
                .map(|c| if c.is_off() { 0.05 } else { 1.0 })
                .collect(),
            light_intensity: IntensityEffect::ALL
                .iter()
                .map(|i| if i.is_off() { 0.05 } else { 1.0 })
                .collect(),
            vfx: VfxEffect::ALL
                .iter()
                .map(|v| if v.is_off() { 0.0 } else { 1.0 })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Streaming
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamParams {
    /// How long before a beat's start its decision must be committed.
    pub decision_lead_ms: u64,
}

impl Default for StreamParams {
    fn default() -> Self {
        Self {
            decision_lead_ms: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level engine config
// ---------------------------------------------------------------------------

/// Top-level engine configuration. Loaded from JSON, never mutated at runtime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Seed for the selector's PRNG.
    pub seed: u64,
    /// Minimum beat gap between two activations of the same VFX group.
    pub vfx_cooldown_beats: u32,
    /// Number of past activations remembered per group.
    pub history_window: usize,
    /// Whether per-beat band energy influences selection.
    pub band_energy_enabled: bool,
    /// Catalog keys the engine may drive.
    pub active_keys: Vec<i64>,
    /// Force one group on when nothing fired on a non-flash beat.
    pub ensure_activity: bool,
    pub activation: ActivationParams,
    pub variety: VarietyParams,
    pub preference: PreferenceParams,
    pub stream: StreamParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            vfx_cooldown_beats: 2,
            history_window: 3,
            band_energy_enabled: true,
            active_keys: GroupLightKey::ALL.iter().map(|k| k.get() as i64).collect(),
            ensure_activity: false,
            activation: ActivationParams::default(),
            variety: VarietyParams::default(),
            preference: PreferenceParams::default(),
            stream: StreamParams::default(),
        }
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { name, value })
    }
}

fn check_weight(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidWeight {
            name: name.to_string(),
            value,
        })
    }
}

fn check_factors(name: &str, factors: &TypeFactors) -> Result<(), ConfigError> {
    check_weight(&format!("{name}.vfx"), factors.vfx)?;
    check_weight(&format!("{name}.single"), factors.single)?;
    check_weight(&format!("{name}.multi"), factors.multi)
}

pub(crate) fn check_table(
    table: &'static str,
    weights: &[f64],
    expected: usize,
) -> Result<(), ConfigError> {
    if weights.len() != expected {
        return Err(ConfigError::EnumBound {
            table,
            expected,
            actual: weights.len(),
        });
    }
    for (i, &w) in weights.iter().enumerate() {
        check_weight(&format!("{table}[{i}]"), w)?;
    }
    Ok(())
}

impl EngineConfig {
    /// Load and validate a config from a JSON file. Missing keys take their
    /// defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// Parse and validate a config from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// The catalog keys this config drives, ascending.
    pub fn group_keys(&self) -> Result<Vec<GroupLightKey>, ConfigError> {
        let mut seen = BTreeSet::new();
        for &raw in &self.active_keys {
            let key = GroupLightKey::new(raw)?;
            if !seen.insert(key) {
                return Err(ConfigError::DuplicateKey(key.get()));
            }
        }
        Ok(seen.into_iter().collect())
    }

    /// Check every bound. Run before building an engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_window == 0 {
            return Err(ConfigError::EmptyHistoryWindow);
        }
        self.group_keys()?;

        let a = &self.activation;
        check_factors("activation.base", &a.base)?;
        for (name, p) in [
            ("activation.base.vfx", a.base.vfx),
            ("activation.base.single", a.base.single),
            ("activation.base.multi", a.base.multi),
        ] {
            check_probability(name, p)?;
        }
        check_probability("activation.maxProbability", a.max_probability)?;
        check_factors("activation.transient", &a.transient)?;
        check_factors("activation.short", &a.short)?;
        check_factors("activation.sustained", &a.sustained)?;
        for (name, gain) in [
            ("activation.bassGain", a.bass_gain),
            ("activation.midGain", a.mid_gain),
            ("activation.highGain", a.high_gain),
            ("activation.spectrumGain", a.spectrum_gain),
        ] {
            check_weight(name, gain)?;
        }
        if !(a.short_beat_secs.is_finite()
            && a.sustained_beat_secs.is_finite()
            && a.short_beat_secs > 0.0
            && a.short_beat_secs <= a.sustained_beat_secs)
        {
            return Err(ConfigError::BeatThresholds {
                short: a.short_beat_secs,
                sustained: a.sustained_beat_secs,
            });
        }

        let v = &self.variety;
        check_weight("variety.repeatPenalty", v.repeat_penalty)?;
        check_weight("variety.alternateBonus", v.alternate_bonus)?;
        check_weight("variety.stalePenalty", v.stale_penalty)?;
        check_weight("variety.quickMotionBonus", v.quick_motion_bonus)?;
        check_probability("variety.mirrorProbability", v.mirror_probability)?;

        let p = &self.preference;
        check_table("preference.singleMotion", &p.single_motion, MotionEffect::COUNT)?;
        check_table("preference.multiMotion", &p.multi_motion, MotionEffect::COUNT)?;
        check_table("preference.lightColor", &p.light_color, ColorEffect::COUNT)?;
        check_table("preference.lightIntensity", &p.light_intensity, IntensityEffect::COUNT)?;
        check_table("preference.vfx", &p.vfx, VfxEffect::COUNT)?;

        Ok(())
    }
}
