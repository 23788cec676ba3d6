// Beat events as produced by the upstream beat-detection stage.
//
// A `BeatEvent` is read-only input: start time, duration (may overlap the
// next beat), and optional normalized per-band energy. The engine never
// edits a beat; output entries carry the input time and duration through
// unchanged.
//
// `SequenceGuard` enforces the input contract one beat at a time: times must
// be finite, non-negative and strictly increasing relative to the last beat
// that was accepted; durations finite and non-negative; band energies in
// [0, 1]. A refused beat does not move the guard, so a single out-of-order
// beat costs only itself.

use serde::{Deserialize, Serialize};

use crate::error::BeatDefect;

/// Normalized spectral energy of a beat, each band in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BandEnergy {
    pub bass: f64,
    pub mid: f64,
    pub high: f64,
}

impl BandEnergy {
    pub const fn new(bass: f64, mid: f64, high: f64) -> Self {
        BandEnergy { bass, mid, high }
    }

    fn check(&self) -> Result<(), BeatDefect> {
        for (band, value) in [("bass", self.bass), ("mid", self.mid), ("high", self.high)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(BeatDefect::BandEnergyOutOfRange { band, value });
            }
        }
        Ok(())
    }
}

/// One detected beat.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeatEvent {
    /// Start time in seconds.
    pub time: f64,
    /// Seconds until the next lighting-relevant change.
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band_energy: Option<BandEnergy>,
}

impl BeatEvent {
    pub const fn new(time: f64, duration: f64) -> Self {
        BeatEvent {
            time,
            duration,
            band_energy: None,
        }
    }

    pub fn with_band_energy(mut self, energy: BandEnergy) -> Self {
        self.band_energy = Some(energy);
        self
    }
}

/// Coarse tempo class of a beat, derived from its duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BeatClass {
    /// Zero-length flash beat.
    Transient,
    /// Rapid beat: quick motions, few groups.
    Short,
    Normal,
    /// Held section: favors laser banks and VFX.
    Sustained,
}

impl BeatClass {
    pub fn classify(duration: f64, short_secs: f64, sustained_secs: f64) -> Self {
        if duration <= 0.0 {
            BeatClass::Transient
        } else if duration < short_secs {
            BeatClass::Short
        } else if duration > sustained_secs {
            BeatClass::Sustained
        } else {
            BeatClass::Normal
        }
    }
}

/// Validates beats in arrival order.
#[derive(Clone, Debug, Default)]
pub struct SequenceGuard {
    last_accepted: Option<f64>,
}

impl SequenceGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a beat against the contract, advancing only on success.
    pub fn admit(&mut self, beat: &BeatEvent) -> Result<(), BeatDefect> {
        if !beat.time.is_finite() || beat.time < 0.0 {
            return Err(BeatDefect::InvalidTime(beat.time));
        }
        if !beat.duration.is_finite() || beat.duration < 0.0 {
            return Err(BeatDefect::InvalidDuration(beat.duration));
        }
        if let Some(previous) = self.last_accepted {
            if beat.time <= previous {
                return Err(BeatDefect::NonIncreasingTime {
                    time: beat.time,
                    previous,
                });
            }
        }
        if let Some(energy) = &beat.band_energy {
            energy.check()?;
        }
        self.last_accepted = Some(beat.time);
        Ok(())
    }

    pub fn last_accepted(&self) -> Option<f64> {
        self.last_accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_duration() {
        assert_eq!(BeatClass::classify(0.0, 1.0, 3.0), BeatClass::Transient);
        assert_eq!(BeatClass::classify(0.4, 1.0, 3.0), BeatClass::Short);
        assert_eq!(BeatClass::classify(1.0, 1.0, 3.0), BeatClass::Normal);
        assert_eq!(BeatClass::classify(3.0, 1.0, 3.0), BeatClass::Normal);
        assert_eq!(BeatClass::classify(4.2, 1.0, 3.0), BeatClass::Sustained);
    }

    #[test]
    fn guard_accepts_increasing_sequence() {
        let mut guard = SequenceGuard::new();
        for t in [0.0, 0.5, 1.25, 9.0] {
            assert!(guard.admit(&BeatEvent::new(t, 0.5)).is_ok());
        }
        assert_eq!(guard.last_accepted(), Some(9.0));
    }

    #[test]
    fn guard_refuses_out_of_order_beat_without_moving() {
        let mut guard = SequenceGuard::new();
        guard.admit(&BeatEvent::new(0.0, 1.0)).unwrap();
        guard.admit(&BeatEvent::new(1.0, 1.0)).unwrap();

        let err = guard.admit(&BeatEvent::new(0.5, 1.0)).unwrap_err();
        assert_eq!(
            err,
            BeatDefect::NonIncreasingTime {
                time: 0.5,
                previous: 1.0
            }
        );
        // The following in-order beat is still accepted.
        assert!(guard.admit(&BeatEvent::new(2.0, 1.0)).is_ok());
    }

    #[test]
    fn guard_refuses_repeated_time() {
        let mut guard = SequenceGuard::new();
        guard.admit(&BeatEvent::new(1.0, 1.0)).unwrap();
        assert!(guard.admit(&BeatEvent::new(1.0, 1.0)).is_err());
    }

    #[test]
    fn guard_refuses_negative_values() {
        let mut guard = SequenceGuard::new();
        assert_eq!(
            guard.admit(&BeatEvent::new(-0.1, 1.0)),
            Err(BeatDefect::InvalidTime(-0.1))
        );
        assert_eq!(
            guard.admit(&BeatEvent::new(0.0, -2.0)),
            Err(BeatDefect::InvalidDuration(-2.0))
        );
        assert!(guard.admit(&BeatEvent::new(f64::NAN, 1.0)).is_err());
        assert_eq!(guard.last_accepted(), None);
    }

    #[test]
    fn guard_refuses_band_energy_out_of_range() {
        let mut guard = SequenceGuard::new();
        let beat = BeatEvent::new(0.0, 1.0).with_band_energy(BandEnergy::new(0.2, 1.4, 0.1));
        assert_eq!(
            guard.admit(&beat),
            Err(BeatDefect::BandEnergyOutOfRange {
                band: "mid",
                value: 1.4
            })
        );
    }

    #[test]
    fn beat_json_uses_camel_case_and_optional_energy() {
        let beat: BeatEvent = serde_json::from_str(r#"{"time": 1.5, "duration": 0.5}"#).unwrap();
        assert_eq!(beat, BeatEvent::new(1.5, 0.5));

        let beat: BeatEvent = serde_json::from_str(
            r#"{"time": 2.0, "duration": 0.25, "bandEnergy": {"bass": 0.9, "mid": 0.3, "high": 0.1}}"#,
        )
        .unwrap();
        assert_eq!(beat.band_energy, Some(BandEnergy::new(0.9, 0.3, 0.1)));
    }
}
