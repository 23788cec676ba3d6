// Effect selector: the per-beat decision core.
//
// For each beat the selector decides which groups fire and what tuple each
// one gets. It owns the engine's only `ShowRng`, its `CoherenceState` and the
// `PreferenceTable`. A decision runs in fixed steps:
//
// 1. Tick cooldown clocks (`CoherenceState::advance_beat`).
// 2. Activation: one roll per active key in ascending order against a
//    probability built from the beat class (by duration), band energy and
//    base odds. VFX groups under cooldown are forced inactive; flash beats
//    only consider single-light groups.
// 3. Cap: flash and short beats keep at most N winners, preferring the
//    largest margin (probability minus roll), ties to the lower key.
// 4. Optional `ensureActivity`: a non-flash beat where nothing fired forces
//    the most probable eligible group on.
// 5. Tuple draw per winner: one weighted draw per field from the preference
//    table, scaled by coherence history (repeat penalty, A-B-A bonus, stale
//    penalty), quick-motion bias on fast beats and bass-driven
//    SpectrumBased weight. Later groups of a type may mirror the first
//    group's primary field (motion for lights, VFX for VFX groups).
// 6. Legalize: an `is_legal` pre-check records any illegal draw as a
//    diagnostic, then `repair` runs unconditionally.
// 7. All-off tuples are dropped: an inactive group is absent, not present
//    with zeros.
//
// `decide()` performs steps 1-7 without touching history; `commit()`
// records the emitted tuples. `select()` does both. The split lets the
// streaming path throw away a decision that finished after its deadline
// while the cooldown clocks still advance.
//
// Candidates are always listed in ascending enum order and the weighted draw
// scans in that order, so equal weights resolve toward the lower value. When
// every weight of a field is zero, value 0 is chosen without consuming a
// draw.
//
// **Critical constraint: determinism.** Same config (seed included) and
// same beat sequence give the same decisions. Nothing here reads the clock
// except `select_before`, and only to decide whether to commit.

use std::collections::BTreeSet;
use std::time::Instant;

use beatlight_prng::ShowRng;
use smallvec::SmallVec;
use tracing::debug;

use crate::beat::{BeatClass, BeatEvent};
use crate::catalog::{GroupLightKey, GroupType};
use crate::coherence::CoherenceState;
use crate::config::{ActivationParams, EngineConfig, TypeFactors, VarietyParams};
use crate::effect::{EffectField, EffectTuple, IntensityEffect, MotionEffect, RawEffectTuple};
use crate::error::ConfigError;
use crate::legalizer;
use crate::preference::PreferenceTable;
use crate::program::{GroupLightAssignment, GroupLights};

/// A drawn tuple the legalizer rejected before repair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IllegalAttempt {
    pub key: GroupLightKey,
    pub tuple: RawEffectTuple,
}

/// The outcome of one beat's selection, not yet committed to history.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Decision {
    pub assignments: GroupLights,
    pub illegal_attempts: SmallVec<[IllegalAttempt; 1]>,
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    key: GroupLightKey,
    probability: f64,
    margin: f64,
}

pub struct EffectSelector {
    seed: u64,
    rng: ShowRng,
    coherence: CoherenceState,
    preferences: PreferenceTable,
    activation: ActivationParams,
    variety: VarietyParams,
    band_energy_enabled: bool,
    ensure_activity: bool,
    keys: Vec<GroupLightKey>,
}

const NEUTRAL: TypeFactors = TypeFactors::new(1.0, 1.0, 1.0);

impl EffectSelector {
    /// Build a selector from a config, failing on any config error.
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(EffectSelector {
            seed: config.seed,
            rng: ShowRng::new(config.seed),
            coherence: CoherenceState::new(config.history_window, config.vfx_cooldown_beats),
            preferences: PreferenceTable::from_params(&config.preference)?,
            activation: config.activation.clone(),
            variety: config.variety.clone(),
            band_energy_enabled: config.band_energy_enabled,
            ensure_activity: config.ensure_activity,
            keys: config.group_keys()?,
        })
    }

    /// Keys this selector drives, ascending.
    pub fn keys(&self) -> &[GroupLightKey] {
        &self.keys
    }

    #[cfg(test)]
    pub(crate) fn coherence(&self) -> &CoherenceState {
        &self.coherence
    }

    /// Classify a beat with this selector's thresholds.
    pub fn classify(&self, beat: &BeatEvent) -> BeatClass {
        BeatClass::classify(
            beat.duration,
            self.activation.short_beat_secs,
            self.activation.sustained_beat_secs,
        )
    }

    /// Decide and commit.
    pub fn select(&mut self, beat: &BeatEvent) -> Decision {
        let decision = self.decide(beat);
        self.commit(&decision);
        decision
    }

    /// Decide, committing only if the decision is ready by `deadline`.
    /// Returns `None` when the deadline has passed; history is untouched and
    /// the beat should be emitted dark.
    pub fn select_before(&mut self, beat: &BeatEvent, deadline: Option<Instant>) -> Option<Decision> {
        let decision = self.decide(beat);
        if deadline.is_some_and(|d| Instant::now() > d) {
            return None;
        }
        self.commit(&decision);
        Some(decision)
    }

    /// Let a beat pass with no activations (malformed input). Cooldown clocks
    /// still advance; no random draws are made.
    pub fn skip(&mut self) {
        self.coherence.advance_beat();
    }

    /// Record a decision's emitted tuples into coherence history.
    pub fn commit(&mut self, decision: &Decision) {
        for a in &decision.assignments {
            self.coherence.record(a.key, a.effects);
        }
    }

    /// Return to program start: empty history, generator reseeded.
    pub fn reset(&mut self) {
        self.coherence.reset();
        self.rng = ShowRng::new(self.seed);
    }

    /// Steps 1-7 for one beat. Mutates the generator and cooldown clocks but
    /// not history.
    pub fn decide(&mut self, beat: &BeatEvent) -> Decision {
        self.coherence.advance_beat();
        let class = self.classify(beat);

        let winners = self.activate(beat, class);

        let mut decision = Decision::default();
        let mut leaders: [Option<EffectTuple>; 3] = [None; 3];
        for c in winners {
            let group = c.key.group_type();
            let slot = type_slot(group);
            let raw = self.draw_tuple(c.key, beat, class, leaders[slot]);
            let (effects, attempt) = legalize(c.key, raw);
            if let Some(attempt) = attempt {
                decision.illegal_attempts.push(attempt);
            }
            if effects.is_off() {
                continue;
            }
            if leaders[slot].is_none() {
                leaders[slot] = Some(effects);
            }
            decision.assignments.push(GroupLightAssignment { key: c.key, effects });
        }

        debug!(
            time = beat.time,
            ?class,
            lit = decision.assignments.len(),
            "beat decided"
        );
        decision
    }

    // -----------------------------------------------------------------------
    // Activation
    // -----------------------------------------------------------------------

    fn class_factors(&self, class: BeatClass) -> TypeFactors {
        match class {
            BeatClass::Transient => self.activation.transient,
            BeatClass::Short => self.activation.short,
            BeatClass::Normal => NEUTRAL,
            BeatClass::Sustained => self.activation.sustained,
        }
    }

    fn activation_probability(&self, group: GroupType, class: BeatClass, beat: &BeatEvent) -> f64 {
        let a = &self.activation;
        let mut p = a.base.get(group) * self.class_factors(class).get(group);
        if let Some(energy) = beat.band_energy.filter(|_| self.band_energy_enabled) {
            p *= match group {
                GroupType::Vfx => 1.0 + a.high_gain * energy.high,
                GroupType::SingleLight => 1.0 + a.mid_gain * energy.mid,
                GroupType::MultiLight => 1.0 + a.bass_gain * energy.bass,
            };
        }
        p.clamp(0.0, a.max_probability)
    }

    fn eligible(&self, key: GroupLightKey, class: BeatClass) -> bool {
        let group = key.group_type();
        if group == GroupType::Vfx && self.coherence.cooldown_active(key) {
            return false;
        }
        class != BeatClass::Transient || group == GroupType::SingleLight
    }

    fn cap(&self, class: BeatClass) -> Option<usize> {
        match class {
            BeatClass::Transient => Some(self.activation.transient_cap),
            BeatClass::Short => Some(self.activation.short_cap),
            BeatClass::Normal | BeatClass::Sustained => None,
        }
    }

    /// Steps 2-4. Returns winners ascending by key.
    fn activate(&mut self, beat: &BeatEvent, class: BeatClass) -> Vec<Candidate> {
        let mut considered = Vec::with_capacity(self.keys.len());
        for &key in &self.keys {
            let probability = if self.eligible(key, class) {
                self.activation_probability(key.group_type(), class, beat)
            } else {
                0.0
            };
            // One roll per key whether or not it can fire, so the stream
            // position does not depend on cooldown state.
            let roll = self.rng.next_f64();
            considered.push(Candidate {
                key,
                probability,
                margin: probability - roll,
            });
        }

        let mut winners: Vec<Candidate> =
            considered.iter().copied().filter(|c| c.margin > 0.0).collect();

        if let Some(cap) = self.cap(class) {
            if winners.len() > cap {
                winners.sort_by(|a, b| b.margin.total_cmp(&a.margin).then(a.key.cmp(&b.key)));
                winners.truncate(cap);
                winners.sort_by_key(|c| c.key);
            }
        }

        if winners.is_empty() && self.ensure_activity && class != BeatClass::Transient {
            let forced = considered
                .iter()
                .filter(|c| c.probability > 0.0)
                .fold(None::<Candidate>, |best, c| match best {
                    Some(b) if b.probability >= c.probability => Some(b),
                    _ => Some(*c),
                });
            winners.extend(forced);
        }

        winners
    }

    // -----------------------------------------------------------------------
    // Tuple draw
    // -----------------------------------------------------------------------

    /// Draw one raw tuple for an activated key. `leader` is the first tuple
    /// emitted this beat for a group of the same type.
    fn draw_tuple(
        &mut self,
        key: GroupLightKey,
        beat: &BeatEvent,
        class: BeatClass,
        leader: Option<EffectTuple>,
    ) -> RawEffectTuple {
        let group = key.group_type();
        let recency = Recency::of(&self.coherence, key);

        let mirror = match leader {
            Some(t) => self.rng.random_bool(self.variety.mirror_probability).then_some(t),
            None => None,
        };

        let motion = match mirror.filter(|_| group != GroupType::Vfx) {
            Some(t) => t.motion.wire() as i64,
            None => {
                let mut w = self.field_weights(group, EffectField::Motion, &recency, |t| t.motion.wire());
                if matches!(class, BeatClass::Transient | BeatClass::Short) {
                    for quick in [MotionEffect::Rotate, MotionEffect::PingPong] {
                        w[quick.wire() as usize] *= self.variety.quick_motion_bonus;
                    }
                }
                self.draw(&w)
            }
        };

        let w = self.field_weights(group, EffectField::Color, &recency, |t| t.color.wire());
        let color = self.draw(&w);

        let mut w = self.field_weights(group, EffectField::Intensity, &recency, |t| t.intensity.wire());
        if let Some(energy) = beat.band_energy.filter(|_| self.band_energy_enabled) {
            w[IntensityEffect::SpectrumBased.wire() as usize] *=
                1.0 + self.activation.spectrum_gain * energy.bass;
        }
        let intensity = self.draw(&w);

        let vfx = match mirror.filter(|_| group == GroupType::Vfx) {
            Some(t) => t.vfx.wire() as i64,
            None => {
                let w = self.field_weights(group, EffectField::Vfx, &recency, |t| t.vfx.wire());
                self.draw(&w)
            }
        };

        RawEffectTuple::new(motion, color, intensity, vfx)
    }

    /// Preference weights for one field scaled by the key's history.
    fn field_weights(
        &self,
        group: GroupType,
        field: EffectField,
        recency: &Recency,
        project: impl Fn(&EffectTuple) -> u8,
    ) -> Vec<f64> {
        let value = |t: &EffectTuple| project(t) as usize;
        let mut weights = self.preferences.weights(group, field).to_vec();
        let recent: SmallVec<[usize; 8]> = recency.recent.iter().map(value).collect();
        apply_variety(
            &mut weights,
            recency.previous.as_ref().map(value),
            recency.before_previous.as_ref().map(value),
            &recent,
            &self.variety,
        );
        weights
    }

    fn draw(&mut self, weights: &[f64]) -> i64 {
        self.rng.weighted_index(weights).unwrap_or(0) as i64
    }
}

/// A key's coherence window, read once per tuple draw.
struct Recency {
    previous: Option<EffectTuple>,
    before_previous: Option<EffectTuple>,
    recent: BTreeSet<EffectTuple>,
}

impl Recency {
    fn of(coherence: &CoherenceState, key: GroupLightKey) -> Self {
        Recency {
            previous: coherence.previous(key),
            before_previous: coherence.before_previous(key),
            recent: coherence.recently_used(key),
        }
    }
}

/// Scale `weights` by how recently each value was used. `recent` holds every
/// value in the window, `previous` and `before_previous` included.
fn apply_variety(
    weights: &mut [f64],
    previous: Option<usize>,
    before_previous: Option<usize>,
    recent: &[usize],
    variety: &VarietyParams,
) {
    for (value, w) in weights.iter_mut().enumerate() {
        if Some(value) == previous {
            *w *= variety.repeat_penalty;
        } else if Some(value) == before_previous {
            *w *= variety.alternate_bonus;
        } else if recent.contains(&value) {
            *w *= variety.stale_penalty;
        }
    }
}

/// Pre-check then repair a drawn tuple.
fn legalize(key: GroupLightKey, raw: RawEffectTuple) -> (EffectTuple, Option<IllegalAttempt>) {
    let group = key.group_type();
    let attempt = (!legalizer::is_legal(group, &raw)).then_some(IllegalAttempt { key, tuple: raw });
    (legalizer::repair(group, &raw), attempt)
}

fn type_slot(group: GroupType) -> usize {
    match group {
        GroupType::Vfx => 0,
        GroupType::SingleLight => 1,
        GroupType::MultiLight => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beat::BandEnergy;
    use crate::config::EngineConfig;
    use crate::effect::{ColorEffect, VfxEffect};

    fn selector(config: EngineConfig) -> EffectSelector {
        EffectSelector::new(&config).unwrap()
    }

    fn beats(n: usize, duration: f64) -> Vec<BeatEvent> {
        (0..n).map(|i| BeatEvent::new(i as f64 * 0.5, duration)).collect()
    }

    #[test]
    fn same_seed_same_decisions() {
        let mut a = selector(EngineConfig::default());
        let mut b = selector(EngineConfig::default());
        for beat in beats(64, 0.8) {
            assert_eq!(a.select(&beat), b.select(&beat));
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = selector(EngineConfig {
            seed: 1,
            ..EngineConfig::default()
        });
        let mut b = selector(EngineConfig {
            seed: 2,
            ..EngineConfig::default()
        });
        let differs = beats(64, 1.5).iter().any(|beat| a.select(beat) != b.select(beat));
        assert!(differs);
    }

    #[test]
    fn assignments_are_legal_sorted_and_never_off() {
        let mut s = selector(EngineConfig::default());
        for (i, beat) in beats(200, 2.0).iter().enumerate() {
            let d = s.select(beat);
            assert!(d.illegal_attempts.is_empty(), "beat {i}: {:?}", d.illegal_attempts);
            for pair in d.assignments.windows(2) {
                assert!(pair[0].key < pair[1].key);
            }
            for a in &d.assignments {
                assert!(legalizer::is_legal_tuple(a.key.group_type(), &a.effects));
                assert!(!a.effects.is_off());
            }
        }
    }

    #[test]
    fn flash_beats_light_at_most_one_single_group() {
        let mut s = selector(EngineConfig::default());
        for beat in beats(100, 0.0) {
            let d = s.select(&beat);
            assert!(d.assignments.len() <= 1);
            for a in &d.assignments {
                assert_eq!(a.key.group_type(), GroupType::SingleLight);
            }
        }
    }

    #[test]
    fn short_beats_respect_cap() {
        let mut s = selector(EngineConfig::default());
        for beat in beats(100, 0.3) {
            assert!(s.select(&beat).assignments.len() <= 2);
        }
    }

    #[test]
    fn vfx_cooldown_spaces_activations() {
        let mut config = EngineConfig::default();
        config.vfx_cooldown_beats = 3;
        config.activation.base.vfx = 1.0;
        config.activation.max_probability = 1.0;
        let mut s = selector(config);

        let mut last_fired: [Option<usize>; 2] = [None, None];
        for (i, beat) in beats(60, 4.0).iter().enumerate() {
            for a in &s.select(beat).assignments {
                if a.key.group_type() == GroupType::Vfx {
                    let k = a.key.index();
                    if let Some(prev) = last_fired[k] {
                        assert!(i - prev >= 3, "key {k} fired at {prev} and {i}");
                    }
                    last_fired[k] = Some(i);
                }
            }
        }
        assert!(last_fired.iter().all(Option::is_some));
    }

    #[test]
    fn skip_advances_cooldown_without_drawing() {
        let mut config = EngineConfig::default();
        config.vfx_cooldown_beats = 2;
        let mut s = selector(config);
        let before = s.rng.clone();
        s.coherence.record(GroupLightKey::new(0).unwrap(), EffectTuple::vfx(VfxEffect::Wave));
        assert!(s.coherence().cooldown_active(GroupLightKey::new(0).unwrap()));
        s.skip();
        s.skip();
        assert!(!s.coherence().cooldown_active(GroupLightKey::new(0).unwrap()));
        assert_eq!(s.rng, before);
    }

    #[test]
    fn decide_without_commit_leaves_history_alone() {
        let mut config = EngineConfig::default();
        config.ensure_activity = true;
        let mut s = selector(config);
        let beat = BeatEvent::new(0.0, 2.0);
        let d = s.decide(&beat);
        assert!(!d.assignments.is_empty());
        for a in &d.assignments {
            assert_eq!(s.coherence().previous(a.key), None);
        }
        s.commit(&d);
        for a in &d.assignments {
            assert_eq!(s.coherence().previous(a.key), Some(a.effects));
        }
    }

    #[test]
    fn missed_deadline_is_not_committed() {
        let mut s = selector(EngineConfig {
            ensure_activity: true,
            ..EngineConfig::default()
        });
        let past = Instant::now();
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert!(s.select_before(&BeatEvent::new(0.0, 2.0), Some(past)).is_none());
        for key in GroupLightKey::ALL {
            assert_eq!(s.coherence().previous(key), None);
        }
        assert!(s.select_before(&BeatEvent::new(1.0, 2.0), None).is_some());
    }

    #[test]
    fn ensure_activity_fills_empty_normal_beats() {
        let mut config = EngineConfig::default();
        config.ensure_activity = true;
        config.activation.base = TypeFactors::new(0.01, 0.01, 0.01);
        let mut s = selector(config);
        for beat in beats(50, 2.0) {
            assert!(!s.select(&beat).assignments.is_empty());
        }
    }

    #[test]
    fn empty_beats_are_valid_by_default() {
        let mut config = EngineConfig::default();
        config.activation.base = TypeFactors::new(0.0, 0.0, 0.0);
        let mut s = selector(config);
        for beat in beats(20, 2.0) {
            assert!(s.select(&beat).assignments.is_empty());
        }
    }

    #[test]
    fn active_keys_limit_the_universe() {
        let mut config = EngineConfig::default();
        config.active_keys = vec![4];
        config.activation.base = TypeFactors::new(1.0, 1.0, 0.95);
        let mut s = selector(config);
        for beat in beats(30, 2.0) {
            for a in &s.select(&beat).assignments {
                assert_eq!(a.key.get(), 4);
            }
        }
    }

    #[test]
    fn light_groups_lean_on_preferred_motions() {
        let mut config = EngineConfig::default();
        config.activation.base = TypeFactors::new(0.0, 0.95, 0.95);
        let mut s = selector(config);
        let (mut preferred, mut total) = (0, 0);
        for beat in beats(300, 2.0) {
            for a in &s.select(&beat).assignments {
                total += 1;
                if a.key.group_type().preferred_motions().contains(&a.effects.motion) {
                    preferred += 1;
                }
            }
        }
        assert!(total > 100);
        assert!(preferred * 10 > total * 8, "{preferred}/{total} on preferred motions");
    }

    #[test]
    fn bass_energy_favors_multi_groups_and_spectrum_intensity() {
        let run = |energy: Option<BandEnergy>| {
            let mut config = EngineConfig::default();
            config.seed = 7;
            let mut s = selector(config);
            let (mut multi, mut spectrum) = (0, 0);
            for i in 0..400 {
                let mut beat = BeatEvent::new(i as f64, 2.0);
                beat.band_energy = energy;
                for a in &s.select(&beat).assignments {
                    if a.key.group_type() == GroupType::MultiLight {
                        multi += 1;
                    }
                    if a.effects.intensity == IntensityEffect::SpectrumBased {
                        spectrum += 1;
                    }
                }
            }
            (multi, spectrum)
        };
        let (quiet_multi, quiet_spectrum) = run(Some(BandEnergy::new(0.0, 0.0, 0.0)));
        let (loud_multi, loud_spectrum) = run(Some(BandEnergy::new(1.0, 0.0, 0.0)));
        assert!(loud_multi > quiet_multi);
        assert!(loud_spectrum > quiet_spectrum);
    }

    #[test]
    fn variety_penalizes_immediate_repeats() {
        let variety = VarietyParams::default();
        let mut w = vec![1.0; 4];
        apply_variety(&mut w, Some(3), Some(2), &[1, 2, 3], &variety);
        assert_eq!(w[0], 1.0);
        assert_eq!(w[1], variety.stale_penalty);
        assert_eq!(w[2], variety.alternate_bonus);
        assert_eq!(w[3], variety.repeat_penalty);
    }

    #[test]
    fn recency_reads_the_coherence_window() {
        let light = |m| EffectTuple::light(m, ColorEffect::StaticColor, IntensityEffect::SpectrumBased);
        let key = GroupLightKey::new(3).unwrap();
        let mut coherence = CoherenceState::new(2, 0);
        for m in [MotionEffect::Wave, MotionEffect::Rotate, MotionEffect::PingPong] {
            coherence.record(key, light(m));
        }

        let recency = Recency::of(&coherence, key);
        assert_eq!(recency.previous, Some(light(MotionEffect::PingPong)));
        assert_eq!(recency.before_previous, Some(light(MotionEffect::Rotate)));
        assert!(!recency.recent.contains(&light(MotionEffect::Wave)));

        let variety = VarietyParams::default();
        let s = selector(EngineConfig::default());
        let flat = vec![1.0; 7];
        let mut expected = flat.clone();
        apply_variety(
            &mut expected,
            Some(MotionEffect::PingPong.wire() as usize),
            Some(MotionEffect::Rotate.wire() as usize),
            &[MotionEffect::Rotate.wire() as usize, MotionEffect::PingPong.wire() as usize],
            &variety,
        );
        let base = s.preferences.weights(GroupType::SingleLight, EffectField::Motion);
        let got = s.field_weights(GroupType::SingleLight, EffectField::Motion, &recency, |t| t.motion.wire());
        for (i, w) in got.iter().enumerate() {
            assert_eq!(*w, base[i] * expected[i]);
        }
    }

    #[test]
    fn all_zero_weights_choose_value_zero() {
        let mut s = selector(EngineConfig::default());
        let before = s.rng.clone();
        assert_eq!(s.draw(&[0.0, 0.0, 0.0]), 0);
        assert_eq!(s.rng, before);
    }

    #[test]
    fn legalize_reports_and_repairs_illegal_draws() {
        let key = GroupLightKey::new(1).unwrap();
        let (effects, attempt) = legalize(key, RawEffectTuple::new(3, 0, 0, 3));
        assert_eq!(effects, EffectTuple::OFF);
        assert_eq!(
            attempt,
            Some(IllegalAttempt {
                key,
                tuple: RawEffectTuple::new(3, 0, 0, 3)
            })
        );

        let key = GroupLightKey::new(2).unwrap();
        let (_, attempt) = legalize(key, RawEffectTuple::new(4, 1, 1, 0));
        assert_eq!(attempt, None);
    }

    #[test]
    fn reset_replays_from_the_start() {
        let mut s = selector(EngineConfig::default());
        let first: Vec<Decision> = beats(20, 1.2).iter().map(|b| s.select(b)).collect();
        s.reset();
        let second: Vec<Decision> = beats(20, 1.2).iter().map(|b| s.select(b)).collect();
        assert_eq!(first, second);
    }
}
