// Per-group rolling memory of recent activations.
//
// For every catalog key the state keeps the last `window` emitted tuples
// (activations only; beats where the group was absent leave no trace) and a
// VFX cooldown counter. Owned exclusively by one `EffectSelector`; nothing
// else reads or writes it.
//
// Cooldown clock: `record()` on a VFX group sets the key's remaining
// cooldown to `cooldown_beats`, and `advance_beat()` (called once at the
// start of every beat, dark or not) counts it down. The key is blocked while
// the counter is above zero, so two activations of one VFX key are always
// at least `cooldown_beats` beats apart. Light groups never cool down.

use std::collections::{BTreeSet, VecDeque};

use crate::catalog::{GroupLightKey, GroupType};
use crate::effect::EffectTuple;

#[derive(Clone, Debug, Default)]
struct KeyMemory {
    history: VecDeque<EffectTuple>,
    cooldown_remaining: u32,
}

#[derive(Clone, Debug)]
pub struct CoherenceState {
    window: usize,
    cooldown_beats: u32,
    keys: [KeyMemory; GroupLightKey::COUNT],
}

impl CoherenceState {
    pub fn new(window: usize, cooldown_beats: u32) -> Self {
        CoherenceState {
            window: window.max(1),
            cooldown_beats,
            keys: Default::default(),
        }
    }

    /// Tick every cooldown clock by one beat.
    pub fn advance_beat(&mut self) {
        for mem in &mut self.keys {
            mem.cooldown_remaining = mem.cooldown_remaining.saturating_sub(1);
        }
    }

    /// Remember an emitted activation, trimming history to the window.
    pub fn record(&mut self, key: GroupLightKey, tuple: EffectTuple) {
        let window = self.window;
        let cooldown = self.cooldown_beats;
        let mem = &mut self.keys[key.index()];
        mem.history.push_back(tuple);
        while mem.history.len() > window {
            mem.history.pop_front();
        }
        if key.group_type() == GroupType::Vfx {
            mem.cooldown_remaining = cooldown;
        }
    }

    /// Distinct tuples seen in the key's window.
    pub fn recently_used(&self, key: GroupLightKey) -> BTreeSet<EffectTuple> {
        self.keys[key.index()].history.iter().copied().collect()
    }

    /// The most recent activation.
    pub fn previous(&self, key: GroupLightKey) -> Option<EffectTuple> {
        self.keys[key.index()].history.back().copied()
    }

    /// The activation before `previous`.
    pub fn before_previous(&self, key: GroupLightKey) -> Option<EffectTuple> {
        let history = &self.keys[key.index()].history;
        history.len().checked_sub(2).and_then(|i| history.get(i)).copied()
    }

    pub fn cooldown_active(&self, key: GroupLightKey) -> bool {
        self.keys[key.index()].cooldown_remaining > 0
    }

    /// Forget everything, as at program start.
    pub fn reset(&mut self) {
        self.keys = Default::default();
    }
}
