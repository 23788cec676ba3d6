// Test helpers for end-to-end engine tests.
//
// Builds synthetic beat tracks and checks whole programs against the
// output contract: legality per group type, at most one entry per key in
// ascending order, 1:1 beat preservation and VFX spacing. Every check runs
// on the public API only, the same way show control consumes a program.
//
// See also: `tests/scenarios.rs` and `tests/properties.rs`.

use beatlight_engine::legalizer::is_legal_tuple;
use beatlight_engine::{
    assemble_program, BandEnergy, BeatEvent, EngineConfig, GroupLightKey, GroupType, LightProgram,
};

/// `n` beats every `spacing` seconds, each lasting `duration`.
pub fn steady_track(n: usize, spacing: f64, duration: f64) -> Vec<BeatEvent> {
    (0..n).map(|i| BeatEvent::new(i as f64 * spacing, duration)).collect()
}

/// `n` zero-duration flash beats.
pub fn flash_track(n: usize) -> Vec<BeatEvent> {
    steady_track(n, 0.25, 0.0)
}

/// A track cycling through flash, short, normal and sustained beats with a
/// slowly rotating band-energy profile.
pub fn mixed_track(n: usize) -> Vec<BeatEvent> {
    let durations = [0.0, 0.4, 1.5, 3.5];
    let mut time = 0.0;
    (0..n)
        .map(|i| {
            let d = durations[i % durations.len()];
            let phase = (i % 12) as f64 / 11.0;
            let beat = BeatEvent::new(time, d).with_band_energy(BandEnergy::new(phase, 0.5, 1.0 - phase));
            time += d.max(0.1);
            beat
        })
        .collect()
}

/// Assemble and serialize exactly as the CLI does.
pub fn program_json(config: &EngineConfig, beats: &[BeatEvent]) -> String {
    let assembled = assemble_program(config, beats.iter().copied()).expect("valid config");
    assembled.program.to_json_pretty().expect("serializable program")
}

/// Beat indices where `key` is lit.
pub fn activations(program: &LightProgram, key: GroupLightKey) -> Vec<usize> {
    program
        .beats
        .iter()
        .enumerate()
        .filter(|(_, e)| e.group_lights.iter().any(|a| a.key == key))
        .map(|(i, _)| i)
        .collect()
}

/// Panic unless every entry honors the output contract.
pub fn assert_contract(program: &LightProgram) {
    for (i, entry) in program.beats.iter().enumerate() {
        for pair in entry.group_lights.windows(2) {
            assert!(pair[0].key < pair[1].key, "beat {i}: keys not strictly ascending");
        }
        for a in &entry.group_lights {
            let group = a.key.group_type();
            assert!(is_legal_tuple(group, &a.effects), "beat {i}: illegal {:?} on key {}", a.effects, a.key);
            assert!(!a.effects.is_off(), "beat {i}: key {} present but off", a.key);
            match group {
                GroupType::Vfx => {
                    assert!(a.effects.motion.is_off());
                    assert!(a.effects.color.is_off());
                    assert!(a.effects.intensity.is_off());
                }
                GroupType::SingleLight | GroupType::MultiLight => {
                    assert!(a.effects.vfx.is_off());
                }
            }
        }
    }
}

/// Panic if two activations of any VFX key are fewer than `cooldown` beats
/// apart.
pub fn assert_vfx_spacing(program: &LightProgram, cooldown: u32) {
    for key in GroupLightKey::ALL {
        if key.group_type() != GroupType::Vfx {
            continue;
        }
        for pair in activations(program, key).windows(2) {
            let gap = pair[1] - pair[0];
            assert!(
                gap >= cooldown as usize,
                "key {key} fired at beats {} and {} with cooldown {cooldown}",
                pair[0],
                pair[1]
            );
        }
    }
}
