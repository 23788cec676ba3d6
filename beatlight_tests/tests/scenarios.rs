// End-to-end scenarios for the effect assignment engine.
//
// Drives whole beat tracks through the public API (assembler, batch,
// stream, file round trip, validator) and checks the emitted programs
// against the output contract using the helpers in `beatlight_tests`.

use std::time::Duration;

use beatlight_engine::legalizer::repair;
use beatlight_engine::validate::validate_program;
use beatlight_engine::{
    assemble_program, assemble_tracks, start_stream, BeatEvent, BeatTimeline, EngineConfig,
    EngineError, GroupType, LightProgram, RawEffectTuple, RawProgram, Track, VfxEffect,
};
use beatlight_tests::{
    activations, assert_contract, assert_vfx_spacing, flash_track, mixed_track, program_json,
    steady_track,
};

fn config(seed: u64) -> EngineConfig {
    EngineConfig {
        seed,
        ..EngineConfig::default()
    }
}

fn assemble(config: &EngineConfig, beats: &[BeatEvent]) -> LightProgram {
    assemble_program(config, beats.iter().copied()).unwrap().program
}

// ---------------------------------------------------------------------------
// Test scenarios
// ---------------------------------------------------------------------------

#[test]
fn single_beat_yields_one_legal_entry() {
    let config = EngineConfig {
        band_energy_enabled: false,
        ..config(42)
    };
    let program = assemble(&config, &[BeatEvent::new(0.0, 1.0)]);
    assert_eq!(program.len(), 1);
    assert_eq!(program.beats[0].beat, BeatEvent::new(0.0, 1.0));
    assert_contract(&program);
}

#[test]
fn saturated_vfx_fires_every_cooldown_beats() {
    let mut config = EngineConfig {
        vfx_cooldown_beats: 2,
        ..config(7)
    };
    config.activation.base.vfx = 1.0;
    config.activation.max_probability = 1.0;
    let program = assemble(&config, &steady_track(10, 4.0, 3.5));
    assert_eq!(program.len(), 10);
    let vfx_keys: Vec<_> = config
        .group_keys()
        .unwrap()
        .into_iter()
        .filter(|k| k.group_type() == GroupType::Vfx)
        .collect();
    assert!(!vfx_keys.is_empty());
    for key in vfx_keys {
        assert_eq!(activations(&program, key), vec![0, 2, 4, 6, 8], "key {key}");
    }
    assert_contract(&program);
}

#[test]
fn flash_beats_never_light_vfx() {
    let program = assemble(&config(7), &flash_track(10));
    assert_eq!(program.len(), 10);
    for entry in &program.beats {
        assert!(entry.group_lights.len() <= 1);
        assert!(entry.group_lights.iter().all(|a| a.key.group_type() == GroupType::SingleLight));
    }
}

#[test]
fn out_of_range_vfx_is_repaired_to_off() {
    let repaired = repair(GroupType::Vfx, &RawEffectTuple::new(0, 0, 0, 3));
    assert_eq!(repaired.vfx, VfxEffect::None);
    assert!(repaired.motion.is_off());
    assert!(repaired.color.is_off());
    assert!(repaired.intensity.is_off());
}

#[test]
fn out_of_order_beat_is_emitted_dark() {
    let beats = vec![
        BeatEvent::new(0.0, 0.5),
        BeatEvent::new(0.5, 0.5),
        BeatEvent::new(0.25, 0.5),
        BeatEvent::new(1.0, 0.5),
    ];
    let assembled = assemble_program(&config(3), beats.clone()).unwrap();
    assert_eq!(assembled.program.len(), beats.len());
    assert!(assembled.program.beats[2].group_lights.is_empty());
    assert_eq!(assembled.report.malformed, 1);
    assert!(assembled
        .report
        .diagnostics
        .iter()
        .any(|e| matches!(e, EngineError::MalformedBeatSequence { index: 2, .. })));

    let raw = assembled.program.to_raw();
    assert!(raw.beats[2].group_lights.is_empty());
    assert!(validate_program(&raw).is_valid());
}

#[test]
fn same_seed_gives_identical_json() {
    let beats = mixed_track(200);
    assert_eq!(program_json(&config(99), &beats), program_json(&config(99), &beats));
    assert_ne!(program_json(&config(99), &beats), program_json(&config(100), &beats));
}

#[test]
fn beat_timing_is_preserved() {
    let beats = mixed_track(64);
    let program = assemble(&config(1), &beats);
    let timing: Vec<_> = program.beats.iter().map(|e| (e.beat.time, e.beat.duration)).collect();
    let expected: Vec<_> = beats.iter().map(|b| (b.time, b.duration)).collect();
    assert_eq!(timing, expected);
}

#[test]
fn long_mixed_track_honors_contract() {
    let config = config(2024);
    let program = assemble(&config, &mixed_track(1000));
    assert_contract(&program);
    assert_vfx_spacing(&program, config.vfx_cooldown_beats);
    assert!(program.beats.iter().any(|e| !e.is_dark()));
}

#[test]
fn generated_program_passes_validation() {
    let program = assemble(&config(5), &steady_track(128, 0.5, 0.5));
    let report = validate_program(&program.to_raw());
    assert!(report.is_valid(), "{:?}", report.violations().collect::<Vec<_>>());
    assert_eq!(report.stats.total_beats, 128);
}

#[test]
fn batch_matches_sequential_assembly() {
    let config = config(11);
    let tracks: Vec<Track> = (0..6)
        .map(|i| Track::new(format!("track{i}"), mixed_track(50 + i * 10)))
        .collect();
    let expected: Vec<LightProgram> = tracks.iter().map(|t| assemble(&config, &t.beats)).collect();

    let results = assemble_tracks(&config, tracks).unwrap();
    assert_eq!(results.len(), expected.len());
    for (i, (got, want)) in results.iter().zip(&expected).enumerate() {
        assert_eq!(got.name, format!("track{i}"));
        assert_eq!(&got.assembled.program, want);
    }
}

#[test]
fn stream_with_distant_deadlines_matches_batch() {
    let config = config(17);
    // Beats an hour out leave every decision far ahead of its deadline.
    let beats: Vec<BeatEvent> = steady_track(40, 0.5, 0.4)
        .into_iter()
        .map(|b| BeatEvent::new(b.time + 3600.0, b.duration))
        .collect();
    let expected = assemble(&config, &beats);

    let handle = start_stream(&config).unwrap();
    for beat in &beats {
        handle.submit(*beat).unwrap();
    }
    let first = handle.recv_timeout(Duration::from_secs(5)).unwrap();
    let (rest, report) = handle.finish();

    let outcomes: Vec<_> = first.into_iter().chain(rest).collect();
    assert_eq!(outcomes.len(), beats.len());
    assert_eq!(report.beats, beats.len());
    assert_eq!(report.missed_deadlines, 0);
    let entries: Vec<_> = outcomes.into_iter().map(|o| o.entry).collect();
    assert_eq!(entries, expected.beats);
}

#[test]
fn stream_beat_already_due_is_emitted_dark() {
    let handle = start_stream(&config(4)).unwrap();
    handle.submit(BeatEvent::new(0.0, 1.0)).unwrap();
    let (outcomes, report) = handle.finish();
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].entry.is_dark());
    assert!(matches!(outcomes[0].diagnostics[0], EngineError::DeadlineMissed { index: 0 }));
    assert_eq!(report.missed_deadlines, 1);
}

#[test]
fn files_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let beats_path = dir.path().join("beats").join("TimeLine_demo.json");
    let effects_path = dir.path().join("effects").join("TimeLine_demo.json");

    BeatTimeline { beats: mixed_track(30) }.save(&beats_path).unwrap();
    let timeline = BeatTimeline::load(&beats_path).unwrap();
    let program = assemble(&config(8), &timeline.beats);
    program.save(&effects_path).unwrap();

    let loaded = RawProgram::load(&effects_path).unwrap();
    assert_eq!(loaded, program.to_raw());
    assert!(validate_program(&loaded).is_valid());
}
