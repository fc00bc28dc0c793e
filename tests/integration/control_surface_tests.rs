//! Control-state surface: boot restore, attribute writes, console input.

use std::sync::Arc;
use std::time::{Duration, Instant};

use moto::adapters::attribute_bridge::{
    ATTR_CURRENT_LEVEL, ATTR_CURRENT_MODE, ATTR_ON_OFF, AttrValue, AttributeUpdate,
    CLUSTER_LEVEL_CONTROL, CLUSTER_MODE_SELECT, CLUSTER_ON_OFF, handle_update,
};
use moto::adapters::console::{ConsoleRequest, parse_line};
use moto::adapters::nvs::NvsAdapter;
use moto::app::commands::CommandError;
use moto::app::control::{ControlState, PersistedControl};
use moto::app::engine::RenderEngine;
use moto::app::persist::DeferredPersistence;
use moto::app::ports::{ControlStore, StorageError};
use moto::config::EngineConfig;
use moto::patterns::PatternId;

use crate::mock_hw::{MemoryStore, MockLeds, RecordingSink};

// ── Boot-time restore ─────────────────────────────────────────

#[test]
fn restored_values_reach_the_first_frame() {
    let control = ControlState::new();
    let store = MemoryStore::with(PersistedControl {
        power: true,
        brightness: 127,
        pattern: PatternId::Comet.index(),
    });
    control.restore(&store).unwrap();

    let mut engine = RenderEngine::new(&EngineConfig::default());
    let mut leds = MockLeds::new(6);
    let mut sink = RecordingSink::default();
    engine.step(control.snapshot(), &mut leds, &mut sink);
    assert_eq!(leds.duties[0], 511);
}

#[test]
fn restored_power_off_keeps_outputs_dark() {
    let control = ControlState::new();
    let store = MemoryStore::with(PersistedControl {
        power: false,
        brightness: 254,
        pattern: 4,
    });
    control.restore(&store).unwrap();

    let mut engine = RenderEngine::new(&EngineConfig::default());
    let mut leds = MockLeds::new(6);
    let mut sink = RecordingSink::default();
    engine.step(control.snapshot(), &mut leds, &mut sink);
    assert!(leds.all_dark());
}

#[test]
fn failed_restore_keeps_defaults() {
    let control = ControlState::new();
    let store = MemoryStore {
        fail_with: Some(StorageError::Corrupted),
        ..MemoryStore::default()
    };
    assert_eq!(control.restore(&store), Err(StorageError::Corrupted));
    assert_eq!(control.persisted(), PersistedControl::default());

    let empty = MemoryStore::default();
    assert_eq!(control.restore(&empty), Err(StorageError::NotFound));
}

#[test]
fn nvs_round_trip_through_control_state() {
    let mut nvs = NvsAdapter::new().unwrap();
    let control = ControlState::new();
    control.set_power(false);
    control.set_brightness(33);
    control.set_pattern(PatternId::PingPong.index());
    nvs.save(&control.persisted()).unwrap();

    let rebooted = ControlState::new();
    rebooted.restore(&nvs).unwrap();
    assert_eq!(rebooted.snapshot(), control.snapshot());
}

// ── Attribute writes ──────────────────────────────────────────

fn attr(cluster_id: u32, attribute_id: u32, value: AttrValue) -> AttributeUpdate {
    AttributeUpdate {
        cluster_id,
        attribute_id,
        value,
    }
}

#[test]
fn attribute_writes_drive_the_render_loop() {
    let control = ControlState::new();
    let mut engine = RenderEngine::new(&EngineConfig::default());
    let mut leds = MockLeds::new(6);
    let mut sink = RecordingSink::default();

    handle_update(&control, &attr(CLUSTER_MODE_SELECT, ATTR_CURRENT_MODE, AttrValue::U8(4))).unwrap();
    handle_update(&control, &attr(CLUSTER_LEVEL_CONTROL, ATTR_CURRENT_LEVEL, AttrValue::U8(254))).unwrap();
    engine.step(control.snapshot(), &mut leds, &mut sink);
    assert_eq!(engine.active_pattern(), Some(PatternId::Wave));
    assert_eq!(leds.duties[0], 128);

    handle_update(&control, &attr(CLUSTER_ON_OFF, ATTR_ON_OFF, AttrValue::Bool(false))).unwrap();
    engine.step(control.snapshot(), &mut leds, &mut sink);
    assert!(leds.all_dark());
}

#[test]
fn rejected_mode_never_reaches_control_state() {
    let control = ControlState::new();
    let err = handle_update(&control, &attr(CLUSTER_MODE_SELECT, ATTR_CURRENT_MODE, AttrValue::U8(5)));
    assert_eq!(err, Err(CommandError::PatternOutOfRange(5)));
    assert_eq!(control.pattern(), PatternId::Comet);
}

#[test]
fn concurrent_writers_only_ever_produce_valid_snapshots() {
    let control = Arc::new(ControlState::new());
    let writers: Vec<_> = (0..4u8)
        .map(|w| {
            let control = Arc::clone(&control);
            std::thread::spawn(move || {
                for i in 0..1_000u32 {
                    let mode = ((i + u32::from(w)) % 5) as u8;
                    let _ = handle_update(
                        &control,
                        &attr(CLUSTER_MODE_SELECT, ATTR_CURRENT_MODE, AttrValue::U8(mode)),
                    );
                    let _ = handle_update(
                        &control,
                        &attr(CLUSTER_LEVEL_CONTROL, ATTR_CURRENT_LEVEL, AttrValue::U8((i % 256) as u8)),
                    );
                }
            })
        })
        .collect();

    for _ in 0..1_000 {
        let s = control.snapshot();
        assert!(s.brightness <= 254);
        assert!(PatternId::from_index(s.pattern.index()).is_some());
    }
    for w in writers {
        w.join().unwrap();
    }
}

// ── Console ───────────────────────────────────────────────────

#[test]
fn console_session_updates_and_persists() {
    let control = ControlState::new();
    let mut store = MemoryStore::default();
    let mut persist = DeferredPersistence::new(Duration::from_millis(2_000));
    let now = Instant::now();

    for line in ["pattern sparkle", "brightness 90", "power off"] {
        match parse_line(line).unwrap() {
            ConsoleRequest::Command(c) => {
                control.apply(c);
                persist.note(&c, now);
                persist.poll(&control, &mut store, now).unwrap();
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    // The brightness write rode along with the power change.
    assert_eq!(store.saves, 2);
    assert_eq!(
        store.stored,
        Some(PersistedControl {
            power: false,
            brightness: 90,
            pattern: PatternId::Sparkle.index(),
        })
    );
}

#[test]
fn console_brightness_sweep_is_saved_once() {
    let control = ControlState::new();
    let mut store = MemoryStore::default();
    let delay = Duration::from_millis(2_000);
    let mut persist = DeferredPersistence::new(delay);
    let t0 = Instant::now();

    for (i, line) in ["brightness 20", "brightness 60", "brightness 140"].iter().enumerate() {
        let now = t0 + Duration::from_millis(100 * i as u64);
        if let ConsoleRequest::Command(c) = parse_line(line).unwrap() {
            control.apply(c);
            persist.note(&c, now);
        }
        assert_eq!(persist.poll(&control, &mut store, now), Ok(false));
    }
    assert_eq!(store.saves, 0);

    let settled = t0 + Duration::from_millis(200) + delay;
    assert_eq!(persist.poll(&control, &mut store, settled), Ok(true));
    assert_eq!(store.saves, 1);
    assert_eq!(store.stored.map(|s| s.brightness), Some(140));
}
