//! Render loop behaviour against the recording duty port.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use moto::app::control::{ControlSnapshot, ControlState};
use moto::app::engine::{LoopState, RenderEngine};
use moto::app::events::EngineEvent;
use moto::config::{EngineConfig, MAX_BRIGHTNESS};
use moto::drivers::hw_init::Ledc;
use moto::drivers::pwm_channels::PwmChannels;
use moto::gamma::gamma_map;
use moto::patterns::PatternId;
use moto::patterns::wave::PHASE_STEP;

use crate::mock_hw::{MockLeds, RecordingSink};

fn on(pattern: PatternId, brightness: u8) -> ControlSnapshot {
    ControlSnapshot {
        power: true,
        brightness,
        pattern,
    }
}

fn off(pattern: PatternId) -> ControlSnapshot {
    ControlSnapshot {
        power: false,
        brightness: MAX_BRIGHTNESS,
        pattern,
    }
}

fn setup(channels: usize) -> (RenderEngine, MockLeds, RecordingSink) {
    (
        RenderEngine::new(&EngineConfig::default()),
        MockLeds::new(channels),
        RecordingSink::default(),
    )
}

// ── Brightness and the perceptual curve ───────────────────────

#[test]
fn wave_first_frame_is_half_intensity_on_channel_zero() {
    let (mut engine, mut leds, mut sink) = setup(6);
    engine.step(on(PatternId::Wave, MAX_BRIGHTNESS), &mut leds, &mut sink);
    assert_eq!(leds.duties[0], gamma_map(0.5, 1023));
    assert_eq!(leds.duties[0], 128);

    engine.step(on(PatternId::Wave, MAX_BRIGHTNESS), &mut leds, &mut sink);
    assert_eq!(leds.duties[0], gamma_map((PHASE_STEP.sin() + 1.0) / 2.0, 1023));
    assert!(leds.duties[0] > 128);
}

#[test]
fn half_brightness_halves_peak_duty() {
    let (mut engine, mut leds, mut sink) = setup(6);
    engine.step(on(PatternId::Comet, 127), &mut leds, &mut sink);
    // Comet head sits fully on channel 0 in its first frame.
    assert_eq!(leds.duties[0], 511);
    assert_eq!(leds.peak(), 511);
}

#[test]
fn zero_brightness_renders_dark() {
    let (mut engine, mut leds, mut sink) = setup(6);
    for _ in 0..20 {
        engine.step(on(PatternId::Sparkle, 0), &mut leds, &mut sink);
        assert!(leds.all_dark());
    }
}

#[test]
fn duties_never_exceed_scaled_peak() {
    for pattern in PatternId::ALL {
        let (mut engine, mut leds, mut sink) = setup(6);
        for _ in 0..200 {
            engine.step(on(pattern, 200), &mut leds, &mut sink);
            assert!(leds.peak() <= 1023 * 200 / 254, "{pattern:?}");
        }
    }
}

// ── Reset semantics ───────────────────────────────────────────

#[test]
fn switching_away_and_back_restarts_from_first_frame() {
    let (mut engine, mut leds, mut sink) = setup(6);

    engine.step(on(PatternId::Comet, MAX_BRIGHTNESS), &mut leds, &mut sink);
    let first = leds.duties.clone();

    for _ in 0..7 {
        engine.step(on(PatternId::Comet, MAX_BRIGHTNESS), &mut leds, &mut sink);
    }
    assert_ne!(leds.duties, first);

    for _ in 0..3 {
        engine.step(on(PatternId::Wave, MAX_BRIGHTNESS), &mut leds, &mut sink);
    }
    engine.step(on(PatternId::Comet, MAX_BRIGHTNESS), &mut leds, &mut sink);
    assert_eq!(leds.duties, first);

    let switches: Vec<_> = sink
        .events
        .iter()
        .filter(|e| matches!(e, EngineEvent::PatternChanged { .. }))
        .collect();
    assert_eq!(switches.len(), 3);
}

#[test]
fn power_cycle_restarts_pattern() {
    let (mut engine, mut leds, mut sink) = setup(6);

    engine.step(on(PatternId::StackFill, MAX_BRIGHTNESS), &mut leds, &mut sink);
    let first = leds.duties.clone();
    for _ in 0..40 {
        engine.step(on(PatternId::StackFill, MAX_BRIGHTNESS), &mut leds, &mut sink);
    }
    assert_ne!(leds.duties, first);

    engine.step(off(PatternId::StackFill), &mut leds, &mut sink);
    engine.step(on(PatternId::StackFill, MAX_BRIGHTNESS), &mut leds, &mut sink);
    assert_eq!(leds.duties, first);
    assert_eq!(
        sink.events.last(),
        Some(&EngineEvent::PatternChanged {
            from: None,
            to: PatternId::StackFill
        })
    );
}

#[test]
fn brightness_change_does_not_reset_pattern() {
    let (mut engine, mut leds, mut sink) = setup(6);
    for _ in 0..5 {
        engine.step(on(PatternId::Wave, MAX_BRIGHTNESS), &mut leds, &mut sink);
    }
    let before = sink.events.len();
    engine.step(on(PatternId::Wave, 60), &mut leds, &mut sink);
    assert_eq!(sink.events.len(), before);
    assert_eq!(engine.active_pattern(), Some(PatternId::Wave));
}

// ── Idle ──────────────────────────────────────────────────────

#[test]
fn power_off_zeroes_every_channel_then_goes_quiet() {
    let (mut engine, mut leds, mut sink) = setup(6);
    engine.step(on(PatternId::Wave, MAX_BRIGHTNESS), &mut leds, &mut sink);
    assert!(!leds.all_dark());

    assert_eq!(engine.step(off(PatternId::Wave), &mut leds, &mut sink), LoopState::Idle);
    assert!(leds.all_dark());

    leds.clear_history();
    for _ in 0..10 {
        engine.step(off(PatternId::Wave), &mut leds, &mut sink);
    }
    assert!(leds.writes.is_empty());
}

#[test]
fn booting_powered_off_blanks_outputs() {
    let (mut engine, mut leds, mut sink) = setup(3);
    leds.duties = vec![500; 3];
    engine.step(off(PatternId::Comet), &mut leds, &mut sink);
    assert!(leds.all_dark());
    assert_eq!(sink.events, vec![EngineEvent::PowerChanged(false)]);
}

// ── Channel counts ────────────────────────────────────────────

#[test]
fn single_channel_renders_every_pattern() {
    for pattern in PatternId::ALL {
        let (mut engine, mut leds, mut sink) = setup(1);
        for _ in 0..50 {
            engine.step(on(pattern, MAX_BRIGHTNESS), &mut leds, &mut sink);
            assert!(leds.duties[0] <= 1023);
        }
    }
}

#[test]
fn zero_channels_is_harmless() {
    let (mut engine, mut leds, mut sink) = setup(0);
    for _ in 0..5 {
        assert_eq!(
            engine.step(on(PatternId::Comet, MAX_BRIGHTNESS), &mut leds, &mut sink),
            LoopState::Rendering
        );
    }
    assert!(leds.writes.is_empty());
    assert!(engine.last_frame().is_empty());
}

// ── Against the simulated PWM driver ──────────────────────────

#[test]
fn partial_driver_init_renders_on_surviving_channels() {
    let config = EngineConfig::default();
    let mut pwm = PwmChannels::new(Ledc, &config);
    // GPIO 40 does not exist on the board and fails to configure.
    assert_eq!(pwm.init(&[8, 40, 3], 3), Ok(2));

    let mut engine = RenderEngine::new(&config);
    let mut sink = RecordingSink::default();
    engine.step(on(PatternId::Comet, MAX_BRIGHTNESS), &mut pwm, &mut sink);

    assert_eq!(pwm.channels().len(), 2);
    assert_eq!(pwm.channels()[1].pin, 3);
    assert_eq!(pwm.duty(0), Some(1023));
    assert_eq!(engine.last_frame().len(), 2);
}

#[test]
fn render_thread_follows_control_writes() {
    let mut config = EngineConfig::default();
    config.frame_interval_ms = 1;
    config.idle_poll_ms = 1;
    let control = Arc::new(ControlState::new());
    let stop = Arc::new(AtomicBool::new(false));

    let handle = {
        let control = Arc::clone(&control);
        let stop = Arc::clone(&stop);
        std::thread::spawn(move || {
            let mut engine = RenderEngine::new(&config);
            let mut leds = MockLeds::new(4);
            let mut sink = RecordingSink::default();
            engine.run(&control, &mut leds, &mut sink, &stop, || {});
            (leds, sink)
        })
    };

    std::thread::sleep(std::time::Duration::from_millis(30));
    control.set_power(false);
    std::thread::sleep(std::time::Duration::from_millis(30));
    stop.store(true, Ordering::Release);

    let (leds, sink) = handle.join().unwrap();
    assert!(leds.all_dark());
    assert_eq!(sink.events.first(), Some(&EngineEvent::Started { channels: 4 }));
    assert!(sink.events.contains(&EngineEvent::PowerChanged(false)));
    assert_eq!(sink.events.last(), Some(&EngineEvent::Stopped));
}
