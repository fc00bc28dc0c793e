//! Render engine, the real-time core.
//!
//! [`RenderEngine`] owns the selected pattern's runtime state and turns
//! one [`ControlSnapshot`] per tick into duty writes. All I/O flows
//! through port traits, so the whole loop runs on the host against a
//! recording fake.
//!
//! ```text
//!  ControlState ──▶ ┌──────────────────────────────┐ ──▶ DutyPort
//!   (snapshot)      │         RenderEngine          │
//!                   │  Idle ⇄ Rendering · patterns  │ ──▶ EventSink
//!                   └──────────────────────────────┘
//! ```
//!
//! ## States
//!
//! * **Idle**: power off. Every channel is written to 0 once on entry,
//!   then nothing is touched until power returns.
//! * **Rendering**: power on. The selected pattern renders one frame per
//!   tick with its peak duty scaled by `brightness / 254`.
//!
//! Pattern state is rebuilt from scratch on every pattern change and on
//! every power-on, so each activation starts from the same first frame.

use core::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::config::EngineConfig;
use crate::gamma::effective_max_duty;
use crate::patterns::{Frame, PatternId, PatternState};

use super::control::{ControlSnapshot, ControlState};
use super::events::EngineEvent;
use super::ports::{DutyPort, EventSink};

/// Loop state after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Rendering,
}

pub struct RenderEngine {
    max_duty: u32,
    frame_interval: Duration,
    idle_poll: Duration,
    /// Last observed power flag; `None` before the first tick.
    powered: Option<bool>,
    active: Option<PatternState>,
    frame: Frame,
    frames_rendered: u64,
}

impl RenderEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            max_duty: config.max_duty(),
            frame_interval: Duration::from_millis(u64::from(config.frame_interval_ms)),
            idle_poll: Duration::from_millis(u64::from(config.idle_poll_ms)),
            powered: None,
            active: None,
            frame: Frame::new(),
            frames_rendered: 0,
        }
    }

    /// Pattern currently holding state, if rendering.
    pub fn active_pattern(&self) -> Option<PatternId> {
        self.active.as_ref().map(PatternState::id)
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Duty values written by the most recent rendered frame.
    pub fn last_frame(&self) -> &[u32] {
        &self.frame
    }

    /// Run one tick against `snapshot`.
    pub fn step(
        &mut self,
        snapshot: ControlSnapshot,
        out: &mut impl DutyPort,
        sink: &mut impl EventSink,
    ) -> LoopState {
        if self.powered != Some(snapshot.power) {
            self.powered = Some(snapshot.power);
            sink.emit(&EngineEvent::PowerChanged(snapshot.power));
            if !snapshot.power {
                self.enter_idle(out);
            }
        }
        if !snapshot.power {
            return LoopState::Idle;
        }

        let previous = self.active_pattern();
        if previous != Some(snapshot.pattern) {
            sink.emit(&EngineEvent::PatternChanged {
                from: previous,
                to: snapshot.pattern,
            });
            self.active = Some(PatternState::fresh(snapshot.pattern));
        }
        let state = self
            .active
            .get_or_insert_with(|| PatternState::fresh(snapshot.pattern));

        let peak = effective_max_duty(self.max_duty, snapshot.brightness);
        state.render(out.channel_count(), peak, &mut self.frame);
        for (channel, &duty) in self.frame.iter().enumerate() {
            out.set_duty(channel, duty);
        }
        self.frames_rendered += 1;
        LoopState::Rendering
    }

    fn enter_idle(&mut self, out: &mut impl DutyPort) {
        for channel in 0..out.channel_count() {
            out.set_duty(channel, 0);
        }
        self.active = None;
        self.frame.clear();
    }

    /// Tick until `stop` is set, sleeping a fixed interval after each tick.
    ///
    /// The sleep does not account for render time. `heartbeat` runs once
    /// per iteration (watchdog feed). Production never sets `stop`.
    pub fn run(
        &mut self,
        control: &ControlState,
        out: &mut impl DutyPort,
        sink: &mut impl EventSink,
        stop: &AtomicBool,
        mut heartbeat: impl FnMut(),
    ) {
        sink.emit(&EngineEvent::Started {
            channels: out.channel_count(),
        });

        while !stop.load(Ordering::Acquire) {
            let state = self.step(control.snapshot(), out, sink);
            heartbeat();
            std::thread::sleep(match state {
                LoopState::Rendering => self.frame_interval,
                LoopState::Idle => self.idle_poll,
            });
        }

        sink.emit(&EngineEvent::Stopped);
    }
}
