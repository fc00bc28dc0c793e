//! Procedural light patterns.
//!
//! Each pattern owns only the state it needs between frames. The render
//! loop holds exactly one [`PatternState`] at a time and rebuilds it from
//! scratch whenever the selection changes, so a pattern always starts
//! from the same clean state no matter what ran before it.
//!
//! | Pattern    | Motion                                          | State          |
//! |------------|-------------------------------------------------|----------------|
//! | Comet      | Bright head with a trailing tail, bouncing      | pos, dir       |
//! | Sparkle    | Random channels lit, reshuffled every 8 frames  | seed, frame    |
//! | StackFill  | Discrete fill level rising then draining        | fill, filling  |
//! | PingPong   | Narrow symmetric halo, bouncing                 | pos, dir       |
//! | Wave       | Travelling sine across the channels             | phase          |
//!
//! Generators render the current state into a [`Frame`] and then advance
//! it. Intensities pass through [`gamma_map`] on the way out, so a frame
//! holds duty values ready for the channel driver.

pub mod comet;
pub mod ping_pong;
pub mod sparkle;
pub mod stack_fill;
pub mod wave;

use crate::config::{MAX_CHANNELS, PATTERN_COUNT};
use crate::gamma::gamma_map;

pub use comet::CometState;
pub use ping_pong::PingPongState;
pub use sparkle::SparkleState;
pub use stack_fill::StackFillState;
pub use wave::WaveState;

/// One tick's duty values, indexed by logical channel.
pub type Frame = heapless::Vec<u32, MAX_CHANNELS>;

/// Pattern selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PatternId {
    Comet = 0,
    Sparkle = 1,
    StackFill = 2,
    PingPong = 3,
    Wave = 4,
}

impl PatternId {
    pub const ALL: [PatternId; PATTERN_COUNT] = [
        PatternId::Comet,
        PatternId::Sparkle,
        PatternId::StackFill,
        PatternId::PingPong,
        PatternId::Wave,
    ];

    /// Strict lookup; `None` past the last pattern.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Lenient lookup for the render path: out-of-range clamps to the last pattern.
    pub fn from_index_clamped(index: u8) -> Self {
        Self::from_index(index).unwrap_or(Self::ALL[PATTERN_COUNT - 1])
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Comet => "comet",
            Self::Sparkle => "sparkle",
            Self::StackFill => "stack",
            Self::PingPong => "pingpong",
            Self::Wave => "wave",
        }
    }

    /// Case-insensitive lookup by [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }
}

/// Runtime state of the selected pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternState {
    Comet(CometState),
    Sparkle(SparkleState),
    StackFill(StackFillState),
    PingPong(PingPongState),
    Wave(WaveState),
}

impl PatternState {
    /// Initial state for `id`.
    pub fn fresh(id: PatternId) -> Self {
        match id {
            PatternId::Comet => Self::Comet(CometState::new()),
            PatternId::Sparkle => Self::Sparkle(SparkleState::new()),
            PatternId::StackFill => Self::StackFill(StackFillState::new()),
            PatternId::PingPong => Self::PingPong(PingPongState::new()),
            PatternId::Wave => Self::Wave(WaveState::new()),
        }
    }

    pub fn id(&self) -> PatternId {
        match self {
            Self::Comet(_) => PatternId::Comet,
            Self::Sparkle(_) => PatternId::Sparkle,
            Self::StackFill(_) => PatternId::StackFill,
            Self::PingPong(_) => PatternId::PingPong,
            Self::Wave(_) => PatternId::Wave,
        }
    }

    /// Render one frame for `channels` outputs (capped at [`MAX_CHANNELS`])
    /// and advance the state. With zero channels nothing is rendered and
    /// the state does not move.
    pub fn render(&mut self, channels: usize, max_duty: u32, frame: &mut Frame) {
        frame.clear();
        let n = channels.min(MAX_CHANNELS);
        if n == 0 {
            return;
        }
        match self {
            Self::Comet(s) => s.render(n, max_duty, frame),
            Self::Sparkle(s) => s.render(n, max_duty, frame),
            Self::StackFill(s) => s.render(n, max_duty, frame),
            Self::PingPong(s) => s.render(n, max_duty, frame),
            Self::Wave(s) => s.render(n, max_duty, frame),
        }
    }
}

/// Push one channel's intensity through the perceptual curve.
/// Generators clear the frame first and push at most [`MAX_CHANNELS`].
fn emit(frame: &mut Frame, intensity: f32, max_duty: u32) {
    let pushed = frame.push(gamma_map(intensity, max_duty));
    debug_assert!(pushed.is_ok(), "frame overflow");
}

/// Travel direction along the channel axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Self::Up => 1.0,
            Self::Down => -1.0,
        }
    }
}

/// Advance `pos` by `step` toward `dir`, reversing at `0` and `last`.
/// The position clamps to the boundary it hit.
fn bounce(pos: &mut f32, dir: &mut Direction, step: f32, last: f32) {
    let next = *pos + dir.sign() * step;
    if next >= last {
        *pos = last;
        *dir = Direction::Down;
    } else if next <= 0.0 {
        *pos = 0.0;
        *dir = Direction::Up;
    } else {
        *pos = next;
    }
}
