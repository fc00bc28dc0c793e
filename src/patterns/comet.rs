//! Comet: a bright head sweeping end to end with a fading tail behind it.

use super::{Direction, Frame, bounce, emit};

/// Channels travelled per frame.
pub const STEP: f32 = 0.15;
/// Half-width of the head falloff, in channels.
pub const HEAD_RADIUS: f32 = 1.0;
/// Tail length behind the head, in channels.
pub const TAIL_LENGTH: f32 = 3.0;
/// Tail intensity right behind the head.
pub const TAIL_PEAK: f32 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub struct CometState {
    pub pos: f32,
    pub dir: Direction,
}

impl Default for CometState {
    fn default() -> Self {
        Self::new()
    }
}

impl CometState {
    pub fn new() -> Self {
        Self {
            pos: 0.0,
            dir: Direction::Up,
        }
    }

    pub(super) fn render(&mut self, n: usize, max_duty: u32, frame: &mut Frame) {
        frame.clear();
        for i in 0..n {
            emit(frame, self.intensity_at(i as f32), max_duty);
        }
        bounce(&mut self.pos, &mut self.dir, STEP, (n - 1) as f32);
    }

    fn intensity_at(&self, x: f32) -> f32 {
        let head = (1.0 - (x - self.pos).abs() / HEAD_RADIUS).max(0.0);
        // Distance behind the head, measured against the travel direction.
        let behind = (self.pos - x) * self.dir.sign();
        let tail = if behind > 0.0 {
            TAIL_PEAK * (1.0 - behind / TAIL_LENGTH).max(0.0)
        } else {
            0.0
        };
        head.max(tail)
    }
}
