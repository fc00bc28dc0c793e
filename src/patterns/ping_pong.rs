//! Ping-pong: a narrow symmetric halo bouncing between the ends.

use super::{Direction, Frame, bounce, emit};

pub const STEP: f32 = 0.1;
/// Halo half-width in channels; narrower than the comet head.
pub const HALO_RADIUS: f32 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct PingPongState {
    pub pos: f32,
    pub dir: Direction,
}

impl Default for PingPongState {
    fn default() -> Self {
        Self::new()
    }
}

impl PingPongState {
    pub fn new() -> Self {
        Self {
            pos: 0.0,
            dir: Direction::Up,
        }
    }

    pub(super) fn render(&mut self, n: usize, max_duty: u32, frame: &mut Frame) {
        frame.clear();
        for i in 0..n {
            let d = (i as f32 - self.pos).abs();
            emit(frame, 1.0 - d / HALO_RADIUS, max_duty);
        }
        bounce(&mut self.pos, &mut self.dir, STEP, (n - 1) as f32);
    }
}
