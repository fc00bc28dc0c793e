//! Wave: a sine travelling across the channels.

use core::f32::consts::TAU;

use super::{Frame, emit};

/// Phase advance per frame (radians).
pub const PHASE_STEP: f32 = 0.08;
/// Phase offset between neighbouring channels (radians).
pub const SPATIAL_FREQUENCY: f32 = 0.9;

#[derive(Debug, Clone, PartialEq)]
pub struct WaveState {
    /// Always within `[0, TAU)`.
    pub phase: f32,
}

impl Default for WaveState {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveState {
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    pub(super) fn render(&mut self, n: usize, max_duty: u32, frame: &mut Frame) {
        frame.clear();
        for i in 0..n {
            let angle = self.phase + i as f32 * SPATIAL_FREQUENCY;
            emit(frame, (angle.sin() + 1.0) / 2.0, max_duty);
        }
        self.phase = (self.phase + PHASE_STEP).rem_euclid(TAU);
    }
}
