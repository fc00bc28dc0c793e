//! Sparkle: random channels lit at random levels, reshuffled every few frames.
//!
//! Randomness is a 32-bit linear congruential generator threaded through
//! the state, so a given seed always replays the same sequence.

use crate::config::MAX_CHANNELS;

use super::{Frame, emit};

/// Reshuffle period in frames.
pub const UPDATE_EVERY: u32 = 8;
/// A channel lights only when its draw exceeds this.
pub const LIGHT_THRESHOLD: f32 = 0.7;
/// Dimmest level a lit channel is given.
pub const MIN_LEVEL: f32 = 0.4;
pub const INITIAL_SEED: u32 = 0x2F6B_9A13;

// Numerical Recipes constants.
const LCG_MUL: u32 = 1_664_525;
const LCG_INC: u32 = 1_013_904_223;

#[derive(Debug, Clone, PartialEq)]
pub struct SparkleState {
    pub seed: u32,
    pub frame: u32,
    levels: [f32; MAX_CHANNELS],
}

impl Default for SparkleState {
    fn default() -> Self {
        Self::new()
    }
}

impl SparkleState {
    pub fn new() -> Self {
        Self::with_seed(INITIAL_SEED)
    }

    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            frame: 0,
            levels: [0.0; MAX_CHANNELS],
        }
    }

    /// Next draw in `[0, 1)` from the top 24 bits of the LCG.
    fn next_unit(&mut self) -> f32 {
        self.seed = self.seed.wrapping_mul(LCG_MUL).wrapping_add(LCG_INC);
        (self.seed >> 8) as f32 / (1u32 << 24) as f32
    }

    pub(super) fn render(&mut self, n: usize, max_duty: u32, frame: &mut Frame) {
        frame.clear();
        if self.frame % UPDATE_EVERY == 0 {
            for i in 0..n {
                let draw = self.next_unit();
                self.levels[i] = if draw > LIGHT_THRESHOLD {
                    MIN_LEVEL + (1.0 - MIN_LEVEL) * self.next_unit()
                } else {
                    0.0
                };
            }
        }
        for &level in &self.levels[..n] {
            emit(frame, level, max_duty);
        }
        self.frame = self.frame.wrapping_add(1);
    }
}
