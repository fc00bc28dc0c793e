//! Stack-fill: channels switch on one by one up to full, then drain back.

use super::{Frame, emit};

/// Frames between fill level changes.
pub const STEP_EVERY: u32 = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFillState {
    /// Channels below this index are on. Always within `0..=n`.
    pub fill: usize,
    pub filling: bool,
    pub frame: u32,
}

impl Default for StackFillState {
    fn default() -> Self {
        Self::new()
    }
}

impl StackFillState {
    pub fn new() -> Self {
        Self {
            fill: 0,
            filling: true,
            frame: 0,
        }
    }

    pub(super) fn render(&mut self, n: usize, max_duty: u32, frame: &mut Frame) {
        frame.clear();
        self.fill = self.fill.min(n);
        for i in 0..n {
            emit(frame, if i < self.fill { 1.0 } else { 0.0 }, max_duty);
        }

        self.frame = self.frame.wrapping_add(1);
        if self.frame % STEP_EVERY == 0 {
            self.step(n);
        }
    }

    fn step(&mut self, n: usize) {
        if self.filling {
            self.fill += 1;
            if self.fill >= n {
                self.fill = n;
                self.filling = false;
            }
        } else {
            self.fill = self.fill.saturating_sub(1);
            if self.fill == 0 {
                self.filling = true;
            }
        }
    }
}
