//! Engine configuration parameters
//!
//! Fixed cadence and sizing constants, plus the tunable [`EngineConfig`]
//! consumed by the channel driver and the render loop.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Fixed render cadence (50 fps).
pub const FRAME_INTERVAL_MS: u32 = 20;

/// Number of selectable animation patterns.
pub const PATTERN_COUNT: usize = 5;

/// Highest brightness level accepted by the control surface.
pub const MAX_BRIGHTNESS: u8 = 254;

/// Hard upper bound on driven channels (LEDC low-speed channel count).
pub const MAX_CHANNELS: usize = 8;

/// Core engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    // --- Timing ---
    /// Sleep between rendered frames (milliseconds)
    pub frame_interval_ms: u32,
    /// Sleep between power re-checks while idle (milliseconds)
    pub idle_poll_ms: u32,
    /// Task watchdog timeout for the render thread (milliseconds)
    pub watchdog_timeout_ms: u32,
    /// Quiet period after the last brightness change before it is saved
    pub persist_delay_ms: u32,

    // --- PWM ---
    /// LEDC timer frequency shared by every channel
    pub pwm_freq_hz: u32,
    /// LEDC duty resolution; max duty is `2^bits - 1`
    pub duty_resolution_bits: u8,

    // --- Boot defaults ---
    pub default_power: bool,
    /// 0..=254
    pub default_brightness: u8,
    /// 0..PATTERN_COUNT
    pub default_pattern: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Timing
            frame_interval_ms: FRAME_INTERVAL_MS,
            idle_poll_ms: FRAME_INTERVAL_MS,
            watchdog_timeout_ms: 5_000,
            persist_delay_ms: 2_000,

            // PWM
            pwm_freq_hz: 1_000,      // 1 kHz
            duty_resolution_bits: 10, // 0..1023

            // Boot defaults
            default_power: true,
            default_brightness: MAX_BRIGHTNESS,
            default_pattern: 0,
        }
    }
}

impl EngineConfig {
    /// Largest duty value the LEDC timer accepts at this resolution.
    pub fn max_duty(&self) -> u32 {
        (1u32 << self.duty_resolution_bits.min(20)) - 1
    }

    /// Range-check every field.
    pub fn validate(&self) -> Result<()> {
        if self.frame_interval_ms == 0 || self.frame_interval_ms > 1_000 {
            return Err(Error::Config("frame_interval_ms must be 1–1000"));
        }
        if self.idle_poll_ms == 0 || self.idle_poll_ms > self.frame_interval_ms {
            return Err(Error::Config(
                "idle_poll_ms must be 1–frame_interval_ms",
            ));
        }
        if self.watchdog_timeout_ms < self.frame_interval_ms * 10 {
            return Err(Error::Config(
                "watchdog_timeout_ms must cover at least 10 frames",
            ));
        }
        if !(100..=60_000).contains(&self.persist_delay_ms) {
            return Err(Error::Config("persist_delay_ms must be 100–60000"));
        }
        if !(100..=40_000).contains(&self.pwm_freq_hz) {
            return Err(Error::Config("pwm_freq_hz must be 100–40000"));
        }
        if !(1..=14).contains(&self.duty_resolution_bits) {
            return Err(Error::Config("duty_resolution_bits must be 1–14"));
        }
        if self.default_brightness > MAX_BRIGHTNESS {
            return Err(Error::Config("default_brightness must be 0–254"));
        }
        if self.default_pattern as usize >= PATTERN_COUNT {
            return Err(Error::Config("default_pattern must be 0–4"));
        }
        Ok(())
    }
}
