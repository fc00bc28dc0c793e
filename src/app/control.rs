//! Control-state surface shared between the protocol layer and the render loop.
//!
//! Three independent atomics. Writers may update any field at any time;
//! the render loop takes one [`ControlSnapshot`] per frame. Each field is
//! read whole, but two fields in one snapshot may come from either side of
//! a writer's pair of updates. That costs at most one odd frame, so no
//! lock is taken.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, MAX_BRIGHTNESS};
use crate::patterns::PatternId;

use super::commands::ControlCommand;
use super::ports::{ControlStore, StorageError};

/// Values read by the render loop for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlSnapshot {
    pub power: bool,
    /// Already clamped to 0..=254.
    pub brightness: u8,
    pub pattern: PatternId,
}

/// Persisted form of the control values (NVS blob).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedControl {
    pub power: bool,
    pub brightness: u8,
    pub pattern: u8,
}

impl Default for PersistedControl {
    fn default() -> Self {
        Self {
            power: true,
            brightness: MAX_BRIGHTNESS,
            pattern: 0,
        }
    }
}

/// Process-wide control state. Share it behind an `Arc` or a `static`.
#[derive(Debug)]
pub struct ControlState {
    power: AtomicBool,
    brightness: AtomicU8,
    pattern: AtomicU8,
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlState {
    /// Compiled-in defaults: on, full brightness, first pattern.
    pub const fn new() -> Self {
        Self {
            power: AtomicBool::new(true),
            brightness: AtomicU8::new(MAX_BRIGHTNESS),
            pattern: AtomicU8::new(0),
        }
    }

    /// Defaults taken from configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            power: AtomicBool::new(config.default_power),
            brightness: AtomicU8::new(config.default_brightness.min(MAX_BRIGHTNESS)),
            pattern: AtomicU8::new(config.default_pattern),
        }
    }

    // ── Setters (any thread) ──────────────────────────────────

    pub fn set_power(&self, on: bool) {
        self.power.store(on, Ordering::Release);
    }

    pub fn set_brightness(&self, level: u8) {
        self.brightness.store(level, Ordering::Release);
    }

    /// `index` must already be validated by the caller; the read side
    /// clamps anything past the last pattern.
    pub fn set_pattern(&self, index: u8) {
        self.pattern.store(index, Ordering::Release);
    }

    pub fn apply(&self, command: ControlCommand) {
        match command {
            ControlCommand::SetPower(on) => self.set_power(on),
            ControlCommand::SetBrightness(level) => self.set_brightness(level),
            ControlCommand::SetPattern(pattern) => self.set_pattern(pattern.index()),
        }
    }

    // ── Readers ───────────────────────────────────────────────

    pub fn power(&self) -> bool {
        self.power.load(Ordering::Acquire)
    }

    pub fn brightness(&self) -> u8 {
        self.brightness.load(Ordering::Acquire).min(MAX_BRIGHTNESS)
    }

    pub fn pattern(&self) -> PatternId {
        PatternId::from_index_clamped(self.pattern.load(Ordering::Acquire))
    }

    pub fn snapshot(&self) -> ControlSnapshot {
        ControlSnapshot {
            power: self.power(),
            brightness: self.brightness(),
            pattern: self.pattern(),
        }
    }

    // ── Persistence ───────────────────────────────────────────

    pub fn persisted(&self) -> PersistedControl {
        PersistedControl {
            power: self.power(),
            brightness: self.brightness(),
            pattern: self.pattern().index(),
        }
    }

    /// Re-apply restored values through the regular setters. A stored
    /// pattern index that no longer exists is skipped.
    pub fn apply_persisted(&self, stored: &PersistedControl) {
        self.set_power(stored.power);
        self.set_brightness(stored.brightness.min(MAX_BRIGHTNESS));
        match PatternId::from_index(stored.pattern) {
            Some(p) => self.set_pattern(p.index()),
            None => warn!("control: stored pattern {} out of range, keeping default", stored.pattern),
        }
    }

    /// Load from `store` and apply. On any error the current values stay.
    pub fn restore(&self, store: &impl ControlStore) -> Result<PersistedControl, StorageError> {
        let stored = store.load()?;
        self.apply_persisted(&stored);
        Ok(stored)
    }
}
