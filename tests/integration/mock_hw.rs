//! Mock hardware and storage adapters for integration tests.
//!
//! Records every duty write and every engine event so tests can assert on
//! the full output history without touching real LEDC registers.

use moto::app::control::PersistedControl;
use moto::app::events::EngineEvent;
use moto::app::ports::{ControlStore, DutyPort, EventSink, StorageError};

// ── MockLeds ──────────────────────────────────────────────────

/// N-channel duty recorder.
pub struct MockLeds {
    pub duties: Vec<u32>,
    pub writes: Vec<(usize, u32)>,
}

#[allow(dead_code)]
impl MockLeds {
    pub fn new(channels: usize) -> Self {
        Self {
            duties: vec![0; channels],
            writes: Vec::new(),
        }
    }

    pub fn peak(&self) -> u32 {
        self.duties.iter().copied().max().unwrap_or(0)
    }

    pub fn all_dark(&self) -> bool {
        self.duties.iter().all(|&d| d == 0)
    }

    pub fn clear_history(&mut self) {
        self.writes.clear();
    }
}

impl DutyPort for MockLeds {
    fn channel_count(&self) -> usize {
        self.duties.len()
    }

    fn set_duty(&mut self, channel: usize, duty: u32) {
        if let Some(d) = self.duties.get_mut(channel) {
            *d = duty;
            self.writes.push((channel, duty));
        }
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<EngineEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &EngineEvent) {
        self.events.push(event.clone());
    }
}

// ── MemoryStore ───────────────────────────────────────────────

/// In-memory [`ControlStore`] with an injectable failure.
#[derive(Default)]
pub struct MemoryStore {
    pub stored: Option<PersistedControl>,
    pub fail_with: Option<StorageError>,
    pub saves: usize,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn with(stored: PersistedControl) -> Self {
        Self {
            stored: Some(stored),
            ..Self::default()
        }
    }
}

impl ControlStore for MemoryStore {
    fn load(&self) -> Result<PersistedControl, StorageError> {
        if let Some(e) = self.fail_with {
            return Err(e);
        }
        self.stored.ok_or(StorageError::NotFound)
    }

    fn save(&mut self, control: &PersistedControl) -> Result<(), StorageError> {
        if let Some(e) = self.fail_with {
            return Err(e);
        }
        self.stored = Some(*control);
        self.saves += 1;
        Ok(())
    }
}
