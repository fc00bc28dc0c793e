//! Port traits: the hexagonal boundary between the render core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ RenderEngine (domain)
//! ```
//!
//! The PWM channel driver, the event log, and persistent storage implement
//! these traits. The [`RenderEngine`](super::engine::RenderEngine) consumes
//! them via generics, so the rendering math runs on the host against
//! recording fakes.

use super::control::PersistedControl;

// ───────────────────────────────────────────────────────────────
// Duty port (driven adapter: domain → PWM hardware)
// ───────────────────────────────────────────────────────────────

/// The only hardware-facing primitive the render loop needs.
pub trait DutyPort {
    /// Number of channels currently driven.
    fn channel_count(&self) -> usize;

    /// Apply `duty` to logical channel `channel`.
    ///
    /// Out-of-range channels and calls before initialisation are silently
    /// ignored, never an error.
    fn set_duty(&mut self, channel: usize, duty: u32);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The engine reports transitions through this port. Adapters decide
/// where they go (serial log, test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::EngineEvent);
}

// ───────────────────────────────────────────────────────────────
// Control store port (driven adapter: domain ↔ NVS)
// ───────────────────────────────────────────────────────────────

/// Persists the last-known control values across reboots.
pub trait ControlStore {
    /// Load the stored values.
    /// Returns [`StorageError::NotFound`] on first boot.
    fn load(&self) -> Result<PersistedControl, StorageError>;

    /// Persist the values atomically.
    fn save(&mut self, control: &PersistedControl) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ControlStore`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Stored blob failed to deserialize.
    Corrupted,
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Corrupted => write!(f, "stored value corrupted"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
