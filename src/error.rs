//! Unified error types for the moto firmware.
//!
//! A single `Error` enum that every fallible subsystem converts into. All
//! variants are `Copy`. The render path itself never produces one: bad
//! runtime input is clamped or ignored there.

use core::fmt;

use crate::app::commands::CommandError;
use crate::app::ports::StorageError;
use crate::drivers::hw_init::HwInitError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// PWM peripheral setup failed.
    Hardware(HwInitError),
    /// Configuration is out of range.
    Config(&'static str),
    /// Persisted control state could not be read or written.
    Storage(StorageError),
    /// A control command was rejected before reaching the engine.
    Command(CommandError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hardware(e) => write!(f, "hardware: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Command(e) => write!(f, "command: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Hardware(e)
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
