//! Inbound control commands.
//!
//! The three control inputs as values. Constructors taking raw numbers
//! validate here, on the caller's side, so the render loop never sees an
//! out-of-range pattern selector.

use core::fmt;

use crate::config::MAX_BRIGHTNESS;
use crate::patterns::PatternId;

/// Commands the protocol layer (or console) sends into the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    SetPower(bool),
    /// 0..=254
    SetBrightness(u8),
    SetPattern(PatternId),
}

impl ControlCommand {
    /// Validated brightness command.
    pub fn brightness(level: u16) -> Result<Self, CommandError> {
        if level > u16::from(MAX_BRIGHTNESS) {
            return Err(CommandError::BrightnessOutOfRange(level));
        }
        Ok(Self::SetBrightness(level as u8))
    }

    /// Validated pattern command.
    pub fn pattern(index: u8) -> Result<Self, CommandError> {
        PatternId::from_index(index)
            .map(Self::SetPattern)
            .ok_or(CommandError::PatternOutOfRange(index))
    }
}

/// Why a command was rejected before reaching the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    PatternOutOfRange(u8),
    BrightnessOutOfRange(u16),
    /// Attribute is not one of the three control inputs.
    UnknownAttribute,
    /// Console input could not be parsed; carries a usage hint.
    Parse(&'static str),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PatternOutOfRange(i) => write!(f, "pattern {i} out of range"),
            Self::BrightnessOutOfRange(l) => write!(f, "brightness {l} out of range (0–254)"),
            Self::UnknownAttribute => write!(f, "unknown attribute"),
            Self::Parse(hint) => write!(f, "parse error: {hint}"),
        }
    }
}
