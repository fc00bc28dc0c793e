//! Line-oriented serial console.
//!
//! A bench stand-in for the smart-home controller: one command per line,
//! case-insensitive.
//!
//! ```text
//! power on|off
//! brightness <0..254>
//! pattern <0..4|comet|sparkle|stack|pingpong|wave>
//! status
//! help
//! ```

use crate::app::commands::{CommandError, ControlCommand};
use crate::app::control::ControlSnapshot;
use crate::patterns::PatternId;

pub const HELP: &str = "commands: power on|off, brightness <0..254>, \
                        pattern <0..4|comet|sparkle|stack|pingpong|wave>, status, help";

/// A parsed console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleRequest {
    Command(ControlCommand),
    Status,
    Help,
}

pub fn parse_line(line: &str) -> Result<ConsoleRequest, CommandError> {
    let lower = line.trim().to_ascii_lowercase();
    let mut words = lower.split_whitespace();
    let verb = words.next().ok_or(CommandError::Parse("empty line"))?;
    let arg = words.next();
    if words.next().is_some() {
        return Err(CommandError::Parse("too many arguments"));
    }

    match (verb, arg) {
        ("power", Some("on" | "1")) => Ok(ConsoleRequest::Command(ControlCommand::SetPower(true))),
        ("power", Some("off" | "0")) => {
            Ok(ConsoleRequest::Command(ControlCommand::SetPower(false)))
        }
        ("power", _) => Err(CommandError::Parse("power on|off")),
        ("brightness", Some(value)) => {
            let level: u16 = value
                .parse()
                .map_err(|_| CommandError::Parse("brightness <0..254>"))?;
            ControlCommand::brightness(level).map(ConsoleRequest::Command)
        }
        ("brightness", None) => Err(CommandError::Parse("brightness <0..254>")),
        ("pattern", Some(value)) => parse_pattern(value).map(ConsoleRequest::Command),
        ("pattern", None) => Err(CommandError::Parse("pattern <0..4|name>")),
        ("status", None) => Ok(ConsoleRequest::Status),
        ("help" | "?", None) => Ok(ConsoleRequest::Help),
        _ => Err(CommandError::Parse("unknown command, try `help`")),
    }
}

fn parse_pattern(value: &str) -> Result<ControlCommand, CommandError> {
    if value.bytes().all(|b| b.is_ascii_digit()) {
        let index: u8 = value
            .parse()
            .map_err(|_| CommandError::Parse("pattern <0..4|name>"))?;
        return ControlCommand::pattern(index);
    }
    PatternId::from_name(value)
        .map(ControlCommand::SetPattern)
        .ok_or(CommandError::Parse("pattern <0..4|name>"))
}

/// One-line status for the `status` command.
pub fn format_status(snapshot: &ControlSnapshot) -> String {
    format!(
        "power={} brightness={} pattern={}({})",
        if snapshot.power { "on" } else { "off" },
        snapshot.brightness,
        snapshot.pattern.name(),
        snapshot.pattern.index()
    )
}
