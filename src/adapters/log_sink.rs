//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing render-loop transitions to the
//! `log` facade (UART / USB-CDC in production).

use log::info;

use crate::app::events::EngineEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`EngineEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &EngineEvent) {
        match event {
            EngineEvent::Started { channels } => {
                info!("START | render loop up, channels={}", channels);
            }
            EngineEvent::PowerChanged(on) => {
                info!("POWER | {}", if *on { "on" } else { "off" });
            }
            EngineEvent::PatternChanged { from: Some(from), to } => {
                info!("PATTERN | {:?} -> {:?}", from, to);
            }
            EngineEvent::PatternChanged { from: None, to } => {
                info!("PATTERN | start {:?}", to);
            }
            EngineEvent::Stopped => {
                info!("STOP | render loop exited");
            }
        }
    }
}
