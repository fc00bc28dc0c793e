//! Outbound engine events.
//!
//! The [`RenderEngine`](super::engine::RenderEngine) emits these through
//! the [`EventSink`](super::ports::EventSink) port on state transitions
//! only, never per frame.

use crate::patterns::PatternId;

/// Structured events emitted by the render core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The render loop is up (carries the driven channel count).
    Started { channels: usize },

    /// The observed power flag changed.
    PowerChanged(bool),

    /// A pattern was (re)started from fresh state. `from` is `None` on the
    /// first activation and after power comes back.
    PatternChanged {
        from: Option<PatternId>,
        to: PatternId,
    },

    /// The cooperative stop flag was observed.
    Stopped,
}
