//! Deferred write-back of control state to the [`ControlStore`].
//!
//! Power and pattern changes are saved on the next poll. Brightness is
//! typically swept (dimmer slider, repeated console commands), so a
//! brightness change only schedules a save `delay` after the last one,
//! collapsing a sweep into a single flash write.

use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::app::commands::ControlCommand;
use crate::app::control::{ControlState, PersistedControl};
use crate::app::ports::{ControlStore, StorageError};

#[derive(Debug)]
pub struct DeferredPersistence {
    delay: Duration,
    due: Option<Instant>,
    last_saved: Option<PersistedControl>,
}

impl DeferredPersistence {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            due: None,
            last_saved: None,
        }
    }

    /// Record what was restored at boot so an unchanged state is not rewritten.
    pub fn mark_saved(&mut self, stored: PersistedControl) {
        self.last_saved = Some(stored);
    }

    /// Schedule a save for an applied command.
    pub fn note(&mut self, command: &ControlCommand, now: Instant) {
        self.due = Some(match command {
            // Each step of a sweep pushes the deadline out, unless a save
            // is already due now.
            ControlCommand::SetBrightness(_) => match self.due {
                Some(due) if due <= now => due,
                _ => now + self.delay,
            },
            ControlCommand::SetPower(_) | ControlCommand::SetPattern(_) => now,
        });
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    /// Write the current state if a save is due and it differs from the
    /// last successful write. Returns `Ok(true)` when the store was written.
    ///
    /// A failed write is retried after another `delay`.
    pub fn poll(
        &mut self,
        control: &ControlState,
        store: &mut impl ControlStore,
        now: Instant,
    ) -> Result<bool, StorageError> {
        match self.due {
            Some(due) if due <= now => {}
            _ => return Ok(false),
        }
        self.due = None;

        let current = control.persisted();
        if self.last_saved == Some(current) {
            debug!("persist: unchanged, skipping write");
            return Ok(false);
        }
        match store.save(&current) {
            Ok(()) => {
                self.last_saved = Some(current);
                Ok(true)
            }
            Err(e) => {
                warn!("persist: save failed ({}), retrying in {:?}", e, self.delay);
                self.due = Some(now + self.delay);
                Err(e)
            }
        }
    }
}
