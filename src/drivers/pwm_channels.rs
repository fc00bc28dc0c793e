//! PWM light channel driver.
//!
//! Owns N duty-cycle outputs sharing one LEDC timer. Logical channel
//! indices are dense and zero-based over the pins that configured
//! successfully, and stay fixed for the life of the process.
//!
//! ## Failure policy
//!
//! - Pins that fail to configure are skipped and logged; the rest run.
//! - Zero configured channels fails `init`.
//! - `set_duty` before `init`, or on an index past the active range, is a
//!   silent no-op so a startup race can never take down the render loop.

use log::{info, warn};

use crate::app::ports::DutyPort;
use crate::config::{EngineConfig, MAX_CHANNELS};
use crate::drivers::hw_init::{HwInitError, LedcPort};
use crate::pins;

/// One configured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    pub pin: i32,
    /// Logical index, also the LEDC channel number.
    pub index: usize,
    /// Last commanded duty.
    pub duty: u32,
}

pub struct PwmChannels<L: LedcPort> {
    ledc: L,
    channels: heapless::Vec<Channel, MAX_CHANNELS>,
    freq_hz: u32,
    resolution_bits: u8,
    max_duty: u32,
    initialized: bool,
    uninit_warned: bool,
}

impl<L: LedcPort> PwmChannels<L> {
    pub fn new(ledc: L, config: &EngineConfig) -> Self {
        Self {
            ledc,
            channels: heapless::Vec::new(),
            freq_hz: config.pwm_freq_hz,
            resolution_bits: config.duty_resolution_bits,
            max_duty: config.max_duty(),
            initialized: false,
            uninit_warned: false,
        }
    }

    /// Configure the shared timer and up to `count` channels from `pins`.
    ///
    /// `count` is clamped to the pin list length and [`MAX_CHANNELS`].
    /// Returns the number of channels that came up.
    pub fn init(&mut self, pin_list: &[i32], count: usize) -> Result<usize, HwInitError> {
        if self.initialized {
            warn!("pwm: init called twice, keeping {} channels", self.channels.len());
            return Ok(self.channels.len());
        }

        let requested = count.min(pin_list.len()).min(MAX_CHANNELS);
        if requested < count {
            warn!("pwm: {} channels requested, clamped to {}", count, requested);
        }

        self.ledc
            .configure_timer(self.freq_hz, self.resolution_bits)
            .map_err(HwInitError::LedcTimerFailed)?;

        for (position, &pin) in pin_list[..requested].iter().enumerate() {
            let index = self.channels.len();
            match self.ledc.configure_channel(index as u32, pin) {
                Ok(()) => {
                    let _ = self.channels.push(Channel {
                        pin,
                        index,
                        duty: 0,
                    });
                    info!("pwm: channel {} on GPIO {} ({})", index, pin, pins::role(position));
                }
                Err(rc) => {
                    warn!("pwm: GPIO {} ({}) failed (rc={}), skipping", pin, pins::role(position), rc);
                }
            }
        }

        if self.channels.is_empty() {
            return Err(HwInitError::NoChannels { requested });
        }
        if self.channels.len() < requested {
            warn!(
                "pwm: running with {}/{} channels",
                self.channels.len(),
                requested
            );
        }

        self.initialized = true;
        info!(
            "pwm: {} channels ready, {} Hz, max duty {}",
            self.channels.len(),
            self.freq_hz,
            self.max_duty
        );
        Ok(self.channels.len())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Last commanded duty on `index`.
    pub fn duty(&self, index: usize) -> Option<u32> {
        self.channels.get(index).map(|c| c.duty)
    }
}

impl<L: LedcPort> DutyPort for PwmChannels<L> {
    fn channel_count(&self) -> usize {
        if self.initialized { self.channels.len() } else { 0 }
    }

    fn set_duty(&mut self, channel: usize, duty: u32) {
        if !self.initialized {
            if !self.uninit_warned {
                warn!("pwm: set_duty before init ignored");
                self.uninit_warned = true;
            }
            return;
        }
        let Some(ch) = self.channels.get_mut(channel) else {
            return;
        };
        let duty = duty.min(self.max_duty);
        self.ledc.write_duty(ch.index as u32, duty);
        ch.duty = duty;
    }
}
