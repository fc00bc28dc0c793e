//! LEDC PWM peripheral configuration.
//!
//! One shared low-speed timer, one LEDC channel per light output. The
//! raw ESP-IDF calls sit behind [`LedcPort`] so the channel driver can be
//! exercised on the host; [`Ledc`] is the real peripheral on ESP-IDF and
//! an in-memory simulation everywhere else.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(not(target_os = "espidf"))]
use crate::config::MAX_CHANNELS;
#[cfg(not(target_os = "espidf"))]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot PWM initialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    LedcTimerFailed(i32),
    NoChannels { requested: usize },
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::LedcTimerFailed(rc) => write!(f, "LEDC timer config failed (rc={})", rc),
            Self::NoChannels { requested } => {
                write!(f, "no PWM channel could be configured (requested {})", requested)
            }
        }
    }
}

/// `ESP_ERR_INVALID_ARG`, reported by the simulation for unroutable pins.
pub const ESP_ERR_INVALID_ARG_RC: i32 = 0x102;

// ── Port ──────────────────────────────────────────────────────

/// Raw LEDC operations. Return codes are ESP-IDF `esp_err_t` values.
pub trait LedcPort {
    /// Configure the timer shared by every light channel.
    fn configure_timer(&mut self, freq_hz: u32, resolution_bits: u8) -> Result<(), i32>;

    /// Bind LEDC `channel` to `gpio` on the shared timer, duty 0.
    fn configure_channel(&mut self, channel: u32, gpio: i32) -> Result<(), i32>;

    /// Latch a new duty on an already configured channel.
    fn write_duty(&mut self, channel: u32, duty: u32);
}

/// The on-chip LEDC peripheral.
#[derive(Debug, Default)]
pub struct Ledc;

#[cfg(target_os = "espidf")]
impl LedcPort for Ledc {
    fn configure_timer(&mut self, freq_hz: u32, resolution_bits: u8) -> Result<(), i32> {
        let timer = ledc_timer_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            timer_num: ledc_timer_t_LEDC_TIMER_0,
            duty_resolution: resolution_bits as ledc_timer_bit_t,
            freq_hz,
            clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
            ..Default::default()
        };
        // SAFETY: called once from the init path before the render thread starts.
        let ret = unsafe { ledc_timer_config(&timer) };
        if ret != ESP_OK as i32 {
            return Err(ret);
        }
        log::info!("hw_init: LEDC timer0 {} Hz, {}-bit", freq_hz, resolution_bits);
        Ok(())
    }

    fn configure_channel(&mut self, channel: u32, gpio: i32) -> Result<(), i32> {
        let cfg = ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: gpio,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        };
        // SAFETY: init path only; the channel is not yet visible to the render loop.
        let ret = unsafe { ledc_channel_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(ret);
        }
        Ok(())
    }

    fn write_duty(&mut self, channel: u32, duty: u32) {
        // SAFETY: channel was configured in configure_channel(); only the
        // render thread writes duty registers after init.
        unsafe {
            ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty);
            ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl LedcPort for Ledc {
    fn configure_timer(&mut self, freq_hz: u32, resolution_bits: u8) -> Result<(), i32> {
        if freq_hz == 0 || !(1..=14).contains(&resolution_bits) {
            return Err(ESP_ERR_INVALID_ARG_RC);
        }
        log::info!("hw_init(sim): LEDC timer {} Hz, {}-bit", freq_hz, resolution_bits);
        Ok(())
    }

    fn configure_channel(&mut self, channel: u32, gpio: i32) -> Result<(), i32> {
        if channel as usize >= MAX_CHANNELS || !(0..=pins::MAX_GPIO).contains(&gpio) {
            return Err(ESP_ERR_INVALID_ARG_RC);
        }
        Ok(())
    }

    fn write_duty(&mut self, _channel: u32, _duty: u32) {}
}
