//! PWM peripheral setup, the light channel driver, and task helpers.

pub mod hw_init;
pub mod pwm_channels;
pub mod task_pin;
pub mod watchdog;
