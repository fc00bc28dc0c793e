//! Perceptual brightness mapping.
//!
//! LEDs are driven linearly in duty but perceived roughly logarithmically,
//! so a linear ramp looks like it spends most of its range near full. A
//! cubic response (`duty = intensity³ · max_duty`) pulls the low end down to
//! where the eye expects it.

use crate::config::MAX_BRIGHTNESS;

/// Map a linear intensity in `[0, 1]` to a duty value in `[0, max_duty]`.
///
/// Out-of-range input is clamped; NaN maps to 0.
pub fn gamma_map(intensity: f32, max_duty: u32) -> u32 {
    if intensity.is_nan() {
        return 0;
    }
    let i = intensity.clamp(0.0, 1.0);
    let duty = (i * i * i * max_duty as f32).round() as u32;
    duty.min(max_duty)
}

/// Scale the configured max duty linearly by `brightness / 254`.
///
/// Brightness above 254 is treated as 254.
pub fn effective_max_duty(max_duty: u32, brightness: u8) -> u32 {
    let level = u64::from(brightness.min(MAX_BRIGHTNESS));
    (u64::from(max_duty) * level / u64::from(MAX_BRIGHTNESS)) as u32
}
