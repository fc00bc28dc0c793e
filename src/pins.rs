//! GPIO assignments for the moto light board.
//!
//! Single source of truth: the channel driver references this module
//! rather than hard-coding pin numbers. Logical channel `i` is
//! `LED_GPIOS[i]` when every pin configures successfully.

// ---------------------------------------------------------------------------
// Light channels (LEDC low-speed PWM)
// ---------------------------------------------------------------------------

/// Number of light channels fitted on the board.
pub const LED_COUNT: usize = 6;

/// Light channel GPIOs, in logical channel order.
pub const LED_GPIOS: [i32; LED_COUNT] = [8, 1, 3, 4, 5, 6];

/// Vehicle-light role of each channel.
pub const LED_ROLES: [&str; LED_COUNT] = [
    "left front indicator",
    "right front indicator",
    "left back indicator",
    "right back indicator",
    "taillight",
    "main light",
];

/// Highest GPIO number routed on the ESP32-C5.
pub const MAX_GPIO: i32 = 28;

/// Role for a channel index, or `"spare"` past the fitted set.
pub fn role(index: usize) -> &'static str {
    LED_ROLES.get(index).copied().unwrap_or("spare")
}
