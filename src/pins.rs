//! GPIO / peripheral pin assignments for the FogPen main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Fire circuit (coil MOSFET + boost converter)
// ---------------------------------------------------------------------------

/// Digital output: gates the coil MOSFET (active HIGH).
pub const FIRE_GPIO: i32 = 1;
/// Digital output: enables the boost converter / coil power domain.
pub const POWER_EN_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Battery sensing (ADC1)
// ---------------------------------------------------------------------------

/// Battery voltage via resistive divider — ADC1 channel 4 (GPIO 5 on ESP32-S3).
pub const BATTERY_ADC_GPIO: i32 = 5;
/// ADC1 channel for the battery divider.
pub const BATTERY_ADC_CHANNEL: u32 = 4;

// ---------------------------------------------------------------------------
// User button (active-low with pull-up)
// ---------------------------------------------------------------------------

/// Momentary fire/control push-button.
pub const BUTTON_GPIO: i32 = 16;
/// Bit index the button occupies in the debounce sampler's input byte.
pub const BUTTON_BIT: u8 = 0;
/// Mask of all debounced switches.
pub const SWITCH_MASK: u8 = 1 << BUTTON_BIT;

// ---------------------------------------------------------------------------
// Indicator LED (LEDC PWM)
// ---------------------------------------------------------------------------

pub const INDICATOR_GPIO: i32 = 11;
/// LEDC frequency for the indicator (1 kHz — flicker-free).
pub const INDICATOR_PWM_FREQ_HZ: u32 = 1_000;

// ---------------------------------------------------------------------------
// UART developer console
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;
pub const UART_BAUD: u32 = 115_200;
