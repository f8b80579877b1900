//! Device configuration parameters
//!
//! All tunable parameters for the FogPen firmware in one place.
//! The defaults are the values the hardware was characterised with;
//! nothing is persisted across power loss.

use serde::{Deserialize, Serialize};

/// Core device configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    // --- Timing ---
    /// Debounce sampler tick period (milliseconds)
    pub tick_interval_ms: u32,
    /// Ticks per pulse event (5 ticks × 10 ms = 50 ms pulse period)
    pub pulse_ticks: u8,

    // --- Battery safety ---
    /// Pulses between under-load battery measurements while firing
    /// (4 pulses × 50 ms = 200 ms)
    pub pulses_per_battery_check: u8,
    /// 8-bit under-load reading at or below which firing is forcibly
    /// stopped and the device shuts down
    pub battery_stop_level: u8,

    // --- Indicator ---
    /// Indicator PWM brightness (0-100%) while the coil is firing
    pub indicator_fire_brightness: u8,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            // Timing
            tick_interval_ms: 10,
            pulse_ticks: 5, // 50 ms

            // Battery safety
            pulses_per_battery_check: 4, // 200 ms
            battery_stop_level: 96,

            // Indicator
            indicator_fire_brightness: 99,
        }
    }
}
