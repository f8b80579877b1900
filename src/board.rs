//! Board adapter — bridges real peripherals to the domain port traits.
//!
//! Owns the fire, indicator, and sleep drivers, exposing them through
//! [`ActuatorPort`], [`IndicatorPort`], and [`SleepPort`].  Together with
//! the UART console this is the only layer the control core sees; on
//! non-espidf targets the underlying drivers use cfg-gated stubs.

use crate::app::ports::{ActuatorPort, IndicatorPort, SleepPort};
use crate::drivers::fire::FireDriver;
use crate::drivers::indicator::IndicatorLed;
use crate::drivers::power::LightSleep;
use crate::events::EventQueue;

/// Concrete adapter combining all actuator-side hardware.
pub struct Board {
    fire: FireDriver,
    indicator: IndicatorLed,
    sleep: LightSleep,
}

impl Board {
    pub fn new() -> Self {
        Self {
            fire: FireDriver::new(),
            indicator: IndicatorLed::new(),
            sleep: LightSleep::new(),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for Board {
    fn step(&mut self, hw_events: &EventQueue) {
        self.fire.step(hw_events);
    }

    fn request_fire_on(&mut self) {
        self.fire.request_on();
    }

    fn request_fire_off(&mut self) {
        self.fire.request_off();
    }

    fn request_battery_measurement(&mut self) {
        self.fire.request_measurement();
    }

    fn power_up(&mut self) {
        self.fire.power_up();
    }

    fn power_down(&mut self) {
        self.fire.power_down();
    }
}

// ── IndicatorPort implementation ──────────────────────────────

impl IndicatorPort for Board {
    fn set_brightness(&mut self, percent: u8) {
        self.indicator.set_percent(percent);
    }

    fn brightness(&self) -> u8 {
        self.indicator.percent()
    }
}

// ── SleepPort implementation ──────────────────────────────────

impl SleepPort for Board {
    fn sleep_until_wake(&mut self) {
        self.sleep.sleep_until_wake();
    }
}
