//! Fire circuit driver — coil MOSFET, power domain, battery sampling.
//!
//! Fire and measurement calls are requests; the driver applies them on its
//! next [`step`](FireDriver::step) and acknowledges through HW events.
//! The control core reacts only to those acknowledgements, so its firing
//! flag always mirrors what the hardware actually did.

use crate::drivers::hw_init;
use crate::events::{EventQueue, HwEvent};
use crate::pins;

pub struct FireDriver {
    /// Coil currently engaged at the MOSFET.
    engaged: bool,
    /// Coil power domain up.
    powered: bool,
    /// Fire request waiting for the next step (`Some(true)` = engage).
    pending_fire: Option<bool>,
    /// Battery conversion requested.
    measure_pending: bool,
}

impl FireDriver {
    pub fn new() -> Self {
        Self {
            engaged: false,
            powered: true, // the power domain boots enabled
            pending_fire: None,
            measure_pending: false,
        }
    }

    pub fn request_on(&mut self) {
        self.pending_fire = Some(true);
    }

    pub fn request_off(&mut self) {
        self.pending_fire = Some(false);
    }

    pub fn request_measurement(&mut self) {
        self.measure_pending = true;
    }

    pub fn power_up(&mut self) {
        hw_init::gpio_write(pins::POWER_EN_GPIO, true);
        self.powered = true;
    }

    /// Drops the power domain.  Kills the coil at hardware level without
    /// an acknowledgement event; the control core clears its own firing
    /// flag on the shutdown path.
    pub fn power_down(&mut self) {
        hw_init::gpio_write(pins::FIRE_GPIO, false);
        self.engaged = false;
        self.pending_fire = None;
        self.measure_pending = false;
        hw_init::gpio_write(pins::POWER_EN_GPIO, false);
        self.powered = false;
    }

    /// Per-iteration cycle: apply pending requests, emit acknowledgements.
    pub fn step(&mut self, hw_events: &EventQueue) {
        if let Some(on) = self.pending_fire.take() {
            // Engaging needs the power domain; disengaging always works.
            if on != self.engaged && (self.powered || !on) {
                hw_init::gpio_write(pins::FIRE_GPIO, on);
                self.engaged = on;
                let event = if on { HwEvent::FireOn } else { HwEvent::FireOff };
                hw_events.try_enqueue(event.encode());
            }
        }

        if self.measure_pending {
            self.measure_pending = false;
            // 12-bit single-shot conversion, scaled to the 8-bit reading
            // the control core works with.
            let raw = hw_init::adc1_read(pins::BATTERY_ADC_CHANNEL);
            let reading = (raw >> 4).min(255) as u8;
            hw_events.try_enqueue(HwEvent::BatteryMeasured(reading).encode());
        }
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }
}

impl Default for FireDriver {
    fn default() -> Self {
        Self::new()
    }
}
