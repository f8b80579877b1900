//! Port traits — the boundary between domain logic and the outside world.
//!
//! ```text
//!   Driver ──▶ Port trait ──▶ ControlService (domain)
//! ```
//!
//! Driven adapters (fire circuit, indicator, sleep, console) implement
//! these traits.  The [`ControlService`](super::service::ControlService)
//! consumes them via generics, so the domain core never touches hardware
//! directly and the whole control loop runs on the host under test.

use crate::events::EventQueue;
use heapless::String;

/// Longest accepted console input line.
pub const CONSOLE_LINE_MAX: usize = 32;

/// One assembled console input line.
pub type ConsoleLine = String<CONSOLE_LINE_MAX>;

// ───────────────────────────────────────────────────────────────
// Actuator port (domain → fire circuit)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the coil and its power domain.
///
/// Fire and measurement calls are *requests*: the driver acknowledges them
/// by emitting `FireOn`/`FireOff`/`BatteryMeasured` HW events from
/// [`step`](Self::step), and the domain reacts to those events — never to
/// the request itself.
pub trait ActuatorPort {
    /// Per-iteration driver cycle: applies pending requests and pushes
    /// resulting HW events into `hw_events`.
    fn step(&mut self, hw_events: &EventQueue);

    /// Ask for the coil to be engaged.
    fn request_fire_on(&mut self);

    /// Ask for the coil to be disengaged.
    fn request_fire_off(&mut self);

    /// Ask for a single-shot under-load battery conversion.
    fn request_battery_measurement(&mut self);

    /// Bring up the coil power domain.
    fn power_up(&mut self);

    /// Drop the coil power domain; forces the coil off at hardware level.
    fn power_down(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Indicator port (domain → PWM LED)
// ───────────────────────────────────────────────────────────────

/// PWM-dimmed indicator LED.
pub trait IndicatorPort {
    /// Set brightness as a percentage (0 = dark, 100 = full).
    fn set_brightness(&mut self, percent: u8);

    /// Last commanded brightness percentage.
    fn brightness(&self) -> u8;
}

// ───────────────────────────────────────────────────────────────
// Sleep port (domain → low-power mode)
// ───────────────────────────────────────────────────────────────

/// The one true suspension point in the system.
pub trait SleepPort {
    /// Enter low-power mode and block until an external wake condition
    /// (a pin change) occurs.  No timeout, no cancellation; the periodic
    /// tick context resumes together with the main loop.
    fn sleep_until_wake(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Console port (domain ↔ developer serial console)
// ───────────────────────────────────────────────────────────────

/// Line-oriented bidirectional developer console.
pub trait ConsolePort {
    /// Return a completed input line, if one has been assembled.
    /// Non-blocking; line terminators are stripped.
    fn poll_line(&mut self) -> Option<ConsoleLine>;

    /// Write a string followed by a line ending.
    fn write_line(&mut self, s: &str);
}
