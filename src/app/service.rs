//! Control service — the central decision engine.
//!
//! Owns the power state machine, the firing/battery interlock, and all
//! telemetry counters.  Everything mutable here belongs exclusively to the
//! main execution context; the only inputs from the tick context arrive
//! through the event queues.
//!
//! Per iteration, while the device is on, events are consumed in a fixed
//! order: one UI event, then one HW event, then one console line.  A
//! `SwitchOff` short-circuits the iteration — nothing after it runs, not
//! even the cycle counter.

use core::fmt::Write as _;
use log::{info, warn};

use crate::config::DeviceConfig;
use crate::events::{EventQueue, HwEvent, UiEvent};

use super::commands::ConsoleCommand;
use super::ports::{ActuatorPort, ConsolePort, IndicatorPort, SleepPort};

// ───────────────────────────────────────────────────────────────
// State
// ───────────────────────────────────────────────────────────────

/// Power state of the device.
///
/// There is no resident "asleep" state: sleeping is the act of blocking in
/// [`SleepPort::sleep_until_wake`], and the state held across that call is
/// `Awakening` — so on wake the very next UI event decides whether the
/// device comes back `On` or goes down again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    On,
    Awakening,
}

/// Local booleans owned by the control service.  Never touched from the
/// tick context.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFlags {
    /// The coil is currently engaged (as acknowledged by the driver).
    pub firing: bool,
    /// Echo every battery reading to the console.
    pub verbose_bvm: bool,
}

/// Main-loop cycle bookkeeping, sampled at the 50 ms pulse.
#[derive(Debug, Clone, Copy)]
struct CycleStats {
    /// Free-running iteration counter; wraps at the end of its range.
    count: u16,
    /// Counter value at the previous pulse.
    last_cycle_value: u16,
    /// Iterations between the two most recent pulses.
    last_cycles_per_pulse: u16,
    /// Minimum of `last_cycles_per_pulse` over the whole uptime.
    min_cycles_per_pulse: u16,
}

impl CycleStats {
    fn new() -> Self {
        Self {
            count: 0,
            last_cycle_value: 0,
            last_cycles_per_pulse: 0,
            min_cycles_per_pulse: u16::MAX,
        }
    }

    /// Update the per-pulse delta.  Skipped when the wrapping counter
    /// overflowed since the previous pulse — the delta would be garbage.
    fn on_pulse(&mut self) {
        if self.last_cycle_value < self.count {
            self.last_cycles_per_pulse = self.count - self.last_cycle_value;
            if self.min_cycles_per_pulse > self.last_cycles_per_pulse {
                self.min_cycles_per_pulse = self.last_cycles_per_pulse;
            }
        }
        self.last_cycle_value = self.count;
    }
}

// ───────────────────────────────────────────────────────────────
// ControlService
// ───────────────────────────────────────────────────────────────

/// The control core.  One instance lives for the whole process.
pub struct ControlService {
    config: DeviceConfig,
    state: DeviceState,
    flags: LocalFlags,
    /// Counts 50 ms pulses toward the next firing-mode battery check.
    /// Free-running (wrapping) while not firing.
    pulse_counter: u8,
    /// Most recent under-load battery reading.
    battery_under_load: u8,
    cycles: CycleStats,
}

impl ControlService {
    pub fn new(config: DeviceConfig) -> Self {
        Self {
            config,
            state: DeviceState::On,
            flags: LocalFlags::default(),
            pulse_counter: 0,
            battery_under_load: 0,
            cycles: CycleStats::new(),
        }
    }

    /// Emit the startup banner.  Call once before the first iteration.
    pub fn start(&self, console: &mut impl ConsolePort) {
        let mut line: heapless::String<48> = heapless::String::new();
        let _ = write!(line, "FogPen {}", env!("CARGO_PKG_VERSION"));
        console.write_line(&line);
        console.write_line("Hi! This is the FogPen.");
        info!("control service started in {:?}", self.state);
    }

    /// One main-loop iteration of the decision engine.
    pub fn iterate(
        &mut self,
        ui_events: &EventQueue,
        hw_events: &EventQueue,
        hw: &mut (impl ActuatorPort + IndicatorPort + SleepPort),
        console: &mut impl ConsolePort,
    ) {
        if self.state == DeviceState::Awakening {
            self.awakening_step(ui_events, hw, console);
            return;
        }

        // Device is on: one UI event, one HW event, one console line —
        // strictly in this order.
        if let Some(event) = ui_events.try_dequeue().and_then(UiEvent::decode) {
            match event {
                UiEvent::FireButtonPressed => hw.request_fire_on(),
                UiEvent::FireButtonReleased => hw.request_fire_off(),
                UiEvent::SwitchOff => {
                    self.shut_down(hw, console);
                    // Explicit short-circuit: the rest of the iteration,
                    // including the cycle counter, must not run.
                    return;
                }
                UiEvent::PulseTick50ms => self.on_pulse(hw),
                // Meaningful only while awakening.
                UiEvent::SwitchOn | UiEvent::AbortAwakening => {}
            }
        }

        if let Some(event) = hw_events.try_dequeue().and_then(HwEvent::decode) {
            match event {
                HwEvent::FireOn => {
                    self.flags.firing = true;
                    self.pulse_counter = 0;
                    hw.set_brightness(self.config.indicator_fire_brightness);
                }
                HwEvent::FireOff => {
                    self.flags.firing = false;
                    self.pulse_counter = 0;
                    hw.set_brightness(0);
                }
                HwEvent::BatteryMeasured(reading) => {
                    self.on_battery_reading(reading, ui_events, hw, console);
                }
            }
        }

        if let Some(line) = console.poll_line() {
            if let Some(command) = ConsoleCommand::parse(&line) {
                self.dispatch_command(command, hw, console);
            }
            // Unrecognized lines are silently ignored.
        }

        self.cycles.count = self.cycles.count.wrapping_add(1);
    }

    // ── State handlers ────────────────────────────────────────

    fn awakening_step(
        &mut self,
        ui_events: &EventQueue,
        hw: &mut (impl ActuatorPort + IndicatorPort + SleepPort),
        console: &mut impl ConsolePort,
    ) {
        let Some(event) = ui_events.try_dequeue().and_then(UiEvent::decode) else {
            return;
        };
        match event {
            UiEvent::SwitchOn => {
                hw.power_up();
                hw.set_brightness(0);
                self.state = DeviceState::On;
                console.write_line("DEVICE UP");
                info!("device up");
            }
            UiEvent::AbortAwakening => {
                console.write_line("DOWN AGAIN");
                hw.sleep_until_wake();
            }
            // Anything else is ignored until a definitive on/off decision.
            _ => {}
        }
    }

    fn shut_down(
        &mut self,
        hw: &mut (impl ActuatorPort + IndicatorPort + SleepPort),
        console: &mut impl ConsolePort,
    ) {
        console.write_line("DOWN");
        self.flags.firing = false;
        self.pulse_counter = 0;
        hw.request_fire_off();
        hw.power_down();
        hw.set_brightness(0);
        info!("device down, sleeping until pin change");
        hw.sleep_until_wake();
        self.state = DeviceState::Awakening;
    }

    fn on_pulse(&mut self, hw: &mut impl ActuatorPort) {
        self.cycles.on_pulse();
        self.pulse_counter = self.pulse_counter.wrapping_add(1);
        if self.flags.firing && self.pulse_counter >= self.config.pulses_per_battery_check {
            hw.request_battery_measurement();
            self.pulse_counter = 0;
        }
    }

    fn on_battery_reading(
        &mut self,
        reading: u8,
        ui_events: &EventQueue,
        hw: &mut impl ActuatorPort,
        console: &mut impl ConsolePort,
    ) {
        if self.flags.firing {
            self.battery_under_load = reading;
            // Hard cutoff.  Unconditional, and ahead of the echo below:
            // no console traffic may delay or skip it.
            if reading <= self.config.battery_stop_level {
                warn!(
                    "battery under load at {} (limit {}) — forcing switch-off",
                    reading, self.config.battery_stop_level
                );
                self.flags.firing = false;
                hw.request_fire_off();
                // Logical switch-off: the next iteration runs the ordinary
                // shutdown path.  Enqueued from the main context, like every
                // other UI event — the queue keeps its single producer.
                ui_events.try_enqueue(UiEvent::SwitchOff.encode());
            }
        }
        if self.flags.verbose_bvm {
            let mut line: heapless::String<48> = heapless::String::new();
            let _ = write!(line, "BVM: {reading}");
            console.write_line(&line);
        }
    }

    fn dispatch_command(
        &mut self,
        command: ConsoleCommand,
        hw: &mut (impl ActuatorPort + IndicatorPort),
        console: &mut impl ConsolePort,
    ) {
        match command {
            ConsoleCommand::FireOff => hw.request_fire_off(),
            ConsoleCommand::FireOn => hw.request_fire_on(),
            ConsoleCommand::MeasureBattery => hw.request_battery_measurement(),
            ConsoleCommand::PrintLastCycles => {
                write_value(
                    console,
                    "Last cycle count per 50ms pulse: ",
                    self.cycles.last_cycles_per_pulse,
                );
            }
            ConsoleCommand::PrintMinCycles => {
                write_value(
                    console,
                    "Minimum cycle count per 50ms pulse: ",
                    self.cycles.min_cycles_per_pulse,
                );
            }
            ConsoleCommand::PrintCycleCount => {
                write_value(console, "Main cycle counter: ", self.cycles.count);
            }
            ConsoleCommand::PrintIndicator => {
                let mut line: heapless::String<48> = heapless::String::new();
                let _ = write!(line, "Indicator brightness: {}%", hw.brightness());
                console.write_line(&line);
            }
            ConsoleCommand::PrintBatteryVoltage => {
                write_value(
                    console,
                    "Battery voltage under load: ",
                    u16::from(self.battery_under_load),
                );
            }
            ConsoleCommand::EchoReadingsOn => self.flags.verbose_bvm = true,
            ConsoleCommand::EchoReadingsOff => self.flags.verbose_bvm = false,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn flags(&self) -> LocalFlags {
        self.flags
    }

    pub fn battery_under_load(&self) -> u8 {
        self.battery_under_load
    }

    pub fn cycle_count(&self) -> u16 {
        self.cycles.count
    }

    pub fn pulse_counter(&self) -> u8 {
        self.pulse_counter
    }
}

fn write_value(console: &mut impl ConsolePort, label: &str, value: u16) {
    let mut line: heapless::String<48> = heapless::String::new();
    let _ = write!(line, "{label}{value}");
    console.write_line(&line);
}
