//! Mock hardware for integration tests.
//!
//! Records every port call so tests can assert on the full command history
//! without touching real GPIO/PWM registers.  `MockBoard` mimics the real
//! fire driver's request/acknowledge behavior: requests become HW events on
//! the next `step()`, never immediately.

use fogpen::app::ports::{ActuatorPort, ConsoleLine, ConsolePort, IndicatorPort, SleepPort};
use fogpen::events::{EventQueue, HwEvent};
use std::collections::VecDeque;

// ── Board call record ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardCall {
    RequestFireOn,
    RequestFireOff,
    RequestMeasurement,
    PowerUp,
    PowerDown,
    SetBrightness(u8),
    Sleep,
}

// ── MockBoard ─────────────────────────────────────────────────

pub struct MockBoard {
    pub calls: Vec<BoardCall>,
    /// Reading every battery measurement returns.
    pub battery_level: u8,
    pub sleep_count: u32,
    engaged: bool,
    pending_fire: Option<bool>,
    measure_pending: bool,
    brightness: u8,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            battery_level: 200,
            sleep_count: 0,
            engaged: false,
            pending_fire: None,
            measure_pending: false,
            brightness: 0,
        }
    }

    pub fn count(&self, call: BoardCall) -> usize {
        self.calls.iter().filter(|&&c| c == call).count()
    }

    pub fn coil_engaged(&self) -> bool {
        self.engaged
    }
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorPort for MockBoard {
    fn step(&mut self, hw_events: &EventQueue) {
        if let Some(on) = self.pending_fire.take() {
            if on != self.engaged {
                self.engaged = on;
                let event = if on { HwEvent::FireOn } else { HwEvent::FireOff };
                hw_events.try_enqueue(event.encode());
            }
        }
        if self.measure_pending {
            self.measure_pending = false;
            hw_events.try_enqueue(HwEvent::BatteryMeasured(self.battery_level).encode());
        }
    }

    fn request_fire_on(&mut self) {
        self.calls.push(BoardCall::RequestFireOn);
        self.pending_fire = Some(true);
    }

    fn request_fire_off(&mut self) {
        self.calls.push(BoardCall::RequestFireOff);
        self.pending_fire = Some(false);
    }

    fn request_battery_measurement(&mut self) {
        self.calls.push(BoardCall::RequestMeasurement);
        self.measure_pending = true;
    }

    fn power_up(&mut self) {
        self.calls.push(BoardCall::PowerUp);
    }

    fn power_down(&mut self) {
        self.calls.push(BoardCall::PowerDown);
        self.engaged = false;
        self.pending_fire = None;
        self.measure_pending = false;
    }
}

impl IndicatorPort for MockBoard {
    fn set_brightness(&mut self, percent: u8) {
        self.calls.push(BoardCall::SetBrightness(percent));
        self.brightness = percent;
    }

    fn brightness(&self) -> u8 {
        self.brightness
    }
}

impl SleepPort for MockBoard {
    fn sleep_until_wake(&mut self) {
        self.calls.push(BoardCall::Sleep);
        self.sleep_count += 1;
    }
}

// ── MockConsole ───────────────────────────────────────────────

pub struct MockConsole {
    pub input: VecDeque<String>,
    pub output: Vec<String>,
}

#[allow(dead_code)]
impl MockConsole {
    pub fn new() -> Self {
        Self {
            input: VecDeque::new(),
            output: Vec::new(),
        }
    }

    pub fn type_line(&mut self, line: &str) {
        self.input.push_back(line.to_string());
    }

    pub fn printed(&self, needle: &str) -> bool {
        self.output.iter().any(|l| l == needle)
    }
}

impl Default for MockConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsolePort for MockConsole {
    fn poll_line(&mut self) -> Option<ConsoleLine> {
        let next = self.input.pop_front()?;
        let mut line = ConsoleLine::new();
        line.push_str(&next).expect("test line fits the console buffer");
        Some(line)
    }

    fn write_line(&mut self, s: &str) {
        self.output.push(s.to_string());
    }
}
