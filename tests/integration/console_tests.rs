//! Integration tests for developer console dispatch.

use crate::mock_hw::{BoardCall, MockBoard, MockConsole};

use fogpen::app::ports::ActuatorPort;
use fogpen::app::service::ControlService;
use fogpen::config::DeviceConfig;
use fogpen::events::{EventQueue, HwEvent, UiEvent};

struct Rig {
    service: ControlService,
    board: MockBoard,
    console: MockConsole,
    ui: EventQueue,
    hw: EventQueue,
}

impl Rig {
    fn new() -> Self {
        Self {
            service: ControlService::new(DeviceConfig::default()),
            board: MockBoard::new(),
            console: MockConsole::new(),
            ui: EventQueue::new(),
            hw: EventQueue::new(),
        }
    }

    fn iterate(&mut self) {
        self.board.step(&self.hw);
        self.service
            .iterate(&self.ui, &self.hw, &mut self.board, &mut self.console);
    }

    fn run_line(&mut self, line: &str) {
        self.console.type_line(line);
        self.iterate();
    }
}

#[test]
fn on_and_off_drive_the_coil() {
    let mut rig = Rig::new();
    rig.run_line("on");
    assert_eq!(rig.board.count(BoardCall::RequestFireOn), 1);
    rig.run_line("off");
    assert_eq!(rig.board.count(BoardCall::RequestFireOff), 1);
}

#[test]
fn bvm_requests_a_measurement() {
    let mut rig = Rig::new();
    rig.run_line("bvm");
    assert_eq!(rig.board.count(BoardCall::RequestMeasurement), 1);
}

#[test]
fn bv_prints_the_stored_reading() {
    let mut rig = Rig::new();
    rig.run_line("bv");
    assert!(rig.console.printed("Battery voltage under load: 0"));

    // Record a reading while firing, then ask again.
    rig.ui.try_enqueue(UiEvent::FireButtonPressed.encode());
    rig.iterate();
    rig.iterate();
    rig.hw.try_enqueue(HwEvent::BatteryMeasured(142).encode());
    rig.iterate();
    rig.run_line("bv");
    assert!(rig.console.printed("Battery voltage under load: 142"));
}

#[test]
fn cycle_counters_are_printed() {
    let mut rig = Rig::new();
    for _ in 0..5 {
        rig.iterate();
    }
    rig.ui.try_enqueue(UiEvent::PulseTick50ms.encode());
    rig.iterate();

    rig.run_line("cyc l50");
    assert!(rig.console.printed("Last cycle count per 50ms pulse: 5"));
    rig.run_line("cyc m50");
    assert!(rig.console.printed("Minimum cycle count per 50ms pulse: 5"));

    rig.run_line("cyc count");
    // 5 plain iterations + pulse iteration + two command iterations.
    assert!(rig.console.printed("Main cycle counter: 8"));
}

#[test]
fn ui_leds_reports_indicator_brightness() {
    let mut rig = Rig::new();
    rig.run_line("ui leds");
    assert!(rig.console.printed("Indicator brightness: 0%"));

    rig.ui.try_enqueue(UiEvent::FireButtonPressed.encode());
    rig.iterate();
    rig.iterate();
    rig.run_line("ui leds");
    assert!(rig.console.printed("Indicator brightness: 99%"));
}

#[test]
fn echo_toggle_round_trip() {
    let mut rig = Rig::new();
    rig.run_line("p bvm on");
    rig.hw.try_enqueue(HwEvent::BatteryMeasured(120).encode());
    rig.iterate();
    assert!(rig.console.printed("BVM: 120"));

    rig.run_line("p bvm off");
    rig.hw.try_enqueue(HwEvent::BatteryMeasured(121).encode());
    rig.iterate();
    assert!(!rig.console.printed("BVM: 121"));
}

#[test]
fn unknown_lines_are_silently_ignored() {
    let mut rig = Rig::new();
    for line in ["help", "ON", "bvm now", "cyc", "reset", ""] {
        rig.run_line(line);
    }
    assert!(rig.board.calls.is_empty());
    assert!(rig.console.output.is_empty());
}

#[test]
fn one_command_line_per_iteration() {
    let mut rig = Rig::new();
    rig.console.type_line("on");
    rig.console.type_line("off");
    rig.iterate();
    assert_eq!(rig.board.count(BoardCall::RequestFireOn), 1);
    assert_eq!(rig.board.count(BoardCall::RequestFireOff), 0);
    rig.iterate();
    assert_eq!(rig.board.count(BoardCall::RequestFireOff), 1);
}
