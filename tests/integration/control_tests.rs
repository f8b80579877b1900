//! Integration tests for the control service against mock hardware.
//!
//! These run on the host and drive the same per-iteration sequence as the
//! real main loop (driver step, then control iteration), injecting UI and
//! HW events directly into the queues.

use crate::mock_hw::{BoardCall, MockBoard, MockConsole};

use fogpen::app::ports::ActuatorPort;
use fogpen::app::service::{ControlService, DeviceState};
use fogpen::config::DeviceConfig;
use fogpen::events::{EventQueue, HwEvent, UiEvent};

struct Rig {
    service: ControlService,
    board: MockBoard,
    console: MockConsole,
    ui: EventQueue,
    hw: EventQueue,
    config: DeviceConfig,
}

impl Rig {
    fn new() -> Self {
        let config = DeviceConfig::default();
        Self {
            service: ControlService::new(config.clone()),
            board: MockBoard::new(),
            console: MockConsole::new(),
            ui: EventQueue::new(),
            hw: EventQueue::new(),
            config,
        }
    }

    /// One main-loop iteration, minus the input dispatcher (tests inject
    /// UI events directly).
    fn iterate(&mut self) {
        self.board.step(&self.hw);
        self.service
            .iterate(&self.ui, &self.hw, &mut self.board, &mut self.console);
    }

    fn push_ui(&mut self, event: UiEvent) {
        assert!(self.ui.try_enqueue(event.encode()));
    }

    fn push_hw(&mut self, event: HwEvent) {
        assert!(self.hw.try_enqueue(event.encode()));
    }

    /// Press the fire button and run until the driver acknowledges.
    fn start_firing(&mut self) {
        self.push_ui(UiEvent::FireButtonPressed);
        self.iterate(); // request lands in the driver
        self.iterate(); // acknowledgement processed
        assert!(self.service.flags().firing, "rig should be firing");
    }
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn startup_banner_is_emitted() {
    let mut rig = Rig::new();
    rig.service.start(&mut rig.console);
    assert!(rig.console.printed("Hi! This is the FogPen."));
    assert_eq!(rig.service.state(), DeviceState::On);
}

// ── Firing (scenario A) ───────────────────────────────────────

#[test]
fn fire_button_engages_coil_and_indicator() {
    let mut rig = Rig::new();
    rig.push_ui(UiEvent::FireButtonPressed);
    rig.iterate();
    assert_eq!(rig.board.count(BoardCall::RequestFireOn), 1);
    assert!(
        !rig.service.flags().firing,
        "firing waits for the driver acknowledgement"
    );

    rig.iterate();
    assert!(rig.service.flags().firing);
    assert_eq!(rig.service.pulse_counter(), 0);
    assert_eq!(
        rig.board.count(BoardCall::SetBrightness(
            rig.config.indicator_fire_brightness
        )),
        1
    );
}

#[test]
fn fire_button_release_disengages() {
    let mut rig = Rig::new();
    rig.start_firing();

    rig.push_ui(UiEvent::FireButtonReleased);
    rig.iterate();
    rig.iterate();
    assert!(!rig.service.flags().firing);
    assert_eq!(rig.service.pulse_counter(), 0);
    assert_eq!(rig.board.count(BoardCall::SetBrightness(0)), 1);
}

// ── Switch-off and awakening ──────────────────────────────────

#[test]
fn switch_off_enters_awakening_and_skips_cycle_count() {
    let mut rig = Rig::new();
    let before = rig.service.cycle_count();

    rig.push_ui(UiEvent::SwitchOff);
    rig.iterate();

    assert_eq!(rig.service.state(), DeviceState::Awakening);
    assert_eq!(rig.board.sleep_count, 1);
    assert_eq!(rig.board.count(BoardCall::RequestFireOff), 1);
    assert_eq!(rig.board.count(BoardCall::PowerDown), 1);
    assert_eq!(rig.board.count(BoardCall::SetBrightness(0)), 1);
    assert!(rig.console.printed("DOWN"));
    assert_eq!(
        rig.service.cycle_count(),
        before,
        "the switch-off iteration must not count"
    );
}

#[test]
fn awakening_switch_on_powers_back_up() {
    let mut rig = Rig::new();
    rig.push_ui(UiEvent::SwitchOff);
    rig.iterate();

    rig.push_ui(UiEvent::SwitchOn);
    rig.iterate();
    assert_eq!(rig.service.state(), DeviceState::On);
    assert_eq!(rig.board.count(BoardCall::PowerUp), 1);
    assert!(rig.console.printed("DEVICE UP"));
}

#[test]
fn awakening_abort_goes_back_to_sleep() {
    let mut rig = Rig::new();
    rig.push_ui(UiEvent::SwitchOff);
    rig.iterate();
    assert_eq!(rig.board.sleep_count, 1);

    rig.push_ui(UiEvent::AbortAwakening);
    rig.iterate();
    assert_eq!(rig.service.state(), DeviceState::Awakening);
    assert_eq!(rig.board.sleep_count, 2);
    assert!(rig.console.printed("DOWN AGAIN"));
}

#[test]
fn awakening_ignores_everything_else() {
    let mut rig = Rig::new();
    rig.push_ui(UiEvent::SwitchOff);
    rig.iterate();
    let calls_after_shutdown = rig.board.calls.len();

    for event in [
        UiEvent::FireButtonPressed,
        UiEvent::FireButtonReleased,
        UiEvent::PulseTick50ms,
    ] {
        rig.push_ui(event);
        rig.iterate();
    }
    assert_eq!(rig.service.state(), DeviceState::Awakening);
    assert_eq!(rig.board.calls.len(), calls_after_shutdown);
}

// ── Pulse bookkeeping (scenario B) ────────────────────────────

#[test]
fn four_pulses_while_firing_trigger_one_measurement() {
    let mut rig = Rig::new();
    rig.start_firing();

    for _ in 0..4 {
        rig.push_ui(UiEvent::PulseTick50ms);
        rig.iterate();
    }
    assert_eq!(rig.board.count(BoardCall::RequestMeasurement), 1);
    assert_eq!(rig.service.pulse_counter(), 0);
}

#[test]
fn three_pulses_are_not_enough() {
    let mut rig = Rig::new();
    rig.start_firing();

    for _ in 0..3 {
        rig.push_ui(UiEvent::PulseTick50ms);
        rig.iterate();
    }
    assert_eq!(rig.board.count(BoardCall::RequestMeasurement), 0);
    assert_eq!(rig.service.pulse_counter(), 3);
}

#[test]
fn fire_off_resets_the_pulse_run() {
    let mut rig = Rig::new();
    rig.start_firing();

    for _ in 0..3 {
        rig.push_ui(UiEvent::PulseTick50ms);
        rig.iterate();
    }
    rig.push_ui(UiEvent::FireButtonReleased);
    rig.iterate();
    rig.iterate();
    assert_eq!(rig.service.pulse_counter(), 0);

    // No longer firing, so pulses free-run without measurements.
    for _ in 0..6 {
        rig.push_ui(UiEvent::PulseTick50ms);
        rig.iterate();
    }
    assert_eq!(rig.board.count(BoardCall::RequestMeasurement), 0);
}

#[test]
fn pulses_while_idle_request_nothing() {
    let mut rig = Rig::new();
    for _ in 0..10 {
        rig.push_ui(UiEvent::PulseTick50ms);
        rig.iterate();
    }
    assert_eq!(rig.board.count(BoardCall::RequestMeasurement), 0);
}

// ── Battery safety (scenario C) ───────────────────────────────

#[test]
fn battery_at_threshold_forces_switch_off() {
    let mut rig = Rig::new();
    rig.start_firing();

    rig.push_hw(HwEvent::BatteryMeasured(rig.config.battery_stop_level));
    rig.iterate();

    assert!(!rig.service.flags().firing, "cutoff must clear firing at once");
    assert_eq!(
        rig.service.battery_under_load(),
        rig.config.battery_stop_level
    );
    assert_eq!(rig.board.count(BoardCall::RequestFireOff), 1);

    // The forced logical switch-off runs the ordinary shutdown path.
    rig.iterate();
    assert_eq!(rig.service.state(), DeviceState::Awakening);
    assert_eq!(rig.board.sleep_count, 1);
    assert_eq!(rig.board.count(BoardCall::PowerDown), 1);
}

#[test]
fn battery_above_threshold_keeps_firing() {
    let mut rig = Rig::new();
    rig.start_firing();

    rig.push_hw(HwEvent::BatteryMeasured(rig.config.battery_stop_level + 1));
    rig.iterate();
    assert!(rig.service.flags().firing);
    assert_eq!(rig.service.state(), DeviceState::On);
    assert_eq!(
        rig.service.battery_under_load(),
        rig.config.battery_stop_level + 1
    );
}

#[test]
fn cutoff_overrides_pending_ui_events() {
    let mut rig = Rig::new();
    rig.start_firing();

    // A pending fire press must not outrank the cutoff.
    rig.push_ui(UiEvent::FireButtonPressed);
    rig.push_hw(HwEvent::BatteryMeasured(1));
    rig.iterate();
    assert!(!rig.service.flags().firing);

    rig.iterate();
    assert_eq!(rig.service.state(), DeviceState::Awakening);
}

#[test]
fn reading_while_not_firing_is_not_recorded() {
    let mut rig = Rig::new();
    rig.push_hw(HwEvent::BatteryMeasured(12));
    rig.iterate();
    assert_eq!(rig.service.battery_under_load(), 0);
    assert_eq!(rig.service.state(), DeviceState::On);
    assert_eq!(rig.board.count(BoardCall::RequestFireOff), 0);
}

// ── Verbose echo (scenario D) ─────────────────────────────────

#[test]
fn verbose_echo_prints_reading_without_safety_action() {
    let mut rig = Rig::new();
    rig.console.type_line("p bvm on");
    rig.iterate();

    rig.push_hw(HwEvent::BatteryMeasured(50));
    rig.iterate();

    assert!(rig.console.printed("BVM: 50"));
    assert_eq!(rig.service.state(), DeviceState::On);
    assert!(!rig.service.flags().firing);
    assert_eq!(rig.board.count(BoardCall::RequestFireOff), 0);
}

#[test]
fn cutoff_still_runs_with_verbose_echo_enabled() {
    let mut rig = Rig::new();
    rig.start_firing();
    rig.console.type_line("p bvm on");
    rig.iterate();

    rig.push_hw(HwEvent::BatteryMeasured(10));
    rig.iterate();

    assert!(!rig.service.flags().firing);
    assert!(rig.console.printed("BVM: 10"));
}

// ── Cycle counting ────────────────────────────────────────────

#[test]
fn cycle_counter_increments_every_on_iteration() {
    let mut rig = Rig::new();
    for _ in 0..5 {
        rig.iterate();
    }
    assert_eq!(rig.service.cycle_count(), 5);
}

// ── Full loop with the real dispatcher and recognizer ────────

#[test]
fn five_clicks_from_the_button_shut_the_device_down() {
    use fogpen::button::ClickRecognizer;
    use fogpen::events::LowLevelEvent;
    use fogpen::input::InputDispatcher;

    let mut rig = Rig::new();
    let low = EventQueue::new();
    let mut input = InputDispatcher::new(ClickRecognizer::new());

    // Five press/release pairs delivered as debounced low-level events.
    for _ in 0..5 {
        assert!(low.try_enqueue(LowLevelEvent::SwitchPressed(0).encode()));
        assert!(low.try_enqueue(LowLevelEvent::SwitchReleased(0).encode()));
    }

    // Drive the real main-loop sequence until the queues settle.
    for _ in 0..16 {
        input.poll(&low, &rig.ui);
        rig.iterate();
        input.set_device_on(rig.service.state() == DeviceState::On);
    }

    assert_eq!(rig.service.state(), DeviceState::Awakening);
    assert_eq!(rig.board.sleep_count, 1);
    assert!(rig.console.printed("DOWN"));
}
