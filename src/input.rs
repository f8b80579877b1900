//! UI input dispatching — low-level events to semantic UI events.
//!
//! Runs once per main-loop iteration and drains at most one low-level
//! event and at most one recognizer event per call, so a burst of input
//! can never starve the rest of the loop.  Pure translation: this layer
//! holds no safety-relevant state.

use crate::events::{EventQueue, LowLevelEvent, QueueElement, UiEvent};

// ── Button recognizer port ────────────────────────────────────

/// Semantic events produced by a button recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    /// Sustained hold began (fire intent).
    Pressed,
    /// Hold ended.
    Released,
    /// A single short click (currently reserved).
    Click,
    /// Click pattern asking to switch the device on.
    SwitchOn,
    /// Click pattern asking to switch the device off.
    SwitchOff,
    /// Wake-up activity expired without a completed switch-on pattern.
    AbortAwakening,
}

const BTN_PRESSED: u8 = 1;
const BTN_RELEASED: u8 = 2;
const BTN_CLICK: u8 = 3;
const BTN_SWITCH_ON: u8 = 4;
const BTN_SWITCH_OFF: u8 = 5;
const BTN_ABORT_AWAKENING: u8 = 6;

impl ButtonEvent {
    pub fn encode(self) -> QueueElement {
        let code = match self {
            Self::Pressed => BTN_PRESSED,
            Self::Released => BTN_RELEASED,
            Self::Click => BTN_CLICK,
            Self::SwitchOn => BTN_SWITCH_ON,
            Self::SwitchOff => BTN_SWITCH_OFF,
            Self::AbortAwakening => BTN_ABORT_AWAKENING,
        };
        QueueElement { code, aux: 0 }
    }

    pub fn decode(element: QueueElement) -> Option<Self> {
        match element.code {
            BTN_PRESSED => Some(Self::Pressed),
            BTN_RELEASED => Some(Self::Released),
            BTN_CLICK => Some(Self::Click),
            BTN_SWITCH_ON => Some(Self::SwitchOn),
            BTN_SWITCH_OFF => Some(Self::SwitchOff),
            BTN_ABORT_AWAKENING => Some(Self::AbortAwakening),
            _ => None,
        }
    }
}

/// Port for the click-pattern recognizer.
///
/// The dispatcher feeds it raw debounced edges plus the 50 ms timing step
/// and drains its semantic events; it owns click/press semantics entirely.
pub trait ButtonRecognizer {
    /// A debounced press edge arrived.
    fn raw_pressed(&mut self);
    /// A debounced release edge arrived.
    fn raw_released(&mut self);
    /// Advance internal timing; called on every 50 ms pulse so click
    /// timeouts stay synchronized with the rest of the system.
    fn step(&mut self);
    /// Drain at most one pending semantic event.
    fn poll_event(&mut self) -> Option<ButtonEvent>;
    /// Resynchronize the recognizer's notion of device power, e.g. after
    /// a forced safety shutdown.
    fn set_device_on(&mut self, on: bool);
}

// ── Dispatcher ────────────────────────────────────────────────

/// Translates low-level and recognizer events into UI events.
pub struct InputDispatcher<R: ButtonRecognizer> {
    recognizer: R,
}

impl<R: ButtonRecognizer> InputDispatcher<R> {
    pub fn new(recognizer: R) -> Self {
        Self { recognizer }
    }

    /// One dispatch cycle: at most one low-level event, then at most one
    /// recognizer event.  Non-blocking.
    pub fn poll(&mut self, low_level: &EventQueue, ui: &EventQueue) {
        if let Some(element) = low_level.try_dequeue() {
            match LowLevelEvent::decode(element) {
                Some(LowLevelEvent::SwitchPressed(_)) => self.recognizer.raw_pressed(),
                Some(LowLevelEvent::SwitchReleased(_)) => self.recognizer.raw_released(),
                Some(LowLevelEvent::PulseTick) => {
                    ui.try_enqueue(UiEvent::PulseTick50ms.encode());
                    self.recognizer.step();
                }
                None => {}
            }
        }

        if let Some(event) = self.recognizer.poll_event() {
            let mapped = match event {
                ButtonEvent::Pressed => Some(UiEvent::FireButtonPressed),
                ButtonEvent::Released => Some(UiEvent::FireButtonReleased),
                // A click sequence has no UI-level effect yet.
                ButtonEvent::Click => None,
                ButtonEvent::SwitchOn => Some(UiEvent::SwitchOn),
                ButtonEvent::SwitchOff => Some(UiEvent::SwitchOff),
                ButtonEvent::AbortAwakening => Some(UiEvent::AbortAwakening),
            };
            if let Some(ui_event) = mapped {
                ui.try_enqueue(ui_event.encode());
            }
        }
    }

    /// Pass the control core's power state down to the recognizer.
    pub fn set_device_on(&mut self, on: bool) {
        self.recognizer.set_device_on(on);
    }
}
