//! Click-pattern recognizer for the single control button.
//!
//! One momentary button carries every user intent, distinguished by
//! timing:
//!
//! | Gesture                 | Condition                                 | Event            |
//! |-------------------------|-------------------------------------------|------------------|
//! | Fire press              | hold ≥ 2 steps (100 ms) while device on   | `Pressed`        |
//! | Fire release            | release after a fire press                | `Released`       |
//! | Click                   | one short click, window expires           | `Click`          |
//! | Power toggle            | 5 clicks, each gap ≤ 8 steps (400 ms)     | `SwitchOn`/`Off` |
//! | Abort wake-up           | pattern while off expires incomplete      | `AbortAwakening` |
//!
//! Timing is driven exclusively by [`step`](ClickRecognizer::step) at the
//! 50 ms pulse cadence, keeping the recognizer deterministic and clock-free.
//! Semantic events travel through an internal event queue and are drained
//! one per dispatch cycle.

use crate::events::EventQueue;
use crate::input::{ButtonEvent, ButtonRecognizer};

/// Steps a hold must last before it counts as a fire press (2 × 50 ms).
const HOLD_STEPS: u8 = 2;
/// Steps after a release before the click pattern times out (8 × 50 ms).
const CLICK_WINDOW_STEPS: u8 = 8;
/// Clicks that complete the power on/off toggle pattern.
const SWITCH_CLICKS: u8 = 5;

/// Stateful recognizer turning debounced edges into semantic events.
pub struct ClickRecognizer {
    /// Mirror of the control core's power state; decides whether a
    /// completed pattern means on or off, and whether holds fire.
    device_on: bool,
    down: bool,
    down_steps: u8,
    press_emitted: bool,
    clicks: u8,
    gap_steps: u8,
    events: EventQueue,
}

impl ClickRecognizer {
    pub fn new() -> Self {
        Self {
            device_on: true, // the device boots switched on
            down: false,
            down_steps: 0,
            press_emitted: false,
            clicks: 0,
            gap_steps: 0,
            events: EventQueue::new(),
        }
    }

    fn emit(&mut self, event: ButtonEvent) {
        self.events.try_enqueue(event.encode());
    }

    fn complete_toggle(&mut self) {
        if self.device_on {
            self.emit(ButtonEvent::SwitchOff);
            self.device_on = false;
        } else {
            self.emit(ButtonEvent::SwitchOn);
            self.device_on = true;
        }
        self.clicks = 0;
        self.gap_steps = 0;
    }
}

impl Default for ClickRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonRecognizer for ClickRecognizer {
    fn raw_pressed(&mut self) {
        self.down = true;
        self.down_steps = 0;
    }

    fn raw_released(&mut self) {
        self.down = false;
        if self.press_emitted {
            self.emit(ButtonEvent::Released);
            self.press_emitted = false;
            self.clicks = 0;
            self.gap_steps = 0;
            return;
        }
        self.clicks += 1;
        self.gap_steps = 0;
        if self.clicks >= SWITCH_CLICKS {
            self.complete_toggle();
        }
    }

    fn step(&mut self) {
        if self.down {
            self.down_steps = self.down_steps.saturating_add(1);
            // A long hold while off is not a fire intent; it resolves as a
            // click (on release) or an abort (on timeout) instead.
            if self.down_steps >= HOLD_STEPS && !self.press_emitted && self.device_on {
                self.emit(ButtonEvent::Pressed);
                self.press_emitted = true;
                self.clicks = 0;
                self.gap_steps = 0;
            }
        } else if self.clicks > 0 {
            self.gap_steps = self.gap_steps.saturating_add(1);
            if self.gap_steps > CLICK_WINDOW_STEPS {
                if self.device_on {
                    if self.clicks == 1 {
                        self.emit(ButtonEvent::Click);
                    }
                    // 2-4 clicks: reserved, no event
                } else {
                    self.emit(ButtonEvent::AbortAwakening);
                }
                self.clicks = 0;
                self.gap_steps = 0;
            }
        }
    }

    fn poll_event(&mut self) -> Option<ButtonEvent> {
        self.events.try_dequeue().and_then(ButtonEvent::decode)
    }

    fn set_device_on(&mut self, on: bool) {
        if self.device_on != on {
            self.device_on = on;
            self.clicks = 0;
            self.gap_steps = 0;
            self.press_emitted = false;
        }
    }
}
