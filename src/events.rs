//! Event transport between the tick context and the main loop.
//!
//! Events are produced by:
//! - the 10 ms debounce tick (switch edges, 50 ms pulse)
//! - the hardware driver (fire acknowledgements, battery readings)
//! - the button recognizer (semantic press/click events)
//!
//! Each queue carries events one way, from exactly one producer context to
//! exactly one consumer context:
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────┐
//! │ 10ms tick    │────▶│ low-level queue    │────▶│              │
//! │ (timer task) │     │ (lock-free SPSC)   │     │  Main loop   │
//! └──────────────┘     ├───────────────────┤     │              │
//!   dispatcher    ────▶│ UI event queue     │────▶│              │
//!   fire driver   ────▶│ HW event queue     │────▶│              │
//!                      └───────────────────┘     └──────────────┘
//! ```
//!
//! The queues are the *only* state shared between the tick context and the
//! main loop; everything else is owned by exactly one context.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU8, Ordering};

/// Unread elements a queue can hold.
pub const QUEUE_CAPACITY: usize = 5;

/// Ring slots; one slot is kept empty to tell full from empty.
const QUEUE_SLOTS: usize = QUEUE_CAPACITY + 1;

/// A single queued event: an event code plus one byte of payload
/// (switch index, measured voltage).  Copied by value; never mutated
/// after enqueue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueElement {
    pub code: u8,
    pub aux: u8,
}

impl QueueElement {
    pub const EMPTY: Self = Self { code: 0, aux: 0 };
}

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// One context writes (produces), another reads (consumes).  Separate
// atomic head/tail indices advance independently, so neither side ever
// blocks or disables interrupts.  The buffer lives behind an UnsafeCell
// so queue instances can be placed in statics and shared with the
// tick context.

/// Bounded single-producer / single-consumer event queue.
///
/// Contract: exactly one context calls [`try_enqueue`](Self::try_enqueue)
/// and exactly one context calls [`try_dequeue`](Self::try_dequeue) for the
/// lifetime of the queue.  A queue with two writer or two reader contexts
/// is outside the contract.
///
/// Overflow policy: drop-newest.  A full queue rejects the incoming
/// element and leaves the buffered ones untouched; overwriting could
/// discard a still-unread release event paired with an already-delivered
/// press, desynchronizing the coil.
pub struct EventQueue {
    /// Producer index — next slot to write.
    head: AtomicU8,
    /// Consumer index — next slot to read.
    tail: AtomicU8,
    slots: UnsafeCell<[QueueElement; QUEUE_SLOTS]>,
}

// SAFETY: the head/tail atomics enforce the SPSC discipline.  The producer
// writes a slot strictly before publishing it via the Release store to
// `head`; the consumer reads `head` with Acquire before touching the slot
// and only releases it afterwards via `tail`.  With one producer context
// and one consumer context, no slot is ever accessed concurrently.
unsafe impl Sync for EventQueue {}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            head: AtomicU8::new(0),
            tail: AtomicU8::new(0),
            slots: UnsafeCell::new([QueueElement::EMPTY; QUEUE_SLOTS]),
        }
    }

    /// Push an element.  Safe to call from the tick context (lock-free).
    /// Returns `false` if the queue is full (element dropped).
    pub fn try_enqueue(&self, element: QueueElement) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        let next_head = (head + 1) % QUEUE_SLOTS as u8;

        if next_head == tail {
            return false; // Queue full — drop the newest element.
        }

        // SAFETY: `head` is owned by the single producer; the consumer will
        // not read this slot until the Release store below publishes it.
        unsafe {
            (*self.slots.get())[head as usize] = element;
        }

        self.head.store(next_head, Ordering::Release);
        true
    }

    /// Pop the oldest unread element, or `None` if the queue is empty.
    pub fn try_dequeue(&self) -> Option<QueueElement> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        if tail == head {
            return None; // Empty.
        }

        // SAFETY: `tail` is owned by the single consumer; the Acquire load
        // of `head` above guarantees the producer's write is visible.
        let element = unsafe { (*self.slots.get())[tail as usize] };
        self.tail.store((tail + 1) % QUEUE_SLOTS as u8, Ordering::Release);

        Some(element)
    }

    pub fn is_empty(&self) -> bool {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        tail == head
    }

    /// Number of unread elements.
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Relaxed) as usize;
        let tail = self.tail.load(Ordering::Relaxed) as usize;
        (head + QUEUE_SLOTS - tail) % QUEUE_SLOTS
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ── Static queue instances ────────────────────────────────────
//
// The target build wires these into the timer callback and the main loop.
// Tests construct their own local queues instead.

/// Tick context → input dispatcher.
pub static LOW_LEVEL_EVENTS: EventQueue = EventQueue::new();
/// Input dispatcher → control service.
pub static UI_EVENTS: EventQueue = EventQueue::new();
/// Fire driver → control service.
pub static HW_EVENTS: EventQueue = EventQueue::new();

// ── Low-level events (produced by the debounce sampler) ───────

const LLE_SWITCH_PRESSED: u8 = 1;
const LLE_SWITCH_RELEASED: u8 = 2;
const LLE_PULSE_TICK: u8 = 3;

/// Raw, hardware-adjacent occurrences emitted by the tick context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LowLevelEvent {
    /// A switch settled into the pressed state; payload is the switch index.
    SwitchPressed(u8),
    /// A switch settled into the released state; payload is the switch index.
    SwitchReleased(u8),
    /// Fires every 5th tick (50 ms cadence).
    PulseTick,
}

impl LowLevelEvent {
    pub fn encode(self) -> QueueElement {
        match self {
            Self::SwitchPressed(idx) => QueueElement { code: LLE_SWITCH_PRESSED, aux: idx },
            Self::SwitchReleased(idx) => QueueElement { code: LLE_SWITCH_RELEASED, aux: idx },
            Self::PulseTick => QueueElement { code: LLE_PULSE_TICK, aux: 0 },
        }
    }

    pub fn decode(element: QueueElement) -> Option<Self> {
        match element.code {
            LLE_SWITCH_PRESSED => Some(Self::SwitchPressed(element.aux)),
            LLE_SWITCH_RELEASED => Some(Self::SwitchReleased(element.aux)),
            LLE_PULSE_TICK => Some(Self::PulseTick),
            _ => None,
        }
    }
}

// ── UI events (produced by the input dispatcher) ──────────────

const UI_SWITCH_ON: u8 = 1;
const UI_SWITCH_OFF: u8 = 2;
const UI_ABORT_AWAKENING: u8 = 3;
const UI_FIRE_BUTTON_PRESSED: u8 = 4;
const UI_FIRE_BUTTON_RELEASED: u8 = 5;
const UI_PULSE_50MS: u8 = 6;

/// Semantic, main-loop-facing occurrences derived from low-level and
/// button-recognizer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// User asked to switch the device on.
    SwitchOn,
    /// User asked to switch the device off.
    SwitchOff,
    /// Wake-up attempt expired without a switch-on; go back to sleep.
    AbortAwakening,
    /// Sustained hold on the fire button started.
    FireButtonPressed,
    /// Fire button released.
    FireButtonReleased,
    /// 50 ms cadence, relayed from the tick context.
    PulseTick50ms,
}

impl UiEvent {
    pub fn encode(self) -> QueueElement {
        let code = match self {
            Self::SwitchOn => UI_SWITCH_ON,
            Self::SwitchOff => UI_SWITCH_OFF,
            Self::AbortAwakening => UI_ABORT_AWAKENING,
            Self::FireButtonPressed => UI_FIRE_BUTTON_PRESSED,
            Self::FireButtonReleased => UI_FIRE_BUTTON_RELEASED,
            Self::PulseTick50ms => UI_PULSE_50MS,
        };
        QueueElement { code, aux: 0 }
    }

    pub fn decode(element: QueueElement) -> Option<Self> {
        match element.code {
            UI_SWITCH_ON => Some(Self::SwitchOn),
            UI_SWITCH_OFF => Some(Self::SwitchOff),
            UI_ABORT_AWAKENING => Some(Self::AbortAwakening),
            UI_FIRE_BUTTON_PRESSED => Some(Self::FireButtonPressed),
            UI_FIRE_BUTTON_RELEASED => Some(Self::FireButtonReleased),
            UI_PULSE_50MS => Some(Self::PulseTick50ms),
            _ => None,
        }
    }
}

// ── HW events (produced by the fire driver) ───────────────────

const HW_FIRE_ON: u8 = 1;
const HW_FIRE_OFF: u8 = 2;
const HW_BATTERY_MEASURED: u8 = 3;

/// Occurrences reported by the actuator driver and battery sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwEvent {
    /// The coil is now engaged.
    FireOn,
    /// The coil is now disengaged.
    FireOff,
    /// A single-shot conversion finished; payload is the 8-bit
    /// under-load battery reading.
    BatteryMeasured(u8),
}

impl HwEvent {
    pub fn encode(self) -> QueueElement {
        match self {
            Self::FireOn => QueueElement { code: HW_FIRE_ON, aux: 0 },
            Self::FireOff => QueueElement { code: HW_FIRE_OFF, aux: 0 },
            Self::BatteryMeasured(v) => QueueElement { code: HW_BATTERY_MEASURED, aux: v },
        }
    }

    pub fn decode(element: QueueElement) -> Option<Self> {
        match element.code {
            HW_FIRE_ON => Some(Self::FireOn),
            HW_FIRE_OFF => Some(Self::FireOff),
            HW_BATTERY_MEASURED => Some(Self::BatteryMeasured(element.aux)),
            _ => None,
        }
    }
}
