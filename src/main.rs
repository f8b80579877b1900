//! FogPen Firmware — Main Entry Point
//!
//! Two execution contexts, one shared mechanism:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  esp_timer task (10 ms tick)                                 │
//! │     DebounceSampler ──▶ low-level event queue                │
//! ├──────────────────────────────────────────────────────────────┤
//! │  main task (cooperative loop)                                │
//! │     InputDispatcher ──▶ UI event queue ──▶ ControlService    │
//! │     FireDriver      ──▶ HW event queue ──▶      │            │
//! │     UartConsole     ◀──────────────────────────-┘            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The queues are the only state crossing the boundary; everything else
//! is owned by exactly one context.

#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
mod app;
mod board;
mod button;
mod config;
mod debounce;
mod drivers;
mod events;
mod input;
mod pins;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::info;

use app::ports::ActuatorPort;
use app::service::{ControlService, DeviceState};
use board::Board;
use button::ClickRecognizer;
use config::DeviceConfig;
use drivers::console::UartConsole;
use events::{HW_EVENTS, LOW_LEVEL_EVENTS, UI_EVENTS};
use input::InputDispatcher;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("FogPen v{} booting", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        log::error!("HAL init failed: {e} — halting");
        #[allow(clippy::empty_loop)]
        loop {}
    }

    let config = DeviceConfig::default();
    drivers::hw_timer::start_tick_timer(config.tick_interval_ms);

    // ── 3. Wiring ─────────────────────────────────────────────
    let mut board = Board::new();
    let mut console = UartConsole::new();
    let mut input = InputDispatcher::new(ClickRecognizer::new());
    let mut service = ControlService::new(config);

    service.start(&mut console);
    info!("system ready, entering main loop");

    // ── 4. Main loop ──────────────────────────────────────────
    loop {
        // UI gets its cycle, then the hardware, then the decision engine.
        input.poll(&LOW_LEVEL_EVENTS, &UI_EVENTS);
        board.step(&HW_EVENTS);
        service.iterate(&UI_EVENTS, &HW_EVENTS, &mut board, &mut console);

        // Keep the recognizer's power notion in lockstep with the core;
        // this also covers the forced safety switch-off.
        input.set_device_on(service.state() == DeviceState::On);
    }
}
