//! Periodic 10 ms tick driving the debounce sampler.
//!
//! Uses ESP-IDF's esp_timer API.  The callback executes in the esp_timer
//! task — a context that preempts the main loop — so everything it touches
//! is either private to this module or the lock-free low-level event
//! queue.  A new tick cannot re-enter a still-running callback; esp_timer
//! serializes dispatches on its own task.

#[cfg(target_os = "espidf")]
use crate::debounce::DebounceSampler;
#[cfg(target_os = "espidf")]
use crate::events::LOW_LEVEL_EVENTS;
#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

/// Debounce state, private to the tick context.
///
/// SAFETY: touched exclusively from `tick_cb`, which esp_timer invokes
/// serially on its dispatch task.  The main loop never references it.
#[cfg(target_os = "espidf")]
static mut TICK_SAMPLER: DebounceSampler = DebounceSampler::new(pins::SWITCH_MASK);

#[cfg(target_os = "espidf")]
static mut TICK_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// SAFETY: TICK_TIMER is written once in `start_tick_timer()` before any
/// callback fires.  Only called from the single main task.
#[cfg(target_os = "espidf")]
unsafe fn tick_timer() -> esp_timer_handle_t {
    unsafe { TICK_TIMER }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tick_cb(_arg: *mut core::ffi::c_void) {
    // Raw input image: pull-ups read high, a pressed button drives low.
    let mut raw: u8 = 0xFF;
    if !crate::drivers::hw_init::gpio_read(pins::BUTTON_GPIO) {
        raw &= !pins::SWITCH_MASK;
    }
    // SAFETY: TICK_SAMPLER contract above — this is its only access site.
    unsafe {
        let sampler = &raw mut TICK_SAMPLER;
        (*sampler).on_tick(raw, &LOW_LEVEL_EVENTS);
    }
}

/// Start the periodic debounce tick.
#[cfg(target_os = "espidf")]
pub fn start_tick_timer(period_ms: u32) {
    // SAFETY: TICK_TIMER is written here once at boot from the single
    // main-task context before any callback fires.  The callback itself
    // only touches TICK_SAMPLER and the lock-free queue.
    unsafe {
        let args = esp_timer_create_args_t {
            callback: Some(tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"tick\0".as_ptr().cast(),
            skip_unhandled_events: true,
        };
        let ret = esp_timer_create(&args, &raw mut TICK_TIMER);
        if ret != ESP_OK {
            log::error!("hw_timer: tick timer create failed (rc={ret}) — no input without it");
            return;
        }
        let ret = esp_timer_start_periodic(TICK_TIMER, u64::from(period_ms) * 1_000);
        if ret != ESP_OK {
            log::error!("hw_timer: tick timer start failed (rc={ret})");
            return;
        }
        info!("hw_timer: {period_ms} ms debounce tick started");
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn start_tick_timer(_period_ms: u32) {
    log::info!("hw_timer(sim): tick timer not started");
}

/// Stop the periodic tick.
#[cfg(target_os = "espidf")]
pub fn stop_tick_timer() {
    // SAFETY: tick_timer() contract — main task only; null-check guards
    // against a failed start.
    unsafe {
        let t = tick_timer();
        if !t.is_null() {
            esp_timer_stop(t);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn stop_tick_timer() {}
