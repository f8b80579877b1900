//! Low-power mode — the one blocking primitive in the system.
//!
//! Light sleep suspends the main task and the tick timer until the button
//! line goes low.  There is no timeout and no cancellation: execution
//! resumes only on the wake condition, after which both contexts continue
//! where they stopped.

use crate::app::ports::SleepPort;

#[cfg(target_os = "espidf")]
use crate::pins;

pub struct LightSleep;

impl LightSleep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LightSleep {
    fn default() -> Self {
        Self::new()
    }
}

impl SleepPort for LightSleep {
    fn sleep_until_wake(&mut self) {
        #[cfg(target_os = "espidf")]
        {
            use esp_idf_svc::sys::*;
            log::info!("entering light sleep until button press");
            // SAFETY: one-shot sleep configuration from the main task; the
            // call blocks here and returns after the GPIO wake condition.
            unsafe {
                gpio_wakeup_enable(pins::BUTTON_GPIO, gpio_int_type_t_GPIO_INTR_LOW_LEVEL);
                esp_sleep_enable_gpio_wakeup();
                esp_light_sleep_start();
                gpio_wakeup_disable(pins::BUTTON_GPIO);
            }
            log::info!("woke from light sleep");
        }
        #[cfg(not(target_os = "espidf"))]
        log::info!("power(sim): light sleep skipped");
    }
}
