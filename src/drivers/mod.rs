//! Hardware drivers.
//!
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module; on host targets the same modules compile against
//! in-memory stubs so the driver state machines stay testable.

pub mod console;
pub mod fire;
pub mod hw_init;
pub mod hw_timer;
pub mod indicator;
pub mod power;
