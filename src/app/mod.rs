//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the control rules for the FogPen: the power state
//! machine, the firing/battery-safety interlock, and the developer console
//! dispatch.  All interaction with hardware happens through **port traits**
//! defined in [`ports`], keeping this layer fully testable without real
//! peripherals.

pub mod commands;
pub mod ports;
pub mod service;
