//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the monitor's orchestration: channel bring-up,
//! the periodic sample / transmit / report tasks and alert intake.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
