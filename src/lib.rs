//! Dual-channel power monitor firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection.  All ESP-IDF-specific code is guarded by
//! `#[cfg(feature = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod alert;
pub mod app;
pub mod channel;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod monitor;
pub mod pins;
pub mod scheduler;
pub mod sensors;

// Adapters and drivers carry the target-specific code; their host
// builds fall back to simulation stubs.
pub mod adapters;
pub mod drivers;
