//! Sensor backend, indicator and peripheral bring-up drivers.

pub mod heartbeat;
pub mod hw_init;
pub mod ina226;
