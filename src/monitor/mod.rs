//! Sampling-and-integration core.
//!
//! ```text
//!  SensorPort ──▶ ChannelReader ──▶ Channel ──▶ EnergyIntegrator
//!                                      │
//!                                      ▼
//!                               frame::encode ──▶ TransportPort
//! ```
//!
//! Everything here is pure or works through port traits, so the whole
//! pipeline runs on the host under test.

pub mod frame;
pub mod integrator;
pub mod reader;
