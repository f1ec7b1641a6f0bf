//! Unified error types for the PowerMon firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level loop's error handling uniform.  All variants are `Copy` so they
//! can be passed through the service and the diagnostics counters without
//! allocation.
//!
//! None of these errors stop the node: the service logs them, bumps a
//! counter and keeps running on the last good values.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be initialised or read.
    Sensor(SensorError),
    /// A telemetry frame could not be handed to the bus.
    Transport(TransportError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// I²C transaction failed (NACK, arbitration loss, bus fault).
    Bus,
    /// The sensor flagged an arithmetic overflow in its power/current engine.
    MathOverflow,
    /// The channel was never successfully initialised.
    NotInitialized,
    /// The conversion-ready flag did not assert within the poll budget.
    ConversionTimeout,
    /// Shunt resistance is zero or too small to calibrate against.
    InvalidShunt,
    /// The device at the configured address is not the expected part.
    UnexpectedDevice,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "I2C bus error"),
            Self::MathOverflow => write!(f, "math overflow"),
            Self::NotInitialized => write!(f, "not initialised"),
            Self::ConversionTimeout => write!(f, "conversion-ready timeout"),
            Self::InvalidShunt => write!(f, "invalid shunt resistance"),
            Self::UnexpectedDevice => write!(f, "unexpected device id"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// No free transmit slot right now.  The frame is dropped, not queued.
    Busy,
    /// The controller rejected the frame (bus-off, invalid id, driver error).
    Bus,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => write!(f, "transmit queue full"),
            Self::Bus => write!(f, "bus error"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
