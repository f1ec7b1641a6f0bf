//! Sensor-side helpers shared by the service and the sensor backends.
//!
//! The register-level driver lives in [`crate::drivers::ina226`]; this
//! module holds what the domain needs to know about a current/voltage/power
//! monitor without knowing its register map.

pub mod calibration;

use core::fmt;

/// A quantity the sensor backend can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    BusVoltage,
    Current,
    Power,
}

impl Quantity {
    /// Read order used by the channel reader.
    pub const ALL: [Quantity; 3] = [Quantity::BusVoltage, Quantity::Current, Quantity::Power];
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusVoltage => write!(f, "bus voltage"),
            Self::Current => write!(f, "current"),
            Self::Power => write!(f, "power"),
        }
    }
}
