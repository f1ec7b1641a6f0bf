//! Channel data model.
//!
//! A channel is one independent sensing path (bus side or battery side)
//! with its own voltage / current / power / energy state.  Each field has
//! exactly one writer: the [`ChannelReader`](crate::monitor::reader::ChannelReader)
//! owns voltage, current and power; the
//! [`EnergyIntegrator`](crate::monitor::integrator::EnergyIntegrator) owns
//! energy.  Both run on the main loop, so no locking is needed.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Number of sensing channels on the board.
pub const CHANNEL_COUNT: usize = 2;

/// Identifies a sensing channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ChannelId {
    /// Supply bus side.
    Bus = 0,
    /// Battery side.
    Battery = 1,
}

impl ChannelId {
    /// All channels, in sampling and transmit order.
    pub const ALL: [ChannelId; CHANNEL_COUNT] = [ChannelId::Bus, ChannelId::Battery];

    /// Array index for per-channel tables.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short tag used in logs and the status report.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Bus => "BUS",
            Self::Battery => "BAT",
        }
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Engineering-unit state of one channel.
///
/// Created zeroed at startup and never destroyed.  `energy_mwh` only ever
/// grows; the wire encoder is responsible for rolling it over.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Channel {
    /// Bus voltage (mV, signed).
    pub voltage_mv: f32,
    /// Shunt current (mA, signed; negative = reverse flow).
    pub current_ma: f32,
    /// Power (mW, non-negative).
    pub power_mw: f32,
    /// Energy accumulated since startup (mWh, non-negative).
    pub energy_mwh: f64,
}

impl Channel {
    pub const fn new() -> Self {
        Self {
            voltage_mv: 0.0,
            current_ma: 0.0,
            power_mw: 0.0,
            energy_mwh: 0.0,
        }
    }
}
