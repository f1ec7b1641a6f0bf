//! Channel reader.
//!
//! Pulls bus voltage, current and power from the sensor backend as raw
//! counts, converts them with the channel's [`Calibration`] and commits
//! each one to the [`Channel`] independently.  A failed quantity leaves its
//! field at the last good value; the other two still update.  No retries
//! here; the next read period is the retry.

use core::fmt;

use log::debug;

use crate::app::ports::SensorPort;
use crate::channel::{Channel, ChannelId};
use crate::error::SensorError;
use crate::sensors::Quantity;
use crate::sensors::calibration::Calibration;

/// Quantities that failed during one read pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadError {
    failures: heapless::Vec<(Quantity, SensorError), 3>,
}

impl ReadError {
    pub fn failures(&self) -> &[(Quantity, SensorError)] {
        &self.failures
    }

    pub fn failed(&self, quantity: Quantity) -> bool {
        self.failures.iter().any(|(q, _)| *q == quantity)
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (quantity, error)) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{quantity}: {error}")?;
        }
        Ok(())
    }
}

/// Reads one channel's sensor into its [`Channel`] state.
#[derive(Debug, Clone, Copy)]
pub struct ChannelReader {
    channel: ChannelId,
    calibration: Calibration,
}

impl ChannelReader {
    pub fn new(channel: ChannelId, calibration: Calibration) -> Self {
        Self {
            channel,
            calibration,
        }
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Read all three quantities and commit the ones that succeeded.
    ///
    /// Returns `Err` listing the failed quantities when any sub-read failed;
    /// successful ones have already been written to `state` by then.
    pub fn read(&self, sensor: &mut impl SensorPort, state: &mut Channel) -> Result<(), ReadError> {
        let mut failures = heapless::Vec::new();

        for quantity in Quantity::ALL {
            match sensor.read_raw(self.channel, quantity) {
                Ok(raw) => self.commit(quantity, raw, state),
                Err(e) => {
                    debug!("{}: {} read skipped ({})", self.channel, quantity, e);
                    // Capacity equals Quantity::ALL.len().
                    let _ = failures.push((quantity, e));
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ReadError { failures })
        }
    }

    fn commit(&self, quantity: Quantity, raw: u16, state: &mut Channel) {
        match quantity {
            Quantity::BusVoltage => state.voltage_mv = self.calibration.bus_voltage_mv(raw),
            Quantity::Current => state.current_ma = self.calibration.current_ma(raw),
            Quantity::Power => state.power_mw = self.calibration.power_mw(raw),
        }
    }
}
