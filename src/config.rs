//! Deployment configuration.
//!
//! Every value that differs between installations lives here: task periods,
//! CAN identifiers, shunt resistances, alert thresholds and the sensor's
//! conversion settings.  The binary embeds `monitor.json` and falls back to
//! [`MonitorConfig::default()`] when it is missing or invalid.

use serde::{Deserialize, Serialize};

use crate::alert::AlertKind;
use crate::channel::{CHANNEL_COUNT, ChannelId};
use crate::drivers::ina226::Ina226Settings;
use crate::error::Error;
use crate::sensors::calibration::Calibration;

/// Highest 11-bit (standard) CAN identifier.
pub const MAX_STANDARD_ID: u16 = 0x7FF;

/// Optional hardware alert on one channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertLimit {
    pub kind: AlertKind,
    /// Threshold in mA (shunt kinds), mV (bus kinds) or mW (power).
    pub value: f32,
}

/// Per-channel parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// CAN identifier of this channel's telemetry frame.
    pub frame_id: u16,
    /// Shunt resistance (Ω).
    pub shunt_ohm: f32,
    #[serde(default)]
    pub alert: Option<AlertLimit>,
}

/// Core monitor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    // --- Timing ---
    /// Sensor read + energy integration period (ms)
    pub read_period_ms: u32,
    /// Telemetry transmit + heartbeat period (ms)
    pub transmit_period_ms: u32,
    /// Status report period (ms)
    pub report_period_ms: u32,

    // --- Channels (indexed by ChannelId) ---
    pub channels: [ChannelConfig; CHANNEL_COUNT],

    // --- Sensor ---
    #[serde(default)]
    pub sensor: Ina226Settings,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            read_period_ms: 50,      // 20 Hz
            transmit_period_ms: 500, // 2 Hz, heartbeat at 1 Hz
            report_period_ms: 1000,  // 1 Hz

            channels: [
                ChannelConfig {
                    frame_id: 0x300,
                    shunt_ohm: 0.004,
                    alert: None,
                },
                ChannelConfig {
                    frame_id: 0x301,
                    shunt_ohm: 0.004,
                    alert: None,
                },
            ],

            sensor: Ina226Settings::default(),
        }
    }
}

impl MonitorConfig {
    pub fn channel(&self, id: ChannelId) -> &ChannelConfig {
        &self.channels[id.index()]
    }

    /// Parse a JSON deployment file and validate it.
    pub fn from_json(bytes: &[u8]) -> Result<Self, Error> {
        let config: Self =
            serde_json::from_slice(bytes).map_err(|_| Error::Config("malformed JSON"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the scheduler or the bus cannot honour.
    pub fn validate(&self) -> Result<(), Error> {
        if self.read_period_ms == 0 || self.transmit_period_ms == 0 || self.report_period_ms == 0
        {
            return Err(Error::Config("task periods must be non-zero"));
        }
        if self.transmit_period_ms < self.read_period_ms {
            return Err(Error::Config("transmit period shorter than read period"));
        }

        for ch in &self.channels {
            if ch.frame_id > MAX_STANDARD_ID {
                return Err(Error::Config("frame id exceeds 11-bit range"));
            }
            if Calibration::for_shunt(ch.shunt_ohm).is_err() {
                return Err(Error::Config("shunt resistance out of range"));
            }
            if let Some(alert) = ch.alert {
                if !alert.value.is_finite() {
                    return Err(Error::Config("alert threshold must be finite"));
                }
            }
        }

        let [a, b] = &self.channels;
        if a.frame_id == b.frame_id {
            return Err(Error::Config("channels share a frame id"));
        }

        Ok(())
    }
}
