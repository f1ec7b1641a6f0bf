//! Telemetry frame codec.
//!
//! Wire format (one frame per channel, 8 bytes, big-endian):
//! ```text
//! ┌──────────────┬──────────────┬──────────────┬──────────────┐
//! │ voltage  i16 │ current  i16 │ power    u16 │ energy   u16 │
//! │ 1 mV/LSB     │ 10 mA/LSB    │ 100 mW/LSB   │ 10 mWh/LSB   │
//! │ saturates    │ saturates    │ saturates    │ rolls over   │
//! └──────────────┴──────────────┴──────────────┴──────────────┘
//!   bytes 0-1      bytes 2-3      bytes 4-5      bytes 6-7
//! ```
//!
//! Voltage, current and power are rounded then clamped to the field range:
//! a spike reads as pegged at the limit, never as a sign flip.  Energy is a
//! free-running counter modulo 65536 × 10 mWh (655.35 Wh) that steps only
//! once a whole 10 mWh has accumulated; consumers must difference successive
//! values rather than read it as an absolute total.
//!
//! Encoding never fails.  NaN encodes as 0.

use crate::channel::Channel;

/// Payload length of one telemetry frame.
pub const FRAME_LEN: usize = 8;

/// Voltage field weight (mV/LSB).
pub const VOLTAGE_LSB_MV: f32 = 1.0;
/// Current field weight (mA/LSB).
pub const CURRENT_LSB_MA: f32 = 10.0;
/// Power field weight (mW/LSB).
pub const POWER_LSB_MW: f32 = 100.0;
/// Energy field weight (mWh/LSB).
pub const ENERGY_LSB_MWH: f64 = 10.0;

/// Serialize a channel into its wire frame.
pub fn encode(channel: &Channel) -> [u8; FRAME_LEN] {
    let voltage = saturate_i16(channel.voltage_mv / VOLTAGE_LSB_MV);
    let current = saturate_i16(channel.current_ma / CURRENT_LSB_MA);
    let power = saturate_u16(channel.power_mw / POWER_LSB_MW);
    let energy = rollover_u16(channel.energy_mwh / ENERGY_LSB_MWH);

    let mut out = [0u8; FRAME_LEN];
    out[0..2].copy_from_slice(&voltage.to_be_bytes());
    out[2..4].copy_from_slice(&current.to_be_bytes());
    out[4..6].copy_from_slice(&power.to_be_bytes());
    out[6..8].copy_from_slice(&energy.to_be_bytes());
    out
}

/// A frame as seen by a consumer on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedFrame {
    /// Raw voltage field (mV).
    pub voltage: i16,
    /// Raw current field (×10 mA).
    pub current: i16,
    /// Raw power field (×100 mW).
    pub power: u16,
    /// Raw energy counter (×10 mWh, modulo 65536).
    pub energy: u16,
}

impl DecodedFrame {
    pub fn voltage_mv(&self) -> f32 {
        f32::from(self.voltage) * VOLTAGE_LSB_MV
    }

    pub fn current_ma(&self) -> f32 {
        f32::from(self.current) * CURRENT_LSB_MA
    }

    pub fn power_mw(&self) -> f32 {
        f32::from(self.power) * POWER_LSB_MW
    }
}

/// Parse a wire frame.
pub fn decode(data: &[u8; FRAME_LEN]) -> DecodedFrame {
    DecodedFrame {
        voltage: i16::from_be_bytes([data[0], data[1]]),
        current: i16::from_be_bytes([data[2], data[3]]),
        power: u16::from_be_bytes([data[4], data[5]]),
        energy: u16::from_be_bytes([data[6], data[7]]),
    }
}

// ── Narrowing helpers ─────────────────────────────────────────

fn saturate_i16(scaled: f32) -> i16 {
    if scaled.is_nan() {
        return 0;
    }
    scaled
        .round()
        .clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16
}

fn saturate_u16(scaled: f32) -> u16 {
    if scaled.is_nan() {
        return 0;
    }
    scaled.round().clamp(0.0, f32::from(u16::MAX)) as u16
}

fn rollover_u16(scaled: f64) -> u16 {
    if scaled.is_nan() || scaled <= 0.0 {
        return 0;
    }
    // Truncate, so the counter only counts completed units.  `as u64`
    // saturates for absurd totals; the modulo is the rollover.
    (scaled.floor() as u64 % 0x1_0000) as u16
}
