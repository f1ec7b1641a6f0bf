//! Shunt calibration for an INA226-class power monitor.
//!
//! The calibration register scales the shunt-voltage ADC into current
//! and power registers.  We pick the current LSB so that the full ±81.92 mV
//! shunt range maps onto the full signed 16-bit current register:
//!
//! ```text
//! current_lsb = 81.92 mV / R_shunt / 2^15
//! CAL         = 0.00512 / (current_lsb · R_shunt)
//! power_lsb   = 25 · current_lsb
//! ```
//!
//! Bus voltage is fixed at 1.25 mV/LSB and shunt voltage at 2.5 µV/LSB
//! regardless of calibration.

use crate::alert::AlertKind;
use crate::error::SensorError;

/// Shunt-voltage full scale (V).
const SHUNT_FULL_SCALE_V: f64 = 0.081_92;
/// Internal fixed scaling constant of the calibration equation.
const CAL_CONSTANT: f64 = 0.005_12;
/// Positive full scale of a signed 16-bit result register.
const SIGNED_FULL_SCALE: f64 = 32_768.0;
/// Shunt resistances at or below this are treated as zero.
const MIN_SHUNT_OHM: f64 = 0.000_001;

/// Bus voltage register weight (mV/LSB).
pub const BUS_VOLTAGE_LSB_MV: f32 = 1.25;
/// Shunt voltage register weight (µV/LSB).
pub const SHUNT_VOLTAGE_LSB_UV: f32 = 2.5;
/// Power LSB as a multiple of the current LSB.
const POWER_LSB_RATIO: f32 = 25.0;

/// Calibration derived from a shunt resistance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    shunt_ohm: f32,
    current_lsb_ma: f32,
    register: u16,
}

impl Calibration {
    /// Compute the calibration for `shunt_ohm`.
    ///
    /// Fails with [`SensorError::InvalidShunt`] for zero, negative, NaN,
    /// infinite or absurdly small resistances.
    pub fn for_shunt(shunt_ohm: f32) -> Result<Self, SensorError> {
        let r = f64::from(shunt_ohm);
        if !r.is_finite() || r <= MIN_SHUNT_OHM {
            return Err(SensorError::InvalidShunt);
        }

        let current_lsb_a = SHUNT_FULL_SCALE_V / r / SIGNED_FULL_SCALE;
        let register = (CAL_CONSTANT / (current_lsb_a * r)).round();
        if register < 1.0 || register > f64::from(u16::MAX) {
            return Err(SensorError::InvalidShunt);
        }

        Ok(Self {
            shunt_ohm,
            current_lsb_ma: (current_lsb_a * 1000.0) as f32,
            register: register as u16,
        })
    }

    /// Value to write into the sensor's calibration register.
    pub const fn register(&self) -> u16 {
        self.register
    }

    pub const fn shunt_ohm(&self) -> f32 {
        self.shunt_ohm
    }

    /// Current register weight (mA/LSB).
    pub const fn current_lsb_ma(&self) -> f32 {
        self.current_lsb_ma
    }

    /// Power register weight (mW/LSB).
    pub fn power_lsb_mw(&self) -> f32 {
        self.current_lsb_ma * POWER_LSB_RATIO
    }

    // ── Raw → engineering units ───────────────────────────────

    pub fn bus_voltage_mv(&self, raw: u16) -> f32 {
        f32::from(raw) * BUS_VOLTAGE_LSB_MV
    }

    /// The current register is two's complement.
    pub fn current_ma(&self, raw: u16) -> f32 {
        f32::from(raw as i16) * self.current_lsb_ma
    }

    pub fn power_mw(&self, raw: u16) -> f32 {
        f32::from(raw) * self.power_lsb_mw()
    }

    // ── Engineering units → alert limit register ──────────────

    /// Convert an alert threshold to the limit-register value.
    ///
    /// `value` is in mA for shunt kinds, mV for bus kinds and mW for the
    /// power limit.  Out-of-range thresholds saturate.
    pub fn alert_limit(&self, kind: AlertKind, value: f32) -> u16 {
        match kind {
            AlertKind::ShuntOverVoltage | AlertKind::ShuntUnderVoltage => {
                // mA · Ω = mV; × 1000 → µV.
                let shunt_uv = value * self.shunt_ohm * 1000.0;
                let raw = (shunt_uv / SHUNT_VOLTAGE_LSB_UV)
                    .round()
                    .clamp(f32::from(i16::MIN), f32::from(i16::MAX));
                raw as i16 as u16
            }
            AlertKind::BusOverVoltage | AlertKind::BusUnderVoltage => {
                // Bus voltage register is 15 bits, unsigned.
                (value / BUS_VOLTAGE_LSB_MV)
                    .round()
                    .clamp(0.0, f32::from(i16::MAX)) as u16
            }
            AlertKind::PowerOverLimit => (value / self.power_lsb_mw())
                .round()
                .clamp(0.0, f32::from(u16::MAX)) as u16,
        }
    }
}
