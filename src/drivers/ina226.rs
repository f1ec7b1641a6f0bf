//! INA226 current/voltage/power monitor backend.
//!
//! Implements [`SensorPort`] for two INA226 devices sharing one I²C bus,
//! one per channel, addressed by their A0/A1 strapping.  Generic over the
//! `embedded-hal` 1.0 [`I2c`] and [`DelayNs`] traits so the same code runs
//! on the ESP-IDF I²C driver and on a scripted bus in host tests.
//!
//! ## Register map (16-bit, big-endian)
//!
//! | Addr | Register      | Use                                   |
//! |------|---------------|---------------------------------------|
//! | 0x00 | Configuration | reset, averaging, conversion times    |
//! | 0x02 | Bus voltage   | 1.25 mV/LSB                           |
//! | 0x03 | Power         | 25 × current LSB                      |
//! | 0x04 | Current       | signed, current LSB                   |
//! | 0x05 | Calibration   | see [`Calibration`](crate::sensors::calibration::Calibration) |
//! | 0x06 | Mask/Enable   | alert sources + status flags          |
//! | 0x07 | Alert limit   | threshold for the enabled source      |
//! | 0xFE | Manufacturer  | 0x5449 ("TI")                         |
//!
//! Alerts run in transparent mode (latch disabled): the alert function
//! flag follows the condition, so the periodic overflow checks that read
//! Mask/Enable never swallow a pending alert.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::alert::{AlertKind, AlertStatus};
use crate::app::ports::SensorPort;
use crate::channel::{CHANNEL_COUNT, ChannelId};
use crate::error::SensorError;
use crate::sensors::Quantity;

// ── Registers ─────────────────────────────────────────────────

const REG_CONFIG: u8 = 0x00;
const REG_BUS_VOLTAGE: u8 = 0x02;
const REG_POWER: u8 = 0x03;
const REG_CURRENT: u8 = 0x04;
const REG_CALIBRATION: u8 = 0x05;
const REG_MASK_ENABLE: u8 = 0x06;
const REG_ALERT_LIMIT: u8 = 0x07;
const REG_MANUFACTURER_ID: u8 = 0xFE;

const MANUFACTURER_TI: u16 = 0x5449;

// Configuration register fields.
const CONFIG_RESET: u16 = 1 << 15;
const CONFIG_RESERVED: u16 = 1 << 14;
const CONFIG_AVG_SHIFT: u16 = 9;
const CONFIG_VBUSCT_SHIFT: u16 = 6;
const CONFIG_VSHCT_SHIFT: u16 = 3;
const MODE_SHUNT_BUS_CONTINUOUS: u16 = 0b111;

// Mask/Enable register fields.
const MASK_ALERT_FLAG: u16 = 1 << 4;
const MASK_CONVERSION_READY: u16 = 1 << 3;
const MASK_MATH_OVERFLOW: u16 = 1 << 2;

/// Extra polls granted beyond the nominal first-conversion time.
const CONVERSION_POLL_MARGIN_MS: u32 = 10;

// ── Settings ──────────────────────────────────────────────────

/// Samples averaged per reported conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u16)]
pub enum Averaging {
    X1 = 0,
    X4 = 1,
    #[default]
    X16 = 2,
    X64 = 3,
    X128 = 4,
    X256 = 5,
    X512 = 6,
    X1024 = 7,
}

impl Averaging {
    pub const fn samples(self) -> u32 {
        match self {
            Self::X1 => 1,
            Self::X4 => 4,
            Self::X16 => 16,
            Self::X64 => 64,
            Self::X128 => 128,
            Self::X256 => 256,
            Self::X512 => 512,
            Self::X1024 => 1024,
        }
    }
}

/// ADC conversion time per sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u16)]
pub enum ConversionTime {
    Us140 = 0,
    Us204 = 1,
    Us332 = 2,
    Us588 = 3,
    #[default]
    Us1100 = 4,
    Us2116 = 5,
    Us4156 = 6,
    Us8244 = 7,
}

impl ConversionTime {
    pub const fn micros(self) -> u32 {
        match self {
            Self::Us140 => 140,
            Self::Us204 => 204,
            Self::Us332 => 332,
            Self::Us588 => 588,
            Self::Us1100 => 1100,
            Self::Us2116 => 2116,
            Self::Us4156 => 4156,
            Self::Us8244 => 8244,
        }
    }
}

/// Conversion settings applied to both devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ina226Settings {
    pub averaging: Averaging,
    pub bus_conversion: ConversionTime,
    pub shunt_conversion: ConversionTime,
}

impl Ina226Settings {
    /// Configuration register value: continuous shunt + bus conversion.
    pub const fn config_register(&self) -> u16 {
        CONFIG_RESERVED
            | (self.averaging as u16) << CONFIG_AVG_SHIFT
            | (self.bus_conversion as u16) << CONFIG_VBUSCT_SHIFT
            | (self.shunt_conversion as u16) << CONFIG_VSHCT_SHIFT
            | MODE_SHUNT_BUS_CONTINUOUS
    }

    /// Time for one averaged shunt + bus conversion (ms, rounded up).
    pub const fn conversion_period_ms(&self) -> u32 {
        let us = (self.bus_conversion.micros() + self.shunt_conversion.micros())
            * self.averaging.samples();
        us.div_ceil(1000)
    }
}

// ── Mask/Enable mapping ───────────────────────────────────────

const fn alert_enable_bit(kind: AlertKind) -> u16 {
    match kind {
        AlertKind::ShuntOverVoltage => 1 << 15,
        AlertKind::ShuntUnderVoltage => 1 << 14,
        AlertKind::BusOverVoltage => 1 << 13,
        AlertKind::BusUnderVoltage => 1 << 12,
        AlertKind::PowerOverLimit => 1 << 11,
    }
}

fn decode_alert_status(mask: u16) -> AlertStatus {
    AlertKind::PRIORITY
        .into_iter()
        .filter(|kind| mask & alert_enable_bit(*kind) != 0)
        .fold(AlertStatus::new(mask & MASK_ALERT_FLAG != 0), AlertStatus::with)
}

// ── Driver ────────────────────────────────────────────────────

/// Two INA226 devices on one I²C bus.
pub struct Ina226<I2C, D> {
    i2c: I2C,
    delay: D,
    addresses: [u8; CHANNEL_COUNT],
    settings: Ina226Settings,
    ready: [bool; CHANNEL_COUNT],
}

impl<I2C: I2c, D: DelayNs> Ina226<I2C, D> {
    /// `addresses` are 7-bit I²C addresses indexed by [`ChannelId`].
    pub fn new(i2c: I2C, delay: D, addresses: [u8; CHANNEL_COUNT], settings: Ina226Settings) -> Self {
        Self {
            i2c,
            delay,
            addresses,
            settings,
            ready: [false; CHANNEL_COUNT],
        }
    }

    /// Give back the bus (tests, re-initialisation).
    pub fn release(self) -> I2C {
        self.i2c
    }

    pub fn is_ready(&self, channel: ChannelId) -> bool {
        self.ready[channel.index()]
    }

    fn read_reg(&mut self, channel: ChannelId, reg: u8) -> Result<u16, SensorError> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.addresses[channel.index()], &[reg], &mut buf)
            .map_err(|_| SensorError::Bus)?;
        Ok(u16::from_be_bytes(buf))
    }

    fn write_reg(&mut self, channel: ChannelId, reg: u8, value: u16) -> Result<(), SensorError> {
        let [hi, lo] = value.to_be_bytes();
        self.i2c
            .write(self.addresses[channel.index()], &[reg, hi, lo])
            .map_err(|_| SensorError::Bus)
    }

    fn ensure_ready(&self, channel: ChannelId) -> Result<(), SensorError> {
        if self.ready[channel.index()] {
            Ok(())
        } else {
            Err(SensorError::NotInitialized)
        }
    }

    /// Poll for the first conversion-ready flag, 1 ms apart.
    /// Gives up after one conversion period plus a margin.
    fn wait_first_conversion(&mut self, channel: ChannelId) -> Result<(), SensorError> {
        let budget = self.settings.conversion_period_ms() + CONVERSION_POLL_MARGIN_MS;
        for _ in 0..budget {
            let mask = self.read_reg(channel, REG_MASK_ENABLE)?;
            if mask & MASK_CONVERSION_READY != 0 {
                return Ok(());
            }
            self.delay.delay_ms(1);
        }
        Err(SensorError::ConversionTimeout)
    }
}

impl<I2C: I2c, D: DelayNs> SensorPort for Ina226<I2C, D> {
    fn init(&mut self, channel: ChannelId) -> Result<(), SensorError> {
        self.ready[channel.index()] = false;

        self.write_reg(channel, REG_CONFIG, CONFIG_RESET)?;
        let id = self.read_reg(channel, REG_MANUFACTURER_ID)?;
        if id != MANUFACTURER_TI {
            warn!("INA226 {}: manufacturer id 0x{:04X}", channel, id);
            return Err(SensorError::UnexpectedDevice);
        }

        let config = self.settings.config_register();
        self.write_reg(channel, REG_CONFIG, config)?;
        self.wait_first_conversion(channel)?;

        self.ready[channel.index()] = true;
        info!(
            "INA226 {} @0x{:02X}: config=0x{:04X}",
            channel,
            self.addresses[channel.index()],
            config
        );
        Ok(())
    }

    fn write_calibration(&mut self, channel: ChannelId, register: u16) -> Result<(), SensorError> {
        self.ensure_ready(channel)?;
        self.write_reg(channel, REG_CALIBRATION, register)
    }

    fn read_raw(&mut self, channel: ChannelId, quantity: Quantity) -> Result<u16, SensorError> {
        self.ensure_ready(channel)?;

        let mask = self.read_reg(channel, REG_MASK_ENABLE)?;
        if mask & MASK_MATH_OVERFLOW != 0 {
            return Err(SensorError::MathOverflow);
        }

        let reg = match quantity {
            Quantity::BusVoltage => REG_BUS_VOLTAGE,
            Quantity::Current => REG_CURRENT,
            Quantity::Power => REG_POWER,
        };
        self.read_reg(channel, reg)
    }

    fn configure_alert(
        &mut self,
        channel: ChannelId,
        kind: AlertKind,
        limit: u16,
    ) -> Result<(), SensorError> {
        self.ensure_ready(channel)?;
        self.write_reg(channel, REG_ALERT_LIMIT, limit)?;
        // Active-low, transparent (latch disabled).
        self.write_reg(channel, REG_MASK_ENABLE, alert_enable_bit(kind))
    }

    fn read_alert_status(&mut self, channel: ChannelId) -> Result<AlertStatus, SensorError> {
        self.ensure_ready(channel)?;
        let mask = self.read_reg(channel, REG_MASK_ENABLE)?;
        Ok(decode_alert_status(mask))
    }
}
