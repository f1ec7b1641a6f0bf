//! GPIO / peripheral pin assignments for the power-monitor board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// I²C sensor bus (two INA226)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 8;
pub const I2C_SCL_GPIO: i32 = 9;
/// Bus clock (fast mode).
pub const I2C_FREQ_HZ: u32 = 400_000;

/// INA226 on the supply bus side (A1=GND, A0=GND).
pub const INA226_BUS_ADDR: u8 = 0x40;
/// INA226 on the battery side (A1=GND, A0=VS).
pub const INA226_BATTERY_ADDR: u8 = 0x41;

/// Sensor addresses indexed by [`ChannelId`](crate::channel::ChannelId).
pub const INA226_ADDRS: [u8; 2] = [INA226_BUS_ADDR, INA226_BATTERY_ADDR];

// ---------------------------------------------------------------------------
// INA226 ALERT lines (open-drain, active low, external pull-up)
// ---------------------------------------------------------------------------

pub const ALERT_BUS_GPIO: i32 = 10;
pub const ALERT_BATTERY_GPIO: i32 = 11;

// ---------------------------------------------------------------------------
// CAN (TWAI + SN65HVD230 transceiver)
// ---------------------------------------------------------------------------

pub const CAN_TX_GPIO: i32 = 4;
pub const CAN_RX_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Heartbeat LED
// ---------------------------------------------------------------------------

/// Digital output: HIGH = LED on.
pub const HEARTBEAT_LED_GPIO: i32 = 2;
