//! Alert intake.
//!
//! Each INA226 drives an open-drain ALERT line wired to a GPIO interrupt.
//! The ISR does exactly one thing: set the channel's pending flag.  The
//! main loop drains the flags once per pass, after the periodic tasks,
//! and runs the acknowledgment routine for every channel that was flagged.
//!
//! ```text
//! ┌────────────┐  raise()  ┌──────────────┐  take()  ┌──────────────────┐
//! │ ALERT1 ISR │──────────▶│              │─────────▶│ MonitorService   │
//! │ ALERT2 ISR │──────────▶│  AlertFlags  │          │  acknowledge +   │
//! └────────────┘           │ (AtomicBool) │          │  classify + emit │
//!                          └──────────────┘          └──────────────────┘
//! ```
//!
//! Only one bit per channel crosses the interrupt boundary.  Two alerts
//! raised before the loop drains the flag coalesce into one; the detection
//! is kept, the count is not.

use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::channel::{CHANNEL_COUNT, ChannelId};

// ───────────────────────────────────────────────────────────────
// Alert kinds and classification
// ───────────────────────────────────────────────────────────────

/// Threshold conditions the sensor can raise an alert for.
///
/// Declaration order is the classification priority: when several enabled
/// conditions are reported at once, the earliest one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum AlertKind {
    /// Shunt voltage above limit (current over-range).
    ShuntOverVoltage = 0,
    /// Shunt voltage below limit (current under-range).
    ShuntUnderVoltage = 1,
    /// Bus voltage above limit.
    BusOverVoltage = 2,
    /// Bus voltage below limit.
    BusUnderVoltage = 3,
    /// Power above limit.
    PowerOverLimit = 4,
}

impl AlertKind {
    /// Classification order, highest priority first.
    pub const PRIORITY: [AlertKind; 5] = [
        AlertKind::ShuntOverVoltage,
        AlertKind::ShuntUnderVoltage,
        AlertKind::BusOverVoltage,
        AlertKind::BusUnderVoltage,
        AlertKind::PowerOverLimit,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShuntOverVoltage => write!(f, "current over-range"),
            Self::ShuntUnderVoltage => write!(f, "current under-range"),
            Self::BusOverVoltage => write!(f, "bus over-voltage"),
            Self::BusUnderVoltage => write!(f, "bus under-voltage"),
            Self::PowerOverLimit => write!(f, "power over limit"),
        }
    }
}

/// Decoded alert status as reported by the sensor backend.
///
/// Backends translate their own register layout into this; the service
/// never looks at register bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertStatus {
    /// The sensor's alert function flag is set.
    pub asserted: bool,
    enabled: u8,
}

impl AlertStatus {
    pub const fn new(asserted: bool) -> Self {
        Self {
            asserted,
            enabled: 0,
        }
    }

    /// Mark `kind` as an enabled alert source.
    #[must_use]
    pub const fn with(mut self, kind: AlertKind) -> Self {
        self.enabled |= kind.bit();
        self
    }

    pub const fn is_enabled(&self, kind: AlertKind) -> bool {
        self.enabled & kind.bit() != 0
    }
}

/// Decide which condition tripped.
///
/// Returns `None` when the alert flag is not asserted (spurious edge or the
/// condition already cleared).  Ties follow [`AlertKind::PRIORITY`].
pub fn classify(status: AlertStatus) -> Option<AlertKind> {
    if !status.asserted {
        return None;
    }
    AlertKind::PRIORITY
        .into_iter()
        .find(|kind| status.is_enabled(*kind))
}

// ───────────────────────────────────────────────────────────────
// ISR → main-loop flags
// ───────────────────────────────────────────────────────────────

/// One pending-alert bit per channel.
pub struct AlertFlags {
    pending: [AtomicBool; CHANNEL_COUNT],
}

impl AlertFlags {
    pub const fn new() -> Self {
        Self {
            pending: [AtomicBool::new(false), AtomicBool::new(false)],
        }
    }

    /// Flag `channel` as needing attention.
    /// Lock-free and allocation-free, safe to call from interrupt context.
    pub fn raise(&self, channel: ChannelId) {
        self.pending[channel.index()].store(true, Ordering::Release);
    }

    /// Clear and return the pending flag for `channel`.
    pub fn take(&self, channel: ChannelId) -> bool {
        self.pending[channel.index()].swap(false, Ordering::AcqRel)
    }

    pub fn is_pending(&self, channel: ChannelId) -> bool {
        self.pending[channel.index()].load(Ordering::Acquire)
    }
}

impl Default for AlertFlags {
    fn default() -> Self {
        Self::new()
    }
}

/// Flags written by the ALERT GPIO interrupts.
/// `static` because ISR callbacks cannot capture owned state.
pub static ALERTS: AlertFlags = AlertFlags::new();

/// Called from the ALERT GPIO ISR of `channel`.
pub fn alert_isr_handler(channel: ChannelId) {
    ALERTS.raise(channel);
}
