//! Outbound application events.
//!
//! The [`MonitorService`](super::service::MonitorService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: print them to the debug UART, forward them
//! to a host, or record them in a test.

use core::fmt;

use crate::alert::AlertKind;
use crate::channel::{CHANNEL_COUNT, Channel, ChannelId};
use crate::diagnostics::Diagnostics;
use crate::error::SensorError;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service finished startup; carries how many channels came up.
    Started { online: usize },

    /// A channel failed to initialise and will report stale/zero data.
    ChannelOffline {
        channel: ChannelId,
        error: SensorError,
    },

    /// Periodic human-readable status snapshot.
    Status(StatusReport),

    /// A sensor alert was acknowledged and classified.
    Alert {
        channel: ChannelId,
        kind: AlertKind,
    },
}

/// Point-in-time view of both channels plus counters.
///
/// `Display` renders the status line printed once per report period.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub channels: [(ChannelId, Channel); CHANNEL_COUNT],
    pub diagnostics: Diagnostics,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (id, ch)) in self.channels.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(
                f,
                "{}: {:.0}mV {:.1}mA {:.1}mW {:.1}mWh",
                id, ch.voltage_mv, ch.current_ma, ch.power_mw, ch.energy_mwh
            )?;
        }
        Ok(())
    }
}
