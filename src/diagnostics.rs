//! Runtime diagnostics counters.
//!
//! Nothing in the monitor escalates on failure: a dropped frame or a
//! skipped sensor read is logged and counted here, and the loop carries on.
//! The counters ride along in every [`StatusReport`](crate::app::events::StatusReport).
//!
//! All counters saturate instead of wrapping so a long-running node never
//! reports a small number after overflow.

use crate::channel::{CHANNEL_COUNT, ChannelId};
use crate::error::TransportError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Frames accepted by the transport.
    pub frames_sent: u32,
    /// Frames dropped because the transmit queue was full.
    pub frames_busy: u32,
    /// Frames rejected by the transport.
    pub frames_failed: u32,
    /// Individual quantity reads that failed, per channel.
    pub read_failures: [u32; CHANNEL_COUNT],
    /// Alerts classified and dispatched, per channel.
    pub alerts: [u32; CHANNEL_COUNT],
    /// Alert acknowledgments whose status read failed.
    pub alert_ack_failures: u32,
}

impl Diagnostics {
    pub fn record_send(&mut self, result: Result<(), TransportError>) {
        let counter = match result {
            Ok(()) => &mut self.frames_sent,
            Err(TransportError::Busy) => &mut self.frames_busy,
            Err(TransportError::Bus) => &mut self.frames_failed,
        };
        *counter = counter.saturating_add(1);
    }

    pub fn record_read_failures(&mut self, channel: ChannelId, count: usize) {
        let slot = &mut self.read_failures[channel.index()];
        *slot = slot.saturating_add(count as u32);
    }

    pub fn record_alert(&mut self, channel: ChannelId) {
        let slot = &mut self.alerts[channel.index()];
        *slot = slot.saturating_add(1);
    }

    pub fn record_alert_ack_failure(&mut self) {
        self.alert_ack_failures = self.alert_ack_failures.saturating_add(1);
    }

    /// Frames that never reached the bus.
    pub fn frames_dropped(&self) -> u32 {
        self.frames_busy.saturating_add(self.frames_failed)
    }
}
