//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the `log`
//! facade (the ESP-IDF logger on target, which goes to UART / USB-CDC).
//! The status report line is the node's human-readable debug output.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Status(report) => {
                info!("{}", report);
                let d = &report.diagnostics;
                debug!(
                    "DIAG | sent={} busy={} failed={} | read_fail={:?} | alerts={:?} ack_fail={}",
                    d.frames_sent,
                    d.frames_busy,
                    d.frames_failed,
                    d.read_failures,
                    d.alerts,
                    d.alert_ack_failures,
                );
            }
            AppEvent::Alert { channel, kind } => {
                warn!("ALERT | {}: {}", channel, kind);
            }
            AppEvent::ChannelOffline { channel, error } => {
                warn!("OFFLINE | {}: {}", channel, error);
            }
            AppEvent::Started { online } => {
                info!("START | {} channel(s) online", online);
            }
        }
    }
}
