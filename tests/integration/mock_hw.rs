//! Mock hardware adapter for integration tests.
//!
//! Plays back fixed raw register counts per channel, injects failures on
//! demand, and records every frame and heartbeat toggle so tests can
//! assert on the full output history without touching real peripherals.

use powermon::alert::{AlertKind, AlertStatus};
use powermon::app::events::AppEvent;
use powermon::app::ports::{EventSink, IndicatorPort, SensorPort, TransportPort};
use powermon::channel::ChannelId;
use powermon::error::{SensorError, TransportError};
use powermon::monitor::frame::FRAME_LEN;
use powermon::sensors::Quantity;

// ── Raw counts for the default 4 mΩ shunt ─────────────────────

/// 24 000 mV at 1.25 mV/LSB.
pub const RAW_24V: u16 = 19_200;
/// 1 500 mA at 0.625 mA/LSB.
pub const RAW_1500MA: u16 = 2_400;
/// 36 000 mW at 15.625 mW/LSB.
pub const RAW_36W: u16 = 2_304;
/// 1 000 mW at 15.625 mW/LSB.
pub const RAW_1W: u16 = 64;

// ── Call records ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HwCall {
    Init(ChannelId),
    Calibrate(ChannelId, u16),
    ConfigureAlert(ChannelId, AlertKind, u16),
    Send(u16, [u8; FRAME_LEN]),
    Toggle,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<HwCall>,
    /// Raw counts per channel: [bus voltage, current, power].
    pub raw: [[u16; 3]; 2],
    pub fail_init: Option<ChannelId>,
    pub fail_read: Option<(ChannelId, Quantity, SensorError)>,
    pub transport: Result<(), TransportError>,
    pub alert_status: [Result<AlertStatus, SensorError>; 2],
    pub reads: usize,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            raw: [[RAW_24V, RAW_1500MA, RAW_36W]; 2],
            fail_init: None,
            fail_read: None,
            transport: Ok(()),
            alert_status: [Ok(AlertStatus::new(false)), Ok(AlertStatus::new(false))],
            reads: 0,
        }
    }

    pub fn sent(&self) -> Vec<(u16, [u8; FRAME_LEN])> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::Send(id, data) => Some((*id, *data)),
                _ => None,
            })
            .collect()
    }

    pub fn toggles(&self) -> usize {
        self.calls.iter().filter(|c| **c == HwCall::Toggle).count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn init(&mut self, channel: ChannelId) -> Result<(), SensorError> {
        self.calls.push(HwCall::Init(channel));
        if self.fail_init == Some(channel) {
            Err(SensorError::Bus)
        } else {
            Ok(())
        }
    }

    fn write_calibration(&mut self, channel: ChannelId, register: u16) -> Result<(), SensorError> {
        self.calls.push(HwCall::Calibrate(channel, register));
        Ok(())
    }

    fn read_raw(&mut self, channel: ChannelId, quantity: Quantity) -> Result<u16, SensorError> {
        self.reads += 1;
        if let Some((ch, q, e)) = self.fail_read {
            if ch == channel && q == quantity {
                return Err(e);
            }
        }
        let idx = match quantity {
            Quantity::BusVoltage => 0,
            Quantity::Current => 1,
            Quantity::Power => 2,
        };
        Ok(self.raw[channel.index()][idx])
    }

    fn configure_alert(
        &mut self,
        channel: ChannelId,
        kind: AlertKind,
        limit: u16,
    ) -> Result<(), SensorError> {
        self.calls.push(HwCall::ConfigureAlert(channel, kind, limit));
        Ok(())
    }

    fn read_alert_status(&mut self, channel: ChannelId) -> Result<AlertStatus, SensorError> {
        self.alert_status[channel.index()]
    }
}

impl TransportPort for MockHardware {
    fn try_send(&mut self, id: u16, data: &[u8; FRAME_LEN]) -> Result<(), TransportError> {
        self.calls.push(HwCall::Send(id, *data));
        self.transport
    }
}

impl IndicatorPort for MockHardware {
    fn toggle_heartbeat(&mut self) {
        self.calls.push(HwCall::Toggle);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn alerts(&self) -> Vec<(ChannelId, AlertKind)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Alert { channel, kind } => Some((*channel, *kind)),
                _ => None,
            })
            .collect()
    }

    pub fn status_lines(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Status(r) => Some(r.to_string()),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
