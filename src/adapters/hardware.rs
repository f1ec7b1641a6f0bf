//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the sensor backend, the CAN transport and the heartbeat LED,
//! exposing them through [`SensorPort`], [`TransportPort`] and
//! [`IndicatorPort`] on one value so the service can borrow all three
//! at once.  Generic over each part: on target these are the INA226
//! driver, the TWAI transport and a GPIO `PinDriver`; on the host any
//! implementation of the same traits.

use embedded_hal::digital::StatefulOutputPin;

use crate::alert::{AlertKind, AlertStatus};
use crate::app::ports::{IndicatorPort, SensorPort, TransportPort};
use crate::channel::ChannelId;
use crate::drivers::heartbeat::HeartbeatLed;
use crate::error::{SensorError, TransportError};
use crate::monitor::frame::FRAME_LEN;
use crate::sensors::Quantity;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<S, T, P> {
    sensors: S,
    transport: T,
    led: HeartbeatLed<P>,
}

impl<S, T, P> HardwareAdapter<S, T, P>
where
    S: SensorPort,
    T: TransportPort,
    P: StatefulOutputPin,
{
    pub fn new(sensors: S, transport: T, led: HeartbeatLed<P>) -> Self {
        Self {
            sensors,
            transport,
            led,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn led(&self) -> &HeartbeatLed<P> {
        &self.led
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<S: SensorPort, T, P> SensorPort for HardwareAdapter<S, T, P> {
    fn init(&mut self, channel: ChannelId) -> Result<(), SensorError> {
        self.sensors.init(channel)
    }

    fn write_calibration(&mut self, channel: ChannelId, register: u16) -> Result<(), SensorError> {
        self.sensors.write_calibration(channel, register)
    }

    fn read_raw(&mut self, channel: ChannelId, quantity: Quantity) -> Result<u16, SensorError> {
        self.sensors.read_raw(channel, quantity)
    }

    fn configure_alert(
        &mut self,
        channel: ChannelId,
        kind: AlertKind,
        limit: u16,
    ) -> Result<(), SensorError> {
        self.sensors.configure_alert(channel, kind, limit)
    }

    fn read_alert_status(&mut self, channel: ChannelId) -> Result<AlertStatus, SensorError> {
        self.sensors.read_alert_status(channel)
    }
}

// ── TransportPort implementation ──────────────────────────────

impl<S, T: TransportPort, P> TransportPort for HardwareAdapter<S, T, P> {
    fn try_send(&mut self, id: u16, data: &[u8; FRAME_LEN]) -> Result<(), TransportError> {
        self.transport.try_send(id, data)
    }
}

// ── IndicatorPort implementation ──────────────────────────────

impl<S, T, P: StatefulOutputPin> IndicatorPort for HardwareAdapter<S, T, P> {
    fn toggle_heartbeat(&mut self) {
        self.led.toggle();
    }
}
