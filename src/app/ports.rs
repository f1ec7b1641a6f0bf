//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MonitorService (domain)
//! ```
//!
//! Driven adapters (sensor bus, CAN controller, heartbeat LED, log output)
//! implement these traits.  The [`MonitorService`](super::service::MonitorService)
//! consumes them via generics, so the domain core never touches hardware
//! directly and never sees a register address.
//!
//! Every port call is non-blocking from the loop's point of view: a port
//! that cannot make progress right now returns an error instead of waiting.

use crate::alert::{AlertKind, AlertStatus};
use crate::channel::ChannelId;
use crate::error::{SensorError, TransportError};
use crate::monitor::frame::FRAME_LEN;
use crate::sensors::Quantity;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Capability interface of a current/voltage/power monitor backend.
///
/// One backend serves both channels (they normally share an I²C bus), so
/// every call names the channel it targets.
pub trait SensorPort {
    /// Bring up the sensor for `channel` (reset, identify, configure).
    fn init(&mut self, channel: ChannelId) -> Result<(), SensorError>;

    /// Program the calibration register.
    fn write_calibration(&mut self, channel: ChannelId, register: u16) -> Result<(), SensorError>;

    /// Read one quantity as raw register counts.
    ///
    /// Conversion to engineering units is the caller's job; see
    /// [`Calibration`](crate::sensors::calibration::Calibration).
    fn read_raw(&mut self, channel: ChannelId, quantity: Quantity) -> Result<u16, SensorError>;

    /// Enable alert `kind` with limit-register value `limit`.
    fn configure_alert(
        &mut self,
        channel: ChannelId,
        kind: AlertKind,
        limit: u16,
    ) -> Result<(), SensorError>;

    /// Read and acknowledge the alert status.  Bounded time.
    fn read_alert_status(&mut self, channel: ChannelId) -> Result<AlertStatus, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Transport port (driven adapter: domain → shared bus)
// ───────────────────────────────────────────────────────────────

/// Byte-level frame transmission on the shared telemetry bus.
pub trait TransportPort {
    /// Try to hand one 8-byte frame to the controller.
    ///
    /// Must return [`TransportError::Busy`] immediately when no transmit
    /// slot is free; the caller drops the frame and tries again next period.
    fn try_send(&mut self, id: u16, data: &[u8; FRAME_LEN]) -> Result<(), TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → status LED)
// ───────────────────────────────────────────────────────────────

/// Visual liveness indicator.
pub trait IndicatorPort {
    /// Flip the heartbeat LED.
    fn toggle_heartbeat(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / reporting)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, a
/// debug UART, a test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
