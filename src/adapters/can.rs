//! CAN telemetry transport.
//!
//! Implements [`TransportPort`] over the ESP32 TWAI controller.
//!
//! - **`feature = "espidf"`**: [`TwaiTransport`] queues standard-id data
//!   frames with `twai_transmit` and a zero timeout, so a full transmit
//!   queue reports [`TransportError::Busy`] instead of blocking the loop.
//! - **otherwise**: [`SimTransport`] logs every frame and keeps the most
//!   recent ones for host-side inspection.

use crate::app::ports::TransportPort;
use crate::error::TransportError;
use crate::monitor::frame::FRAME_LEN;

// ── ESP-IDF TWAI ──────────────────────────────────────────────

/// TWAI-backed transport.  The driver must already be installed and
/// started (see [`init_can`](crate::drivers::hw_init::init_can)).
#[cfg(feature = "espidf")]
pub struct TwaiTransport;

#[cfg(feature = "espidf")]
impl TwaiTransport {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "espidf")]
impl Default for TwaiTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "espidf")]
impl TransportPort for TwaiTransport {
    fn try_send(&mut self, id: u16, data: &[u8; FRAME_LEN]) -> Result<(), TransportError> {
        use esp_idf_svc::sys::{
            ESP_ERR_TIMEOUT, ESP_FAIL, ESP_OK, twai_message_t, twai_transmit,
        };

        // Zeroed flags: standard 11-bit id, data frame.
        let mut msg = twai_message_t {
            identifier: u32::from(id),
            data_length_code: FRAME_LEN as u8,
            ..Default::default()
        };
        msg.data[..FRAME_LEN].copy_from_slice(data);

        // SAFETY: msg outlives the call; zero ticks never blocks.
        let rc = unsafe { twai_transmit(&msg, 0) };
        match rc {
            rc if rc == ESP_OK as i32 => Ok(()),
            // Queue full, or a transmission still in flight.
            rc if rc == ESP_ERR_TIMEOUT as i32 || rc == ESP_FAIL => Err(TransportError::Busy),
            rc => {
                log::debug!("CAN: twai_transmit rc={}", rc);
                Err(TransportError::Bus)
            }
        }
    }
}

// ── Host simulation ───────────────────────────────────────────

/// Frames retained by [`SimTransport`].
#[cfg(not(feature = "espidf"))]
pub const SIM_HISTORY: usize = 16;

/// Log-only transport for host builds.
#[cfg(not(feature = "espidf"))]
#[derive(Default)]
pub struct SimTransport {
    sent: heapless::Deque<(u16, [u8; FRAME_LEN]), SIM_HISTORY>,
}

#[cfg(not(feature = "espidf"))]
impl SimTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent frames, oldest first.
    pub fn sent(&self) -> impl Iterator<Item = &(u16, [u8; FRAME_LEN])> {
        self.sent.iter()
    }
}

#[cfg(not(feature = "espidf"))]
impl TransportPort for SimTransport {
    fn try_send(&mut self, id: u16, data: &[u8; FRAME_LEN]) -> Result<(), TransportError> {
        log::trace!("CAN(sim): 0x{:03X} {:02X?}", id, data);
        if self.sent.is_full() {
            let _ = self.sent.pop_front();
        }
        // Space was made above.
        let _ = self.sent.push_back((id, *data));
        Ok(())
    }
}
