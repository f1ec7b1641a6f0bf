//! Heartbeat LED driver.
//!
//! A single GPIO LED that flips once per transmit period, so a healthy
//! node blinks at half the transmit rate.  Generic over the
//! `embedded-hal` 1.0 [`StatefulOutputPin`] trait: the ESP-IDF
//! `PinDriver` in production, an in-memory pin in tests.

use embedded_hal::digital::StatefulOutputPin;
use log::warn;

pub struct HeartbeatLed<P> {
    pin: P,
    toggles: u32,
}

impl<P: StatefulOutputPin> HeartbeatLed<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, toggles: 0 }
    }

    /// Flip the LED.  A pin error is logged and otherwise ignored.
    pub fn toggle(&mut self) {
        match self.pin.toggle() {
            Ok(()) => self.toggles = self.toggles.wrapping_add(1),
            Err(e) => warn!("Heartbeat: toggle failed ({:?})", e),
        }
    }

    /// Current LED level, `None` if the pin cannot be read back.
    pub fn is_on(&mut self) -> Option<bool> {
        self.pin.is_set_high().ok()
    }

    /// Successful toggles since construction (wrapping).
    pub fn toggles(&self) -> u32 {
        self.toggles
    }
}
