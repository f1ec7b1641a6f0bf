//! Energy integrator.
//!
//! Rectangular (Euler) integration of power over the measured time since
//! the previous read pass:
//!
//! ```text
//! energy_mwh += power_mw × elapsed_h
//! ```
//!
//! Elapsed time comes from the tick counter, not from the nominal read
//! period, so a late pass contributes its real interval and scheduler
//! jitter does not bias the total.  The baseline is the time the
//! integrator was started, so the first interval after boot is counted.

use crate::channel::Channel;

/// Milliseconds per hour.
pub const MS_PER_HOUR: f64 = 3_600_000.0;

/// Tracks the tick of the previous integration step.
#[derive(Debug, Clone, Copy)]
pub struct EnergyIntegrator {
    last_ms: u32,
}

impl EnergyIntegrator {
    /// Start measuring intervals from `start_ms`.
    pub const fn new(start_ms: u32) -> Self {
        Self { last_ms: start_ms }
    }

    /// Hours elapsed since the previous call (or since start), and advance
    /// the baseline to `now_ms`.
    ///
    /// Wrapping subtraction keeps this correct across the `u32` tick
    /// rollover (~49.7 days at 1 ms).
    pub fn lap_hours(&mut self, now_ms: u32) -> f64 {
        let elapsed_ms = now_ms.wrapping_sub(self.last_ms);
        self.last_ms = now_ms;
        f64::from(elapsed_ms) / MS_PER_HOUR
    }

    /// Move the baseline without integrating.
    pub fn restart(&mut self, now_ms: u32) {
        self.last_ms = now_ms;
    }
}

/// Add `power × elapsed_hours` to the channel's accumulated energy.
///
/// Energy never decreases: non-finite or negative contributions are ignored.
pub fn integrate(channel: &mut Channel, elapsed_hours: f64) {
    let delta = f64::from(channel.power_mw) * elapsed_hours;
    if delta.is_finite() && delta > 0.0 {
        channel.energy_mwh += delta;
    }
}
