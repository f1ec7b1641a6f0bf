//! Application service: the hexagonal core.
//!
//! [`MonitorService`] owns both channels, the scheduler, the energy
//! integrator and the diagnostics counters.  All I/O flows through port
//! traits injected at call sites, so the whole service is testable with
//! mock adapters.
//!
//! ```text
//!    SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                   │        MonitorService        │
//! TransportPort ◀── │ Scheduler · Reader · Energy  │
//! IndicatorPort ◀── │ Frame encoder · Alert intake │
//!                   └──────────────────────────────┘
//! ```
//!
//! One call to [`MonitorService::poll`] is one pass of the cooperative
//! loop: due tasks run in slot order (sample, transmit, report), then the
//! pending alert flags are drained.  Nothing in a pass blocks and nothing
//! in a pass is fatal.

use log::{debug, info, warn};

use crate::alert::{AlertFlags, classify};
use crate::channel::{CHANNEL_COUNT, Channel, ChannelId};
use crate::config::MonitorConfig;
use crate::diagnostics::Diagnostics;
use crate::error::SensorError;
use crate::monitor::frame;
use crate::monitor::integrator::{EnergyIntegrator, integrate};
use crate::monitor::reader::ChannelReader;
use crate::scheduler::{Scheduler, TaskId};
use crate::sensors::calibration::Calibration;

use super::events::{AppEvent, StatusReport};
use super::ports::{EventSink, IndicatorPort, SensorPort, TransportPort};

// ───────────────────────────────────────────────────────────────
// MonitorService
// ───────────────────────────────────────────────────────────────

pub struct MonitorService {
    config: MonitorConfig,
    channels: [Channel; CHANNEL_COUNT],
    /// `None` while a channel is offline (not started, or bring-up failed).
    readers: [Option<ChannelReader>; CHANNEL_COUNT],
    scheduler: Scheduler,
    integrator: EnergyIntegrator,
    diagnostics: Diagnostics,
}

impl MonitorService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    pub fn new(config: MonitorConfig) -> Self {
        let mut scheduler = Scheduler::new();
        // Slot order is pass order: sampling completes before transmission.
        let tasks = [
            (TaskId::Sample, config.read_period_ms),
            (TaskId::Transmit, config.transmit_period_ms),
            (TaskId::Report, config.report_period_ms),
        ];
        for (task, period_ms) in tasks {
            if scheduler.add(task, period_ms, 0).is_none() {
                warn!("Scheduler full, '{}' not registered", task.label());
            }
        }

        Self {
            config,
            channels: [Channel::new(); CHANNEL_COUNT],
            readers: [None; CHANNEL_COUNT],
            scheduler,
            integrator: EnergyIntegrator::new(0),
            diagnostics: Diagnostics::default(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Bring up both channels and arm the periodic tasks at `now_ms`.
    ///
    /// A channel that fails any bring-up step is reported through
    /// [`AppEvent::ChannelOffline`] and left offline: it is never read or
    /// integrated, and its frame keeps carrying zeros.  The other channel
    /// is unaffected.  Energy integration is measured from `now_ms`.
    pub fn start(&mut self, hw: &mut impl SensorPort, now_ms: u32, sink: &mut impl EventSink) {
        for id in ChannelId::ALL {
            match self.bring_up(hw, id) {
                Ok(reader) => {
                    info!(
                        "{}: online (shunt={} Ω, cal=0x{:04X})",
                        id,
                        reader.calibration().shunt_ohm(),
                        reader.calibration().register()
                    );
                    self.readers[id.index()] = Some(reader);
                }
                Err(error) => {
                    warn!("{}: bring-up failed ({}), channel offline", id, error);
                    self.readers[id.index()] = None;
                    sink.emit(&AppEvent::ChannelOffline { channel: id, error });
                }
            }
        }

        self.scheduler.restart(now_ms);
        self.integrator.restart(now_ms);

        let online = self.readers.iter().flatten().count();
        sink.emit(&AppEvent::Started { online });
        info!("MonitorService started, {}/{} channels online", online, CHANNEL_COUNT);
    }

    fn bring_up(
        &self,
        hw: &mut impl SensorPort,
        id: ChannelId,
    ) -> Result<ChannelReader, SensorError> {
        let cfg = self.config.channel(id);
        let calibration = Calibration::for_shunt(cfg.shunt_ohm)?;

        hw.init(id)?;
        hw.write_calibration(id, calibration.register())?;
        if let Some(alert) = cfg.alert {
            let limit = calibration.alert_limit(alert.kind, alert.value);
            hw.configure_alert(id, alert.kind, limit)?;
            info!("{}: alert '{}' at {} (0x{:04X})", id, alert.kind, alert.value, limit);
        }

        Ok(ChannelReader::new(id, calibration))
    }

    // ── Per-pass orchestration ────────────────────────────────

    /// Run one loop pass at tick `now_ms`.
    ///
    /// The `hw` parameter satisfies all three hardware ports; this avoids
    /// a triple mutable borrow while keeping the port boundary explicit.
    pub fn poll(
        &mut self,
        now_ms: u32,
        hw: &mut (impl SensorPort + TransportPort + IndicatorPort),
        alerts: &AlertFlags,
        sink: &mut impl EventSink,
    ) {
        for task in self.scheduler.poll(now_ms) {
            match task {
                TaskId::Sample => self.sample(hw, now_ms),
                TaskId::Transmit => self.transmit(hw),
                TaskId::Report => sink.emit(&AppEvent::Status(self.status_report())),
            }
        }

        self.drain_alerts(hw, alerts, sink);
    }

    /// Read every online channel, then integrate its power over the time
    /// since the previous sample pass.
    fn sample(&mut self, hw: &mut impl SensorPort, now_ms: u32) {
        let elapsed_hours = self.integrator.lap_hours(now_ms);

        for id in ChannelId::ALL {
            let Some(reader) = &self.readers[id.index()] else {
                continue;
            };
            let state = &mut self.channels[id.index()];

            if let Err(e) = reader.read(hw, state) {
                debug!("{}: partial read ({})", id, e);
                self.diagnostics
                    .record_read_failures(id, e.failures().len());
            }
            integrate(state, elapsed_hours);
        }
    }

    /// Send one frame per channel, then toggle the heartbeat once.
    fn transmit(&mut self, hw: &mut (impl TransportPort + IndicatorPort)) {
        for id in ChannelId::ALL {
            let data = frame::encode(&self.channels[id.index()]);
            let frame_id = self.config.channel(id).frame_id;

            let result = hw.try_send(frame_id, &data);
            if let Err(e) = result {
                warn!("{}: frame 0x{:03X} dropped ({})", id, frame_id, e);
            }
            self.diagnostics.record_send(result);
        }

        hw.toggle_heartbeat();
    }

    /// Acknowledge and classify every flagged channel.
    fn drain_alerts(
        &mut self,
        hw: &mut impl SensorPort,
        alerts: &AlertFlags,
        sink: &mut impl EventSink,
    ) {
        for id in ChannelId::ALL {
            if !alerts.take(id) {
                continue;
            }

            match hw.read_alert_status(id) {
                Ok(status) => match classify(status) {
                    Some(kind) => {
                        self.diagnostics.record_alert(id);
                        sink.emit(&AppEvent::Alert { channel: id, kind });
                    }
                    None => debug!("{}: alert edge with no active condition", id),
                },
                Err(e) => {
                    // The flag is already cleared; the next assertion re-raises it.
                    warn!("{}: alert acknowledgment failed ({})", id, e);
                    self.diagnostics.record_alert_ack_failure();
                }
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn channel(&self, id: ChannelId) -> &Channel {
        &self.channels[id.index()]
    }

    pub fn is_online(&self, id: ChannelId) -> bool {
        self.readers[id.index()].is_some()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Snapshot of both channels plus counters.
    pub fn status_report(&self) -> StatusReport {
        StatusReport {
            channels: ChannelId::ALL.map(|id| (id, self.channels[id.index()])),
            diagnostics: self.diagnostics,
        }
    }
}
