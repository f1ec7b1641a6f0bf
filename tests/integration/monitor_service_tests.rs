//! Integration tests for the MonitorService → ports pipeline.
//!
//! Drive the service with explicit tick values against the mock hardware
//! and check what reaches the bus, the LED and the event sink.

use super::mock_hw::{HwCall, MockHardware, RAW_1W, RecordingSink};

use powermon::alert::{AlertFlags, AlertKind};
use powermon::app::events::AppEvent;
use powermon::app::service::MonitorService;
use powermon::channel::ChannelId;
use powermon::config::{AlertLimit, MonitorConfig};
use powermon::error::{SensorError, TransportError};
use powermon::monitor::frame::decode;
use powermon::sensors::Quantity;

fn make_service(config: MonitorConfig) -> (MonitorService, MockHardware, RecordingSink) {
    let mut svc = MonitorService::new(config);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    svc.start(&mut hw, 0, &mut sink);
    (svc, hw, sink)
}

fn run(svc: &mut MonitorService, hw: &mut MockHardware, sink: &mut RecordingSink, ticks: &[u32]) {
    let flags = AlertFlags::new();
    for &t in ticks {
        svc.poll(t, hw, &flags, sink);
    }
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_initialises_and_calibrates_both_channels() {
    let (svc, hw, sink) = make_service(MonitorConfig::default());

    assert_eq!(
        hw.calls,
        vec![
            HwCall::Init(ChannelId::Bus),
            HwCall::Calibrate(ChannelId::Bus, 2048),
            HwCall::Init(ChannelId::Battery),
            HwCall::Calibrate(ChannelId::Battery, 2048),
        ]
    );
    assert!(svc.is_online(ChannelId::Bus));
    assert!(svc.is_online(ChannelId::Battery));
    assert!(matches!(sink.events.last(), Some(AppEvent::Started { online: 2 })));
}

#[test]
fn configured_alert_limit_is_programmed() {
    let mut config = MonitorConfig::default();
    config.channels[1].alert = Some(AlertLimit {
        kind: AlertKind::BusUnderVoltage,
        value: 10_500.0,
    });
    let (_, hw, _) = make_service(config);

    assert!(hw.calls.contains(&HwCall::ConfigureAlert(
        ChannelId::Battery,
        AlertKind::BusUnderVoltage,
        8_400
    )));
}

#[test]
fn invalid_shunt_takes_channel_offline_without_touching_it() {
    let mut config = MonitorConfig::default();
    config.channels[0].shunt_ohm = 0.0;
    let (svc, hw, sink) = make_service(config);

    assert!(!svc.is_online(ChannelId::Bus));
    assert!(!hw.calls.contains(&HwCall::Init(ChannelId::Bus)));
    assert!(matches!(
        sink.events[0],
        AppEvent::ChannelOffline {
            channel: ChannelId::Bus,
            error: SensorError::InvalidShunt
        }
    ));
}

// ── Transmit ──────────────────────────────────────────────────

#[test]
fn first_transmit_carries_reference_readings() {
    let (mut svc, mut hw, mut sink) = make_service(MonitorConfig::default());
    hw.clear();

    let ticks: Vec<u32> = (1..=10).map(|i| i * 50).collect();
    run(&mut svc, &mut hw, &mut sink, &ticks);

    let sent = hw.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].0, 0x300);
    assert_eq!(sent[1].0, 0x301);
    assert_eq!(&sent[0].1[..6], &[0x5D, 0xC0, 0x00, 0x96, 0x01, 0x68]);

    let frame = decode(&sent[1].1);
    assert_eq!(frame.voltage_mv(), 24_000.0);
    assert_eq!(frame.current_ma(), 1_500.0);
    assert_eq!(frame.power_mw(), 36_000.0);
}

#[test]
fn late_pass_sends_one_pair_and_toggles_once() {
    let (mut svc, mut hw, mut sink) = make_service(MonitorConfig::default());
    hw.clear();

    // Ten transmit periods with no pass at all.
    run(&mut svc, &mut hw, &mut sink, &[5_000]);
    assert_eq!(hw.sent().len(), 2);
    assert_eq!(hw.toggles(), 1);

    // No catch-up burst on the following passes.
    run(&mut svc, &mut hw, &mut sink, &[5_001, 5_050, 5_499]);
    assert_eq!(hw.sent().len(), 2);
    assert_eq!(hw.toggles(), 1);

    run(&mut svc, &mut hw, &mut sink, &[5_500]);
    assert_eq!(hw.sent().len(), 4);
    assert_eq!(hw.toggles(), 2);
}

#[test]
fn heartbeat_toggles_once_per_transmit_period() {
    let (mut svc, mut hw, mut sink) = make_service(MonitorConfig::default());
    hw.clear();

    let ticks: Vec<u32> = (1..=200).map(|i| i * 10).collect();
    run(&mut svc, &mut hw, &mut sink, &ticks);

    // 2 s at 500 ms → 4 toggles → LED period 1 s.
    assert_eq!(hw.toggles(), 4);
    // Each toggle follows its pair of frames.
    let tail: Vec<_> = hw.calls.iter().rev().take(3).collect();
    assert_eq!(*tail[0], HwCall::Toggle);
    assert!(matches!(tail[1], HwCall::Send(0x301, _)));
    assert!(matches!(tail[2], HwCall::Send(0x300, _)));
}

#[test]
fn busy_transport_drops_and_counts_but_still_toggles() {
    let (mut svc, mut hw, mut sink) = make_service(MonitorConfig::default());
    hw.transport = Err(TransportError::Busy);

    run(&mut svc, &mut hw, &mut sink, &[500]);
    assert_eq!(svc.diagnostics().frames_busy, 2);
    assert_eq!(svc.diagnostics().frames_sent, 0);
    assert_eq!(hw.toggles(), 1);

    // Next period tries again with fresh data.
    hw.transport = Ok(());
    run(&mut svc, &mut hw, &mut sink, &[1_000]);
    assert_eq!(svc.diagnostics().frames_sent, 2);
    assert_eq!(svc.diagnostics().frames_dropped(), 2);
}

#[test]
fn bus_error_is_counted_separately() {
    let (mut svc, mut hw, mut sink) = make_service(MonitorConfig::default());
    hw.transport = Err(TransportError::Bus);

    run(&mut svc, &mut hw, &mut sink, &[500]);
    assert_eq!(svc.diagnostics().frames_failed, 2);
    assert_eq!(svc.diagnostics().frames_busy, 0);
}

// ── Sampling + energy ─────────────────────────────────────────

#[test]
fn one_watt_for_one_hour_over_two_passes() {
    let (mut svc, mut hw, mut sink) = make_service(MonitorConfig::default());
    hw.raw[0][2] = RAW_1W;

    run(&mut svc, &mut hw, &mut sink, &[1_200_000, 3_600_000]);

    let ch = svc.channel(ChannelId::Bus);
    assert_eq!(ch.power_mw, 1_000.0);
    assert!((ch.energy_mwh - 1_000.0).abs() < 1e-6, "energy {}", ch.energy_mwh);
}

#[test]
fn current_read_failure_keeps_stale_current_only() {
    let (mut svc, mut hw, mut sink) = make_service(MonitorConfig::default());
    run(&mut svc, &mut hw, &mut sink, &[50]);
    assert_eq!(svc.channel(ChannelId::Bus).current_ma, 1_500.0);

    // New readings on the bus, but the current read now fails.
    hw.raw[0] = [16_000, 800, RAW_1W];
    hw.fail_read = Some((ChannelId::Bus, Quantity::Current, SensorError::Bus));
    run(&mut svc, &mut hw, &mut sink, &[100]);

    let ch = svc.channel(ChannelId::Bus);
    assert_eq!(ch.current_ma, 1_500.0);
    assert_eq!(ch.voltage_mv, 20_000.0);
    assert_eq!(ch.power_mw, 1_000.0);
    assert_eq!(svc.diagnostics().read_failures, [1, 0]);
}

#[test]
fn math_overflow_is_a_skipped_read() {
    let (mut svc, mut hw, mut sink) = make_service(MonitorConfig::default());
    hw.fail_read = Some((ChannelId::Battery, Quantity::Power, SensorError::MathOverflow));

    run(&mut svc, &mut hw, &mut sink, &[50]);
    assert_eq!(svc.channel(ChannelId::Battery).power_mw, 0.0);
    assert_eq!(svc.channel(ChannelId::Battery).voltage_mv, 24_000.0);
    assert_eq!(svc.diagnostics().read_failures, [0, 1]);
}

#[test]
fn init_failure_leaves_other_channel_fully_working() {
    let mut svc = MonitorService::new(MonitorConfig::default());
    let mut hw = MockHardware::new();
    hw.fail_init = Some(ChannelId::Bus);
    let mut sink = RecordingSink::new();
    svc.start(&mut hw, 0, &mut sink);

    assert!(matches!(sink.events.last(), Some(AppEvent::Started { online: 1 })));

    let ticks: Vec<u32> = (1..=10).map(|i| i * 50).collect();
    run(&mut svc, &mut hw, &mut sink, &ticks);

    // Only the battery channel was read: three quantities per pass.
    assert_eq!(hw.reads, 30);
    assert_eq!(svc.channel(ChannelId::Bus).voltage_mv, 0.0);
    assert_eq!(svc.channel(ChannelId::Bus).energy_mwh, 0.0);
    assert_eq!(svc.channel(ChannelId::Battery).voltage_mv, 24_000.0);
    assert!(svc.channel(ChannelId::Battery).energy_mwh > 0.0);

    // Both frames still go out; the offline one is all zeros.
    let sent = hw.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], (0x300, [0; 8]));
    assert_eq!(decode(&sent[1].1).voltage, 24_000);
}

// ── Status report ─────────────────────────────────────────────

#[test]
fn status_report_once_per_report_period() {
    let (mut svc, mut hw, mut sink) = make_service(MonitorConfig::default());

    let ticks: Vec<u32> = (1..=40).map(|i| i * 50).collect();
    run(&mut svc, &mut hw, &mut sink, &ticks);

    let lines = sink.status_lines();
    assert_eq!(lines.len(), 2);
    assert!(
        lines[0].starts_with("BUS: 24000mV 1500.0mA 36000.0mW "),
        "got {}",
        lines[0]
    );
    assert!(lines[0].contains(" | BAT: 24000mV 1500.0mA 36000.0mW "));
}

#[test]
fn status_report_carries_diagnostics() {
    let (mut svc, mut hw, mut sink) = make_service(MonitorConfig::default());
    hw.transport = Err(TransportError::Busy);

    run(&mut svc, &mut hw, &mut sink, &[500, 1_000]);

    let report = sink
        .events
        .iter()
        .find_map(|e| match e {
            AppEvent::Status(r) => Some(r.clone()),
            _ => None,
        })
        .expect("one status report");
    assert_eq!(report.diagnostics.frames_busy, 4);
    assert_eq!(report.diagnostics, *svc.diagnostics());
}
