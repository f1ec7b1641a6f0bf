//! Integration tests for alert intake: ISR flag → acknowledgment →
//! classification → event.

use super::mock_hw::{MockHardware, RecordingSink};

use powermon::alert::{AlertFlags, AlertKind, AlertStatus};
use powermon::app::events::AppEvent;
use powermon::app::service::MonitorService;
use powermon::channel::ChannelId;
use powermon::config::MonitorConfig;
use powermon::error::SensorError;

fn make_service() -> (MonitorService, MockHardware, RecordingSink) {
    let mut svc = MonitorService::new(MonitorConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    svc.start(&mut hw, 0, &mut sink);
    sink.events.clear();
    (svc, hw, sink)
}

#[test]
fn flagged_channel_is_classified_and_reported() {
    let (mut svc, mut hw, mut sink) = make_service();
    hw.alert_status[1] = Ok(AlertStatus::new(true).with(AlertKind::BusUnderVoltage));
    let flags = AlertFlags::new();
    flags.raise(ChannelId::Battery);

    svc.poll(1, &mut hw, &flags, &mut sink);

    assert_eq!(
        sink.alerts(),
        vec![(ChannelId::Battery, AlertKind::BusUnderVoltage)]
    );
    assert_eq!(svc.diagnostics().alerts, [0, 1]);
    assert!(!flags.is_pending(ChannelId::Battery));
}

#[test]
fn simultaneous_conditions_follow_fixed_priority() {
    let (mut svc, mut hw, mut sink) = make_service();
    hw.alert_status[0] = Ok(AlertStatus::new(true)
        .with(AlertKind::PowerOverLimit)
        .with(AlertKind::BusOverVoltage)
        .with(AlertKind::ShuntUnderVoltage));
    let flags = AlertFlags::new();
    flags.raise(ChannelId::Bus);

    svc.poll(1, &mut hw, &flags, &mut sink);

    assert_eq!(
        sink.alerts(),
        vec![(ChannelId::Bus, AlertKind::ShuntUnderVoltage)]
    );
}

#[test]
fn repeated_raises_coalesce_into_one_acknowledgment() {
    let (mut svc, mut hw, mut sink) = make_service();
    hw.alert_status[0] = Ok(AlertStatus::new(true).with(AlertKind::ShuntOverVoltage));
    let flags = AlertFlags::new();
    flags.raise(ChannelId::Bus);
    flags.raise(ChannelId::Bus);
    flags.raise(ChannelId::Bus);

    svc.poll(1, &mut hw, &flags, &mut sink);
    svc.poll(2, &mut hw, &flags, &mut sink);

    assert_eq!(sink.alerts().len(), 1);
}

#[test]
fn alerts_are_handled_after_periodic_tasks() {
    let (mut svc, mut hw, mut sink) = make_service();
    hw.alert_status[0] = Ok(AlertStatus::new(true).with(AlertKind::PowerOverLimit));
    let flags = AlertFlags::new();
    flags.raise(ChannelId::Bus);

    // Report is due on this pass too.
    svc.poll(1_000, &mut hw, &flags, &mut sink);

    let kinds: Vec<&str> = sink
        .events
        .iter()
        .map(|e| match e {
            AppEvent::Status(_) => "status",
            AppEvent::Alert { .. } => "alert",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["status", "alert"]);
}

#[test]
fn unasserted_status_is_not_reported() {
    let (mut svc, mut hw, mut sink) = make_service();
    hw.alert_status[0] = Ok(AlertStatus::new(false).with(AlertKind::BusOverVoltage));
    let flags = AlertFlags::new();
    flags.raise(ChannelId::Bus);

    svc.poll(1, &mut hw, &flags, &mut sink);

    assert!(sink.alerts().is_empty());
    assert_eq!(svc.diagnostics().alerts, [0, 0]);
    assert_eq!(svc.diagnostics().alert_ack_failures, 0);
}

#[test]
fn failed_acknowledgment_is_logged_and_not_redelivered() {
    let (mut svc, mut hw, mut sink) = make_service();
    hw.alert_status[1] = Err(SensorError::Bus);
    let flags = AlertFlags::new();
    flags.raise(ChannelId::Battery);

    svc.poll(1, &mut hw, &flags, &mut sink);
    assert_eq!(svc.diagnostics().alert_ack_failures, 1);

    // Flag already cleared: the next pass does not retry.
    hw.alert_status[1] = Ok(AlertStatus::new(true).with(AlertKind::PowerOverLimit));
    svc.poll(2, &mut hw, &flags, &mut sink);
    assert!(sink.alerts().is_empty());
    assert_eq!(svc.diagnostics().alert_ack_failures, 1);
}

#[test]
fn isr_handler_raises_the_shared_flag() {
    let (mut svc, mut hw, mut sink) = make_service();
    hw.alert_status[1] = Ok(AlertStatus::new(true).with(AlertKind::BusOverVoltage));

    powermon::alert::alert_isr_handler(ChannelId::Battery);
    assert!(powermon::alert::ALERTS.is_pending(ChannelId::Battery));

    svc.poll(1, &mut hw, &powermon::alert::ALERTS, &mut sink);
    assert_eq!(
        sink.alerts(),
        vec![(ChannelId::Battery, AlertKind::BusOverVoltage)]
    );
    assert!(!powermon::alert::ALERTS.is_pending(ChannelId::Battery));
}
