//! PowerMon firmware entry point.
//!
//! Hexagonal architecture with a single cooperative loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter              LogEventSink    MonotonicClock   │
//! │  (INA226 ×2 · TWAI · LED)     (EventSink)     (tick source)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              MonitorService (pure logic)               │    │
//! │  │  Scheduler · Reader · Energy · Frames · Alert intake   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  ALERT ISRs ──▶ ALERTS (one atomic flag per channel)           │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, PinDriver};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::{error, info, warn};

use powermon::adapters::can::TwaiTransport;
use powermon::adapters::hardware::HardwareAdapter;
use powermon::adapters::log_sink::LogEventSink;
use powermon::adapters::time::MonotonicClock;
use powermon::alert::ALERTS;
use powermon::app::service::MonitorService;
use powermon::config::MonitorConfig;
use powermon::drivers::heartbeat::HeartbeatLed;
use powermon::drivers::hw_init;
use powermon::drivers::ina226::Ina226;
use powermon::pins;

/// Deployment parameters baked in at build time.
static MONITOR_JSON: &[u8] = include_bytes!("../monitor.json");

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  PowerMon v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = match MonitorConfig::from_json(MONITOR_JSON) {
        Ok(cfg) => {
            info!("Config loaded from monitor.json");
            cfg
        }
        Err(e) => {
            warn!("monitor.json rejected ({}), using defaults", e);
            MonitorConfig::default()
        }
    };

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;

    // SAFETY: each GPIO number is claimed exactly once, here, at boot.
    let (sda, scl, led_pin) = unsafe {
        (
            AnyIOPin::new(pins::I2C_SDA_GPIO),
            AnyIOPin::new(pins::I2C_SCL_GPIO),
            AnyOutputPin::new(pins::HEARTBEAT_LED_GPIO),
        )
    };

    let i2c = I2cDriver::new(
        peripherals.i2c0,
        sda,
        scl,
        &I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ)),
    )?;
    let sensors = Ina226::new(i2c, FreeRtos, pins::INA226_ADDRS, config.sensor);

    // CAN and ALERT lines degrade instead of halting: the node keeps
    // sampling and logging even when it cannot transmit.
    if let Err(e) = hw_init::init_can() {
        error!("CAN init failed: {}, telemetry frames will be dropped", e);
    }
    if let Err(e) = hw_init::init_alert_inputs() {
        error!("ALERT init failed: {}, continuing without alerts", e);
    }

    let led = HeartbeatLed::new(PinDriver::output(led_pin)?);
    let mut hw = HardwareAdapter::new(sensors, TwaiTransport::new(), led);

    // ── 4. Service ────────────────────────────────────────────
    let clock = MonotonicClock::new();
    let mut log_sink = LogEventSink::new();
    let mut service = MonitorService::new(config);
    service.start(&mut hw, clock.now_ms(), &mut log_sink);

    info!("System ready. Entering main loop.");

    // ── 5. Main loop ──────────────────────────────────────────
    loop {
        service.poll(clock.now_ms(), &mut hw, &ALERTS, &mut log_sink);

        // Yield one tick so the idle task can feed the task watchdog.
        FreeRtos::delay_ms(1);
    }
}
