//! One-shot hardware peripheral initialization.
//!
//! Configures the two INA226 ALERT inputs with their interrupt handlers
//! and brings up the TWAI (CAN) controller, using raw ESP-IDF sys calls.
//! Called once from `main()` before the event loop starts.

#[cfg(feature = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
    IsrAttachFailed(i32),
    CanInstallFailed(i32),
    CanStartFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::IsrAttachFailed(rc) => write!(f, "ALERT handler attach failed (rc={})", rc),
            Self::CanInstallFailed(rc) => write!(f, "TWAI driver install failed (rc={})", rc),
            Self::CanStartFailed(rc) => write!(f, "TWAI start failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

/// Map an `esp_err_t` to `Ok` (`ESP_OK` is 0) or the given error variant.
#[cfg_attr(not(feature = "espidf"), allow(dead_code))]
fn check(rc: i32, err: fn(i32) -> HwInitError) -> Result<(), HwInitError> {
    if rc == 0 { Ok(()) } else { Err(err(rc)) }
}

#[cfg(feature = "espidf")]
use log::info;

#[cfg(feature = "espidf")]
use crate::pins;

// ── ALERT inputs + ISRs ───────────────────────────────────────

#[cfg(feature = "espidf")]
use crate::alert::alert_isr_handler;
#[cfg(feature = "espidf")]
use crate::channel::ChannelId;

#[cfg(feature = "espidf")]
unsafe extern "C" fn bus_alert_isr(_arg: *mut core::ffi::c_void) {
    alert_isr_handler(ChannelId::Bus);
}

#[cfg(feature = "espidf")]
unsafe extern "C" fn battery_alert_isr(_arg: *mut core::ffi::c_void) {
    alert_isr_handler(ChannelId::Battery);
}

/// Configure both ALERT pins as pulled-up inputs and attach their
/// falling-edge handlers.  Call before the event loop.
#[cfg(feature = "espidf")]
pub fn init_alert_inputs() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: (1u64 << pins::ALERT_BUS_GPIO) | (1u64 << pins::ALERT_BATTERY_GPIO),
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
        ..Default::default()
    };
    // SAFETY: Called once from main() before the loop; single-threaded.
    check(unsafe { gpio_config(&cfg) }, HwInitError::GpioConfigFailed)?;

    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed.  The handlers only store one atomic.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        let handlers: [(i32, unsafe extern "C" fn(*mut core::ffi::c_void)); 2] = [
            (pins::ALERT_BUS_GPIO, bus_alert_isr),
            (pins::ALERT_BATTERY_GPIO, battery_alert_isr),
        ];
        for (gpio, isr) in handlers {
            check(
                gpio_isr_handler_add(gpio, Some(isr), core::ptr::null_mut()),
                HwInitError::IsrAttachFailed,
            )?;
            check(gpio_intr_enable(gpio), HwInitError::IsrAttachFailed)?;
        }
    }

    info!(
        "hw_init: ALERT inputs on GPIO {} / {}",
        pins::ALERT_BUS_GPIO,
        pins::ALERT_BATTERY_GPIO
    );
    Ok(())
}

#[cfg(not(feature = "espidf"))]
pub fn init_alert_inputs() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ALERT inputs skipped");
    Ok(())
}

// ── TWAI (CAN) controller ─────────────────────────────────────

/// Transmit queue depth.  One transmit firing queues one frame per channel.
pub const CAN_TX_QUEUE_LEN: u32 = 4;

/// Install and start the TWAI driver at 500 kbit/s, normal mode,
/// accepting all frames.
#[cfg(feature = "espidf")]
pub fn init_can() -> Result<(), HwInitError> {
    let general = twai_general_config_t {
        mode: twai_mode_t_TWAI_MODE_NORMAL,
        tx_io: pins::CAN_TX_GPIO,
        rx_io: pins::CAN_RX_GPIO,
        clkout_io: -1,
        bus_off_io: -1,
        tx_queue_len: CAN_TX_QUEUE_LEN,
        rx_queue_len: 4,
        alerts_enabled: TWAI_ALERT_NONE,
        clkout_divider: 0,
        intr_flags: ESP_INTR_FLAG_LEVEL1 as i32,
        ..Default::default()
    };
    // 10 MHz quanta, 1 + 15 + 4 = 20 tq per bit → 500 kbit/s.
    let timing = twai_timing_config_t {
        quanta_resolution_hz: 10_000_000,
        brp: 0,
        tseg_1: 15,
        tseg_2: 4,
        sjw: 3,
        triple_sampling: false,
        ..Default::default()
    };
    let filter = twai_filter_config_t {
        acceptance_code: 0,
        acceptance_mask: 0xFFFF_FFFF,
        single_filter: true,
    };

    // SAFETY: Called once from main() before the loop; the configs live
    // for the duration of the call.
    check(
        unsafe { twai_driver_install(&general, &timing, &filter) },
        HwInitError::CanInstallFailed,
    )?;
    // SAFETY: Driver installed above.
    check(unsafe { twai_start() }, HwInitError::CanStartFailed)?;

    info!(
        "hw_init: TWAI started (tx={}, rx={}, 500 kbit/s)",
        pins::CAN_TX_GPIO,
        pins::CAN_RX_GPIO
    );
    Ok(())
}

#[cfg(not(feature = "espidf"))]
pub fn init_can() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): TWAI init skipped");
    Ok(())
}
