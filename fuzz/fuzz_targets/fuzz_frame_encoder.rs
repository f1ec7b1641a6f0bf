//! Fuzz target: `frame::encode` / `frame::decode`
//!
//! Builds a channel from arbitrary bit patterns (NaN, infinities and
//! subnormals included) and asserts that encoding never panics, that
//! saturated fields stay pegged at the correct end, and that decoding the
//! raw bytes is total.
//!
//! cargo fuzz run fuzz_frame_encoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use powermon::channel::Channel;
use powermon::monitor::frame::{FRAME_LEN, decode, encode};

fuzz_target!(|data: &[u8]| {
    if data.len() < 20 {
        // Still exercise the decoder on short inputs.
        let mut raw = [0u8; FRAME_LEN];
        let n = data.len().min(FRAME_LEN);
        raw[..n].copy_from_slice(&data[..n]);
        let _ = decode(&raw);
        return;
    }

    let f32_at = |i: usize| f32::from_le_bytes([data[i], data[i + 1], data[i + 2], data[i + 3]]);
    let mut e = [0u8; 8];
    e.copy_from_slice(&data[12..20]);

    let ch = Channel {
        voltage_mv: f32_at(0),
        current_ma: f32_at(4),
        power_mw: f32_at(8),
        energy_mwh: f64::from_le_bytes(e),
    };

    let d = decode(&encode(&ch));

    if ch.voltage_mv >= 32_767.5 {
        assert_eq!(d.voltage, i16::MAX);
    }
    if ch.voltage_mv <= -32_768.5 {
        assert_eq!(d.voltage, i16::MIN);
    }
    if ch.power_mw <= 0.0 || ch.power_mw.is_nan() {
        assert_eq!(d.power, 0);
    }
    if ch.energy_mwh.is_nan() || ch.energy_mwh <= 0.0 {
        assert_eq!(d.energy, 0);
    }
});
