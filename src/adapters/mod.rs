//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                   | Connects to                  |
//! |------------|------------------------------|------------------------------|
//! | `hardware` | SensorPort, TransportPort,   | INA226 backend, CAN, LED     |
//! |            | IndicatorPort                |                              |
//! | `can`      | TransportPort                | ESP32 TWAI / host simulation |
//! | `log_sink` | EventSink                    | Serial log output            |
//! | `time`     | (tick source)                | ESP32 system timer           |

pub mod can;
pub mod hardware;
pub mod log_sink;
pub mod time;
