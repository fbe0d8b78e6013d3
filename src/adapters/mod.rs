//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to                     |
//! |------------|--------------|---------------------------------|
//! | `hardware` | ButtonPort   | embedded-hal input pins         |
//! |            | HeaterPort   | embedded-hal output pins        |
//! | `eeprom`   | NvStore      | NVS blob / in-memory image      |
//! | `log_sink` | EventSink    | Serial log output               |
//! | `time`     | Clock        | ESP32 system timer / `Instant`  |

pub mod eeprom;
pub mod hardware;
pub mod log_sink;
pub mod time;
