//! Adapters: concrete implementations of the hexagonal port traits, plus
//! the inbound control paths.
//!
//! | Adapter            | Implements / drives   | Connects to              |
//! |--------------------|-----------------------|--------------------------|
//! | `log_sink`         | EventSink             | Serial log output        |
//! | `nvs`              | ControlStore          | NVS / in-memory store    |
//! | `attribute_bridge` | ControlState          | Smart-home attribute writes |
//! | `console`          | ControlState          | Serial console lines     |

pub mod attribute_bridge;
pub mod console;
pub mod log_sink;
pub mod nvs;
