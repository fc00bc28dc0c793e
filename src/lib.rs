//! moto light-controller firmware library.
//!
//! Exposes the render engine, control surface and drivers for the binary
//! and for host-side integration tests. All ESP-IDF-specific code is
//! guarded by `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod gamma;
pub mod patterns;
pub mod pins;

pub use error::{Error, Result};
