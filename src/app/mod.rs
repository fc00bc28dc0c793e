//! Application core: control surface and render loop, no direct I/O.
//!
//! Hardware, logging and persistence are reached through the port traits
//! in [`ports`], so everything here runs on the host.

pub mod commands;
pub mod control;
pub mod engine;
pub mod events;
pub mod persist;
pub mod ports;
