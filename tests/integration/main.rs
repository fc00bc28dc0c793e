//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters. All tests run on the host with no real hardware
//! required.

#![cfg(not(target_os = "espidf"))]

mod control_surface_tests;
mod engine_tests;
mod mock_hw;
