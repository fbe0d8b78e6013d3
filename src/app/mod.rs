//! Application core: pure domain logic, zero I/O.
//!
//! This module wires the input monitor, heat controller, shutoff timer,
//! feedback player and persistent store into one control cycle.  All
//! interaction with hardware happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
