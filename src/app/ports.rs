//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SeatController (domain)
//! ```
//!
//! Driven adapters (buttons, heater outputs, EEPROM, clock, event sinks)
//! implement these traits.  The [`SeatController`](super::service::SeatController)
//! consumes them via generics, so the domain core never touches hardware
//! directly and every module can be exercised on the host.

use crate::zone::{HeatLevel, Zone};

// ───────────────────────────────────────────────────────────────
// Button port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Raw, undebounced button lines.  Active-high: `true` while pressed.
pub trait ButtonPort {
    fn button_pressed(&mut self, zone: Zone) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Heater port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the relay / transistor array.
///
/// The pin-to-level mapping is the adapter's concern; the domain only
/// asks for "this zone at this level" and "everything in this zone off".
pub trait HeaterPort {
    /// Drive the shared power-enable line.
    fn set_power_enable(&mut self, on: bool);

    /// Energise the output for `level` in `zone`.  Never called with `Off`.
    fn activate_level(&mut self, zone: Zone, level: HeatLevel);

    /// De-energise every level output of `zone`.
    fn deactivate_zone(&mut self, zone: Zone);
}

// ───────────────────────────────────────────────────────────────
// Non-volatile store port (driven adapter: domain ↔ EEPROM / NVS)
// ───────────────────────────────────────────────────────────────

/// Byte-addressable persistent memory.
///
/// Writes are synchronous: a `read` after a successful `write` in the same
/// control cycle observes the new value.  Implementations are not required
/// to verify writes; wrap in [`VerifiedStore`](crate::persist::VerifiedStore)
/// to opt in.
pub trait NvStore {
    /// Total number of addressable bytes.
    fn capacity(&self) -> usize;

    fn read(&self, address: usize) -> Result<u8, StorageError>;

    fn write(&mut self, address: usize, value: u8) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.  Wraps at `u32::MAX`; consumers compare
/// with `wrapping_sub`.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`SeatEvent`](super::events::SeatEvent)s
/// through this port.  The controller never depends on a sink being
/// attached; [`NullSink`] discards everything.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::SeatEvent);
}

/// Sink that drops every event.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &super::events::SeatEvent) {}
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`NvStore`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Address lies outside the store.
    OutOfBounds(usize),
    /// Backend I/O failure (carries the platform error code).
    IoError(i32),
    /// Read-after-write returned a different byte.
    VerifyFailed(usize),
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfBounds(addr) => write!(f, "address {} out of bounds", addr),
            Self::IoError(rc) => write!(f, "I/O error (rc={})", rc),
            Self::VerifyFailed(addr) => write!(f, "write verification failed at {}", addr),
        }
    }
}

impl core::error::Error for StorageError {}
