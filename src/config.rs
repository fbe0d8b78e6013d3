//! Controller configuration parameters
//!
//! Timing constants for input classification, feedback playback and the
//! main loop.  The values match the shipped hardware; they are gathered
//! here so tests can shrink them and so every module reads the same set.

use serde::{Deserialize, Serialize};

/// Auto-shutoff intervals in minutes, indexed by the stored timer selector.
pub const TIMER_INTERVALS_MIN: [u8; 4] = [15, 10, 5, 1];

/// Selector restored whenever the stored one is invalid or cleared (1 minute).
pub const TIMER_SELECTOR_RESET: u8 = 3;

/// Bytes reserved for the configuration store.
pub const EEPROM_SIZE: usize = 64;

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    // --- Buttons ---
    /// Releases closer than this to the press are treated as bounce (ms)
    pub debounce_ms: u32,
    /// Holding longer than this is a press-and-hold gesture (ms)
    pub hold_ms: u32,

    // --- Feedback ---
    /// Dark period before a blink pattern starts (ms)
    pub blink_lead_in_ms: u32,
    /// Number of on/off cycles per pattern
    pub blink_repeats: u8,

    // --- Timing ---
    /// On-board heartbeat LED toggle period (ms)
    pub heartbeat_ms: u32,
    /// Delay between control cycles in the main loop (ms)
    pub poll_interval_ms: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 25,
            hold_ms: 500,

            blink_lead_in_ms: 500,
            blink_repeats: 2,

            heartbeat_ms: 1000,
            poll_interval_ms: 2,
        }
    }
}

impl ControllerConfig {
    /// Reject timing combinations that would make gestures ambiguous.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_ms == 0 {
            return Err(ConfigError::ValidationFailed("debounce_ms must be > 0"));
        }
        if self.hold_ms <= self.debounce_ms.saturating_mul(2) {
            return Err(ConfigError::ValidationFailed(
                "hold_ms must exceed twice debounce_ms",
            ));
        }
        if self.blink_repeats == 0 {
            return Err(ConfigError::ValidationFailed("blink_repeats must be > 0"));
        }
        if self.heartbeat_ms == 0 {
            return Err(ConfigError::ValidationFailed("heartbeat_ms must be > 0"));
        }
        Ok(())
    }
}

/// Errors from [`ControllerConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl core::error::Error for ConfigError {}
