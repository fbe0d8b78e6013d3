//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing one line per [`SeatEvent`] to the
//! `log` facade (UART / USB-CDC on the device).  The boot line carries the
//! persisted configuration as JSON so it can be scraped from a capture.

use log::{info, warn};

use crate::app::events::SeatEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`SeatEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &SeatEvent) {
        match event {
            SeatEvent::Started { persisted, levels } => {
                let json = serde_json::to_string(persisted)
                    .unwrap_or_else(|_| String::from("<unserialisable>"));
                info!(
                    "START | driver={:?} passenger={:?} | store={}",
                    levels[crate::zone::Zone::Driver],
                    levels[crate::zone::Zone::Passenger],
                    json
                );
            }
            SeatEvent::LevelChanged { zone, from, to } => {
                info!("LEVEL | {} {:?} -> {:?}", zone.name(), from, to);
            }
            SeatEvent::PowerChanged(on) => {
                info!("POWER | {}", if *on { "ON" } else { "OFF" });
            }
            SeatEvent::PressHold(zone) => {
                info!("HOLD  | {}", zone.name());
            }
            SeatEvent::AutoStartSaved(levels) => {
                info!("AUTO  | saved {:?}", levels);
            }
            SeatEvent::AutoStartCleared => {
                info!("AUTO  | disabled, timer reset");
            }
            SeatEvent::TimerSelectorSaved { minutes } => {
                info!("TIMER | interval {} min from next start", minutes);
            }
            SeatEvent::TimerArmed { zone, minutes } => {
                info!("TIMER | {} armed, {} min", zone.name(), minutes);
            }
            SeatEvent::TimerCancelled => {
                info!("TIMER | cancelled by manual change");
            }
            SeatEvent::TimerForcedOff(zone) => {
                info!("TIMER | {} switched off", zone.name());
            }
            SeatEvent::TimerLatched => {
                info!("TIMER | expired");
            }
            SeatEvent::StoreMigrated { found_version } => {
                warn!("STORE | version {} mismatch, cleared", found_version);
            }
            SeatEvent::StoreRepaired => {
                warn!("STORE | out-of-range value reset");
            }
            SeatEvent::StorageFailed(e) => {
                warn!("STORE | {}", e);
            }
            SeatEvent::FeedbackPlayed { zone, pattern } => {
                info!("BLINK | {:?} on {}", pattern, zone.name());
            }
        }
    }
}
