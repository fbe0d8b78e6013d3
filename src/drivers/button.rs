//! Polled, debounced button monitor with click and press-and-hold detection.
//!
//! ## Hardware
//!
//! One active-high momentary switch per zone, sampled by the main loop
//! every control cycle.  No ISR: a press shorter than one cycle is lost.
//!
//! ## Gesture detection
//!
//! | Gesture      | Condition                                        | Event         |
//! |--------------|--------------------------------------------------|---------------|
//! | Click        | Release > debounce after press, ≥ 2×debounce since last click | `SingleClick` |
//! | Press+hold   | Released ≥ hold threshold after press            | `PressHold`   |
//!
//! Each press-release cycle yields at most one event.  Elapsed times use
//! `wrapping_sub` so the u32 millisecond clock may roll over mid-press.

use heapless::Vec;
use log::debug;

use crate::app::ports::ButtonPort;
use crate::config::ControllerConfig;
use crate::zone::{PerZone, Zone};

/// Classified button gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    SingleClick(Zone),
    PressHold(Zone),
}

/// Per-zone tracking state.
#[derive(Debug, Clone, Copy, Default)]
struct ButtonState {
    last_high: bool,
    pressed_at_ms: u32,
    hold_latched: bool,
    last_click_ms: Option<u32>,
}

pub struct InputMonitor {
    debounce_ms: u32,
    hold_ms: u32,
    zones: PerZone<ButtonState>,
}

impl InputMonitor {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            debounce_ms: config.debounce_ms,
            hold_ms: config.hold_ms,
            zones: PerZone::default(),
        }
    }

    /// Feed one raw sample for `zone` taken at `now_ms`.
    /// Returns a classified gesture on the falling edge that completes it.
    pub fn poll(&mut self, zone: Zone, raw_high: bool, now_ms: u32) -> Option<ButtonEvent> {
        let debounce_ms = self.debounce_ms;
        let hold_ms = self.hold_ms;
        let state = &mut self.zones[zone];
        let was_high = state.last_high;
        state.last_high = raw_high;

        match (was_high, raw_high) {
            // Rising edge
            (false, true) => {
                debug!("button {}: pressed", zone.name());
                state.pressed_at_ms = now_ms;
                None
            }

            // Still held
            (true, true) => {
                if now_ms.wrapping_sub(state.pressed_at_ms) > hold_ms {
                    state.hold_latched = true;
                }
                None
            }

            // Falling edge
            (true, false) => {
                let held_ms = now_ms.wrapping_sub(state.pressed_at_ms);

                if state.hold_latched || held_ms >= hold_ms {
                    state.hold_latched = false;
                    return Some(ButtonEvent::PressHold(zone));
                }

                if held_ms <= debounce_ms {
                    return None;
                }

                let clear_of_last = state
                    .last_click_ms
                    .is_none_or(|t| now_ms.wrapping_sub(t) >= debounce_ms.saturating_mul(2));
                if clear_of_last {
                    state.last_click_ms = Some(now_ms);
                    Some(ButtonEvent::SingleClick(zone))
                } else {
                    None
                }
            }

            (false, false) => None,
        }
    }

    /// Sample both zones through `buttons` and classify.
    pub fn poll_all(&mut self, buttons: &mut impl ButtonPort, now_ms: u32) -> Vec<ButtonEvent, 2> {
        let mut events = Vec::new();
        for zone in Zone::ALL {
            let raw = buttons.button_pressed(zone);
            if let Some(event) = self.poll(zone, raw, now_ms) {
                // Capacity equals the zone count, so this cannot overflow.
                let _ = events.push(event);
            }
        }
        events
    }

    /// True while the hold threshold has been crossed but the button is
    /// still down.
    pub fn hold_pending(&self, zone: Zone) -> bool {
        self.zones[zone].hold_latched
    }
}
