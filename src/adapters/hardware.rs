//! Hardware adapter: bridges GPIO pins to domain port traits.
//!
//! Owns every pin the controller touches and exposes them through
//! [`ButtonPort`] and [`HeaterPort`].  Generic over the embedded-hal 1.0
//! digital traits, so the same adapter runs on ESP-IDF `PinDriver`s and
//! on host-side mock pins.
//!
//! ## Output map
//!
//! | Zone      | High | Medium | Low |
//! |-----------|------|--------|-----|
//! | Driver    | 0    | 1      | 2   |
//! | Passenger | 0    | 1      | 2   |
//!
//! Slots index into the per-zone `[O; 3]` array handed to [`HardwareAdapter::new`].

use embedded_hal::digital::{InputPin, OutputPin, PinState};
use log::warn;

use crate::app::ports::{ButtonPort, HeaterPort};
use crate::zone::{HeatLevel, PerZone, Zone};

/// Concrete adapter that combines all pins behind port traits.
pub struct HardwareAdapter<I, O> {
    buttons: PerZone<I>,
    level_outputs: PerZone<[O; 3]>,
    power_enable: O,
    heartbeat_led: O,
}

impl<I: InputPin, O: OutputPin> HardwareAdapter<I, O> {
    pub fn new(
        buttons: PerZone<I>,
        level_outputs: PerZone<[O; 3]>,
        power_enable: O,
        heartbeat_led: O,
    ) -> Self {
        Self {
            buttons,
            level_outputs,
            power_enable,
            heartbeat_led,
        }
    }

    /// Drive the on-board heartbeat LED.
    pub fn set_heartbeat(&mut self, lit: bool) {
        drive(&mut self.heartbeat_led, lit, "heartbeat");
    }
}

// ── ButtonPort implementation ─────────────────────────────────

impl<I: InputPin, O: OutputPin> ButtonPort for HardwareAdapter<I, O> {
    fn button_pressed(&mut self, zone: Zone) -> bool {
        match self.buttons[zone].is_high() {
            Ok(high) => high,
            Err(e) => {
                warn!("button {}: read failed: {:?}", zone.name(), e);
                false
            }
        }
    }
}

// ── HeaterPort implementation ─────────────────────────────────

impl<I: InputPin, O: OutputPin> HeaterPort for HardwareAdapter<I, O> {
    fn set_power_enable(&mut self, on: bool) {
        drive(&mut self.power_enable, on, "power enable");
    }

    fn activate_level(&mut self, zone: Zone, level: HeatLevel) {
        if let Some(slot) = level.output_slot() {
            drive(&mut self.level_outputs[zone][slot], true, zone.name());
        }
    }

    fn deactivate_zone(&mut self, zone: Zone) {
        for pin in &mut self.level_outputs[zone] {
            drive(pin, false, zone.name());
        }
    }
}

fn drive(pin: &mut impl OutputPin, on: bool, what: &str) {
    if let Err(e) = pin.set_state(PinState::from(on)) {
        warn!("{}: output write failed: {:?}", what, e);
    }
}
