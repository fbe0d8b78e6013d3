//! Blocking blink-pattern feedback for configuration gestures.
//!
//! After a press-and-hold the controller blanks the affected zone and
//! flashes one of its level outputs so the occupant can see the gesture
//! registered.  Playback busy-waits on the clock and returns only when
//! the pattern is finished; buttons are not sampled meanwhile.
//!
//! ## Patterns
//!
//! | Pattern | On (ms) | Off (ms) | Used for                    |
//! |---------|---------|----------|-----------------------------|
//! | On      | 1500    | 500      | auto-start saved            |
//! | Off     | 350     | 1500     | auto-start cleared          |
//! | Toggle  | 1000    | 1000     | timer interval saved        |
//! | Error   | 350     | 350      | storage write failed        |
//!
//! Each pattern runs after a dark lead-in and repeats a configured number
//! of times.

use log::debug;

use crate::app::ports::{Clock, HeaterPort};
use crate::config::ControllerConfig;
use crate::control::heat::HeatController;
use crate::zone::{HeatLevel, Zone};

/// Pattern identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkPattern {
    On,
    Off,
    Toggle,
    Error,
}

impl BlinkPattern {
    /// `(on_ms, off_ms)` for one cycle.
    pub const fn timing(self) -> (u32, u32) {
        match self {
            Self::On => (1500, 500),
            Self::Off => (350, 1500),
            Self::Toggle => (1000, 1000),
            Self::Error => (350, 350),
        }
    }
}

pub struct FeedbackSignaler {
    lead_in_ms: u32,
    repeats: u8,
}

impl FeedbackSignaler {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            lead_in_ms: config.blink_lead_in_ms,
            repeats: config.blink_repeats,
        }
    }

    /// Wall time one playback of `pattern` takes.
    pub fn duration_ms(&self, pattern: BlinkPattern) -> u32 {
        let (on, off) = pattern.timing();
        self.lead_in_ms + u32::from(self.repeats) * (on + off)
    }

    /// Blank `zone`, flash its indicator, then restore the previous level.
    ///
    /// The indicator is the output for the zone's level before playback,
    /// or the Medium output when the zone was Off.
    pub fn play(
        &self,
        pattern: BlinkPattern,
        zone: Zone,
        heat: &mut HeatController,
        hw: &mut impl HeaterPort,
        clock: &impl Clock,
    ) {
        let previous = heat.level(zone);
        let indicator = if previous.is_off() {
            HeatLevel::Medium
        } else {
            previous
        };
        let (on_ms, off_ms) = pattern.timing();
        debug!(
            "feedback: {:?} on {} via {:?} output",
            pattern,
            zone.name(),
            indicator
        );

        heat.set_level(zone, HeatLevel::Off);
        heat.apply_outputs(hw);

        busy_wait(clock, self.lead_in_ms);
        for _ in 0..self.repeats {
            hw.activate_level(zone, indicator);
            busy_wait(clock, on_ms);
            hw.deactivate_zone(zone);
            busy_wait(clock, off_ms);
        }

        heat.set_level(zone, previous);
        heat.apply_outputs(hw);
    }
}

fn busy_wait(clock: &impl Clock, ms: u32) {
    let start = clock.now_ms();
    while clock.now_ms().wrapping_sub(start) < ms {
        core::hint::spin_loop();
    }
}
