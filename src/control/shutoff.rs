//! Auto-shutoff countdown for auto-started heat sessions.
//!
//! Each zone is either `Disarmed` or `Armed { armed_at_ms }`.  The timer
//! only protects the session that auto-start restored (or that was just
//! saved): a zone arms when its live level is non-zero and every zone
//! still matches the reference levels from storage.
//!
//! ## Evaluation order (once per control cycle)
//!
//! 1. **Expiry**: an armed zone whose interval has elapsed is forced
//!    Off.  Its reference becomes Off too, so the forced change does not
//!    count as a manual one.
//! 2. **Divergence**: if *any* zone differs from its reference, *both*
//!    zones are disarmed.  The device treats either side moving as the
//!    occupant taking over; this coupling is deliberate.
//! 3. **Arming**: with no divergence, disarmed non-zero zones arm.
//! 4. **Latch**: both zones disarmed and both Off ends the timer for the
//!    rest of the run, even if auto-start is saved again later.

use heapless::Vec;
use log::info;

use crate::control::heat::HeatController;
use crate::persist::TimerSelector;
use crate::zone::{HeatLevel, PerZone, Zone};

/// Transitions reported by [`AutoShutoffTimer::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutoffEvent {
    Armed { zone: Zone, minutes: u8 },
    Cancelled,
    ForcedOff(Zone),
    Latched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum TimerState {
    #[default]
    Disarmed,
    Armed {
        armed_at_ms: u32,
    },
}

pub struct AutoShutoffTimer {
    auto_start: bool,
    expired: bool,
    minutes: u8,
    interval_ms: u32,
    reference: PerZone<HeatLevel>,
    states: PerZone<TimerState>,
}

impl AutoShutoffTimer {
    /// Build from the configuration loaded at boot.  The interval is fixed
    /// for the run.
    pub fn new(auto_start: bool, selector: TimerSelector, reference: PerZone<HeatLevel>) -> Self {
        let minutes = selector.minutes();
        Self {
            auto_start,
            expired: false,
            minutes,
            interval_ms: u32::from(minutes) * 60_000,
            reference,
            states: PerZone::default(),
        }
    }

    /// Auto-start mode is on and the timer has not latched.
    pub fn is_active(&self) -> bool {
        self.auto_start && !self.expired
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn is_armed(&self, zone: Zone) -> bool {
        matches!(self.states[zone], TimerState::Armed { .. })
    }

    pub fn interval_minutes(&self) -> u8 {
        self.minutes
    }

    /// Driver press-hold stored `levels` as the new auto-start session.
    /// Countdowns restart from the next evaluation.
    pub fn on_auto_start_saved(&mut self, levels: PerZone<HeatLevel>) {
        self.auto_start = true;
        self.reference = levels;
        self.states = PerZone::default();
    }

    /// Driver press-hold with everything off disabled auto-start.
    pub fn on_auto_start_cleared(&mut self) {
        self.auto_start = false;
        self.reference = PerZone::splat(HeatLevel::Off);
        self.states = PerZone::default();
    }

    /// Run one evaluation against the live levels in `heat`.  May force
    /// zones Off.
    pub fn evaluate(&mut self, heat: &mut HeatController, now_ms: u32) -> Vec<ShutoffEvent, 6> {
        let mut events = Vec::new();
        if !self.is_active() {
            return events;
        }

        for zone in Zone::ALL {
            if let TimerState::Armed { armed_at_ms } = self.states[zone] {
                if now_ms.wrapping_sub(armed_at_ms) >= self.interval_ms {
                    info!("shutoff: {} timer elapsed, switching off", zone.name());
                    heat.set_level(zone, HeatLevel::Off);
                    self.reference[zone] = HeatLevel::Off;
                    self.states[zone] = TimerState::Disarmed;
                    let _ = events.push(ShutoffEvent::ForcedOff(zone));
                }
            }
        }

        let live = heat.levels();
        let diverged = Zone::ALL.iter().any(|&z| live[z] != self.reference[z]);

        if diverged {
            if Zone::ALL.iter().any(|&z| self.is_armed(z)) {
                info!("shutoff: level changed manually, cancelling both timers");
                let _ = events.push(ShutoffEvent::Cancelled);
            }
            self.states = PerZone::default();
        } else {
            for zone in Zone::ALL {
                if !self.is_armed(zone) && !live[zone].is_off() {
                    self.states[zone] = TimerState::Armed { armed_at_ms: now_ms };
                    info!("shutoff: {} armed for {} min", zone.name(), self.minutes);
                    let _ = events.push(ShutoffEvent::Armed {
                        zone,
                        minutes: self.minutes,
                    });
                }
            }
        }

        let all_disarmed = Zone::ALL.iter().all(|&z| !self.is_armed(z));
        if all_disarmed && live.all_off() {
            info!("shutoff: both zones off, timer expired for this run");
            self.expired = true;
            let _ = events.push(ShutoffEvent::Latched);
        }

        events
    }
}
