//! Seat controller service: the hexagonal core.
//!
//! [`SeatController`] owns the input monitor, heat controller, shutoff
//! timer and feedback player.  It exposes a hardware-agnostic API; all
//! I/O flows through port traits injected at call sites, making the
//! whole control cycle testable with mock adapters.
//!
//! ```text
//!   ButtonPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                  │      SeatController      │
//!   HeaterPort ◀── │ Input · Heat · Shutoff   │ ◀─▶ NvStore
//!                  └──────────────────────────┘ ◀── Clock
//! ```

use log::{info, warn};

use crate::config::ControllerConfig;
use crate::control::heat::HeatController;
use crate::control::shutoff::{AutoShutoffTimer, ShutoffEvent};
use crate::drivers::button::{ButtonEvent, InputMonitor};
use crate::drivers::feedback::{BlinkPattern, FeedbackSignaler};
use crate::persist::{AutoStartChange, PersistedConfig, PersistentConfig};
use crate::zone::{HeatLevel, PerZone, Zone};

use super::events::SeatEvent;
use super::ports::{ButtonPort, Clock, EventSink, HeaterPort, NvStore};

// ───────────────────────────────────────────────────────────────
// SeatController
// ───────────────────────────────────────────────────────────────

/// The controller orchestrates all domain logic for one control cycle.
pub struct SeatController {
    buttons: InputMonitor,
    heat: HeatController,
    shutoff: AutoShutoffTimer,
    feedback: FeedbackSignaler,
    powered: bool,
}

impl SeatController {
    /// Load the persisted configuration, restore auto-start levels and
    /// drive the outputs once.
    ///
    /// A store that cannot be read at all leaves the controller on
    /// defaults (everything Off, auto-start disabled).
    pub fn boot(
        config: &ControllerConfig,
        store: &mut impl NvStore,
        hw: &mut impl HeaterPort,
        sink: &mut impl EventSink,
    ) -> Self {
        let persisted = match PersistentConfig::new(store).load() {
            Ok(outcome) => {
                if let Some(found_version) = outcome.migrated_from {
                    sink.emit(&SeatEvent::StoreMigrated { found_version });
                }
                if outcome.repaired {
                    sink.emit(&SeatEvent::StoreRepaired);
                }
                outcome.config
            }
            Err(e) => {
                warn!("SeatController: config load failed ({}), using defaults", e);
                sink.emit(&SeatEvent::StorageFailed(e));
                PersistedConfig::default()
            }
        };

        let levels = if persisted.auto_start {
            persisted.heat
        } else {
            PerZone::splat(HeatLevel::Off)
        };

        let heat = HeatController::new(levels);
        let powered = heat.apply_outputs(hw);

        sink.emit(&SeatEvent::Started { persisted, levels });
        info!("SeatController started with levels {:?}", levels);

        Self {
            buttons: InputMonitor::new(config),
            heat,
            shutoff: AutoShutoffTimer::new(persisted.auto_start, persisted.timer, persisted.heat),
            feedback: FeedbackSignaler::new(config),
            powered,
        }
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full control cycle: sample buttons → dispatch gestures →
    /// apply outputs → shutoff timer.
    ///
    /// The `hw` parameter satisfies **both** [`ButtonPort`] and
    /// [`HeaterPort`]; one adapter owns every pin.
    pub fn tick(
        &mut self,
        hw: &mut (impl ButtonPort + HeaterPort),
        store: &mut impl NvStore,
        clock: &impl Clock,
        sink: &mut impl EventSink,
    ) {
        let now_ms = clock.now_ms();

        for event in self.buttons.poll_all(hw, now_ms) {
            self.handle_button(event, hw, store, clock, sink);
        }

        self.refresh(hw, clock.now_ms(), sink);
    }

    /// Apply outputs and, while auto-start is active, evaluate the
    /// shutoff timer.
    pub fn refresh(&mut self, hw: &mut impl HeaterPort, now_ms: u32, sink: &mut impl EventSink) {
        self.apply(hw, sink);

        if !self.shutoff.is_active() {
            return;
        }

        let mut forced = false;
        for event in self.shutoff.evaluate(&mut self.heat, now_ms) {
            let out = match event {
                ShutoffEvent::Armed { zone, minutes } => SeatEvent::TimerArmed { zone, minutes },
                ShutoffEvent::Cancelled => SeatEvent::TimerCancelled,
                ShutoffEvent::ForcedOff(zone) => {
                    forced = true;
                    SeatEvent::TimerForcedOff(zone)
                }
                ShutoffEvent::Latched => SeatEvent::TimerLatched,
            };
            sink.emit(&out);
        }

        if forced {
            self.apply(hw, sink);
        }
    }

    // ── Gesture handling ──────────────────────────────────────

    fn handle_button(
        &mut self,
        event: ButtonEvent,
        hw: &mut impl HeaterPort,
        store: &mut impl NvStore,
        clock: &impl Clock,
        sink: &mut impl EventSink,
    ) {
        match event {
            ButtonEvent::SingleClick(zone) => {
                let from = self.heat.level(zone);
                let to = self.heat.on_single_click(zone);
                sink.emit(&SeatEvent::LevelChanged { zone, from, to });
            }
            ButtonEvent::PressHold(zone) => {
                sink.emit(&SeatEvent::PressHold(zone));
                let pattern = self.save_for(zone, store, sink);
                self.feedback.play(pattern, zone, &mut self.heat, hw, clock);
                sink.emit(&SeatEvent::FeedbackPlayed { zone, pattern });
            }
        }
    }

    /// Persist the press-hold action for `zone` and pick the pattern that
    /// acknowledges it.
    fn save_for(
        &mut self,
        zone: Zone,
        store: &mut impl NvStore,
        sink: &mut impl EventSink,
    ) -> BlinkPattern {
        let mut persist = PersistentConfig::new(store);

        let result = match zone {
            Zone::Driver => persist.save_auto_start(self.heat.levels()).map(|change| {
                match change {
                    AutoStartChange::Saved(levels) => {
                        self.shutoff.on_auto_start_saved(levels);
                        sink.emit(&SeatEvent::AutoStartSaved(levels));
                        BlinkPattern::On
                    }
                    AutoStartChange::Cleared => {
                        self.shutoff.on_auto_start_cleared();
                        sink.emit(&SeatEvent::AutoStartCleared);
                        BlinkPattern::Off
                    }
                }
            }),
            Zone::Passenger => persist
                .save_timer_selector(self.heat.level(Zone::Passenger))
                .map(|selector| {
                    sink.emit(&SeatEvent::TimerSelectorSaved {
                        minutes: selector.minutes(),
                    });
                    BlinkPattern::Toggle
                }),
        };

        result.unwrap_or_else(|e| {
            warn!("SeatController: save for {} failed: {}", zone.name(), e);
            sink.emit(&SeatEvent::StorageFailed(e));
            BlinkPattern::Error
        })
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn level(&self, zone: Zone) -> HeatLevel {
        self.heat.level(zone)
    }

    pub fn levels(&self) -> PerZone<HeatLevel> {
        self.heat.levels()
    }

    /// Whether the power-enable output is currently driven.
    pub fn is_powered(&self) -> bool {
        self.powered
    }

    pub fn timer_armed(&self, zone: Zone) -> bool {
        self.shutoff.is_armed(zone)
    }

    /// The shutoff timer has latched for the rest of this run.
    pub fn timer_expired(&self) -> bool {
        self.shutoff.is_expired()
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply(&mut self, hw: &mut impl HeaterPort, sink: &mut impl EventSink) {
        let powered = self.heat.apply_outputs(hw);
        if powered != self.powered {
            self.powered = powered;
            sink.emit(&SeatEvent::PowerChanged(powered));
        }
    }
}
