//! Per-zone heat level state and output application.
//!
//! The controller holds the live level for each zone and translates it
//! into heater outputs.  Power-enable follows "any zone on".  A zone's
//! level outputs are always cleared before the selected one is driven,
//! so two levels of the same zone are never energised together.

use log::trace;

use crate::app::ports::HeaterPort;
use crate::zone::{HeatLevel, PerZone, Zone};

pub struct HeatController {
    levels: PerZone<HeatLevel>,
}

impl HeatController {
    pub fn new(levels: PerZone<HeatLevel>) -> Self {
        Self { levels }
    }

    /// Advance `zone` by one level, wrapping Low → Off.
    pub fn on_single_click(&mut self, zone: Zone) -> HeatLevel {
        let next = self.levels[zone].next();
        self.levels[zone] = next;
        next
    }

    pub fn set_level(&mut self, zone: Zone, level: HeatLevel) {
        self.levels[zone] = level;
    }

    pub fn level(&self, zone: Zone) -> HeatLevel {
        self.levels[zone]
    }

    pub fn levels(&self) -> PerZone<HeatLevel> {
        self.levels
    }

    /// Overall power: on while either zone is above Off.
    pub fn is_powered(&self) -> bool {
        !self.levels.all_off()
    }

    /// Drive `hw` to match the current levels.  Returns the power state
    /// that was applied.
    pub fn apply_outputs(&self, hw: &mut impl HeaterPort) -> bool {
        let powered = self.is_powered();
        trace!("heat: apply outputs power={} levels={:?}", powered, self.levels);

        if powered {
            hw.set_power_enable(true);
            for (zone, level) in self.levels.iter() {
                hw.deactivate_zone(zone);
                if !level.is_off() {
                    hw.activate_level(zone, *level);
                }
            }
        } else {
            for zone in Zone::ALL {
                hw.deactivate_zone(zone);
            }
            hw.set_power_enable(false);
        }

        powered
    }
}
