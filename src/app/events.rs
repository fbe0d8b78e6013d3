//! Outbound controller events.
//!
//! The [`SeatController`](super::service::SeatController) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them (serial log today).

use crate::drivers::feedback::BlinkPattern;
use crate::persist::PersistedConfig;
use crate::zone::{HeatLevel, PerZone, Zone};

use super::ports::StorageError;

/// Structured events emitted by the controller core.
#[derive(Debug, Clone, PartialEq)]
pub enum SeatEvent {
    /// The controller finished booting (carries the loaded configuration
    /// and the levels it restored).
    Started {
        persisted: PersistedConfig,
        levels: PerZone<HeatLevel>,
    },

    /// A zone moved to a new level through a click.
    LevelChanged {
        zone: Zone,
        from: HeatLevel,
        to: HeatLevel,
    },

    /// Overall power-enable output changed.
    PowerChanged(bool),

    /// A press-and-hold gesture was recognised.
    PressHold(Zone),

    /// Auto-start enabled with these levels.
    AutoStartSaved(PerZone<HeatLevel>),

    /// Auto-start disabled and saved levels cleared.
    AutoStartCleared,

    /// A new shutoff interval was stored (effective next boot).
    TimerSelectorSaved { minutes: u8 },

    /// Shutoff countdown started for a zone.
    TimerArmed { zone: Zone, minutes: u8 },

    /// A manual change cancelled both zones' countdowns.
    TimerCancelled,

    /// Countdown elapsed and the zone was switched off.
    TimerForcedOff(Zone),

    /// Both zones are off; the shutoff timer is done for this run.
    TimerLatched,

    /// Stored schema version did not match; the store was wiped.
    StoreMigrated { found_version: u8 },

    /// An out-of-range stored value was replaced with its default.
    StoreRepaired,

    /// A storage operation failed.
    StorageFailed(StorageError),

    /// A feedback blink pattern finished playing.
    FeedbackPlayed { zone: Zone, pattern: BlinkPattern },
}
