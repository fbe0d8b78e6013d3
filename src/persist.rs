//! Versioned auto-start configuration in non-volatile memory.
//!
//! ## Layout
//!
//! | Address | Field            | Valid values        |
//! |---------|------------------|---------------------|
//! | 0       | schema version   | [`SCHEMA_VERSION`]  |
//! | 1       | auto-start       | 0 = off, else on    |
//! | 2       | timer selector   | 0..=3               |
//! | 3       | driver level     | 0..=3               |
//! | 4       | passenger level  | 0..=3               |
//!
//! A schema mismatch wipes the whole store before any field is read.
//! Out-of-range fields are replaced with their default and written back
//! immediately.  Writes are not read back unless the store is wrapped in
//! [`VerifiedStore`].

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::{NvStore, StorageError};
use crate::config::{TIMER_INTERVALS_MIN, TIMER_SELECTOR_RESET};
use crate::zone::{HeatLevel, PerZone, Zone};

pub const SCHEMA_VERSION: u8 = 1;

const ADDR_SCHEMA_VERSION: usize = 0;
const ADDR_AUTO_START: usize = 1;
const ADDR_TIMER_SELECTOR: usize = 2;
const ADDR_HEAT_BASE: usize = 3;

const fn heat_addr(zone: Zone) -> usize {
    ADDR_HEAT_BASE + zone.index()
}

// ---------------------------------------------------------------------------
// Timer selector
// ---------------------------------------------------------------------------

/// Index into [`TIMER_INTERVALS_MIN`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerSelector(u8);

impl TimerSelector {
    /// The shortest interval, used after a reset.
    pub const RESET: Self = Self(TIMER_SELECTOR_RESET);

    pub const fn new(raw: u8) -> Option<Self> {
        if (raw as usize) < TIMER_INTERVALS_MIN.len() {
            Some(Self(raw))
        } else {
            None
        }
    }

    /// Passenger level doubles as the interval choice: High picks the
    /// longest interval, Low the shortest, Off resets.
    pub const fn from_level(level: HeatLevel) -> Self {
        match level {
            HeatLevel::Off => Self::RESET,
            other => Self(other.raw() - 1),
        }
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    pub const fn minutes(self) -> u8 {
        TIMER_INTERVALS_MIN[self.0 as usize]
    }
}

// ---------------------------------------------------------------------------
// Persisted record
// ---------------------------------------------------------------------------

/// Validated contents of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedConfig {
    pub schema_version: u8,
    pub auto_start: bool,
    pub timer: TimerSelector,
    pub heat: PerZone<HeatLevel>,
}

impl Default for PersistedConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            auto_start: false,
            timer: TimerSelector::RESET,
            heat: PerZone::splat(HeatLevel::Off),
        }
    }
}

/// Result of [`PersistentConfig::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOutcome {
    pub config: PersistedConfig,
    /// Version byte found before a wipe, if the store was migrated.
    pub migrated_from: Option<u8>,
    /// At least one field was out of range and rewritten.
    pub repaired: bool,
}

/// What a driver press-hold did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoStartChange {
    Saved(PerZone<HeatLevel>),
    Cleared,
}

// ---------------------------------------------------------------------------
// PersistentConfig
// ---------------------------------------------------------------------------

/// Typed view over a byte store.
pub struct PersistentConfig<'a, S: NvStore> {
    store: &'a mut S,
}

impl<'a, S: NvStore> PersistentConfig<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Read and validate the stored configuration, migrating or repairing
    /// the store in place as needed.
    pub fn load(&mut self) -> Result<LoadOutcome, StorageError> {
        let found = self.store.read(ADDR_SCHEMA_VERSION)?;
        let migrated_from = if found == SCHEMA_VERSION {
            None
        } else {
            warn!(
                "persist: schema version {} != {}, clearing store",
                found, SCHEMA_VERSION
            );
            self.reset()?;
            Some(found)
        };

        let auto_start = self.store.read(ADDR_AUTO_START)? != 0;
        let mut repaired = false;

        let raw_timer = self.store.read(ADDR_TIMER_SELECTOR)?;
        let timer = if let Some(timer) = TimerSelector::new(raw_timer) {
            timer
        } else {
            warn!("persist: timer selector {} out of range, reset", raw_timer);
            self.store.write(ADDR_TIMER_SELECTOR, TimerSelector::RESET.raw())?;
            repaired = true;
            TimerSelector::RESET
        };

        let mut heat = PerZone::splat(HeatLevel::Off);
        for zone in Zone::ALL {
            let raw = self.store.read(heat_addr(zone))?;
            if let Some(level) = HeatLevel::from_raw(raw) {
                heat[zone] = level;
            } else {
                warn!("persist: {} level {} out of range, cleared", zone.name(), raw);
                self.store.write(heat_addr(zone), HeatLevel::Off.raw())?;
                repaired = true;
            }
        }

        let config = PersistedConfig {
            schema_version: SCHEMA_VERSION,
            auto_start,
            timer,
            heat,
        };
        info!(
            "persist: loaded auto_start={} timer={}min levels={:?}",
            config.auto_start,
            config.timer.minutes(),
            config.heat
        );

        Ok(LoadOutcome {
            config,
            migrated_from,
            repaired,
        })
    }

    /// Driver press-hold.  Both zones Off clears auto-start entirely;
    /// otherwise auto-start is enabled with both live levels.
    pub fn save_auto_start(
        &mut self,
        levels: PerZone<HeatLevel>,
    ) -> Result<AutoStartChange, StorageError> {
        if levels.all_off() {
            self.store.write(ADDR_AUTO_START, 0)?;
            self.store
                .write(ADDR_TIMER_SELECTOR, TimerSelector::RESET.raw())?;
            for zone in Zone::ALL {
                self.store.write(heat_addr(zone), HeatLevel::Off.raw())?;
            }
            info!("persist: auto-start disabled, timer reset");
            return Ok(AutoStartChange::Cleared);
        }

        self.store.write(ADDR_AUTO_START, 1)?;
        for (zone, level) in levels.iter() {
            self.store.write(heat_addr(zone), level.raw())?;
        }
        info!("persist: auto-start enabled with {:?}", levels);
        Ok(AutoStartChange::Saved(levels))
    }

    /// Passenger press-hold.  The passenger level picks the interval.
    pub fn save_timer_selector(
        &mut self,
        passenger: HeatLevel,
    ) -> Result<TimerSelector, StorageError> {
        let selector = TimerSelector::from_level(passenger);
        self.store.write(ADDR_TIMER_SELECTOR, selector.raw())?;
        info!("persist: timer interval set to {} min", selector.minutes());
        Ok(selector)
    }

    /// Destructive one-way migration: zero everything, then write defaults.
    fn reset(&mut self) -> Result<(), StorageError> {
        for addr in 0..self.store.capacity() {
            self.store.write(addr, 0)?;
        }
        self.store.write(ADDR_SCHEMA_VERSION, SCHEMA_VERSION)?;
        self.store.write(ADDR_AUTO_START, 0)?;
        self.store
            .write(ADDR_TIMER_SELECTOR, TimerSelector::RESET.raw())?;
        for zone in Zone::ALL {
            self.store.write(heat_addr(zone), HeatLevel::Off.raw())?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Optional write verification
// ---------------------------------------------------------------------------

/// Wraps a store and reads every write back.  Adds one read per write.
pub struct VerifiedStore<S> {
    inner: S,
}

impl<S: NvStore> VerifiedStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: NvStore> NvStore for VerifiedStore<S> {
    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    fn read(&self, address: usize) -> Result<u8, StorageError> {
        self.inner.read(address)
    }

    fn write(&mut self, address: usize, value: u8) -> Result<(), StorageError> {
        self.inner.write(address, value)?;
        if self.inner.read(address)? == value {
            Ok(())
        } else {
            Err(StorageError::VerifyFailed(address))
        }
    }
}
