//! Seat zones and heat levels.
//!
//! The hardware exposes exactly two independently heated sides and four
//! discrete levels per side.  Both are closed enums so no out-of-range
//! state can be constructed; raw bytes from storage go through
//! [`HeatLevel::from_raw`].

use core::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// One independently controlled side of the seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Zone {
    Driver = 0,
    Passenger = 1,
}

impl Zone {
    /// Both zones, in storage / polling order.
    pub const ALL: [Zone; 2] = [Zone::Driver, Zone::Passenger];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Driver => "driver",
            Self::Passenger => "passenger",
        }
    }
}

/// Discrete heat output.  Clicking cycles Off → High → Medium → Low → Off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum HeatLevel {
    #[default]
    Off = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl HeatLevel {
    /// Non-off levels, in output-slot order.
    pub const ACTIVE: [HeatLevel; 3] = [HeatLevel::High, HeatLevel::Medium, HeatLevel::Low];

    /// Decode a stored byte.  Anything above 3 is rejected.
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Off),
            1 => Some(Self::High),
            2 => Some(Self::Medium),
            3 => Some(Self::Low),
            _ => None,
        }
    }

    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// The level one click further along, wrapping Low back to Off.
    pub const fn next(self) -> Self {
        match self {
            Self::Off => Self::High,
            Self::High => Self::Medium,
            Self::Medium => Self::Low,
            Self::Low => Self::Off,
        }
    }

    pub const fn is_off(self) -> bool {
        matches!(self, Self::Off)
    }

    /// Index of this level's output line within a zone (High = 0).
    /// `None` for Off, which has no output of its own.
    pub const fn output_slot(self) -> Option<usize> {
        match self {
            Self::Off => None,
            Self::High => Some(0),
            Self::Medium => Some(1),
            Self::Low => Some(2),
        }
    }
}

/// A value per zone, indexed by [`Zone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerZone<T>([T; 2]);

impl<T> PerZone<T> {
    pub const fn new(driver: T, passenger: T) -> Self {
        Self([driver, passenger])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Zone, &T)> {
        Zone::ALL.into_iter().zip(self.0.iter())
    }
}

impl<T: Copy> PerZone<T> {
    pub const fn splat(value: T) -> Self {
        Self([value, value])
    }
}

impl PerZone<HeatLevel> {
    pub fn all_off(&self) -> bool {
        self.0.iter().all(|l| l.is_off())
    }
}

impl<T> Index<Zone> for PerZone<T> {
    type Output = T;

    fn index(&self, zone: Zone) -> &T {
        &self.0[zone.index()]
    }
}

impl<T> IndexMut<Zone> for PerZone<T> {
    fn index_mut(&mut self, zone: Zone) -> &mut T {
        &mut self.0[zone.index()]
    }
}
