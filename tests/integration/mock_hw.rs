//! Mock adapters for integration tests.
//!
//! `MockHardware` models the pins as plain state (scripted button levels,
//! live output levels) and records every heater call so tests can assert
//! on both the end state and the command history.

use std::cell::Cell;

use seatheat::adapters::eeprom::EepromAdapter;
use seatheat::app::events::SeatEvent;
use seatheat::app::ports::{ButtonPort, Clock, EventSink, HeaterPort, NvStore, StorageError};
use seatheat::app::service::SeatController;
use seatheat::config::ControllerConfig;
use seatheat::zone::{HeatLevel, PerZone, Zone};

// ── Heater call record ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeaterCall {
    Power(bool),
    Activate(Zone, HeatLevel),
    Deactivate(Zone),
}

// ── MockHardware ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockHardware {
    pub buttons: PerZone<bool>,
    pub power: bool,
    pub outputs: PerZone<[bool; 3]>,
    pub calls: Vec<HeaterCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of level outputs currently driven for `zone`.
    pub fn active_outputs(&self, zone: Zone) -> usize {
        self.outputs[zone].iter().filter(|on| **on).count()
    }

    /// Level indicated by the outputs of `zone`, `Off` if none is driven.
    pub fn shown_level(&self, zone: Zone) -> HeatLevel {
        self.outputs[zone]
            .iter()
            .position(|on| *on)
            .map_or(HeatLevel::Off, |slot| HeatLevel::ACTIVE[slot])
    }
}

impl ButtonPort for MockHardware {
    fn button_pressed(&mut self, zone: Zone) -> bool {
        self.buttons[zone]
    }
}

impl HeaterPort for MockHardware {
    fn set_power_enable(&mut self, on: bool) {
        self.power = on;
        self.calls.push(HeaterCall::Power(on));
    }

    fn activate_level(&mut self, zone: Zone, level: HeatLevel) {
        if let Some(slot) = level.output_slot() {
            self.outputs[zone][slot] = true;
        }
        self.calls.push(HeaterCall::Activate(zone, level));
    }

    fn deactivate_zone(&mut self, zone: Zone) {
        self.outputs[zone] = [false; 3];
        self.calls.push(HeaterCall::Deactivate(zone));
    }
}

// ── Clock ─────────────────────────────────────────────────────

/// Manually driven clock that also creeps forward on every read, so
/// busy-waits inside feedback playback terminate.
pub struct StepClock {
    now: Cell<u32>,
    step: u32,
}

#[allow(dead_code)]
impl StepClock {
    pub fn starting_at(now: u32) -> Self {
        Self {
            now: Cell::new(now),
            step: 1,
        }
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }

    pub fn peek(&self) -> u32 {
        self.now.get()
    }
}

impl Clock for StepClock {
    fn now_ms(&self) -> u32 {
        let now = self.now.get();
        self.now.set(now.wrapping_add(self.step));
        now
    }
}

// ── Stores ────────────────────────────────────────────────────

/// Store whose writes always fail; reads come from a fixed image.
pub struct ReadOnlyStore(pub EepromAdapter);

impl NvStore for ReadOnlyStore {
    fn capacity(&self) -> usize {
        self.0.capacity()
    }

    fn read(&self, address: usize) -> Result<u8, StorageError> {
        self.0.read(address)
    }

    fn write(&mut self, _address: usize, _value: u8) -> Result<(), StorageError> {
        Err(StorageError::IoError(-1))
    }
}

/// Store image that passes validation untouched.
#[allow(dead_code)]
pub fn valid_image(auto_start: bool, selector: u8, driver: HeatLevel, passenger: HeatLevel) -> EepromAdapter {
    EepromAdapter::with_contents(&[
        1,
        u8::from(auto_start),
        selector,
        driver.raw(),
        passenger.raw(),
    ])
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<SeatEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn contains(&self, event: &SeatEvent) -> bool {
        self.events.contains(event)
    }

    pub fn count(&self, pred: impl Fn(&SeatEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &SeatEvent) {
        self.events.push(event.clone());
    }
}

// ── Rig ───────────────────────────────────────────────────────

/// Controller plus every adapter it talks to, with gesture helpers.
pub struct Rig<S: NvStore = EepromAdapter> {
    pub ctl: SeatController,
    pub hw: MockHardware,
    pub store: S,
    pub clock: StepClock,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl<S: NvStore> Rig<S> {
    pub fn boot(mut store: S) -> Self {
        let mut hw = MockHardware::new();
        let mut sink = RecordingSink::default();
        let ctl = SeatController::boot(&ControllerConfig::default(), &mut store, &mut hw, &mut sink);
        Self {
            ctl,
            hw,
            store,
            clock: StepClock::starting_at(1_000),
            sink,
        }
    }

    pub fn tick(&mut self) {
        self.ctl
            .tick(&mut self.hw, &mut self.store, &self.clock, &mut self.sink);
    }

    /// Idle for `ms`, then run one cycle.
    pub fn wait(&mut self, ms: u32) {
        self.clock.advance(ms);
        self.tick();
    }

    /// Short press-release, spaced well clear of the previous click.
    pub fn click(&mut self, zone: Zone) {
        self.hw.buttons[zone] = true;
        self.wait(100);
        self.hw.buttons[zone] = false;
        self.wait(100);
    }

    /// Press and keep holding past the threshold.
    pub fn press_past_hold(&mut self, zone: Zone) {
        self.hw.buttons[zone] = true;
        self.wait(100);
        self.wait(700);
    }

    pub fn release(&mut self, zone: Zone) {
        self.hw.buttons[zone] = false;
        self.wait(50);
    }

    /// Press, hold past the threshold, release.
    pub fn hold(&mut self, zone: Zone) {
        self.press_past_hold(zone);
        self.release(zone);
    }

    pub fn clicks(&mut self, zone: Zone, n: usize) {
        for _ in 0..n {
            self.click(zone);
        }
    }
}
