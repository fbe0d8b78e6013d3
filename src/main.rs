//! Seat heater firmware: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  HardwareAdapter    EepromAdapter   LogEventSink         │
//! │  (Button+Heater)    (NvStore)       (EventSink)          │
//! │  MonotonicClock                                          │
//! │  (Clock)                                                 │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ───────────────     │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │          SeatController (pure logic)               │  │
//! │  │  InputMonitor · HeatController · AutoShutoffTimer  │  │
//! │  │  PersistentConfig · FeedbackSignaler               │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pin map
//!
//! | GPIO | Direction | Function                      |
//! |------|-----------|-------------------------------|
//! | 2    | in        | Driver button (active high)   |
//! | 3    | in        | Passenger button (active high)|
//! | 4-6  | out       | Driver High / Medium / Low    |
//! | 7-9  | out       | Passenger High / Medium / Low |
//! | 10   | out       | Heater power enable           |
//! | 13   | out       | Heartbeat LED                 |
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyInputPin, Input, InputPin, OutputPin, PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use log::{info, warn};

use seatheat::adapters::eeprom::EepromAdapter;
use seatheat::adapters::hardware::HardwareAdapter;
use seatheat::adapters::log_sink::LogEventSink;
use seatheat::adapters::time::MonotonicClock;
use seatheat::app::ports::Clock;
use seatheat::app::service::SeatController;
use seatheat::config::ControllerConfig;
use seatheat::drivers::heartbeat::Heartbeat;
use seatheat::zone::PerZone;

fn button<'d>(pin: AnyInputPin) -> Result<PinDriver<'d, AnyInputPin, Input>> {
    let mut driver = PinDriver::input(pin)?;
    driver.set_pull(Pull::Down)?;
    Ok(driver)
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  SeatHeat v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = ControllerConfig::default();
    config.validate()?;

    // ── 2. Pins ───────────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;

    let buttons = PerZone::new(
        button(pins.gpio2.downgrade_input())?,
        button(pins.gpio3.downgrade_input())?,
    );
    let level_outputs = PerZone::new(
        [
            PinDriver::output(pins.gpio4.downgrade_output())?,
            PinDriver::output(pins.gpio5.downgrade_output())?,
            PinDriver::output(pins.gpio6.downgrade_output())?,
        ],
        [
            PinDriver::output(pins.gpio7.downgrade_output())?,
            PinDriver::output(pins.gpio8.downgrade_output())?,
            PinDriver::output(pins.gpio9.downgrade_output())?,
        ],
    );
    let power_enable = PinDriver::output(pins.gpio10.downgrade_output())?;
    let heartbeat_led = PinDriver::output(pins.gpio13.downgrade_output())?;

    let mut hw = HardwareAdapter::new(buttons, level_outputs, power_enable, heartbeat_led);

    // ── 3. Storage (or RAM-only fallback) ─────────────────────
    let mut store = match EepromAdapter::new() {
        Ok(s) => s,
        Err(e) => {
            warn!("NVS init failed ({}), running without persistence", e);
            EepromAdapter::erased()
        }
    };

    // ── 4. Controller ─────────────────────────────────────────
    let clock = MonotonicClock::new();
    let mut sink = LogEventSink::new();
    let mut controller = SeatController::boot(&config, &mut store, &mut hw, &mut sink);
    let mut heartbeat = Heartbeat::new(config.heartbeat_ms);

    info!("Entering main loop");

    // ── 5. Main loop ──────────────────────────────────────────
    loop {
        controller.tick(&mut hw, &mut store, &clock, &mut sink);

        if let Some(lit) = heartbeat.tick(clock.now_ms()) {
            hw.set_heartbeat(lit);
        }

        FreeRtos::delay_ms(config.poll_interval_ms);
    }
}
