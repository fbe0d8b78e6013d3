//! Integration tests: persisted configuration layout, migration and repair.

use seatheat::adapters::eeprom::EepromAdapter;
use seatheat::app::ports::NvStore;
use seatheat::config::EEPROM_SIZE;
use seatheat::persist::{
    AutoStartChange, PersistedConfig, PersistentConfig, SCHEMA_VERSION, TimerSelector,
    VerifiedStore,
};
use seatheat::zone::{HeatLevel, PerZone, Zone};

use crate::mock_hw::Rig;

#[test]
fn version_mismatch_wipes_and_resets() {
    let mut store = EepromAdapter::with_contents(&[7, 1, 2, 3, 3, 0xAA, 0xBB]);

    let outcome = PersistentConfig::new(&mut store).load().unwrap();
    assert_eq!(outcome.migrated_from, Some(7));
    assert_eq!(outcome.config, PersistedConfig::default());
    assert!(store.contents()[5..].iter().all(|b| *b == 0));

    let again = PersistentConfig::new(&mut store).load().unwrap();
    assert_eq!(again.migrated_from, None);
    assert!(!again.repaired);
    assert_eq!(again.config, outcome.config);
}

#[test]
fn out_of_range_fields_are_rewritten() {
    let mut store = EepromAdapter::with_contents(&[SCHEMA_VERSION, 1, 9, 2, 8]);

    let outcome = PersistentConfig::new(&mut store).load().unwrap();
    assert!(outcome.repaired);
    assert_eq!(outcome.migrated_from, None);
    assert_eq!(outcome.config.timer, TimerSelector::RESET);
    assert_eq!(outcome.config.heat, PerZone::new(HeatLevel::Medium, HeatLevel::Off));
    assert_eq!(&store.contents()[..5], &[1, 1, 3, 2, 0]);
}

#[test]
fn any_nonzero_byte_enables_auto_start() {
    let mut store = EepromAdapter::with_contents(&[SCHEMA_VERSION, 0x42, 0, 1, 1]);
    let outcome = PersistentConfig::new(&mut store).load().unwrap();
    assert!(outcome.config.auto_start);
    assert_eq!(outcome.config.timer.minutes(), 15);
}

#[test]
fn saving_both_off_clears_everything() {
    let mut store = EepromAdapter::with_contents(&[SCHEMA_VERSION, 1, 0, 1, 2]);

    let change = PersistentConfig::new(&mut store)
        .save_auto_start(PerZone::splat(HeatLevel::Off))
        .unwrap();
    assert_eq!(change, AutoStartChange::Cleared);
    assert_eq!(&store.contents()[..5], &[1, 0, 3, 0, 0]);
}

#[test]
fn saving_levels_keeps_selector() {
    let mut store = EepromAdapter::with_contents(&[SCHEMA_VERSION, 0, 1, 0, 0]);
    let levels = PerZone::new(HeatLevel::Medium, HeatLevel::High);

    let change = PersistentConfig::new(&mut store).save_auto_start(levels).unwrap();
    assert_eq!(change, AutoStartChange::Saved(levels));
    assert_eq!(&store.contents()[..5], &[1, 1, 1, 2, 1]);
}

#[test]
fn selector_follows_passenger_level() {
    let mut store = EepromAdapter::with_contents(&[SCHEMA_VERSION, 0, 1, 0, 0]);
    let mut persist = PersistentConfig::new(&mut store);

    for (level, raw, minutes) in [
        (HeatLevel::High, 0, 15),
        (HeatLevel::Medium, 1, 10),
        (HeatLevel::Low, 2, 5),
        (HeatLevel::Off, 3, 1),
    ] {
        let selector = persist.save_timer_selector(level).unwrap();
        assert_eq!(selector.raw(), raw);
        assert_eq!(selector.minutes(), minutes);
    }
    assert_eq!(store.read(2), Ok(3));
}

#[test]
fn verified_store_passes_through_healthy_backend() {
    let mut store = VerifiedStore::new(EepromAdapter::erased());

    let outcome = PersistentConfig::new(&mut store).load().unwrap();
    assert_eq!(outcome.migrated_from, Some(0xFF));
    assert_eq!(store.capacity(), EEPROM_SIZE);
    assert_eq!(&store.into_inner().contents()[..5], &[1, 0, 3, 0, 0]);
}

#[test]
fn saved_levels_come_back_after_reboot() {
    let mut rig = Rig::boot(EepromAdapter::erased());
    rig.click(Zone::Driver);
    rig.clicks(Zone::Passenger, 3);
    rig.hold(Zone::Driver);

    let rig = Rig::boot(rig.store);
    assert_eq!(rig.ctl.level(Zone::Driver), HeatLevel::High);
    assert_eq!(rig.ctl.level(Zone::Passenger), HeatLevel::Low);
    assert!(rig.hw.power);
}

#[test]
fn cleared_auto_start_boots_cold() {
    let mut rig = Rig::boot(EepromAdapter::erased());
    rig.click(Zone::Driver);
    rig.hold(Zone::Driver);
    rig.clicks(Zone::Driver, 3);
    rig.hold(Zone::Driver);

    let rig = Rig::boot(rig.store);
    assert_eq!(rig.ctl.levels(), PerZone::splat(HeatLevel::Off));
    assert!(!rig.hw.power);
}
