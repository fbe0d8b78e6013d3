//! Fuzz target: `PersistentConfig::load`
//!
//! Loads arbitrary store images and asserts that the result is always a
//! valid configuration and that the store is settled afterwards: a second
//! load neither migrates nor repairs and returns the same values.
//!
//! cargo fuzz run fuzz_persisted_load

#![no_main]

use libfuzzer_sys::fuzz_target;
use seatheat::adapters::eeprom::EepromAdapter;
use seatheat::persist::{PersistentConfig, SCHEMA_VERSION};
use seatheat::zone::HeatLevel;

fuzz_target!(|data: &[u8]| {
    let mut store = EepromAdapter::with_contents(data);

    let first = match PersistentConfig::new(&mut store).load() {
        Ok(outcome) => outcome,
        Err(e) => panic!("in-memory store must not fail: {e}"),
    };
    assert_eq!(first.config.schema_version, SCHEMA_VERSION);
    for (_, level) in first.config.heat.iter() {
        assert!(HeatLevel::from_raw(level.raw()).is_some());
    }
    assert!([15, 10, 5, 1].contains(&first.config.timer.minutes()));

    let second = PersistentConfig::new(&mut store)
        .load()
        .expect("second load");
    assert_eq!(second.migrated_from, None);
    assert!(!second.repaired);
    assert_eq!(second.config, first.config);
});
