//! Integration tests: auto-shutoff timer driven through the controller.

use seatheat::app::events::SeatEvent;
use seatheat::zone::{HeatLevel, PerZone, Zone};

use crate::mock_hw::{Rig, valid_image};

const MIN: u32 = 60_000;

fn forced_off(rig: &Rig) -> usize {
    rig.sink
        .count(|e| matches!(e, SeatEvent::TimerForcedOff(_)))
}

#[test]
fn stored_level_switches_off_after_interval() {
    let mut rig = Rig::boot(valid_image(true, 3, HeatLevel::High, HeatLevel::Off));

    rig.tick();
    assert!(rig.sink.contains(&SeatEvent::TimerArmed {
        zone: Zone::Driver,
        minutes: 1,
    }));
    assert!(rig.ctl.timer_armed(Zone::Driver));
    assert!(!rig.ctl.timer_armed(Zone::Passenger));

    rig.wait(MIN / 2);
    assert_eq!(rig.ctl.level(Zone::Driver), HeatLevel::High);

    rig.wait(MIN / 2);
    assert_eq!(rig.ctl.level(Zone::Driver), HeatLevel::Off);
    assert!(rig.sink.contains(&SeatEvent::TimerForcedOff(Zone::Driver)));
    assert!(rig.sink.contains(&SeatEvent::TimerLatched));
    assert!(rig.ctl.timer_expired());
    assert!(!rig.sink.contains(&SeatEvent::TimerCancelled));
    assert!(!rig.hw.power);
    assert_eq!(rig.hw.active_outputs(Zone::Driver), 0);
}

#[test]
fn both_zones_time_out_together() {
    let mut rig = Rig::boot(valid_image(true, 3, HeatLevel::High, HeatLevel::Low));

    rig.tick();
    rig.wait(MIN + 10);

    assert!(rig.sink.contains(&SeatEvent::TimerForcedOff(Zone::Driver)));
    assert!(rig.sink.contains(&SeatEvent::TimerForcedOff(Zone::Passenger)));
    assert!(rig.ctl.levels().all_off());
    assert!(rig.ctl.timer_expired());
}

/// The device cancels BOTH zones' timers when either zone is changed by
/// hand.  Kept deliberately; this test pins it down.
#[test]
fn manual_change_on_one_zone_cancels_both_timers() {
    let mut rig = Rig::boot(valid_image(true, 3, HeatLevel::High, HeatLevel::Medium));
    rig.tick();
    assert!(rig.ctl.timer_armed(Zone::Driver));
    assert!(rig.ctl.timer_armed(Zone::Passenger));

    rig.click(Zone::Passenger);

    assert!(rig.sink.contains(&SeatEvent::TimerCancelled));
    assert!(!rig.ctl.timer_armed(Zone::Driver));
    assert!(!rig.ctl.timer_armed(Zone::Passenger));

    rig.wait(2 * MIN);
    assert_eq!(rig.ctl.level(Zone::Driver), HeatLevel::High);
    assert_eq!(rig.ctl.level(Zone::Passenger), HeatLevel::Low);
    assert_eq!(forced_off(&rig), 0);
}

#[test]
fn returning_to_stored_levels_rearms() {
    let mut rig = Rig::boot(valid_image(true, 3, HeatLevel::High, HeatLevel::Medium));
    rig.tick();

    // Passenger: Medium -> Low -> Off -> High, driver stays on throughout.
    rig.clicks(Zone::Passenger, 3);
    assert!(!rig.ctl.timer_armed(Zone::Driver));
    assert!(!rig.ctl.timer_armed(Zone::Passenger));
    rig.sink.clear();

    rig.click(Zone::Passenger);
    assert!(rig.ctl.timer_armed(Zone::Driver));
    assert!(rig.ctl.timer_armed(Zone::Passenger));
    assert_eq!(rig.sink.count(|e| matches!(e, SeatEvent::TimerArmed { .. })), 2);
}

#[test]
fn switching_both_off_by_hand_expires_timer() {
    let mut rig = Rig::boot(valid_image(true, 3, HeatLevel::High, HeatLevel::Off));
    rig.tick();

    rig.clicks(Zone::Driver, 3);
    assert!(rig.ctl.timer_expired());
    assert!(rig.sink.contains(&SeatEvent::TimerLatched));

    rig.click(Zone::Driver);
    rig.wait(2 * MIN);
    assert_eq!(rig.ctl.level(Zone::Driver), HeatLevel::High);
    assert_eq!(forced_off(&rig), 0);
}

#[test]
fn expired_latch_survives_resaving_auto_start() {
    let mut rig = Rig::boot(valid_image(true, 3, HeatLevel::High, HeatLevel::Off));
    rig.tick();
    rig.wait(MIN + 10);
    assert!(rig.ctl.timer_expired());

    rig.click(Zone::Driver);
    rig.hold(Zone::Driver);
    assert!(rig.sink.contains(&SeatEvent::AutoStartSaved(PerZone::new(
        HeatLevel::High,
        HeatLevel::Off
    ))));

    rig.wait(3 * MIN);
    assert_eq!(rig.ctl.level(Zone::Driver), HeatLevel::High);
    assert_eq!(forced_off(&rig), 1);
}

#[test]
fn interval_is_fixed_for_the_run() {
    // 15-minute interval at boot; the passenger hold picks 5 for next time.
    let mut rig = Rig::boot(valid_image(true, 0, HeatLevel::High, HeatLevel::Low));
    rig.tick();
    assert!(rig.sink.contains(&SeatEvent::TimerArmed {
        zone: Zone::Driver,
        minutes: 15,
    }));

    rig.hold(Zone::Passenger);
    assert!(rig.sink.contains(&SeatEvent::TimerSelectorSaved { minutes: 5 }));

    rig.wait(6 * MIN);
    assert_eq!(rig.ctl.level(Zone::Driver), HeatLevel::High);

    rig.wait(10 * MIN);
    assert_eq!(rig.ctl.level(Zone::Driver), HeatLevel::Off);
}

#[test]
fn feedback_blanking_does_not_cancel_timer() {
    let mut rig = Rig::boot(valid_image(true, 3, HeatLevel::High, HeatLevel::High));
    rig.tick();

    rig.hold(Zone::Passenger);

    assert!(!rig.sink.contains(&SeatEvent::TimerCancelled));
    assert!(rig.ctl.timer_armed(Zone::Driver));
    assert!(rig.ctl.timer_armed(Zone::Passenger));
}

#[test]
fn no_timer_without_auto_start() {
    let mut rig = Rig::boot(valid_image(false, 3, HeatLevel::Off, HeatLevel::Off));
    rig.click(Zone::Driver);

    rig.wait(20 * MIN);

    assert_eq!(rig.ctl.level(Zone::Driver), HeatLevel::High);
    assert_eq!(rig.sink.count(|e| matches!(e, SeatEvent::TimerArmed { .. })), 0);
}
