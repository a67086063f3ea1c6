// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn fake_clock_advances_epoch_and_instant_together() {
    let clock = FakeClock::new();
    let start_ms = clock.epoch_ms();
    let start_instant = clock.now();

    clock.advance(Duration::from_secs(5));

    assert_eq!(clock.epoch_ms(), start_ms + 5000);
    assert_eq!(clock.now(), start_instant + Duration::from_secs(5));
}

#[test]
fn fake_clock_set_epoch_ms_is_absolute() {
    let clock = FakeClock::new();
    clock.set_epoch_ms(42);
    assert_eq!(clock.epoch_ms(), 42);
}

#[test]
fn system_clock_epoch_ms_is_plausible() {
    let clock = SystemClock;
    // Any time after 2020-01-01 in ms since epoch.
    assert!(clock.epoch_ms() > 1_577_836_800_000);
}
