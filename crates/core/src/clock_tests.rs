// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_advances() {
    let clock = FakeClock::new();
    let start = clock.now();

    clock.advance(Duration::seconds(90));

    assert_eq!(clock.now() - start, Duration::seconds(90));
    assert_eq!(clock.epoch_ms(), start.timestamp_millis() as u64 + 90_000);
}

#[test]
fn fake_clock_set_overrides() {
    let clock = FakeClock::new();
    let target = DateTime::from_timestamp(1_800_000_000, 0).unwrap();

    clock.set(target);

    assert_eq!(clock.now(), target);
}

#[test]
fn fake_clock_clones_share_time() {
    let clock = FakeClock::new();
    let other = clock.clone();

    clock.advance(Duration::seconds(5));

    assert_eq!(clock.now(), other.now());
}

#[test]
fn system_clock_is_monotonic_enough() {
    let clock = SystemClock;
    let a = clock.now();
    let b = clock.now();
    assert!(b >= a);
}
