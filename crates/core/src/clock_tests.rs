// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{Clock, FakeClock};
use std::time::Duration;

#[test]
fn advance_moves_both_monotonic_and_wall_clock() {
    let clock = FakeClock::new();
    let start_monotonic = clock.now();
    let start_wall = clock.system_now();

    clock.advance(Duration::from_secs(5));

    assert_eq!(clock.now() - start_monotonic, Duration::from_secs(5));
    assert_eq!(
        clock.system_now().duration_since(start_wall).unwrap(),
        Duration::from_secs(5)
    );
}

#[test]
fn set_system_time_does_not_affect_monotonic() {
    let clock = FakeClock::new();
    let start_monotonic = clock.now();
    clock.set_system_time(std::time::SystemTime::UNIX_EPOCH);
    assert_eq!(clock.now(), start_monotonic);
    assert_eq!(clock.system_now(), std::time::SystemTime::UNIX_EPOCH);
}
