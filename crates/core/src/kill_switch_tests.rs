// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn starts_inactive() {
    let ks = MemoryKillSwitch::new();
    assert!(!ks.is_active());
}

#[test]
fn activate_and_deactivate_toggle_state() {
    let ks = MemoryKillSwitch::new();
    ks.activate();
    assert!(ks.is_active());
    ks.deactivate();
    assert!(!ks.is_active());
}

#[test]
fn clones_share_the_same_flag() {
    let ks = MemoryKillSwitch::new();
    let clone = ks.clone();
    clone.activate();
    assert!(ks.is_active());
}
