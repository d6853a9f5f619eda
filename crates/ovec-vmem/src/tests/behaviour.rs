// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::behaviour::{INJECTED_ERROR_CODE, VmemBehaviour, behaviour, set_behaviour};
use crate::error::ReserveError;
use crate::guarded::{acquire, try_acquire};

#[test]
fn test_default_behaviour_is_none() {
    assert_eq!(behaviour(), VmemBehaviour::None);
}

#[test]
fn test_fail_at_reserve_refuses() {
    set_behaviour(VmemBehaviour::FailAtReserve);

    let result = try_acquire(4096, 1);
    assert!(matches!(result, Err(ReserveError::Refused(INJECTED_ERROR_CODE))));
    assert!(acquire(4096, 1).is_null());

    set_behaviour(VmemBehaviour::None);
}

#[test]
fn test_behaviour_is_sticky_until_reset() {
    set_behaviour(VmemBehaviour::FailAtReserve);

    assert!(acquire(1, 1).is_null());
    assert!(acquire(1, 1).is_null());

    set_behaviour(VmemBehaviour::None);

    let ptr = try_acquire(1, 1).expect("Failed to try_acquire(..)");
    unsafe { crate::guarded::release(ptr, 1, 1) };
}

#[test]
fn test_behaviour_is_thread_local() {
    set_behaviour(VmemBehaviour::FailAtReserve);

    let other = std::thread::spawn(behaviour)
        .join()
        .expect("Failed to join()");

    assert_eq!(other, VmemBehaviour::None);

    set_behaviour(VmemBehaviour::None);
}
