// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Tests for acquire / try_acquire / release against the real OS backend.

use core::ptr::NonNull;

use crate::error::ReserveError;
use crate::guarded::{acquire, release, try_acquire};
use crate::os::page_size;

fn distance_to_page_boundary(ptr: *const u8) -> usize {
    let page = page_size();
    let addr = ptr as usize;

    addr.next_multiple_of(page) - addr
}

// =============================================================================
// acquire()
// =============================================================================

#[test]
fn test_acquire_zero_size_returns_null() {
    assert!(acquire(0, 0).is_null());
    assert!(acquire(0, 1).is_null());
}

#[test]
fn test_acquire_overflowing_size_returns_null() {
    assert!(acquire(usize::MAX, 1).is_null());
    assert!(acquire(1, usize::MAX).is_null());
    assert!(acquire(usize::MAX / 2 + 1, usize::MAX / 2 + 1).is_null());
}

#[test]
fn test_acquire_returns_non_null_for_small_sizes() {
    let ptr = acquire(1, 1);
    assert!(!ptr.is_null());

    unsafe { release(NonNull::new_unchecked(ptr), 1, 1) };
}

// =============================================================================
// try_acquire()
// =============================================================================

#[test]
fn test_try_acquire_reports_zero_size() {
    let result = try_acquire(0, 1);

    assert!(matches!(result, Err(ReserveError::ZeroSize)));
}

#[test]
fn test_try_acquire_reports_overflow() {
    let result = try_acquire(usize::MAX, 1);

    assert!(matches!(result, Err(ReserveError::Overflow)));
}

#[test]
fn test_try_acquire_data_ends_at_guard_boundary() {
    for data_size in [1usize, 7, 100, 4095, 4096, 4097, 3 * 4096 + 5] {
        let ptr = try_acquire(data_size, 1).expect("Failed to try_acquire(..)");
        let end = unsafe { ptr.as_ptr().add(data_size) };

        assert_eq!(
            distance_to_page_boundary(end),
            0,
            "data of {data_size} bytes must end on a page boundary"
        );

        unsafe { release(ptr, data_size, 1) };
    }
}

#[test]
fn test_try_acquire_data_region_is_writable() {
    let data_size = 3 * page_size() + 17;
    let ptr = try_acquire(data_size, 8).expect("Failed to try_acquire(..)");

    unsafe {
        let slice = core::slice::from_raw_parts_mut(ptr.as_ptr(), data_size);
        slice.fill(0xAB);

        assert!(slice.iter().all(|b| *b == 0xAB));

        release(ptr, data_size, 8);
    }
}

#[test]
fn test_try_acquire_fresh_memory_is_zeroed() {
    let data_size = 2 * page_size();
    let ptr = try_acquire(data_size, 1).expect("Failed to try_acquire(..)");

    unsafe {
        let slice = core::slice::from_raw_parts(ptr.as_ptr(), data_size);
        assert!(slice.iter().all(|b| *b == 0));

        release(ptr, data_size, 1);
    }
}

#[test]
fn test_try_acquire_large_reservation_is_lazy() {
    // 64 GiB of address space; only the touched page gets committed.
    #[cfg(target_pointer_width = "64")]
    {
        let data_size = 64usize << 30;

        if let Ok(ptr) = try_acquire(data_size, 1) {
            unsafe {
                *ptr.as_ptr() = 1;
                *ptr.as_ptr().add(data_size - 1) = 2;

                assert_eq!(*ptr.as_ptr(), 1);
                assert_eq!(*ptr.as_ptr().add(data_size - 1), 2);

                release(ptr, data_size, 1);
            }
        }
    }
}

#[test]
fn test_try_acquire_distinct_reservations_do_not_alias() {
    let a = try_acquire(128, 1).expect("Failed to try_acquire(..)");
    let b = try_acquire(128, 1).expect("Failed to try_acquire(..)");

    assert_ne!(a, b);

    unsafe {
        a.as_ptr().write_bytes(0x11, 128);
        b.as_ptr().write_bytes(0x22, 128);

        assert_eq!(*a.as_ptr(), 0x11);
        assert_eq!(*b.as_ptr(), 0x22);

        release(a, 128, 1);
        release(b, 128, 1);
    }
}

#[cfg(target_os = "linux")]
mod address_space_limit {
    use serial_test::serial;

    use ovec_test_utils::{run_test_as_subprocess, with_address_space_limit};

    use super::*;

    #[test]
    #[ignore]
    fn subprocess_try_acquire_refused_when_address_space_exhausted() {
        let result = with_address_space_limit(0, || try_acquire(page_size(), 1));

        assert!(matches!(result, Err(ReserveError::Refused(code)) if code == libc::ENOMEM));
    }

    #[test]
    #[serial(vmem)]
    fn test_try_acquire_refused_when_address_space_exhausted() {
        let status = run_test_as_subprocess(
            "tests::guarded::address_space_limit::subprocess_try_acquire_refused_when_address_space_exhausted",
        );

        assert!(status.success(), "Subprocess should exit cleanly after assertion");
    }

    #[test]
    #[ignore]
    fn subprocess_acquire_returns_null_when_address_space_exhausted() {
        let ptr = with_address_space_limit(0, || acquire(page_size(), 1));

        assert!(ptr.is_null());
    }

    #[test]
    #[serial(vmem)]
    fn test_acquire_returns_null_when_address_space_exhausted() {
        let status = run_test_as_subprocess(
            "tests::guarded::address_space_limit::subprocess_acquire_returns_null_when_address_space_exhausted",
        );

        assert!(status.success(), "Subprocess should exit cleanly after assertion");
    }
}

// =============================================================================
// release()
// =============================================================================

#[test]
fn test_release_then_reacquire() {
    for _ in 0..64 {
        let ptr = try_acquire(1 << 20, 1).expect("Failed to try_acquire(..)");

        unsafe {
            *ptr.as_ptr() = 0x42;
            release(ptr, 1 << 20, 1);
        }
    }
}

// =============================================================================
// Death tests (guard region, fatal paths)
// =============================================================================

#[cfg(unix)]
mod death {
    use serial_test::serial;

    use ovec_test_utils::{run_test_as_subprocess, termination_signal};

    use super::*;
    use crate::behaviour::{VmemBehaviour, set_behaviour};

    fn is_access_violation(signal: Option<i32>) -> bool {
        matches!(signal, Some(libc::SIGSEGV) | Some(libc::SIGBUS))
    }

    #[test]
    #[ignore]
    fn subprocess_write_past_data_hits_guard() {
        let ptr = try_acquire(1, 1).expect("Failed to try_acquire(..)");

        unsafe {
            ptr.as_ptr().write_volatile(b'a');
            ptr.as_ptr().add(1).write_volatile(b'b');
        }
    }

    #[test]
    #[serial(vmem)]
    fn test_write_past_data_hits_guard() {
        let status = run_test_as_subprocess(
            "tests::guarded::death::subprocess_write_past_data_hits_guard",
        );

        assert!(
            is_access_violation(termination_signal(&status)),
            "overrun must fault, got {status:?}"
        );
    }

    #[test]
    #[ignore]
    fn subprocess_read_past_unaligned_data_hits_guard() {
        // 12 bytes of data: the slack absorbs the rest of the page, byte 12 is guarded.
        let ptr = try_acquire(12, 4).expect("Failed to try_acquire(..)");

        unsafe {
            let _ = ptr.as_ptr().add(11).read_volatile();
            let _ = ptr.as_ptr().add(12).read_volatile();
        }
    }

    #[test]
    #[serial(vmem)]
    fn test_read_past_unaligned_data_hits_guard() {
        let status = run_test_as_subprocess(
            "tests::guarded::death::subprocess_read_past_unaligned_data_hits_guard",
        );

        assert!(
            is_access_violation(termination_signal(&status)),
            "overrun must fault, got {status:?}"
        );
    }

    #[test]
    #[ignore]
    fn subprocess_protect_failure_aborts() {
        set_behaviour(VmemBehaviour::FailAtProtect);

        let _ = acquire(4096, 1);
    }

    #[test]
    #[serial(vmem)]
    fn test_protect_failure_aborts() {
        let status =
            run_test_as_subprocess("tests::guarded::death::subprocess_protect_failure_aborts");

        assert_eq!(termination_signal(&status), Some(libc::SIGABRT));
    }

    #[test]
    #[ignore]
    fn subprocess_release_failure_aborts() {
        let ptr = try_acquire(4096, 1).expect("Failed to try_acquire(..)");

        set_behaviour(VmemBehaviour::FailAtRelease);

        unsafe { release(ptr, 4096, 1) };
    }

    #[test]
    #[serial(vmem)]
    fn test_release_failure_aborts() {
        let status =
            run_test_as_subprocess("tests::guarded::death::subprocess_release_failure_aborts");

        assert_eq!(termination_signal(&status), Some(libc::SIGABRT));
    }

    #[test]
    #[ignore]
    fn subprocess_release_with_unreservable_layout_aborts() {
        let ptr = try_acquire(4096, 1).expect("Failed to try_acquire(..)");

        unsafe { release(ptr, 0, 1) };
    }

    #[test]
    #[serial(vmem)]
    fn test_release_with_unreservable_layout_aborts() {
        let status = run_test_as_subprocess(
            "tests::guarded::death::subprocess_release_with_unreservable_layout_aborts",
        );

        assert_eq!(termination_signal(&status), Some(libc::SIGABRT));
    }
}
