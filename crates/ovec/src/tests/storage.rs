// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use ovec_vmem::ReserveError;

use crate::error::AllocError;
use crate::storage::Storage;

#[repr(align(1048576))]
struct OverAligned(#[allow(dead_code)] u8);

// =============================================================================
// unbacked()
// =============================================================================

#[test]
fn test_unbacked() {
    let storage = Storage::<u32>::unbacked();

    assert!(!storage.is_backed());
    assert!(storage.ptr().is_null());
    assert_eq!(storage.len(), 0);
    assert_eq!(storage.max_size(), 0);
}

// =============================================================================
// try_with_max_size()
// =============================================================================

#[test]
fn test_try_with_max_size_backs_storage() {
    let storage = Storage::<u64>::try_with_max_size(100, 1).expect("Failed to try_with_max_size(..)");

    assert!(storage.is_backed());
    assert!(storage.ptr().is_aligned());
    assert_eq!(storage.len(), 0);
    assert_eq!(storage.max_size(), 100);
}

#[test]
fn test_try_with_max_size_zero_is_rejected() {
    let result = Storage::<u64>::try_with_max_size(0, 1);

    assert!(matches!(
        result,
        Err(AllocError::Reserve(ReserveError::ZeroSize))
    ));
}

#[test]
fn test_try_with_max_size_zero_sized_type_is_rejected() {
    let result = Storage::<()>::try_with_max_size(10, 1);

    assert!(matches!(
        result,
        Err(AllocError::Reserve(ReserveError::ZeroSize))
    ));
}

#[test]
fn test_try_with_max_size_byte_count_overflow() {
    let result = Storage::<u64>::try_with_max_size(usize::MAX / 4, 1);

    assert!(matches!(result, Err(AllocError::CapacityOverflow)));
}

#[test]
fn test_try_with_max_size_guard_overflow() {
    let result = Storage::<u64>::try_with_max_size(1, usize::MAX / 4);

    assert!(matches!(result, Err(AllocError::CapacityOverflow)));
}

#[test]
fn test_try_with_max_size_unreservable_size() {
    let result = Storage::<u8>::try_with_max_size(usize::MAX, 1);

    assert!(matches!(
        result,
        Err(AllocError::Reserve(ReserveError::Overflow))
    ));
}

#[test]
fn test_try_with_max_size_rejects_alignment_above_page() {
    let result = Storage::<OverAligned>::try_with_max_size(1, 1);

    assert!(matches!(
        result,
        Err(AllocError::UnsupportedAlignment { align: 1048576, .. })
    ));
}

// =============================================================================
// with_max_size()
// =============================================================================

#[test]
fn test_with_max_size_falls_back_to_unbacked() {
    let storage = Storage::<u8>::with_max_size(usize::MAX, 1);

    assert!(!storage.is_backed());
    assert_eq!(storage.max_size(), 0);
}

#[test]
fn test_with_max_size_zero_guard_is_clamped() {
    let storage = Storage::<u16>::with_max_size(3, 0);

    assert!(storage.is_backed());
    assert_eq!(storage.max_size(), 3);
}

// =============================================================================
// set_len()
// =============================================================================

#[test]
fn test_set_len() {
    let mut storage = Storage::<u8>::with_max_size(4, 1);

    unsafe {
        storage.ptr().write_bytes(7, 4);
        storage.set_len(4);
    }
    assert_eq!(storage.len(), 4);

    unsafe { storage.set_len(0) };
    assert_eq!(storage.len(), 0);
}

// =============================================================================
// swap()
// =============================================================================

#[test]
fn test_swap_exchanges_reservations() {
    let mut backed = Storage::<u32>::with_max_size(8, 1);
    let mut unbacked = Storage::<u32>::unbacked();
    let ptr = backed.ptr();

    backed.swap(&mut unbacked);

    assert!(!backed.is_backed());
    assert_eq!(backed.max_size(), 0);
    assert_eq!(unbacked.ptr(), ptr);
    assert_eq!(unbacked.max_size(), 8);
}

// =============================================================================
// Drop
// =============================================================================

#[test]
fn test_drop_releases_many_reservations() {
    // 4096 x 64 GiB exceeds a 47-bit address space: a leak would run dry.
    #[cfg(target_pointer_width = "64")]
    {
        if !Storage::<u8>::with_max_size(64 << 30, 1).is_backed() {
            return;
        }

        for _ in 0..4096 {
            let storage = Storage::<u8>::with_max_size(64 << 30, 1);
            assert!(storage.is_backed());
        }
    }
}
