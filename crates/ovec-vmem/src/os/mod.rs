// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Platform virtual memory backends.
//!
//! Each backend exposes the same four primitives. The free functions in this
//! module dispatch to the backend selected at build time and are the only
//! place failure injection hooks in.

use core::ptr::NonNull;
use core::sync::atomic::{AtomicUsize, Ordering};

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
type Platform = unix::Posix;
#[cfg(windows)]
type Platform = windows::Windows;

#[cfg(not(any(unix, windows)))]
compile_error!("ovec-vmem supports unix and windows targets only");

#[cfg(any(test, feature = "test-utils"))]
use crate::behaviour::{INJECTED_ERROR_CODE, VmemBehaviour, behaviour};

/// Raw OS virtual memory primitives.
///
/// Errors carry the raw OS error code (`errno` / `GetLastError`).
pub(crate) trait VirtualMemory {
    /// Queries the page size from the OS.
    fn page_size() -> usize;

    /// Reserves `len` bytes of address space as a single unit.
    ///
    /// # Safety
    /// `len` must be a non-zero page multiple.
    unsafe fn reserve(len: usize) -> Result<NonNull<u8>, i32>;

    /// Makes `[base, base + len)` readable and writable.
    ///
    /// # Safety
    /// The range must lie inside a reservation from `reserve`.
    unsafe fn commit(base: NonNull<u8>, len: usize) -> Result<(), i32>;

    /// Removes all access from `[start, start + len)`.
    ///
    /// # Safety
    /// The range must lie inside a reservation from `reserve`.
    unsafe fn protect_none(start: NonNull<u8>, len: usize) -> Result<(), i32>;

    /// Releases a whole reservation.
    ///
    /// # Safety
    /// `base` and `len` must be exactly what `reserve` handed out and
    /// received. The range must not be accessed afterwards.
    unsafe fn release(base: NonNull<u8>, len: usize) -> Result<(), i32>;
}

static PAGE_SIZE: AtomicUsize = AtomicUsize::new(0);

/// Returns the platform page size in bytes.
///
/// Queried from the OS on first use and cached.
#[inline]
pub fn page_size() -> usize {
    let cached = PAGE_SIZE.load(Ordering::Relaxed);

    if cached != 0 {
        return cached;
    }

    let size = Platform::page_size();
    PAGE_SIZE.store(size, Ordering::Relaxed);

    size
}

/// Last OS error code of the calling thread.
pub(crate) fn last_os_error() -> i32 {
    std::io::Error::last_os_error().raw_os_error().unwrap_or(0)
}

pub(crate) unsafe fn reserve(len: usize) -> Result<NonNull<u8>, i32> {
    #[cfg(any(test, feature = "test-utils"))]
    if behaviour() == VmemBehaviour::FailAtReserve {
        return Err(INJECTED_ERROR_CODE);
    }

    unsafe { Platform::reserve(len) }
}

pub(crate) unsafe fn commit(base: NonNull<u8>, len: usize) -> Result<(), i32> {
    unsafe { Platform::commit(base, len) }
}

pub(crate) unsafe fn protect_none(start: NonNull<u8>, len: usize) -> Result<(), i32> {
    #[cfg(any(test, feature = "test-utils"))]
    if behaviour() == VmemBehaviour::FailAtProtect {
        return Err(INJECTED_ERROR_CODE);
    }

    unsafe { Platform::protect_none(start, len) }
}

pub(crate) unsafe fn release(base: NonNull<u8>, len: usize) -> Result<(), i32> {
    #[cfg(any(test, feature = "test-utils"))]
    if behaviour() == VmemBehaviour::FailAtRelease {
        return Err(INJECTED_ERROR_CODE);
    }

    unsafe { Platform::release(base, len) }
}
