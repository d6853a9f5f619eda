// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! acquire / release of guarded reservations.

use core::ptr::{self, NonNull};

use crate::error::{FatalError, ReserveError};
use crate::fatal::{fatal, here};
use crate::layout::GuardedLayout;
use crate::os;

/// Reserves `data_size` usable bytes followed by a guard of at least
/// `guard_size` bytes.
///
/// Returns null on any recoverable failure. See [`try_acquire`] for the
/// reason-reporting variant.
///
/// # Example
///
/// ```rust
/// use ovec_vmem::{acquire, release};
/// use core::ptr::NonNull;
///
/// assert!(acquire(0, 1).is_null());
/// assert!(acquire(usize::MAX, 1).is_null());
///
/// let ptr = acquire(64, 8);
/// assert!(!ptr.is_null());
///
/// unsafe { release(NonNull::new_unchecked(ptr), 64, 8) };
/// ```
#[must_use]
pub fn acquire(data_size: usize, guard_size: usize) -> *mut u8 {
    match try_acquire(data_size, guard_size) {
        Ok(ptr) => ptr.as_ptr(),
        Err(_) => ptr::null_mut(),
    }
}

/// Reserves `data_size` usable bytes followed by a guard of at least
/// `guard_size` bytes.
///
/// The returned pointer is preceded by the page-rounding slack, so exactly
/// `data_size` bytes are writable before the guard region starts.
///
/// # Errors
///
/// - [`ReserveError::ZeroSize`] if `data_size == 0`.
/// - [`ReserveError::Overflow`] if the rounded sizes do not fit the address
///   space.
/// - [`ReserveError::Refused`] if the OS refused the reservation.
///
/// # Aborts
///
/// If the OS reserves the range but then fails to commit the data region or
/// to protect the guard region, the error is printed and the process aborts.
pub fn try_acquire(data_size: usize, guard_size: usize) -> Result<NonNull<u8>, ReserveError> {
    let layout = GuardedLayout::new(data_size, guard_size).inspect_err(|e| {
        log::debug!("guarded reservation of {data_size}+{guard_size} bytes rejected: {e}");
    })?;

    let base = unsafe { os::reserve(layout.total()) }.map_err(|code| {
        log::debug!(
            "guarded reservation of {} bytes refused: os error code {code}",
            layout.total()
        );
        ReserveError::Refused(code)
    })?;

    if let Err(code) = unsafe { os::commit(base, layout.rounded_data()) } {
        fatal(here!(), FatalError::Commit(code));
    }

    if layout.rounded_guard() != 0 {
        // rounded_data < total <= isize::MAX, so the offset stays in bounds.
        let guard_start = unsafe { base.add(layout.rounded_data()) };

        if let Err(code) = unsafe { os::protect_none(guard_start, layout.rounded_guard()) } {
            fatal(here!(), FatalError::Protect(code));
        }
    }

    log::trace!(
        "reserved {} bytes at {:p} ({} data, {} guard, {} slack)",
        layout.total(),
        base,
        layout.data_size(),
        layout.rounded_guard(),
        layout.slack()
    );

    Ok(unsafe { base.add(layout.slack()) })
}

/// Releases a reservation obtained from [`acquire`] or [`try_acquire`].
///
/// # Safety
///
/// - `ptr` must have been returned by [`acquire`] / [`try_acquire`] called
///   with the same `data_size` and `guard_size`.
/// - The reservation must not have been released already.
/// - No reference into the reservation may be used afterwards.
///
/// # Aborts
///
/// If the OS fails to release the mapping the process has lost track of a
/// valid reservation; the error is printed and the process aborts.
pub unsafe fn release(ptr: NonNull<u8>, data_size: usize, guard_size: usize) {
    let layout = match GuardedLayout::new(data_size, guard_size) {
        Ok(layout) => layout,
        Err(e) => fatal(here!(), FatalError::Layout(e)),
    };

    // SAFETY: ptr was produced as base + slack for this very layout.
    let base = unsafe { ptr.sub(layout.slack()) };

    if let Err(code) = unsafe { os::release(base, layout.total()) } {
        fatal(here!(), FatalError::Release(code));
    }

    log::trace!("released {} bytes at {:p}", layout.total(), base);
}
