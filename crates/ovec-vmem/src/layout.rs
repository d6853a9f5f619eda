// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! GuardedLayout - page-rounded sizes of a guarded reservation.

use crate::error::ReserveError;
use crate::os::page_size;

/// Sizes of a guarded reservation, rounded to page multiples.
///
/// Computed once when reserving and recomputed identically when releasing,
/// so the caller only needs to remember the sizes it asked for.
///
/// # Example
///
/// ```rust
/// use ovec_vmem::GuardedLayout;
///
/// let layout = GuardedLayout::with_page_size(5000, 8, 4096).unwrap();
///
/// assert_eq!(layout.rounded_data(), 8192);
/// assert_eq!(layout.rounded_guard(), 4096);
/// assert_eq!(layout.slack(), 3192);
/// assert_eq!(layout.total(), 12288);
/// ```
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GuardedLayout {
    data_size: usize,
    guard_size: usize,
    rounded_data: usize,
    rounded_guard: usize,
}

impl GuardedLayout {
    /// Computes the layout using the platform page size.
    pub fn new(data_size: usize, guard_size: usize) -> Result<Self, ReserveError> {
        Self::with_page_size(data_size, guard_size, page_size())
    }

    /// Computes the layout for an explicit page size.
    ///
    /// # Errors
    ///
    /// - [`ReserveError::ZeroSize`] if `data_size == 0`.
    /// - [`ReserveError::Overflow`] if rounding either size, or adding the
    ///   rounded sizes, exceeds `isize::MAX`.
    pub fn with_page_size(
        data_size: usize,
        guard_size: usize,
        page_size: usize,
    ) -> Result<Self, ReserveError> {
        debug_assert!(page_size > 0, "page size must be non-zero");

        if data_size == 0 {
            return Err(ReserveError::ZeroSize);
        }

        let rounded_data = ceil_multiple(data_size, page_size).ok_or(ReserveError::Overflow)?;
        let rounded_guard = ceil_multiple(guard_size, page_size).ok_or(ReserveError::Overflow)?;

        let total = rounded_data
            .checked_add(rounded_guard)
            .ok_or(ReserveError::Overflow)?;

        // Pointer offsets inside the reservation must fit in isize.
        if total > isize::MAX as usize {
            return Err(ReserveError::Overflow);
        }

        Ok(Self {
            data_size,
            guard_size,
            rounded_data,
            rounded_guard,
        })
    }

    /// Requested data bytes.
    #[inline]
    pub fn data_size(&self) -> usize {
        self.data_size
    }

    /// Requested guard bytes.
    #[inline]
    pub fn guard_size(&self) -> usize {
        self.guard_size
    }

    /// Data region size rounded up to a page multiple.
    #[inline]
    pub fn rounded_data(&self) -> usize {
        self.rounded_data
    }

    /// Guard region size rounded up to a page multiple.
    #[inline]
    pub fn rounded_guard(&self) -> usize {
        self.rounded_guard
    }

    /// Bytes reserved from the OS in one unit.
    #[inline]
    pub fn total(&self) -> usize {
        self.rounded_data + self.rounded_guard
    }

    /// Offset from the reservation base to the pointer handed to the caller.
    #[inline]
    pub fn slack(&self) -> usize {
        self.rounded_data - self.data_size
    }
}

/// Smallest multiple of `n` that is `>= size`, or `None` on overflow.
#[inline]
pub(crate) fn ceil_multiple(size: usize, n: usize) -> Option<usize> {
    size.div_ceil(n).checked_mul(n)
}
