// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Storage - exclusive owner of one guarded reservation.
//!
//! Tracks `(ptr, len, max_size)`; never touches elements. Dropping elements
//! is the job of [`crate::OVec`], releasing the reservation is ours.

use core::marker::PhantomData;
use core::ptr::{self, NonNull};

use crate::error::AllocError;

/// Owns zero or one reservation sized for `max_size` elements of `T`.
///
/// Invariants:
/// - `max_size == 0` iff `ptr` is null (unbacked).
/// - `len <= max_size`.
pub(crate) struct Storage<T> {
    ptr: *mut T,
    len: usize,
    max_size: usize,
    guard_elements: usize,
    _marker: PhantomData<T>,
}

impl<T> Storage<T> {
    /// A holder without reservation.
    pub(crate) const fn unbacked() -> Self {
        Self {
            ptr: ptr::null_mut(),
            len: 0,
            max_size: 0,
            guard_elements: 0,
            _marker: PhantomData,
        }
    }

    /// Reserves room for `max_size` elements followed by a guard of
    /// `guard_elements` elements (at least one).
    pub(crate) fn try_with_max_size(
        max_size: usize,
        guard_elements: usize,
    ) -> Result<Self, AllocError> {
        let align = align_of::<T>();
        let page_size = ovec_vmem::page_size();

        // The reservation base is only page aligned.
        if align > page_size {
            return Err(AllocError::UnsupportedAlignment { align, page_size });
        }

        let guard_elements = guard_elements.max(1);
        let data_size = max_size
            .checked_mul(size_of::<T>())
            .ok_or(AllocError::CapacityOverflow)?;
        let guard_size = guard_elements
            .checked_mul(size_of::<T>())
            .ok_or(AllocError::CapacityOverflow)?;

        let ptr = ovec_vmem::try_acquire(data_size, guard_size)?;

        // slack = rounded_data - max_size * size_of::<T>(): both terms are
        // multiples of align, so base + slack keeps T's alignment.
        debug_assert!(ptr.cast::<T>().is_aligned());

        Ok(Self {
            ptr: ptr.as_ptr().cast::<T>(),
            len: 0,
            max_size,
            guard_elements,
            _marker: PhantomData,
        })
    }

    /// Same as [`Self::try_with_max_size`], unbacked on failure.
    pub(crate) fn with_max_size(max_size: usize, guard_elements: usize) -> Self {
        Self::try_with_max_size(max_size, guard_elements).unwrap_or_else(|e| {
            log::debug!("OVec of {max_size} elements left unbacked: {e}");
            Self::unbacked()
        })
    }

    #[inline(always)]
    pub(crate) fn ptr(&self) -> *mut T {
        self.ptr
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub(crate) fn max_size(&self) -> usize {
        self.max_size
    }

    #[inline(always)]
    pub(crate) fn is_backed(&self) -> bool {
        !self.ptr.is_null()
    }

    /// # Safety
    /// `len <= max_size`, and exactly the slots `[0, len)` hold live values.
    #[inline(always)]
    pub(crate) unsafe fn set_len(&mut self, len: usize) {
        debug_assert!(len <= self.max_size);
        self.len = len;
    }

    pub(crate) fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }
}

impl<T> Drop for Storage<T> {
    fn drop(&mut self) {
        let Some(ptr) = NonNull::new(self.ptr) else {
            return;
        };

        // Sizes were checked for overflow when the reservation was made.
        let data_size = self.max_size * size_of::<T>();
        let guard_size = self.guard_elements * size_of::<T>();

        unsafe { ovec_vmem::release(ptr.cast::<u8>(), data_size, guard_size) };

        self.ptr = ptr::null_mut();
        self.len = 0;
        self.max_size = 0;
    }
}
