// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for ovec.

use ovec_vmem::ReserveError;
use thiserror::Error;

/// Reasons an `OVec` could not be backed by a reservation.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum AllocError {
    /// The guarded allocator rejected or the OS refused the reservation.
    #[error("reservation failed: {0}")]
    Reserve(#[from] ReserveError),

    /// `max_size * size_of::<T>()` (or the guard equivalent) overflows `usize`.
    ///
    /// Reached with astronomically large element counts, never by sizes that
    /// could actually be reserved.
    #[error("Integer overflow: element count times element size exceeds usize::MAX")]
    CapacityOverflow,

    /// The element type requires a larger alignment than a page provides.
    #[error("element alignment {align} exceeds the page size {page_size}")]
    UnsupportedAlignment {
        /// `align_of::<T>()`.
        align: usize,
        /// Platform page size.
        page_size: usize,
    },
}

/// Returned by `OVec::try_push` when there is no free slot. Hands the
/// rejected element back.
#[derive(Error)]
#[error("Capacity exceeded: OVec is full or not backed by storage")]
pub struct CapacityError<T> {
    element: T,
}

impl<T> CapacityError<T> {
    pub(crate) fn new(element: T) -> Self {
        Self { element }
    }

    /// The element that could not be inserted.
    pub fn element(&self) -> &T {
        &self.element
    }

    /// Recovers the element that could not be inserted.
    pub fn into_element(self) -> T {
        self.element
    }
}

impl<T> core::fmt::Debug for CapacityError<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CapacityError").finish_non_exhaustive()
    }
}
