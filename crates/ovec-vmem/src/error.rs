// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for ovec-vmem.

use thiserror::Error;

/// Recoverable reservation failures.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum ReserveError {
    /// A zero-byte data region was requested.
    #[error("requested data size is zero")]
    ZeroSize,

    /// Rounding to page multiples, or the sum of both regions, overflows.
    #[error("reservation size overflows the address space")]
    Overflow,

    /// The operating system refused the reservation.
    #[error("reservation refused: os error code {0}")]
    Refused(i32),
}

/// Failures after a successful reservation. These are never returned to the
/// caller; they are reported and the process aborts.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum FatalError {
    /// Committing the data region failed.
    #[error("failed to commit allocation: os error code {0}")]
    Commit(i32),

    /// Applying no-access protection to the guard region failed.
    #[error("failed to enable guard page: os error code {0}")]
    Protect(i32),

    /// Releasing the reservation failed.
    #[error("failed to release memory: os error code {0}")]
    Release(i32),

    /// A release was requested with sizes that could never have been reserved.
    #[error("release with unreservable layout: {0}")]
    Layout(ReserveError),
}
