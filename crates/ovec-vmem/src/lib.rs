// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Guarded virtual memory reservations.
//!
//! This crate reserves address space from the operating system for a
//! caller-sized data region and places an inaccessible guard region directly
//! after it. Physical memory is committed lazily by the OS, so reserving a
//! large region costs nothing until pages are touched.
//!
//! # Layout
//!
//! ```text
//!   base                                 ptr            guard start
//!   │                                    │              │
//!   ▼                                    ▼              ▼
//!   ┌────────────────────────────────────┬──────────────┬──────────────┐
//!   │            slack (unused)          │  data_size   │    guard     │
//!   │                                    │  read/write  │  no access   │
//!   └────────────────────────────────────┴──────────────┴──────────────┘
//!   ◄──────────── rounded_data (page multiple) ─────────►◄ rounded_guard ►
//! ```
//!
//! The returned pointer is offset by the rounding slack, so the last valid
//! byte of the caller's data is immediately followed by the first guarded
//! byte. A single-element overrun faults instead of silently writing into
//! rounding padding.
//!
//! # Failure Tiers
//!
//! - **Recoverable**: zero size, arithmetic overflow while rounding, or the OS
//!   refusing the reservation. [`acquire`] returns null, [`try_acquire`]
//!   returns a [`ReserveError`].
//! - **Fatal**: the OS failing to commit the data region, to protect the guard
//!   region, or to release a reservation it handed out. The error is printed
//!   to stderr and the process aborts.
//!
//! # Backends
//!
//! - Unix: `mmap` / `mprotect(PROT_NONE)` / `munmap`
//! - Windows: `VirtualAlloc(MEM_RESERVE)` / `VirtualAlloc(MEM_COMMIT)` /
//!   `VirtualFree(MEM_RELEASE)`
//!
//! # Example
//!
//! ```rust
//! use ovec_vmem::{release, try_acquire, ReserveError};
//!
//! fn example() -> Result<(), ReserveError> {
//!     let ptr = try_acquire(100, 1)?;
//!
//!     unsafe {
//!         // 100 writable bytes, the 101st is guarded.
//!         core::ptr::write_bytes(ptr.as_ptr(), 0xAB, 100);
//!         assert_eq!(*ptr.as_ptr().add(99), 0xAB);
//!
//!         release(ptr, 100, 1);
//!     }
//!
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
mod tests;

#[cfg(any(test, feature = "test-utils"))]
mod behaviour;

mod error;
mod fatal;
mod guarded;
mod layout;
mod os;

pub use error::{FatalError, ReserveError};
pub use guarded::{acquire, release, try_acquire};
pub use layout::GuardedLayout;
pub use os::page_size;

#[cfg(any(test, feature = "test-utils"))]
pub use behaviour::{INJECTED_ERROR_CODE, VmemBehaviour, behaviour, set_behaviour};
