// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Overcommit vector: a dynamic array that never reallocates.
//!
//! [`OVec`] reserves virtual address space for its maximum size up front and
//! relies on the OS to back pages with physical memory only when they are
//! first touched. Growing is a write plus a length bump; it never copies or
//! moves existing elements, so pointers and references into an `OVec` stay
//! valid for as long as the element lives.
//!
//! A no-access guard region sits right after the last slot. Writing one
//! element past `max_size()` through raw pointers faults instead of
//! corrupting neighbouring memory.
//!
//! # Core Types
//!
//! - [`OVec`]: the container
//! - [`AllocError`]: why a reservation could not be made
//! - [`CapacityError`]: returned by [`OVec::try_push`], hands the element back
//!
//! # Example
//!
//! ```rust
//! use ovec::{AllocError, OVec};
//!
//! fn example() -> Result<(), AllocError> {
//!     // 1M slots of address space; only touched pages cost memory.
//!     let mut v = OVec::<u64>::try_with_max_size(1 << 20)?;
//!
//!     v.push(1);
//!     v.emplace_back(|| 2);
//!     v.extend([3, 4, 5]);
//!
//!     assert_eq!(v, [1, 2, 3, 4, 5]);
//!     assert_eq!(v.iter().sum::<u64>(), 15);
//!
//!     v.pop_back();
//!     assert_eq!(v.back(), &4);
//!
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! # Unbacked Containers
//!
//! [`OVec::new`], [`Default`], and a failed
//! [`OVec::with_max_size_or_null`] produce an `OVec` without storage:
//! null pointer, `max_size() == 0`. It can be queried, compared, swapped and
//! dropped; inserting into it panics.
//!
//! ## License
//!
//! GPL-3.0-only

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
mod tests;

mod error;
mod ovec;
mod storage;

pub use error::{AllocError, CapacityError};
pub use ovec::{DEFAULT_GUARD_ELEMENTS, OVec, swap};
pub use ovec_vmem::{ReserveError, page_size};
