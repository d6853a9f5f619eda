// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Failure injection for OS calls (test-utils only).

use core::cell::Cell;

/// OS error code reported by injected failures.
pub const INJECTED_ERROR_CODE: i32 = -1;

/// Test behaviour for injecting failures into the OS backend.
///
/// This is only available with the `test-utils` feature. The behaviour is
/// sticky and thread-local: it applies to every subsequent call made by the
/// current thread until changed.
///
/// # Example
///
/// ```rust,ignore
/// // test-utils feature required in dev-dependencies
/// use ovec_vmem::{acquire, set_behaviour, VmemBehaviour};
///
/// set_behaviour(VmemBehaviour::FailAtReserve);
/// assert!(acquire(4096, 1).is_null());
///
/// set_behaviour(VmemBehaviour::None);
/// ```
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum VmemBehaviour {
    /// Normal behaviour - no injected failures.
    #[default]
    None,
    /// Reservations are refused as if the address space were exhausted.
    FailAtReserve,
    /// Guard protection fails after a successful reservation (fatal).
    FailAtProtect,
    /// Releasing a reservation fails (fatal).
    FailAtRelease,
}

thread_local! {
    static BEHAVIOUR: Cell<VmemBehaviour> = const { Cell::new(VmemBehaviour::None) };
}

/// Sets the behaviour for the current thread.
pub fn set_behaviour(behaviour: VmemBehaviour) {
    BEHAVIOUR.with(|cell| cell.set(behaviour));
}

/// Returns the behaviour active on the current thread.
pub fn behaviour() -> VmemBehaviour {
    BEHAVIOUR.with(Cell::get)
}
