// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

/// Runs `f` with the soft `RLIMIT_AS` lowered to `limit` bytes, then restores
/// the previous limit.
///
/// The limit is process-wide: call this from a test that runs alone in a
/// subprocess (see [`crate::run_test_as_subprocess`]).
pub fn with_address_space_limit<R>(limit: libc::rlim_t, f: impl FnOnce() -> R) -> R {
    let mut original = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    unsafe { libc::getrlimit(libc::RLIMIT_AS, &mut original) };

    let tiny = libc::rlimit {
        rlim_cur: limit,
        rlim_max: original.rlim_max,
    };
    unsafe { libc::setrlimit(libc::RLIMIT_AS, &tiny) };

    let result = f();

    unsafe { libc::setrlimit(libc::RLIMIT_AS, &original) };

    result
}
