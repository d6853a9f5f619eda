// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Unrecoverable error reporting.

use crate::error::FatalError;

/// Expands to `"file:line"` of the call site.
macro_rules! here {
    () => {
        concat!(file!(), ":", line!())
    };
}

pub(crate) use here;

/// Reports `error` on stderr and aborts the process. Never unwinds.
#[cold]
#[inline(never)]
pub(crate) fn fatal(location: &'static str, error: FatalError) -> ! {
    log::error!("{location}: fatal error: {error}");
    eprintln!("{location}: fatal error: {error}");

    std::process::abort()
}
