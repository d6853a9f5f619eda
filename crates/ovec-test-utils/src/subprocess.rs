// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::process::{Command, ExitStatus};

/// Runs an ignored test of the current test binary as a subprocess and
/// returns its exit status.
///
/// `test_name` is the full path of the test inside its crate, e.g.
/// `"tests::ovec::death::subprocess_overrun"`.
pub fn run_test_as_subprocess(test_name: &str) -> ExitStatus {
    let exe = std::env::current_exe().expect("Failed to current_exe()");

    Command::new(exe)
        .args([
            "--exact",
            test_name,
            "--ignored",
            "--test-threads=1",
            "--nocapture",
        ])
        .status()
        .expect("Failed to run subprocess")
}

/// The signal that terminated the process, if any.
#[cfg(unix)]
pub fn termination_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;

    status.signal()
}

/// The signal that terminated the process, if any.
///
/// Windows has no signals; an access violation or abort surfaces as a
/// non-success exit code instead.
#[cfg(not(unix))]
pub fn termination_signal(_status: &ExitStatus) -> Option<i32> {
    None
}
