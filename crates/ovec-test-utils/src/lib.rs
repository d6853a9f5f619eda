// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Test utilities for ovec crates.
//!
//! - [`DropTally`] / [`Tracked`]: an element type that counts its drops
//!   without global state, so tests can run in parallel.
//! - [`run_test_as_subprocess`]: re-runs an `#[ignore]`d test in a child
//!   process, for death tests and process-wide resource limits.
//! - [`with_address_space_limit`] (Linux): temporarily caps `RLIMIT_AS`.
//!
//! ## License
//!
//! GPL-3.0-only

mod drop_tally;
#[cfg(target_os = "linux")]
mod rlimit;
mod subprocess;

pub use drop_tally::{DropTally, Tracked};
#[cfg(target_os = "linux")]
pub use rlimit::with_address_space_limit;
pub use subprocess::{run_test_as_subprocess, termination_signal};
