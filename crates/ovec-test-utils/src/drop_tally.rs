// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::cell::Cell;
use std::rc::Rc;

/// Counts drops of the [`Tracked`] values it hands out.
#[derive(Debug, Clone, Default)]
pub struct DropTally {
    drops: Rc<Cell<usize>>,
}

impl DropTally {
    /// Creates a tally with zero drops.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a value whose drop is counted by this tally.
    pub fn tracked(&self, value: u32) -> Tracked {
        Tracked {
            value,
            drops: Rc::clone(&self.drops),
        }
    }

    /// Number of tracked values dropped so far.
    pub fn drops(&self) -> usize {
        self.drops.get()
    }

    /// Resets the drop count to zero.
    pub fn reset(&self) {
        self.drops.set(0);
    }
}

/// A value that increments its [`DropTally`] when dropped.
#[derive(Debug)]
pub struct Tracked {
    value: u32,
    drops: Rc<Cell<usize>>,
}

impl Tracked {
    /// The payload given at creation.
    pub fn value(&self) -> u32 {
        self.value
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}
