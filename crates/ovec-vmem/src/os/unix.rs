// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! POSIX backend: mmap / mprotect / munmap.

use core::ptr::{self, NonNull};

use super::{VirtualMemory, last_os_error};

/// Fallback when `sysconf` cannot report a page size.
const DEFAULT_PAGE_SIZE: usize = 4096;

// MAP_NORESERVE keeps Linux's heuristic overcommit from refusing reservations
// larger than RAM + swap. Pages are still committed lazily on first touch.
#[cfg(any(target_os = "linux", target_os = "android"))]
const MAP_FLAGS: libc::c_int = libc::MAP_PRIVATE | libc::MAP_ANONYMOUS | libc::MAP_NORESERVE;
#[cfg(not(any(target_os = "linux", target_os = "android")))]
const MAP_FLAGS: libc::c_int = libc::MAP_PRIVATE | libc::MAP_ANONYMOUS;

pub(crate) struct Posix;

impl VirtualMemory for Posix {
    fn page_size() -> usize {
        let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };

        if size <= 0 {
            return DEFAULT_PAGE_SIZE;
        }

        size as usize
    }

    unsafe fn reserve(len: usize) -> Result<NonNull<u8>, i32> {
        let ptr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                MAP_FLAGS,
                -1,
                0,
            )
        };

        if ptr == libc::MAP_FAILED {
            return Err(last_os_error());
        }

        NonNull::new(ptr.cast::<u8>()).ok_or_else(last_os_error)
    }

    unsafe fn commit(_base: NonNull<u8>, _len: usize) -> Result<(), i32> {
        // mmap(PROT_READ | PROT_WRITE) already made the whole range accessible.
        Ok(())
    }

    unsafe fn protect_none(start: NonNull<u8>, len: usize) -> Result<(), i32> {
        let failed =
            unsafe { libc::mprotect(start.as_ptr().cast(), len, libc::PROT_NONE) } != 0;

        if failed {
            return Err(last_os_error());
        }

        Ok(())
    }

    unsafe fn release(base: NonNull<u8>, len: usize) -> Result<(), i32> {
        let failed = unsafe { libc::munmap(base.as_ptr().cast(), len) } != 0;

        if failed {
            return Err(last_os_error());
        }

        Ok(())
    }
}
