// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Windows backend: VirtualAlloc / VirtualFree.
//!
//! The full range is reserved `PAGE_NOACCESS`, then only the data region is
//! committed read/write. The guard region stays reserved and inaccessible.

use core::mem::MaybeUninit;
use core::ptr::{self, NonNull};

use windows_sys::Win32::System::Memory::{
    MEM_COMMIT, MEM_RELEASE, MEM_RESERVE, PAGE_NOACCESS, PAGE_READWRITE, VirtualAlloc,
    VirtualFree,
};
use windows_sys::Win32::System::SystemInformation::{GetSystemInfo, SYSTEM_INFO};

use super::{VirtualMemory, last_os_error};

pub(crate) struct Windows;

impl VirtualMemory for Windows {
    fn page_size() -> usize {
        let info = unsafe {
            let mut info = MaybeUninit::<SYSTEM_INFO>::uninit();
            GetSystemInfo(info.as_mut_ptr());
            info.assume_init()
        };

        info.dwPageSize as usize
    }

    unsafe fn reserve(len: usize) -> Result<NonNull<u8>, i32> {
        let ptr = unsafe { VirtualAlloc(ptr::null(), len, MEM_RESERVE, PAGE_NOACCESS) };

        NonNull::new(ptr.cast::<u8>()).ok_or_else(last_os_error)
    }

    unsafe fn commit(base: NonNull<u8>, len: usize) -> Result<(), i32> {
        let ptr = unsafe { VirtualAlloc(base.as_ptr().cast(), len, MEM_COMMIT, PAGE_READWRITE) };

        if ptr.is_null() {
            return Err(last_os_error());
        }

        Ok(())
    }

    unsafe fn protect_none(_start: NonNull<u8>, _len: usize) -> Result<(), i32> {
        // Reserved-but-uncommitted pages are already PAGE_NOACCESS.
        Ok(())
    }

    unsafe fn release(base: NonNull<u8>, _len: usize) -> Result<(), i32> {
        // MEM_RELEASE requires size 0 and frees the whole reservation.
        let failed = unsafe { VirtualFree(base.as_ptr().cast(), 0, MEM_RELEASE) } == 0;

        if failed {
            return Err(last_os_error());
        }

        Ok(())
    }
}
